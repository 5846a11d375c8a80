//! Line shape.

use super::{point_to_segment_dist, ShapeGeometry, ShapeId, STROKE_HIT_TOLERANCE};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: ShapeId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Line {
    /// Create a line with a fresh id.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: ShapeId::random(),
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    /// Create a line with a specific id (for history/wire decoding).
    pub fn with_id(id: ShapeId, start: Point, end: Point) -> Self {
        Self {
            id,
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

impl ShapeGeometry for Line {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) <= STROKE_HIT_TOLERANCE
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_near_segment() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 4.0)));
        assert!(!line.hit_test(Point::new(50.0, 6.0)));
    }

    #[test]
    fn test_hit_past_endpoint_clamps() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(103.0, 0.0)));
        assert!(!line.hit_test(Point::new(110.0, 0.0)));
    }

    #[test]
    fn test_zero_length_line() {
        let line = Line::new(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        assert!(line.hit_test(Point::new(13.0, 10.0)));
        assert!(!line.hit_test(Point::new(20.0, 10.0)));
    }
}
