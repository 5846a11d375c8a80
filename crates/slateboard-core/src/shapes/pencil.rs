//! Freehand pencil stroke.

use super::{ShapeGeometry, ShapeId, STROKE_HIT_TOLERANCE};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke captured as an ordered point sequence.
///
/// A committed stroke always holds at least one point (the gesture anchor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pencil {
    pub id: ShapeId,
    pub points: Vec<Point>,
}

impl Pencil {
    /// Create a stroke from captured points with a fresh id.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: ShapeId::random(),
            points,
        }
    }

    /// Create a stroke with a specific id (for history/wire decoding).
    pub fn with_id(id: ShapeId, points: Vec<Point>) -> Self {
        Self { id, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ShapeGeometry for Pencil {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        rect
    }

    /// Proximity to any sampled point, not the interpolated polyline.
    /// Cheap and good enough at pencil sampling density.
    fn hit_test(&self, point: Point) -> bool {
        self.points
            .iter()
            .any(|p| p.distance(point) <= STROKE_HIT_TOLERANCE)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        for p in &self.points[1..] {
            path.line_to(*p);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> Pencil {
        Pencil::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(40.0, 10.0),
        ])
    }

    #[test]
    fn test_hit_near_sampled_point() {
        let s = stroke();
        assert!(s.hit_test(Point::new(21.0, 3.0)));
    }

    #[test]
    fn test_miss_between_sparse_samples() {
        // Midway between samples, farther than the tolerance from both
        let s = stroke();
        assert!(!s.hit_test(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_bounds() {
        let s = stroke();
        let bounds = s.bounds();
        assert!((bounds.x1 - 40.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_point_stroke() {
        let s = Pencil::from_points(vec![Point::new(5.0, 5.0)]);
        assert!(s.hit_test(Point::new(7.0, 5.0)));
        assert_eq!(s.len(), 1);
    }
}
