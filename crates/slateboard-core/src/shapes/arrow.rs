//! Arrow shape.

use super::{point_to_segment_dist, ShapeGeometry, ShapeId, STROKE_HIT_TOLERANCE};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An arrow: a line segment with a fixed-geometry arrowhead at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: ShapeId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Arrow {
    /// Arrowhead size in world units, fixed for every arrow.
    pub const HEAD_SIZE: f64 = 15.0;

    /// Create an arrow with a fresh id.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: ShapeId::random(),
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    /// Create an arrow with a specific id (for history/wire decoding).
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

    /// Get the direction vector (normalized). Zero-length arrows point right.
    pub fn direction(&self) -> Vec2 {
        let d = self.end() - self.start();
        let len = d.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            d / len
        }
    }

    /// The two barb points of the arrowhead.
    fn head_barbs(&self) -> (Point, Point) {
        let dir = self.direction();
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end() - dir * Self::HEAD_SIZE;
        (
            back + perp * (Self::HEAD_SIZE * 0.5),
            back - perp * (Self::HEAD_SIZE * 0.5),
        )
    }
}

impl ShapeGeometry for Arrow {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        let (left, right) = self.head_barbs();
        let mut rect = Rect::from_points(self.start(), self.end());
        for p in [left, right] {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        rect
    }

    fn hit_test(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start(), self.end()) <= STROKE_HIT_TOLERANCE
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());

        let (left, right) = self.head_barbs();
        path.move_to(left);
        path.line_to(self.end());
        path.line_to(right);
        path
    }
}
