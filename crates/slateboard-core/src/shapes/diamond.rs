//! Diamond shape.

use super::{ShapeGeometry, ShapeId};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A diamond inscribed in its bounding box, defined by centre and extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diamond {
    pub id: ShapeId,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Diamond {
    /// Create a diamond with a fresh id.
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::random(),
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// Create a diamond with a specific id (for history/wire decoding).
    pub fn with_id(id: ShapeId, center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// The four vertices: top, right, bottom, left.
    pub fn vertices(&self) -> [Point; 4] {
        let hw = self.width.abs() / 2.0;
        let hh = self.height.abs() / 2.0;
        [
            Point::new(self.center_x, self.center_y - hh),
            Point::new(self.center_x + hw, self.center_y),
            Point::new(self.center_x, self.center_y + hh),
            Point::new(self.center_x - hw, self.center_y),
        ]
    }
}

impl ShapeGeometry for Diamond {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        let hw = self.width.abs() / 2.0;
        let hh = self.height.abs() / 2.0;
        Rect::new(
            self.center_x - hw,
            self.center_y - hh,
            self.center_x + hw,
            self.center_y + hh,
        )
    }

    /// Bounding-box approximation rather than the actual rhombus. Corner
    /// clicks register even though they miss the outline; acceptable for
    /// erase at whiteboard scale.
    fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    fn to_path(&self) -> BezPath {
        let [top, right, bottom, left] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(top);
        path.line_to(right);
        path.line_to(bottom);
        path.line_to(left);
        path.close_path();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let d = Diamond::new(50.0, 50.0, 40.0, 20.0);
        let [top, right, bottom, left] = d.vertices();
        assert_eq!(top, Point::new(50.0, 40.0));
        assert_eq!(right, Point::new(70.0, 50.0));
        assert_eq!(bottom, Point::new(50.0, 60.0));
        assert_eq!(left, Point::new(30.0, 50.0));
    }

    #[test]
    fn test_hit_test_uses_bounding_box() {
        let d = Diamond::new(0.0, 0.0, 100.0, 100.0);
        // A corner of the bounding box is outside the rhombus but counts
        assert!(d.hit_test(Point::new(45.0, 45.0)));
        assert!(!d.hit_test(Point::new(60.0, 0.0)));
    }
}
