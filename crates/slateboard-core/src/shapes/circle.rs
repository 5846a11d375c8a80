//! Circle shape.

use super::{ShapeGeometry, ShapeId};
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle defined by centre and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: ShapeId,
    /// Centre, world space. Wire names keep the original spelling.
    pub centre_x: f64,
    pub centre_y: f64,
    pub radius: f64,
}

impl Circle {
    /// Minimum effective radius for hit-testing, in world units.
    pub const MIN_HIT_RADIUS: f64 = 6.0;

    /// Create a circle with a fresh id.
    pub fn new(centre_x: f64, centre_y: f64, radius: f64) -> Self {
        Self {
            id: ShapeId::random(),
            centre_x,
            centre_y,
            radius,
        }
    }

    /// Create a circle with a specific id (for history/wire decoding).
    pub fn with_id(id: ShapeId, centre_x: f64, centre_y: f64, radius: f64) -> Self {
        Self {
            id,
            centre_x,
            centre_y,
            radius,
        }
    }

    pub fn centre(&self) -> Point {
        Point::new(self.centre_x, self.centre_y)
    }
}

impl ShapeGeometry for Circle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.centre_x - self.radius,
            self.centre_y - self.radius,
            self.centre_x + self.radius,
            self.centre_y + self.radius,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        let dist = self.centre().distance(point);
        dist <= self.radius.max(Self::MIN_HIT_RADIUS)
    }

    fn to_path(&self) -> BezPath {
        KurboCircle::new(self.centre(), self.radius).to_path(0.1)
    }
}
