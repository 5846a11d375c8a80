//! Rectangle shape.

use super::{ShapeGeometry, ShapeId};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle drawn from a corner with signed extents.
///
/// Width and height keep the sign of the drag, matching the wire format;
/// geometry helpers normalize to a well-formed bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: ShapeId,
    /// Corner position in world space.
    pub x: f64,
    pub y: f64,
    /// Signed width of the drag.
    pub width: f64,
    /// Signed height of the drag.
    pub height: f64,
}

impl Rectangle {
    /// Minimum hit-test extent per axis, in world units. Keeps degenerate
    /// rectangles erasable.
    pub const MIN_HIT_EXTENT: f64 = 8.0;

    /// Create a rectangle with a fresh id.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::random(),
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle with a specific id (for history/wire decoding).
    pub fn with_id(id: ShapeId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }

    /// Get the normalized bounding box.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

impl ShapeGeometry for Rectangle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        let rect = self.as_rect();
        // Floor each dimension to the minimum extent, growing around the
        // center, so near-zero-area rectangles still register hits.
        let grow_x = ((Self::MIN_HIT_EXTENT - rect.width()) / 2.0).max(0.0);
        let grow_y = ((Self::MIN_HIT_EXTENT - rect.height()) / 2.0).max(0.0);
        rect.inflate(grow_x, grow_y).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }
}
