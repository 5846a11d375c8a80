//! Shape definitions for the whiteboard.

mod arrow;
mod circle;
mod diamond;
mod line;
mod pencil;
mod rectangle;

pub use arrow::Arrow;
pub use circle::Circle;
pub use diamond::Diamond;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::Rectangle;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tolerance for line, arrow and pencil proximity tests, in world units.
pub const STROKE_HIT_TOLERANCE: f64 = 5.0;

/// Unique identifier for shapes.
///
/// Fresh shapes get a random uuid; shapes recovered from pre-id history
/// entries carry a deterministic `legacy_`-prefixed id (see the `history`
/// module). Identity, not structural equality, drives deletion matching,
/// so the id is an opaque string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShapeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Distance from a point to a line segment (a→b).
///
/// Projects the point onto the segment, clamps to the endpoints, and
/// measures to the nearest point. Zero-length segments fall back to plain
/// point distance.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Geometry operations every shape variant implements.
pub trait ShapeGeometry {
    /// Get the unique identifier.
    fn id(&self) -> &ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check whether a world-space point is close enough to erase or
    /// select this shape. Each variant carries its own tolerance.
    fn hit_test(&self, point: Point) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;
}

/// Tagged union of all shape types.
///
/// Serializes with the wire field names the sync protocol uses, e.g.
/// `{"type":"rectangle","id":"...","x":10,"y":10,"width":100,"height":50}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Pencil(Pencil),
    Diamond(Diamond),
    Arrow(Arrow),
    Line(Line),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Pencil(s) => s.id(),
            Shape::Diamond(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Line(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Pencil(s) => s.bounds(),
            Shape::Diamond(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point),
            Shape::Circle(s) => s.hit_test(point),
            Shape::Pencil(s) => s.hit_test(point),
            Shape::Diamond(s) => s.hit_test(point),
            Shape::Arrow(s) => s.hit_test(point),
            Shape::Line(s) => s.hit_test(point),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Pencil(s) => s.to_path(),
            Shape::Diamond(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
        }
    }
}
