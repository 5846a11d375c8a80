//! Tool selection and gesture state for the input state machine.

use crate::shapes::{Arrow, Circle, Diamond, Line, Pencil, Rectangle, Shape};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Rectangle,
    #[default]
    Circle,
    Pencil,
    Diamond,
    Arrow,
    Line,
    Eraser,
}

impl Tool {
    /// Whether this tool draws a shape (everything except the eraser).
    pub fn is_drawing(self) -> bool {
        self != Tool::Eraser
    }
}

/// State of the in-progress gesture. Transient; reset at gesture end and
/// never persisted or broadcast.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// A drawing drag. The tool is captured at pointer-down so a toolbar
    /// change mid-gesture does not retarget it.
    Drawing {
        tool: Tool,
        /// Anchor in world coordinates.
        anchor: Point,
        /// Latest pointer position in world coordinates.
        current: Point,
        /// Accumulated stroke points (pencil only).
        pencil: Vec<Point>,
    },
    /// Eraser held down; the erase is evaluated at pointer-up.
    Erasing,
    /// Pan drag via modifier-click or middle button.
    Panning {
        /// Pointer-down position in screen coordinates.
        start_screen: Point,
        /// Camera offset at pointer-down.
        start_offset: Vec2,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Build the committed shape for a finished drawing drag.
///
/// Construction rules per tool: rectangle keeps the anchor corner and the
/// signed drag extents; circle and diamond derive centre and size from the
/// drag bounding box (circle radius is half the larger extent); line and
/// arrow run anchor→current; pencil commits the accumulated points. A
/// zero-size drag still produces a shape.
pub fn construct_shape(tool: Tool, anchor: Point, current: Point, pencil: &[Point]) -> Option<Shape> {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    match tool {
        Tool::Rectangle => Some(Shape::Rectangle(Rectangle::new(anchor.x, anchor.y, dx, dy))),
        Tool::Circle => {
            let radius = dx.abs().max(dy.abs()) / 2.0;
            Some(Shape::Circle(Circle::new(
                anchor.x + dx / 2.0,
                anchor.y + dy / 2.0,
                radius,
            )))
        }
        Tool::Diamond => Some(Shape::Diamond(Diamond::new(
            anchor.x + dx / 2.0,
            anchor.y + dy / 2.0,
            dx.abs(),
            dy.abs(),
        ))),
        Tool::Arrow => Some(Shape::Arrow(Arrow::new(anchor, current))),
        Tool::Line => Some(Shape::Line(Line::new(anchor, current))),
        Tool::Pencil => Some(Shape::Pencil(Pencil::from_points(pencil.to_vec()))),
        Tool::Eraser => None,
    }
}
