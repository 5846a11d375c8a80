//! Input event vocabulary for pointer and wheel handling.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A pointer down/move/up sample in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button event with no modifiers, the common case.
    pub fn primary(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether this pointer-down starts a pan: middle button, or the pan
    /// modifier held with any button.
    pub fn is_pan_trigger(&self) -> bool {
        self.button == MouseButton::Middle || self.modifiers.ctrl
    }
}

/// A wheel event in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Whether the zoom modifier is held; otherwise the wheel pans.
    pub fn is_zoom(&self) -> bool {
        self.modifiers.ctrl
    }
}
