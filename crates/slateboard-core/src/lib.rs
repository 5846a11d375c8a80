//! Slateboard Core Library
//!
//! Platform-agnostic drawing engine for the Slateboard collaborative
//! whiteboard: shape model, viewport transform, hit-testing, the pointer
//! input state machine, and the wire protocol that keeps rooms in sync.

pub mod board;
pub mod camera;
pub mod engine;
pub mod history;
pub mod input;
pub mod shapes;
pub mod sync;
pub mod tools;

pub use board::Board;
pub use camera::Camera;
pub use engine::{Engine, ViewportInfo};
pub use history::HistoryEntry;
pub use input::{Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use shapes::{Shape, ShapeId};
pub use sync::{ConnectionState, Envelope, NativeWebSocket, Operation, ProtocolError, SyncEvent, SyncTransport};
pub use tools::Tool;
