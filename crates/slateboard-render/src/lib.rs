//! Slateboard Render Library
//!
//! Renderer abstraction for the Slateboard whiteboard. The built-in
//! implementation produces a backend-agnostic display list that embedders
//! replay onto their drawing surface.

mod display;
mod renderer;

pub use display::{DisplayList, DisplayListRenderer, PaintCmd};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
