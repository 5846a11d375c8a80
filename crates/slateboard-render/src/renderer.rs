//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use slateboard_core::board::Board;
use slateboard_core::camera::Camera;
use slateboard_core::shapes::Shape;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The board to render.
    pub board: &'a Board,
    /// The view transform.
    pub camera: &'a Camera,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Stroke color for committed and preview shapes.
    pub stroke_color: Color,
    /// Stroke width in world units.
    pub stroke_width: f64,
    /// In-progress shape, painted on top of everything else.
    pub preview: Option<&'a Shape>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the default dark-board style.
    pub fn new(board: &'a Board, camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            board,
            camera,
            viewport_size,
            background_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_color: Color::from_rgba8(255, 255, 255, 255),
            stroke_width: 2.0,
            preview: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the stroke color.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    /// Set the preview shape.
    pub fn with_preview(mut self, preview: Option<&'a Shape>) -> Self {
        self.preview = preview;
        self
    }
}

/// Trait for rendering backends.
///
/// A frame is always a full redraw: clear, then every shape back to front,
/// then the preview. There is no dirty-region tracking.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
