//! Display-list renderer.
//!
//! Builds a flat command list per frame. Embedders replay the commands on
//! whatever surface they own (a raster canvas, an SVG writer, a test
//! harness); paths arrive already transformed into screen space.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::BezPath;
use peniko::Color;
use slateboard_core::shapes::Shape;

/// One paint command in screen space.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCmd {
    /// Clear the whole surface to a color.
    Clear(Color),
    /// Stroke a path.
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
    },
}

/// An ordered frame of paint commands.
pub type DisplayList = Vec<PaintCmd>;

/// Renderer that emits a display list.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    commands: DisplayList,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands built by the last [`Renderer::build_scene`] call.
    pub fn commands(&self) -> &[PaintCmd] {
        &self.commands
    }

    /// Take the built frame, leaving an empty list.
    pub fn take_frame(&mut self) -> DisplayList {
        std::mem::take(&mut self.commands)
    }

    fn push_shape(&mut self, shape: &Shape, ctx: &RenderContext) {
        let transform = ctx.camera.transform();
        self.commands.push(PaintCmd::Stroke {
            path: transform * shape.to_path(),
            color: ctx.stroke_color,
            // Stroke width follows the zoom so lines keep their on-screen
            // weight relative to the content
            width: ctx.stroke_width * ctx.camera.scale,
        });
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.commands.clear();
        self.commands.push(PaintCmd::Clear(ctx.background_color));

        // Committed shapes back to front, then the live preview on top
        for shape in ctx.board.shapes() {
            self.push_shape(shape, ctx);
        }
        if let Some(preview) = ctx.preview {
            self.push_shape(preview, ctx);
        }
        Ok(())
    }
}
