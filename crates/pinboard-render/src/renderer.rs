//! Renderer trait abstraction.

use kurbo::{Rect, Size};
use peniko::Color;
use pinboard_core::camera::CoordinateTransform;
use pinboard_core::canvas::CanvasDocument;
use pinboard_core::interaction::InteractionView;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error, PartialEq)]
pub enum RendererError {
    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a CanvasDocument,
    /// Model to screen mapping supplied by the host.
    pub transform: &'a dyn CoordinateTransform,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Drop target that deletes shapes (screen coordinates).
    pub trash_region: Rect,
    /// Radius of connection handles in model units.
    pub handle_radius: f64,
    /// Transient pointer feedback.
    pub interaction: InteractionView,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a CanvasDocument, transform: &'a dyn CoordinateTransform, viewport_size: Size) -> Self {
        Self {
            canvas,
            transform,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            trash_region: Rect::ZERO,
            handle_radius: 6.0,
            interaction: InteractionView::default(),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the trash region.
    pub fn with_trash_region(mut self, region: Rect) -> Self {
        self.trash_region = region;
        self
    }

    /// Set the handle radius.
    pub fn with_handle_radius(mut self, radius: f64) -> Self {
        self.handle_radius = radius;
        self
    }

    /// Set the interaction feedback for this frame.
    pub fn with_interaction(mut self, view: InteractionView) -> Self {
        self.interaction = view;
        self
    }

    /// Check the viewport can be drawn into.
    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(RendererError::InvalidViewport { width, height })
        }
    }
}

/// Trait for rendering backends.
///
/// A backend turns the active canvas and the interaction feedback into
/// whatever it draws with.
pub trait Renderer: Send + Sync {
    /// Build the drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
