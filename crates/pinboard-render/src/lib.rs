//! Pinboard Render Library
//!
//! Renderer abstraction for Pinboard canvases. The bundled backend records a
//! flat display list that hosts replay with their own drawing toolkit.

mod display_list;
mod renderer;

pub use display_list::{DisplayListRenderer, DrawCommand, kind_fill, trash_fill};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
