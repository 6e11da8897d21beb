//! Inkroom Render Library
//!
//! Surface abstraction, the deterministic shape renderer and a vello CPU
//! backend with PNG export.

mod raster;
mod renderer;
mod surface;
mod vello_impl;

pub use raster::{encode_png, export_png};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{DrawCommand, RecordingSurface, StrokeStyle, Surface};
pub use vello_impl::VelloSurface;
