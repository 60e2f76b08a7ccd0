//! Floor-plan Render Library
//!
//! Projects the element model into a 2D plan view. The projector records a
//! display list ([`Scene2d`]) that the CPU rasterizer turns into pixels for
//! export, or that the optional Vello backend replays on the GPU.

pub mod export;
pub mod palette;
pub mod projector;
pub mod raster;
mod renderer;
pub mod scene;
pub mod shapes;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use export::{ExportError, encode_png, export_png, file_name_for, write_png};
pub use projector::{PlanRenderer, paint_priority};
pub use raster::{Pixmap, Rasterizer};
pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DrawCommand, Scene2d, TextAlign};
pub use shapes::{BedSize, Glyph, PaintStyle, ShapeFamily};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
