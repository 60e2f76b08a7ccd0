//! PNG export of the plan view.

use crate::raster::Rasterizer;
use crate::renderer::RendererError;
use crate::scene::Scene2d;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render failed: {0}")]
    Render(#[from] RendererError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode tightly packed RGBA8 pixels as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}

/// Rasterize a plan frame and encode it as PNG.
pub fn export_png(scene: &Scene2d, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let pixmap = Rasterizer::new().render(scene, width, height)?;
    encode_png(pixmap.data(), pixmap.width(), pixmap.height())
}

/// Rasterize a plan frame and write it to `path`.
pub fn write_png(
    scene: &Scene2d,
    width: u32,
    height: u32,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    match export_png(scene, width, height).and_then(|data| Ok(std::fs::write(path, data)?)) {
        Ok(()) => {
            log::info!("Exported plan to {}", path.display());
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to export plan to {}: {}", path.display(), e);
            Err(e)
        }
    }
}

/// Download name for a project: whitespace runs become `_`, lower-cased.
pub fn file_name_for(project_name: &str) -> String {
    let stem = project_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    let mut name = String::new();
    if project_name.starts_with(char::is_whitespace) {
        name.push('_');
    }
    name.push_str(&stem);
    if project_name.ends_with(char::is_whitespace) && !stem.is_empty() {
        name.push('_');
    }
    name.push_str(".png");
    name
}
