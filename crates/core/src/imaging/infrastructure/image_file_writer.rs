use std::path::Path;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::pixel_buffer::PixelBuffer;

/// Encodes buffers with the `image` crate, picking the format from the
/// file extension.
///
/// JPEG has no alpha channel, so JPEG output drops it.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::DynamicImage::ImageRgba8(buffer.to_rgba_image());
        if drops_alpha(path) {
            img.to_rgb8().save(path)?;
        } else {
            img.save(path)?;
        }
        Ok(())
    }
}

fn drops_alpha(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}
