use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::pixel_buffer::PixelBuffer;

/// Decodes image files with the `image` crate, converting every format to RGBA8.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?
            .to_rgba8();
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(PixelBuffer::from(img))
    }
}
