use std::path::Path;

use crate::shared::pixel_buffer::PixelBuffer;

/// Decodes an image source into an RGBA buffer.
///
/// Format handling stays behind this interface; the pipeline only ever
/// sees the decoded [`PixelBuffer`].
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>>;
}
