use crate::shared::bounding_box::BoundingBox;
use crate::shared::pixel_buffer::PixelBuffer;

/// Domain interface for text detection.
///
/// Returns word boxes in reading order; the blur pipeline processes them
/// in exactly that order. Implementations may hold process handles or
/// caches, hence `&mut self`.
pub trait TextDetector: Send {
    fn detect(
        &mut self,
        buffer: &PixelBuffer,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;
}
