use crate::shared::pixel_buffer::PixelBuffer;
use crate::shared::region::Region;

/// Domain interface for blurring one region of a buffer.
///
/// Implementations modify the buffer in place (`&mut PixelBuffer`). Callers
/// blur regions one at a time in detector order, so a region that overlaps
/// an earlier one sees the earlier result.
pub trait RegionBlurrer: Send {
    fn blur(&self, buffer: &mut PixelBuffer, region: &Region);
}
