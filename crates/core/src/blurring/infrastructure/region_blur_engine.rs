use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::shared::constants::DEFAULT_BOX_RADIUS;
use crate::shared::pixel_buffer::PixelBuffer;
use crate::shared::region::Region;

use super::box_blur_pass::BoxBlurPass;
use super::row_bands::RowBands;
use super::weighted_smoothing_pass::WeightedSmoothingPass;

/// CPU blurrer that softens one rectangular region at a time.
///
/// The region is copied out, box blurred, smoothed, and written back to
/// the same coordinates. The box pass finishes before smoothing reads any
/// of its output; only rows within a pass are split across threads.
pub struct RegionBlurEngine {
    box_pass: BoxBlurPass,
    smoothing: WeightedSmoothingPass,
}

impl RegionBlurEngine {
    pub fn new(radius: u32) -> Self {
        Self {
            box_pass: BoxBlurPass::new(radius),
            smoothing: WeightedSmoothingPass::new(),
        }
    }

    pub fn with_bands(self, bands: RowBands) -> Self {
        Self {
            box_pass: self.box_pass.with_bands(bands),
            smoothing: self.smoothing.with_bands(bands),
        }
    }

    pub fn radius(&self) -> u32 {
        self.box_pass.radius()
    }

    /// Runs both passes over a standalone buffer.
    pub fn blur_buffer(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let intermediate = self.box_pass.apply(buffer);
        self.smoothing.apply(&intermediate)
    }

    /// Blurs `region` of `buffer` in place. Zero-area regions are a no-op.
    pub fn blur_region(&self, buffer: &mut PixelBuffer, region: &Region) {
        let region = if region.fits_within(buffer.width(), buffer.height()) {
            *region
        } else {
            let clipped = region.clipped_to(buffer.width(), buffer.height());
            log::warn!(
                "Region {region:?} exceeds {}x{} buffer, clipped to {clipped:?}",
                buffer.width(),
                buffer.height()
            );
            clipped
        };

        if region.is_empty() {
            log::debug!("Skipping zero-area region at ({}, {})", region.x, region.y);
            return;
        }

        log::debug!(
            "Blurring region x={} y={} {}x{} (radius={})",
            region.x,
            region.y,
            region.width,
            region.height,
            self.radius()
        );
        let patch = buffer.extract(&region);
        let blurred = self.blur_buffer(&patch);
        buffer.write_back(&region, &blurred);
    }
}

impl Default for RegionBlurEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_RADIUS)
    }
}

impl RegionBlurrer for RegionBlurEngine {
    fn blur(&self, buffer: &mut PixelBuffer, region: &Region) {
        self.blur_region(buffer, region);
    }
}
