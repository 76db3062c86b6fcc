use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::DEFAULT_PADDING;
use crate::shared::region::Region;

/// Turns detector boxes into padded integer regions clamped to a buffer.
///
/// Never rejects input: boxes hanging off the image are clamped, and
/// degenerate boxes come out as zero-area regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionResolver {
    padding: u32,
}

impl RegionResolver {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn resolve(&self, bbox: &BoundingBox, buffer_width: u32, buffer_height: u32) -> Region {
        resolve_region(bbox, self.padding, buffer_width, buffer_height)
    }
}

impl Default for RegionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

/// Pads `bbox` by `padding` on every side and clamps it into the buffer.
///
/// The origin is floored and clamped to the last valid pixel; the size is
/// ceiled and clamped so the region never runs past the right/bottom edge.
pub fn resolve_region(
    bbox: &BoundingBox,
    padding: u32,
    buffer_width: u32,
    buffer_height: u32,
) -> Region {
    let pad = padding as f64;
    let x = floor_clamped(bbox.x0 - pad, buffer_width.saturating_sub(1));
    let y = floor_clamped(bbox.y0 - pad, buffer_height.saturating_sub(1));
    let width = ceil_clamped(bbox.width() + 2.0 * pad, buffer_width - x);
    let height = ceil_clamped(bbox.height() + 2.0 * pad, buffer_height - y);
    Region::new(x, y, width, height)
}

// `as i64` saturates on overflow and maps NaN to 0.
fn floor_clamped(value: f64, max: u32) -> u32 {
    (value.floor() as i64).clamp(0, max as i64) as u32
}

fn ceil_clamped(value: f64, max: u32) -> u32 {
    (value.ceil() as i64).clamp(0, max as i64) as u32
}
