/// Integer blur target rectangle inside a [`PixelBuffer`](super::pixel_buffer::PixelBuffer).
///
/// Produced by the region resolver from a padded detector box, so it is
/// always contained in the buffer it was resolved against. Zero-area
/// regions are valid and mean "nothing to blur".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `x+width <= buffer_width` and `y+height <= buffer_height`.
    pub fn fits_within(&self, buffer_width: u32, buffer_height: u32) -> bool {
        self.x as u64 + self.width as u64 <= buffer_width as u64
            && self.y as u64 + self.height as u64 <= buffer_height as u64
    }

    /// Shrinks the region to the part that lies inside the buffer.
    pub fn clipped_to(&self, buffer_width: u32, buffer_height: u32) -> Region {
        let x = self.x.min(buffer_width);
        let y = self.y.min(buffer_height);
        Region {
            x,
            y,
            width: self.width.min(buffer_width - x),
            height: self.height.min(buffer_height - y),
        }
    }
}
