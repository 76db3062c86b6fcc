use ndarray::ArrayView3;

use super::constants::RGBA_CHANNELS;
use super::error::BlurError;
use super::region::Region;

/// An RGBA image held in memory: contiguous bytes in row-major order,
/// four channels per pixel (R, G, B, A).
///
/// Decoding and encoding happen at I/O boundaries only; the blur core
/// treats the bytes as four independent channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw RGBA bytes, rejecting data whose length is not `width*height*4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BlurError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(BlurError::InvalidBufferLayout {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * RGBA_CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * RGBA_CHANNELS
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + RGBA_CHANNELS].copy_from_slice(&rgba);
    }

    /// Copies the pixels under `region` into a standalone buffer.
    ///
    /// `region` must fit within this buffer.
    pub fn extract(&self, region: &Region) -> PixelBuffer {
        debug_assert!(region.fits_within(self.width, self.height));
        let row_bytes = region.width as usize * RGBA_CHANNELS;
        let mut pixels = Vec::with_capacity(row_bytes * region.height as usize);
        for row in 0..region.height {
            let start = self.offset(region.x, region.y + row);
            pixels.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        PixelBuffer {
            width: region.width,
            height: region.height,
            pixels,
        }
    }

    /// Copies `patch` into this buffer at the coordinates of `region`.
    ///
    /// `patch` must have the region's dimensions.
    pub fn write_back(&mut self, region: &Region, patch: &PixelBuffer) {
        debug_assert!(region.fits_within(self.width, self.height));
        debug_assert_eq!(
            (patch.width, patch.height),
            (region.width, region.height),
            "patch dimensions must match the region"
        );
        let row_bytes = region.width as usize * RGBA_CHANNELS;
        for row in 0..region.height {
            let dst = self.offset(region.x, region.y + row);
            let src = row as usize * row_bytes;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&patch.pixels[src..src + row_bytes]);
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.pixels)
            .expect("pixel length is validated at construction")
    }

    /// Encodes into an `image` crate buffer for file output.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("pixel length is validated at construction")
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, RGBA_CHANNELS)
    }
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * RGBA_CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in 0..width {
                buf.set_pixel(x, y, [x as u8, y as u8, (x + y) as u8, 255]);
            }
        }
        buf
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![7u8; 2 * 3 * 4];
        let buf = PixelBuffer::new(2, 3, data.clone()).unwrap();
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.stride(), 8);
        assert_eq!(buf.pixels(), &data[..]);
    }

    #[test]
    fn test_mismatched_length_is_rejected() {
        let err = PixelBuffer::new(2, 2, vec![0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            BlurError::InvalidBufferLayout {
                width: 2,
                height: 2,
                expected: 16,
                actual: 12,
            }
        );
        assert!(err.to_string().contains("expected 16"));
    }

    #[test]
    fn test_zero_sized_buffer_is_valid() {
        let buf = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_filled_sets_every_pixel() {
        let buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buf.pixels().len(), 24);
        for chunk in buf.pixels().chunks(4) {
            assert_eq!(chunk, &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_pixel_roundtrip() {
        let mut buf = PixelBuffer::filled(4, 4, [0, 0, 0, 0]);
        buf.set_pixel(2, 3, [10, 20, 30, 40]);
        assert_eq!(buf.pixel(2, 3), [10, 20, 30, 40]);
        assert_eq!(buf.pixel(3, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_extract_copies_sub_rectangle() {
        let buf = gradient(6, 5);
        let patch = buf.extract(&Region::new(2, 1, 3, 2));
        assert_eq!(patch.width(), 3);
        assert_eq!(patch.height(), 2);
        assert_eq!(patch.pixel(0, 0), buf.pixel(2, 1));
        assert_eq!(patch.pixel(2, 1), buf.pixel(4, 2));
    }

    #[test]
    fn test_extract_empty_region() {
        let buf = gradient(6, 5);
        let patch = buf.extract(&Region::new(3, 3, 0, 2));
        assert!(patch.is_empty());
        assert!(patch.pixels().is_empty());
    }

    #[test]
    fn test_write_back_only_touches_region() {
        let mut buf = gradient(6, 5);
        let original = buf.clone();
        let region = Region::new(1, 1, 2, 3);
        let patch = PixelBuffer::filled(2, 3, [200, 201, 202, 203]);
        buf.write_back(&region, &patch);

        for y in 0..5 {
            for x in 0..6 {
                let inside = (1..3).contains(&x) && (1..4).contains(&y);
                if inside {
                    assert_eq!(buf.pixel(x, y), [200, 201, 202, 203]);
                } else {
                    assert_eq!(buf.pixel(x, y), original.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        let buf = gradient(4, 2);
        let arr = buf.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 4]);
        assert_eq!(arr[[1, 3, 0]], 3);
        assert_eq!(arr[[1, 3, 1]], 1);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let buf = gradient(3, 3);
        let img = buf.to_rgba_image();
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(img.get_pixel(2, 1).0, buf.pixel(2, 1));
        assert_eq!(PixelBuffer::from(img), buf);
    }
}
