use crate::shared::constants::{DEFAULT_BOX_RADIUS, RGBA_CHANNELS};
use crate::shared::pixel_buffer::PixelBuffer;

use super::channel::store_channel;
use super::row_bands::RowBands;

/// First blur stage: unweighted mean over a `(2r+1)x(2r+1)` window.
///
/// Samples outside the buffer are clamped to the nearest edge pixel, so
/// every mean divides by the full window size. Computed as a separable
/// running sum over exact integer totals, which gives the same values as
/// summing each window directly.
#[derive(Clone, Copy, Debug)]
pub struct BoxBlurPass {
    radius: u32,
    bands: RowBands,
}

impl BoxBlurPass {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            bands: RowBands::sequential(),
        }
    }

    pub fn with_bands(mut self, bands: RowBands) -> Self {
        self.bands = bands;
        self
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of samples averaged per output value.
    pub fn window_count(&self) -> u64 {
        let side = 2 * self.radius as u64 + 1;
        side * side
    }

    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        if input.is_empty() || self.radius == 0 {
            return input.clone();
        }

        let width = input.width() as usize;
        let height = input.height() as usize;
        let stride = input.stride();
        let radius = self.radius as usize;
        let src = input.pixels();

        let mut row_sums = vec![0u64; src.len()];
        self.bands.run(&mut row_sums, stride, |first_row, band| {
            for (i, sums) in band.chunks_mut(stride).enumerate() {
                let y = first_row + i;
                horizontal_sums(&src[y * stride..(y + 1) * stride], width, radius, sums);
            }
        });

        let count = self.window_count() as f64;
        let mut output = PixelBuffer::filled(input.width(), input.height(), [0; 4]);
        self.bands.run(output.pixels_mut(), stride, |first_row, band| {
            vertical_means(&row_sums, stride, height, radius, first_row, band, count);
        });
        output
    }
}

impl Default for BoxBlurPass {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_RADIUS)
    }
}

/// Per-channel sums over `[x-r, x+r]` for one row, edge-clamped.
fn horizontal_sums(row: &[u8], width: usize, radius: usize, sums: &mut [u64]) {
    let last = width - 1;
    let mut acc = [0u64; RGBA_CHANNELS];
    for dx in -(radius as isize)..=(radius as isize) {
        let px = dx.clamp(0, last as isize) as usize;
        add_pixel(&mut acc, &row[px * RGBA_CHANNELS..]);
    }

    for x in 0..width {
        let at = x * RGBA_CHANNELS;
        sums[at..at + RGBA_CHANNELS].copy_from_slice(&acc);

        let leaving = x.saturating_sub(radius) * RGBA_CHANNELS;
        let entering = (x + radius + 1).min(last) * RGBA_CHANNELS;
        for c in 0..RGBA_CHANNELS {
            acc[c] = acc[c] + row[entering + c] as u64 - row[leaving + c] as u64;
        }
    }
}

fn add_pixel(acc: &mut [u64; RGBA_CHANNELS], pixel: &[u8]) {
    for (a, &v) in acc.iter_mut().zip(pixel) {
        *a += v as u64;
    }
}

/// Slides a vertical window of row sums down one band of output rows.
fn vertical_means(
    row_sums: &[u64],
    stride: usize,
    height: usize,
    radius: usize,
    first_row: usize,
    band: &mut [u8],
    count: f64,
) {
    let last = height - 1;
    let row = move |y: usize| row_at(row_sums, stride, y);

    let mut acc = vec![0u64; stride];
    for dy in -(radius as isize)..=(radius as isize) {
        let py = (first_row as isize + dy).clamp(0, last as isize) as usize;
        for (a, &s) in acc.iter_mut().zip(row(py)) {
            *a += s;
        }
    }

    for (i, out_row) in band.chunks_mut(stride).enumerate() {
        let y = first_row + i;
        for (out, &sum) in out_row.iter_mut().zip(&acc) {
            *out = store_channel(sum as f64 / count);
        }

        let leaving = row(y.saturating_sub(radius));
        let entering = row((y + radius + 1).min(last));
        for ((a, &add), &sub) in acc.iter_mut().zip(entering).zip(leaving) {
            *a = *a + add - sub;
        }
    }
}

fn row_at(row_sums: &[u64], stride: usize, y: usize) -> &[u64] {
    &row_sums[y * stride..(y + 1) * stride]
}
