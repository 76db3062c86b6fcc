use ndarray::ArrayView3;

use crate::shared::constants::{RGBA_CHANNELS, SMOOTHING_RADIUS, SMOOTHING_SIGMA};
use crate::shared::pixel_buffer::PixelBuffer;

use super::channel::store_channel;
use super::row_bands::RowBands;

const WINDOW_SIDE: usize = (2 * SMOOTHING_RADIUS + 1) as usize;
const WINDOW_LEN: usize = WINDOW_SIDE * WINDOW_SIDE;

/// Second blur stage: distance-weighted mean over a fixed 5x5 window.
///
/// Weights are `exp(-(dx²+dy²) / (2·sigma²))` with sigma 30. Against a
/// radius-2 window that is almost flat, so the pass softens the box-blur
/// output with only a slight center bias. Each pixel is normalized by its
/// own weight sum; samples outside the buffer clamp to the edge.
#[derive(Clone, Debug)]
pub struct WeightedSmoothingPass {
    weights: [f64; WINDOW_LEN],
    bands: RowBands,
}

impl WeightedSmoothingPass {
    pub fn new() -> Self {
        Self {
            weights: window_weights(SMOOTHING_SIGMA),
            bands: RowBands::sequential(),
        }
    }

    pub fn with_bands(mut self, bands: RowBands) -> Self {
        self.bands = bands;
        self
    }

    /// Weights in row-major window order (`dy` outer, `dx` inner).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        if input.is_empty() {
            return input.clone();
        }

        let src = input.as_ndarray();
        let stride = input.stride();
        let mut output = PixelBuffer::filled(input.width(), input.height(), [0; 4]);
        self.bands.run(output.pixels_mut(), stride, |first_row, band| {
            for (i, out_row) in band.chunks_mut(stride).enumerate() {
                self.smooth_row(&src, first_row + i, out_row);
            }
        });
        output
    }

    fn smooth_row(&self, src: &ArrayView3<'_, u8>, y: usize, out_row: &mut [u8]) {
        let (height, width, _) = src.dim();
        let last_x = width as i64 - 1;
        let last_y = height as i64 - 1;

        for (x, out) in out_row.chunks_mut(RGBA_CHANNELS).enumerate() {
            let mut acc = [0f64; RGBA_CHANNELS];
            let mut weight_sum = 0.0;
            let mut k = 0;

            for dy in -SMOOTHING_RADIUS..=SMOOTHING_RADIUS {
                let py = (y as i64 + dy).clamp(0, last_y) as usize;
                for dx in -SMOOTHING_RADIUS..=SMOOTHING_RADIUS {
                    let px = (x as i64 + dx).clamp(0, last_x) as usize;
                    let weight = self.weights[k];
                    k += 1;
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += src[[py, px, c]] as f64 * weight;
                    }
                    weight_sum += weight;
                }
            }

            for (o, a) in out.iter_mut().zip(acc) {
                *o = store_channel(a / weight_sum);
            }
        }
    }
}

impl Default for WeightedSmoothingPass {
    fn default() -> Self {
        Self::new()
    }
}

fn window_weights(sigma: f64) -> [f64; WINDOW_LEN] {
    let mut weights = [0.0; WINDOW_LEN];
    let offsets = -SMOOTHING_RADIUS..=SMOOTHING_RADIUS;
    let cells = offsets
        .clone()
        .flat_map(|dy| offsets.clone().map(move |dx| (dx, dy)));
    for (w, (dx, dy)) in weights.iter_mut().zip(cells) {
        let distance = (dx * dx + dy * dy) as f64;
        *w = (-distance / (2.0 * sigma * sigma)).exp();
    }
    weights
}
