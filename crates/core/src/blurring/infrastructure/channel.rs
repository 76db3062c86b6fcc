/// Stores an averaged channel value the way an 8-bit clamped RGBA buffer
/// does: round half to even, then clamp to `[0, 255]`.
pub fn store_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
