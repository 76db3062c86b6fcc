/// Margin added around every detected text box before blurring.
pub const DEFAULT_PADDING: u32 = 15;

/// Radius of the first-stage box blur window (`2r+1` pixels per side).
pub const DEFAULT_BOX_RADIUS: u32 = 20;

/// Half-width of the second-stage smoothing window (5x5).
pub const SMOOTHING_RADIUS: i64 = 2;

/// Falloff of the smoothing weights. Large relative to the window, so the
/// pass is close to an unweighted 5x5 mean with a slight center bias.
pub const SMOOTHING_SIGMA: f64 = 30.0;

pub const RGBA_CHANNELS: usize = 4;

pub const DEFAULT_OCR_LANGUAGES: &str = "jpn+eng";
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
