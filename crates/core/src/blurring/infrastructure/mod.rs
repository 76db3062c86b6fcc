pub mod box_blur_pass;
mod channel;
pub mod region_blur_engine;
pub mod row_bands;
pub mod weighted_smoothing_pass;
