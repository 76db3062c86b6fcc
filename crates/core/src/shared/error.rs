use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlurError {
    #[error("pixel data length {actual} does not match {width}x{height} RGBA (expected {expected})")]
    InvalidBufferLayout {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
