pub mod blurring;
pub mod detection;
pub mod imaging;
pub mod pipeline;
pub mod shared;
