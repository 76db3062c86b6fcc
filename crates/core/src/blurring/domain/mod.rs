pub mod region_blurrer;
pub mod region_resolver;
