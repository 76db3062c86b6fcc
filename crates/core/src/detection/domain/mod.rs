pub mod text_detector;
