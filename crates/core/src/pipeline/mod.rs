pub mod blur_text_use_case;
pub mod pipeline_logger;
