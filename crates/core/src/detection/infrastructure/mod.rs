pub mod box_file_detector;
pub mod tesseract_cli_detector;
pub mod tesseract_tsv;
