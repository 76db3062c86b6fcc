use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use textblur_core::blurring::domain::region_resolver::RegionResolver;
use textblur_core::blurring::infrastructure::region_blur_engine::RegionBlurEngine;
use textblur_core::blurring::infrastructure::row_bands::RowBands;
use textblur_core::detection::domain::text_detector::TextDetector;
use textblur_core::detection::infrastructure::box_file_detector::BoxFileDetector;
use textblur_core::detection::infrastructure::tesseract_cli_detector::TesseractCliDetector;
use textblur_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use textblur_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use textblur_core::pipeline::blur_text_use_case::BlurTextUseCase;
use textblur_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use textblur_core::shared::constants::{
    DEFAULT_BOX_RADIUS, DEFAULT_OCR_LANGUAGES, DEFAULT_PADDING, DEFAULT_TESSERACT_BINARY,
    IMAGE_EXTENSIONS,
};

const MAX_RADIUS: u32 = 1000;
const MAX_PADDING: u32 = 1000;

/// Blur the text found in an image.
#[derive(Parser)]
#[command(name = "textblur")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output image file (format chosen by extension).
    output: PathBuf,

    /// Use boxes from a .json or Tesseract .tsv file instead of running OCR.
    #[arg(long)]
    boxes: Option<PathBuf>,

    /// Tesseract language list, '+'-separated.
    #[arg(long, default_value = DEFAULT_OCR_LANGUAGES)]
    languages: String,

    /// Tesseract executable to run.
    #[arg(long, default_value = DEFAULT_TESSERACT_BINARY)]
    tesseract: PathBuf,

    /// Pixels added around each detected box before blurring.
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    padding: u32,

    /// Box blur radius in pixels.
    #[arg(long, default_value_t = DEFAULT_BOX_RADIUS)]
    radius: u32,

    /// Worker threads per blur pass (default: all available cores).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let bands = match cli.threads {
        Some(threads) => RowBands::new(threads),
        None => RowBands::available(),
    };
    log::debug!("Blurring with {} worker threads", bands.threads());
    let engine = RegionBlurEngine::new(cli.radius).with_bands(bands);

    let mut use_case = BlurTextUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        detector,
        Box::new(engine),
        RegionResolver::new(cli.padding),
        Box::new(StdoutPipelineLogger::default()),
    );
    let report = use_case.execute(&cli.input, &cli.output)?;
    if report.boxes == 0 {
        log::warn!("No text found in {}", cli.input.display());
    }
    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn TextDetector>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.boxes {
        return Ok(Box::new(BoxFileDetector::open(path)?));
    }
    log::info!(
        "Running {} with languages {}",
        cli.tesseract.display(),
        cli.languages
    );
    Ok(Box::new(
        TesseractCliDetector::new(cli.languages.clone()).with_binary(cli.tesseract.clone()),
    ))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.output) {
        return Err(format!(
            "Output must be an image file ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.output.display()
        )
        .into());
    }
    if let Some(boxes) = &cli.boxes {
        if !boxes.exists() {
            return Err(format!("Box file not found: {}", boxes.display()).into());
        }
    }
    if cli.languages.trim().is_empty() {
        return Err("Languages must not be empty".into());
    }
    if cli.radius > MAX_RADIUS {
        return Err(format!(
            "Radius must be between 0 and {MAX_RADIUS}, got {}",
            cli.radius
        )
        .into());
    }
    if cli.padding > MAX_PADDING {
        return Err(format!(
            "Padding must be between 0 and {MAX_PADDING}, got {}",
            cli.padding
        )
        .into());
    }
    if cli.threads == Some(0) {
        return Err("Threads must be at least 1".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
