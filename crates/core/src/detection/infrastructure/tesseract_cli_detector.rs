use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::detection::domain::text_detector::TextDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{DEFAULT_OCR_LANGUAGES, DEFAULT_TESSERACT_BINARY};
use crate::shared::pixel_buffer::PixelBuffer;

use super::tesseract_tsv::parse_words;

/// Word detector backed by the `tesseract` command-line tool.
///
/// The buffer is encoded as PNG in memory and piped to
/// `tesseract stdin stdout -l <languages> tsv`; word boxes are read back
/// from the TSV report.
pub struct TesseractCliDetector {
    binary: PathBuf,
    languages: String,
}

impl TesseractCliDetector {
    pub fn new(languages: impl Into<String>) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_TESSERACT_BINARY),
            languages: languages.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["stdin", "stdout", "-l", self.languages.as_str(), "tsv"]);
        cmd
    }
}

impl Default for TesseractCliDetector {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_LANGUAGES)
    }
}

impl TextDetector for TesseractCliDetector {
    fn detect(
        &mut self,
        buffer: &PixelBuffer,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        if buffer.is_empty() {
            return Ok(Vec::new());
        }

        let png = encode_png(buffer)?;
        log::info!(
            "Running {} ({} languages) on {}x{} image",
            self.binary.display(),
            self.languages,
            buffer.width(),
            buffer.height()
        );

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to start {}: {e}", self.binary.display()))?;

        // tesseract may exit before reading any input (e.g. missing
        // traineddata), so stdin is fed on its own thread while output drains.
        let stdin = child.stdin.take();
        let feeder = std::thread::spawn(move || -> std::io::Result<()> {
            match stdin {
                Some(mut stdin) => stdin.write_all(&png),
                None => Ok(()),
            }
        });
        let output = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| "tesseract stdin writer panicked")?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )
            .into());
        }
        fed.map_err(|e| format!("Failed to send image to {}: {e}", self.binary.display()))?;
        if !stderr.trim().is_empty() {
            log::warn!("tesseract: {}", stderr.trim());
        }

        let words = parse_words(&String::from_utf8_lossy(&output.stdout))?;
        log::info!("OCR found {} words", words.len());
        Ok(words.into_iter().map(|w| w.bbox).collect())
    }
}

fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    buffer
        .to_rgba_image()
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}
