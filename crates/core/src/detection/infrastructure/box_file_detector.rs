use std::path::Path;

use crate::detection::domain::text_detector::TextDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::pixel_buffer::PixelBuffer;

use super::tesseract_tsv::parse_words;

/// Replays text boxes loaded from a file produced by an earlier OCR run.
///
/// Accepts a JSON array of `{"x0", "y0", "x1", "y1"}` objects or a
/// Tesseract TSV report. The same boxes are returned for every buffer.
pub struct BoxFileDetector {
    boxes: Vec<BoundingBox>,
}

impl BoxFileDetector {
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    /// Loads boxes, choosing the format from the file extension.
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read box file {}: {e}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        let boxes = match extension.as_deref() {
            Some("json") => serde_json::from_str::<Vec<BoundingBox>>(&contents)?,
            Some("tsv") => parse_words(&contents)?
                .into_iter()
                .map(|w| w.bbox)
                .collect(),
            _ => {
                return Err(format!(
                    "Unsupported box file '{}': expected .json or .tsv",
                    path.display()
                )
                .into())
            }
        };
        log::info!("Loaded {} boxes from {}", boxes.len(), path.display());
        Ok(Self::new(boxes))
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }
}

impl TextDetector for BoxFileDetector {
    fn detect(
        &mut self,
        _buffer: &PixelBuffer,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        Ok(self.boxes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "boxes.json",
            r#"[{"x0": 1, "y0": 2, "x1": 3, "y1": 4}, {"x0": 10.5, "y0": 0, "x1": 20, "y1": 8}]"#,
        );
        let detector = BoxFileDetector::open(&path).unwrap();
        assert_eq!(
            detector.boxes(),
            &[
                BoundingBox::new(1.0, 2.0, 3.0, 4.0),
                BoundingBox::new(10.5, 0.0, 20.0, 8.0),
            ]
        );
    }

    #[test]
    fn test_open_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "words.TSV",
            "level\tleft\ttop\twidth\theight\tconf\ttext\n5\t4\t6\t10\t2\t90\thi\n3\t0\t0\t1\t1\t-1\t\n",
        );
        let detector = BoxFileDetector::open(&path).unwrap();
        assert_eq!(detector.boxes(), &[BoundingBox::new(4.0, 6.0, 14.0, 8.0)]);
    }

    #[test]
    fn test_open_empty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "none.json", "[]");
        assert!(BoxFileDetector::open(&path).unwrap().boxes().is_empty());
    }

    #[test]
    fn test_open_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "boxes.txt", "[]");
        let err = BoxFileDetector::open(&path).err().unwrap();
        assert!(err.to_string().contains("Unsupported box file"));
    }

    #[test]
    fn test_open_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"[{"x0": 1}]"#);
        assert!(BoxFileDetector::open(&path).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = BoxFileDetector::open(Path::new("/nonexistent/boxes.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to read box file"));
    }

    #[test]
    fn test_detect_replays_boxes_in_order() {
        let boxes = vec![
            BoundingBox::new(5.0, 5.0, 9.0, 9.0),
            BoundingBox::new(0.0, 0.0, 2.0, 2.0),
        ];
        let mut detector = BoxFileDetector::new(boxes.clone());
        let buffer = PixelBuffer::filled(10, 10, [0; 4]);
        assert_eq!(detector.detect(&buffer).unwrap(), boxes);
        assert_eq!(detector.detect(&buffer).unwrap(), boxes);
    }
}
