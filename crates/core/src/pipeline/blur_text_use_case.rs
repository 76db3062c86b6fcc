use std::path::Path;
use std::time::Instant;

use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::blurring::domain::region_resolver::RegionResolver;
use crate::detection::domain::text_detector::TextDetector;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::pixel_buffer::PixelBuffer;

/// Outcome of one blur run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlurReport {
    /// Boxes reported by the detector.
    pub boxes: usize,
    /// Regions actually blurred.
    pub blurred: usize,
    /// Boxes that resolved to a zero-area region.
    pub skipped: usize,
}

/// Single-image text blurring: read → detect → resolve → blur → write.
///
/// Regions are blurred one after another in detector order, each against
/// the buffer as left by the previous one.
pub struct BlurTextUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    detector: Box<dyn TextDetector>,
    blurrer: Box<dyn RegionBlurrer>,
    resolver: RegionResolver,
    logger: Box<dyn PipelineLogger>,
}

impl BlurTextUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        detector: Box<dyn TextDetector>,
        blurrer: Box<dyn RegionBlurrer>,
        resolver: RegionResolver,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            detector,
            blurrer,
            resolver,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<BlurReport, Box<dyn std::error::Error>> {
        let t = Instant::now();
        let mut buffer = self.reader.read(input_path)?;
        self.logger.timing("read", elapsed_ms(t));

        let t = Instant::now();
        let boxes = self.detector.detect(&buffer)?;
        self.logger.timing("detect", elapsed_ms(t));
        self.logger.metric("boxes", boxes.len() as f64);
        self.logger.info(&format!(
            "Detected {} text boxes in {}x{} image",
            boxes.len(),
            buffer.width(),
            buffer.height()
        ));

        let report = self.blur_boxes(&mut buffer, &boxes);

        let t = Instant::now();
        self.writer.write(output_path, &buffer)?;
        self.logger.timing("write", elapsed_ms(t));

        self.logger.info(&format!(
            "Blurred {} regions ({} empty)",
            report.blurred, report.skipped
        ));
        self.logger.summary();
        Ok(report)
    }

    /// Resolves and blurs each box in order, mutating `buffer` in place.
    pub fn blur_boxes(&mut self, buffer: &mut PixelBuffer, boxes: &[BoundingBox]) -> BlurReport {
        let mut report = BlurReport {
            boxes: boxes.len(),
            ..BlurReport::default()
        };

        for (i, bbox) in boxes.iter().enumerate() {
            let region = self.resolver.resolve(bbox, buffer.width(), buffer.height());
            if region.is_empty() {
                log::debug!("Box {bbox:?} resolved to an empty region, skipping");
                report.skipped += 1;
            } else {
                let t = Instant::now();
                self.blurrer.blur(buffer, &region);
                self.logger.timing("blur", elapsed_ms(t));
                self.logger.metric("region_area", region.area() as f64);
                report.blurred += 1;
            }
            self.logger.progress(i + 1, boxes.len());
        }
        report
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blurring::infrastructure::region_blur_engine::RegionBlurEngine;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::region::Region;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        buffer: PixelBuffer,
    }

    impl ImageReader for StubReader {
        fn read(&self, _path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
            Ok(self.buffer.clone())
        }
    }

    struct FailingReader;

    impl ImageReader for FailingReader {
        fn read(&self, path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
            Err(format!("cannot decode {}", path.display()).into())
        }
    }

    #[derive(Clone, Default)]
    struct StubWriter {
        written: Arc<Mutex<Vec<(PathBuf, PixelBuffer)>>>,
    }

    impl ImageWriter for StubWriter {
        fn write(
            &self,
            path: &Path,
            buffer: &PixelBuffer,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), buffer.clone()));
            Ok(())
        }
    }

    struct StubDetector {
        boxes: Vec<BoundingBox>,
    }

    impl TextDetector for StubDetector {
        fn detect(
            &mut self,
            _buffer: &PixelBuffer,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Ok(self.boxes.clone())
        }
    }

    struct FailingDetector;

    impl TextDetector for FailingDetector {
        fn detect(
            &mut self,
            _buffer: &PixelBuffer,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Err("ocr unavailable".into())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingBlurrer {
        calls: Arc<Mutex<Vec<Region>>>,
    }

    impl RegionBlurrer for RecordingBlurrer {
        fn blur(&self, _buffer: &mut PixelBuffer, region: &Region) {
            self.calls.lock().unwrap().push(*region);
        }
    }

    // --- Helpers ---

    fn use_case(
        reader: Box<dyn ImageReader>,
        writer: StubWriter,
        detector: Box<dyn TextDetector>,
        blurrer: Box<dyn RegionBlurrer>,
    ) -> BlurTextUseCase {
        BlurTextUseCase::new(
            reader,
            Box::new(writer),
            detector,
            blurrer,
            RegionResolver::default(),
            Box::new(NullPipelineLogger),
        )
    }

    fn reader(w: u32, h: u32) -> Box<dyn ImageReader> {
        Box::new(StubReader {
            buffer: PixelBuffer::filled(w, h, [128, 128, 128, 255]),
        })
    }

    fn detector(boxes: Vec<BoundingBox>) -> Box<dyn TextDetector> {
        Box::new(StubDetector { boxes })
    }

    // --- Tests ---

    #[test]
    fn test_regions_are_padded_and_passed_in_detector_order() {
        let blurrer = RecordingBlurrer::default();
        let calls = blurrer.calls.clone();
        let mut uc = use_case(
            reader(200, 100),
            StubWriter::default(),
            detector(vec![
                BoundingBox::new(100.0, 50.0, 120.0, 60.0),
                BoundingBox::new(20.0, 20.0, 30.0, 25.0),
            ]),
            Box::new(blurrer),
        );

        let report = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert_eq!(
            report,
            BlurReport {
                boxes: 2,
                blurred: 2,
                skipped: 0
            }
        );
        let calls = calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![Region::new(85, 35, 50, 40), Region::new(5, 5, 40, 35)]
        );
    }

    #[test]
    fn test_zero_area_regions_are_skipped() {
        let blurrer = RecordingBlurrer::default();
        let calls = blurrer.calls.clone();
        let mut uc = BlurTextUseCase::new(
            reader(10, 10),
            Box::new(StubWriter::default()),
            detector(vec![
                BoundingBox::new(5.0, 5.0, 5.0, 5.0),
                BoundingBox::new(1.0, 1.0, 3.0, 3.0),
            ]),
            Box::new(blurrer),
            RegionResolver::new(0),
            Box::new(NullPipelineLogger),
        );

        let report = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.blurred, 1);
        assert_eq!(*calls.lock().unwrap(), vec![Region::new(1, 1, 2, 2)]);
    }

    #[test]
    fn test_no_boxes_still_writes_unchanged_image() {
        let writer = StubWriter::default();
        let written = writer.written.clone();
        let mut uc = use_case(
            reader(64, 48),
            writer,
            detector(vec![]),
            Box::new(RegionBlurEngine::default()),
        );

        let report = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        assert_eq!(report, BlurReport::default());
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1, PixelBuffer::filled(64, 48, [128, 128, 128, 255]));
    }

    #[test]
    fn test_real_engine_blurs_only_text_area() {
        let mut buffer = PixelBuffer::filled(120, 80, [255, 255, 255, 255]);
        // Dark "glyph" strokes inside the box.
        for x in (52..68).step_by(3) {
            for y in 36..44 {
                buffer.set_pixel(x, y, [0, 0, 0, 255]);
            }
        }
        let writer = StubWriter::default();
        let written = writer.written.clone();
        let mut uc = use_case(
            Box::new(StubReader {
                buffer: buffer.clone(),
            }),
            writer,
            detector(vec![BoundingBox::new(50.0, 35.0, 70.0, 45.0)]),
            Box::new(RegionBlurEngine::default()),
        );

        uc.execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap();

        let written = written.lock().unwrap();
        let out = &written[0].1;
        // Region is (35, 20) 50x40; outside pixels are untouched.
        assert_eq!(out.pixel(10, 10), [255, 255, 255, 255]);
        assert_eq!(out.pixel(100, 70), [255, 255, 255, 255]);
        // Strokes are smeared into grey.
        let stroke = out.pixel(52, 40);
        assert!(stroke[0] > 0 && stroke[0] < 255, "got {stroke:?}");
        assert_ne!(out, &buffer);
    }

    #[test]
    fn test_blur_boxes_without_io() {
        let blurrer = RecordingBlurrer::default();
        let calls = blurrer.calls.clone();
        let mut uc = use_case(
            reader(1, 1),
            StubWriter::default(),
            detector(vec![]),
            Box::new(blurrer),
        );
        let mut buffer = PixelBuffer::filled(10, 10, [0; 4]);
        let report = uc.blur_boxes(&mut buffer, &[BoundingBox::new(0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(report.blurred, 1);
        assert_eq!(*calls.lock().unwrap(), vec![Region::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_reader_error_propagates() {
        let writer = StubWriter::default();
        let written = writer.written.clone();
        let mut uc = use_case(
            Box::new(FailingReader),
            writer,
            detector(vec![]),
            Box::new(RecordingBlurrer::default()),
        );
        let err = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap_err();
        assert!(err.to_string().contains("cannot decode in.png"));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detector_error_propagates_without_writing() {
        let writer = StubWriter::default();
        let written = writer.written.clone();
        let mut uc = use_case(
            reader(10, 10),
            writer,
            Box::new(FailingDetector),
            Box::new(RecordingBlurrer::default()),
        );
        let err = uc
            .execute(Path::new("in.png"), Path::new("out.png"))
            .unwrap_err();
        assert_eq!(err.to_string(), "ocr unavailable");
        assert!(written.lock().unwrap().is_empty());
    }
}
