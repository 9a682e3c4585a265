use std::path::Path;

use image::DynamicImage;
use poster_core::Classification;
use thiserror::Error;
use tracing::info;

use crate::classify::FieldClassifier;
use crate::hash;
use crate::preprocess::{self, ImageNormalizer, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidImage(#[from] PreprocessError),
    #[error("OCR engine failure: {0}")]
    OcrEngineFailure(#[from] OcrError),
}

/// The result of running one poster through the pipeline.
#[derive(Debug)]
pub struct PosterResult {
    /// SHA-256 hex digest of the source file, when the input came as encoded bytes.
    pub source_sha256: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Raw OCR output, in engine order.
    pub lines: Vec<String>,
    pub classification: Classification,
}

/// Orchestrates: decode → normalize → OCR → classify.
///
/// The OCR backend is owned by the pipeline and reused for every poster it
/// processes; each call builds a fresh record and shares no other state.
pub struct PosterPipeline<R: OcrBackend> {
    recognizer: R,
    normalizer: ImageNormalizer,
    classifier: FieldClassifier,
}

impl<R: OcrBackend> PosterPipeline<R> {
    pub fn new(recognizer: R, normalizer: ImageNormalizer) -> Self {
        Self { recognizer, normalizer, classifier: FieldClassifier::new() }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Process an image file on disk.
    pub fn process_file(&self, path: &Path) -> Result<PosterResult, PipelineError> {
        let bytes = std::fs::read(path)?;
        info!(path = %path.display(), bytes = bytes.len(), "processing poster");
        self.process_bytes(&bytes)
    }

    /// Process encoded image bytes (PNG / JPEG / ...).
    pub fn process_bytes(&self, data: &[u8]) -> Result<PosterResult, PipelineError> {
        let img = preprocess::decode(data)?;
        let mut result = self.process_image(&img)?;
        result.source_sha256 = Some(hash::source_digest(data));
        Ok(result)
    }

    /// Process an already decoded image.
    pub fn process_image(&self, img: &DynamicImage) -> Result<PosterResult, PipelineError> {
        // 1. Normalize.
        let gray = self.normalizer.normalize_dynamic(img)?;
        let (width, height) = gray.dimensions();

        // 2. Run OCR.
        let lines = self.recognizer.recognize(&gray)?;
        info!(width, height, lines = lines.len(), "ocr complete");

        // 3. Classify.
        let classification = self.classifier.classify_detailed(&lines);
        info!(
            stored = classification.record.stored_lines(),
            discarded = classification.discarded.len(),
            "classification complete"
        );

        Ok(PosterResult { source_sha256: None, width, height, lines, classification })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::NormalizerParams;
    use crate::recognizer::MockRecognizer;
    use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
    use std::cell::Cell;
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: RgbImage = ImageBuffer::from_fn(8, 6, |x, _| Rgb([(x * 30) as u8, 90, 200]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn pipeline<R: OcrBackend>(recognizer: R) -> PosterPipeline<R> {
        PosterPipeline::new(recognizer, ImageNormalizer::new(NormalizerParams::default()).unwrap())
    }

    struct FailingRecognizer;

    impl OcrBackend for FailingRecognizer {
        fn recognize(&self, _image: &GrayImage) -> Result<Vec<String>, OcrError> {
            Err(OcrError::Engine("model crashed".into()))
        }
    }

    /// Records the size of the image it was handed.
    struct SizeProbe {
        seen: Cell<Option<(u32, u32)>>,
    }

    impl OcrBackend for SizeProbe {
        fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError> {
            self.seen.set(Some(image.dimensions()));
            Ok(vec![])
        }
    }

    #[test]
    fn process_bytes_classifies_recognized_lines() {
        let p = pipeline(MockRecognizer::new([
            "HACKATHON 2024 GRAND CHALLENGE",
            "ABC Institute of Technology",
            "Win $5000 Cash Prize",
            "info@hackathon2024.com",
        ]));
        let result = p.process_bytes(&tiny_png()).unwrap();

        assert_eq!((result.width, result.height), (8, 6));
        assert_eq!(result.lines.len(), 4);
        assert_eq!(result.source_sha256.as_deref().map(str::len), Some(64));

        let record = &result.classification.record;
        assert_eq!(record.event_name(), Some("HACKATHON 2024 GRAND CHALLENGE"));
        assert_eq!(record.organizer(), Some("ABC Institute of Technology"));
        assert_eq!(record.prizes(), ["Win $5000 Cash Prize"]);
        assert_eq!(record.emails(), ["info@hackathon2024.com"]);
    }

    #[test]
    fn recognizer_sees_normalized_image_of_same_size() {
        let p = pipeline(SizeProbe { seen: Cell::new(None) });
        let result = p.process_bytes(&tiny_png()).unwrap();
        assert_eq!(p.recognizer().seen.get(), Some((8, 6)));
        assert!(result.classification.record.is_empty());
    }

    #[test]
    fn undecodable_bytes_fail_before_ocr() {
        let p = pipeline(SizeProbe { seen: Cell::new(None) });
        let err = p.process_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImage(_)));
        assert_eq!(p.recognizer().seen.get(), None);
    }

    #[test]
    fn empty_image_is_invalid() {
        let p = pipeline(MockRecognizer::new(["unused"]));
        let err = p.process_image(&DynamicImage::new_rgb8(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidImage(PreprocessError::EmptyImage { .. })
        ));
    }

    #[test]
    fn ocr_failure_propagates() {
        let p = pipeline(FailingRecognizer);
        let err = p.process_bytes(&tiny_png()).unwrap_err();
        assert!(matches!(err, PipelineError::OcrEngineFailure(OcrError::Engine(_))));
        assert!(err.to_string().contains("model crashed"));
    }

    #[test]
    fn process_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        std::fs::write(&path, tiny_png()).unwrap();

        let p = pipeline(MockRecognizer::new(["9876543210"]));
        let result = p.process_file(&path).unwrap();
        assert_eq!(result.classification.record.phones(), ["9876543210"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(MockRecognizer::new(Vec::<String>::new()));
        let err = p.process_file(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn same_poster_twice_gives_same_record() {
        let p = pipeline(MockRecognizer::new(["Register by 15 Mar", "Open to all"]));
        let data = tiny_png();
        let r1 = p.process_bytes(&data).unwrap();
        let r2 = p.process_bytes(&data).unwrap();
        assert_eq!(r1.classification, r2.classification);
        assert_eq!(r1.source_sha256, r2.source_sha256);
    }
}
