use image::GrayImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to hand image to OCR engine: {0}")]
    ImageEncode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available; build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
///
/// Implementations take the normalized grayscale poster and return one string
/// per detected text region, in whatever order the engine reports them.
/// Backends are built once by the caller and reused for every poster.
pub trait OcrBackend {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError>;
}

impl<R: OcrBackend + ?Sized> OcrBackend for Box<R> {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image)
    }
}

impl<R: OcrBackend + ?Sized> OcrBackend for &R {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError> {
        (**self).recognize(image)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set list of lines. Useful for testing the classification
/// pipeline without requiring Tesseract to be installed.
pub struct MockRecognizer {
    pub lines: Vec<String>,
}

impl MockRecognizer {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    /// One recognized line per line of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<Vec<String>, OcrError> {
        Ok(self.lines.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use image::GrayImage;
    use leptess::LepTess;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tracing::{debug, info};

    /// Tesseract engine initialized once and reused for every recognition call.
    pub struct TesseractRecognizer {
        engine: Mutex<LepTess>,
    }

    impl TesseractRecognizer {
        /// Loads the language data eagerly, so a missing `traineddata` file
        /// fails here rather than on the first poster.
        pub fn new(data_path: Option<&str>, lang: &str) -> Result<Self, OcrError> {
            let engine = LepTess::new(data_path, lang)
                .map_err(|e| OcrError::Engine(format!("failed to load language '{lang}': {e}")))?;
            info!(lang, data_path = data_path.unwrap_or("<default>"), "tesseract engine ready");
            Ok(Self { engine: Mutex::new(engine) })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError> {
            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| OcrError::ImageEncode(e.to_string()))?;

            let mut lt = self
                .engine
                .lock()
                .map_err(|_| OcrError::Engine("tesseract engine lock poisoned".into()))?;
            lt.set_image_from_mem(&png)
                .map_err(|e| OcrError::ImageEncode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;

            // Tesseract separates blocks with blank lines; those are not text regions.
            let lines: Vec<String> = text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect();
            debug!(count = lines.len(), "tesseract recognized lines");
            Ok(lines)
        }
    }
}
