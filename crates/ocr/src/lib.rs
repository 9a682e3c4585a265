pub mod classify;
pub mod hash;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use classify::{FieldClassifier, Rule, RULES};
pub use hash::source_digest;
pub use pipeline::{PipelineError, PosterPipeline, PosterResult};
pub use preprocess::{ImageNormalizer, NormalizerParams, PreprocessError, MAX_DIAMETER};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
