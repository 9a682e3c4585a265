use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use poster_export::{render_table, to_csv_string, write_csv_file, PosterReport};
use poster_ocr::{FieldClassifier, ImageNormalizer, OcrBackend, OcrError, PosterPipeline};
use tracing::info;

use crate::config::{Config, OcrSettings};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// How to print the extracted record
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// CSV file to write (defaults to the configured output)
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
    /// Print the record without writing the CSV file
    #[arg(long)]
    pub no_write: bool,
}

/// Poster image → normalized image → OCR → classified record.
pub fn extract(config: &Config, image: &Path, out: &OutputArgs) -> Result<()> {
    // The engine is built before the image is touched so a broken OCR setup
    // is reported even for posters that would fail to decode.
    let recognizer = build_recognizer(&config.ocr).context("failed to initialize OCR engine")?;
    let normalizer = ImageNormalizer::new(config.normalizer.clone())?;
    let pipeline = PosterPipeline::new(recognizer, normalizer);

    let result = pipeline
        .process_file(image)
        .with_context(|| format!("failed to extract {}", image.display()))?;

    let report = PosterReport::new(&result.classification, &result.lines).with_source(
        result.source_sha256.as_deref(),
        result.width,
        result.height,
    );
    emit(config, out, &report)
}

/// Classify text that was already recognized elsewhere, one region per line.
pub fn classify(config: &Config, input: Option<&Path>, out: &OutputArgs) -> Result<()> {
    let lines = read_lines(input)?;
    let classification = FieldClassifier::new().classify_detailed(&lines);
    info!(
        lines = lines.len(),
        discarded = classification.discarded.len(),
        "classified text input"
    );
    let report = PosterReport::new(&classification, &lines);
    emit(config, out, &report)
}

#[cfg(feature = "tesseract")]
fn build_recognizer(settings: &OcrSettings) -> Result<Box<dyn OcrBackend>, OcrError> {
    let engine =
        poster_ocr::TesseractRecognizer::new(settings.data_path.as_deref(), &settings.language)?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_settings: &OcrSettings) -> Result<Box<dyn OcrBackend>, OcrError> {
    Err(OcrError::NotAvailable)
}

fn read_lines(input: Option<&Path>) -> Result<Vec<String>> {
    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(text.lines().map(str::to_string).collect())
}

fn emit(config: &Config, out: &OutputArgs, report: &PosterReport<'_>) -> Result<()> {
    print!("{}", render(out.format, report)?);

    if !out.no_write {
        let path = out.output.as_deref().unwrap_or(&config.output);
        write_csv_file(path, &report.row)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote csv");
    }
    Ok(())
}

pub fn render(format: OutputFormat, report: &PosterReport<'_>) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => {
            let mut table = render_table(&report.row);
            if !report.discarded.is_empty() {
                table.push_str("\nDiscarded candidates:\n");
                for d in report.discarded {
                    writeln!(table, "  {}: {}", d.field.column(), d.line)?;
                }
            }
            table
        }
        OutputFormat::Csv => to_csv_string(&report.row)?,
        OutputFormat::Json => report.to_json_pretty()? + "\n",
    };
    Ok(rendered)
}
