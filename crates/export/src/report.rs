use poster_core::{Classification, DiscardedLine, FieldRecord};
use serde::Serialize;

use crate::row::PosterRow;
use crate::ExportError;

/// Machine-readable summary of one extraction, for `--format json`.
#[derive(Debug, Serialize)]
pub struct PosterReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo<'a>>,
    pub row: PosterRow,
    pub record: &'a FieldRecord,
    /// Candidates dropped because their single-valued field was already set.
    pub discarded: &'a [DiscardedLine],
    /// Recognized lines in the order they were classified.
    pub lines: &'a [String],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SourceInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<&'a str>,
    pub width: u32,
    pub height: u32,
}

impl<'a> PosterReport<'a> {
    pub fn new(classification: &'a Classification, lines: &'a [String]) -> Self {
        Self {
            source: None,
            row: PosterRow::from_record(&classification.record),
            record: &classification.record,
            discarded: &classification.discarded,
            lines,
        }
    }

    pub fn with_source(mut self, sha256: Option<&'a str>, width: u32, height: u32) -> Self {
        self.source = Some(SourceInfo { sha256, width, height });
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
