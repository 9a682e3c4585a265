pub mod csv;
pub mod report;
pub mod row;
pub mod table;

use thiserror::Error;

pub use crate::csv::{to_csv_string, write_csv, write_csv_file};
pub use report::{PosterReport, SourceInfo};
pub use row::{PosterRow, MULTI_VALUE_DELIMITER};
pub use table::render_table;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
