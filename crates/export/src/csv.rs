use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::row::PosterRow;
use crate::ExportError;

/// Write `row` as a single-record CSV with a header line.
pub fn write_csv<W: Write>(writer: W, row: &PosterRow) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    wtr.serialize(row)?;
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(row: &PosterRow) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, row)?;
    // The csv writer only emits the UTF-8 strings it was given.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_csv_file(path: &Path, row: &PosterRow) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(file, row)
}
