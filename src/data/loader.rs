//! Dataset loading from a local path or a remote URL

use crate::error::{ClaimflowError, Result};
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use tracing::info;

/// Load the raw dataset into an in-memory table.
///
/// `source` is either a filesystem path or an `http(s)://` URL. Any failure
/// to reach or parse the source is `DataUnavailable` and aborts the run.
pub fn load(source: &str) -> Result<DataFrame> {
    let df = if source.starts_with("http://") || source.starts_with("https://") {
        load_remote_csv(source)?
    } else {
        load_local_csv(source)?
    };
    info!(rows = df.height(), cols = df.width(), source, "loaded dataset");
    Ok(df)
}

fn load_local_csv(path: &str) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| ClaimflowError::DataUnavailable(format!("{path}: {e}")))?;
    read_csv(file)
}

fn load_remote_csv(url: &str) -> Result<DataFrame> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| ClaimflowError::DataUnavailable(format!("{url}: {e}")))?;
    if !response.status().is_success() {
        return Err(ClaimflowError::DataUnavailable(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .map_err(|e| ClaimflowError::DataUnavailable(format!("{url}: {e}")))?;
    read_csv(Cursor::new(bytes.to_vec()))
}

fn read_csv<R: MmapBytesReader + 'static>(reader: R) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .into_reader_with_file_handle(reader)
        .finish()
        .map_err(|e| ClaimflowError::DataUnavailable(e.to_string()))
}
