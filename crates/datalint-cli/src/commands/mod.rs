//! CLI command implementations.

pub mod generate;
pub mod lint;

use std::path::Path;

use datalint::{Dataset, Parser, ReaderConfig};

/// Read a data file, choosing the reader by extension.
pub(crate) fn read_dataset(path: &Path, reader: &ReaderConfig) -> Result<Dataset, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    let (dataset, source) = Parser::with_config(reader.clone()).parse_file(path)?;
    tracing::debug!(file = %source.file, hash = %source.hash, "source fingerprint");
    Ok(dataset)
}
