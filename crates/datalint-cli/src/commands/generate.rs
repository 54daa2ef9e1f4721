//! Generate command - scaffold a metadata document from a data file.

use std::path::PathBuf;

use datalint::{ReaderConfig, generate_metadata};

pub fn run(data: PathBuf, name: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = super::read_dataset(&data, &ReaderConfig::default())?;
    let metadata = generate_metadata(&dataset, name.as_deref());
    println!("{}", metadata.to_json_pretty()?);
    Ok(())
}
