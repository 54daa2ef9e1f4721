//! Dataset model and data source readers.

mod dataset;
mod parser;
mod source;

pub use dataset::{Column, DATE_FORMAT, DATETIME_FORMAT, Dataset, Representation, Value};
pub use parser::{Parser, ReaderConfig, read_csv, read_jsonl};
pub use source::{SourceFormat, SourceMetadata};
