//! Error types for the datalint library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where a duplicate column name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    /// The table metadata document.
    Metadata,
    /// The dataset header.
    Dataset,
}

impl fmt::Display for ColumnOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOrigin::Metadata => f.write_str("metadata"),
            ColumnOrigin::Dataset => f.write_str("dataset"),
        }
    }
}

/// Main error type for datalint operations.
#[derive(Debug, Error)]
pub enum LintError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata document does not match the metadata schema.
    #[error("Invalid metadata at '{path}': {message}")]
    Schema { path: String, message: String },

    /// A column name appears more than once.
    #[error("Duplicate column name '{name}' in {origin}")]
    DuplicateColumn { name: String, origin: ColumnOrigin },

    /// A semantic type name outside the known enumeration.
    #[error("Unknown semantic type: {0}")]
    UnknownType(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A linter was requested without a dataset.
    #[error("Dataset not set")]
    DataNotSet,

    /// A linter was requested without table metadata.
    #[error("Metadata not set")]
    MetadataNotSet,

    /// Results were queried before the relevant checks ran.
    #[error("Checks not yet run: {0}")]
    ChecksNotRun(String),

    /// A column was queried that is not known.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A value could not be coerced under the strict policy.
    #[error("Cannot coerce value '{value}' at row {row} of column '{column}' to {target}")]
    Coercion {
        column: String,
        row: usize,
        value: String,
        target: String,
    },

    /// Dataset columns disagree with the metadata and reconciliation was not allowed.
    #[error("Schema mismatch: missing columns {missing:?}, extra columns {extra:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// Input could not be arranged as a table.
    #[error("Input is not tabular: {0}")]
    NotTabular(String),

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl LintError {
    /// Build a schema error at a document location.
    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        LintError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short name of the variant, used when recording evaluator faults.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LintError::Io { .. } => "Io",
            LintError::Schema { .. } => "Schema",
            LintError::DuplicateColumn { .. } => "DuplicateColumn",
            LintError::UnknownType(_) => "UnknownType",
            LintError::Config(_) => "Config",
            LintError::DataNotSet => "DataNotSet",
            LintError::MetadataNotSet => "MetadataNotSet",
            LintError::ChecksNotRun(_) => "ChecksNotRun",
            LintError::ColumnNotFound(_) => "ColumnNotFound",
            LintError::Coercion { .. } => "Coercion",
            LintError::SchemaMismatch { .. } => "SchemaMismatch",
            LintError::NotTabular(_) => "NotTabular",
            LintError::EmptyData(_) => "EmptyData",
            LintError::Csv(_) => "Csv",
            LintError::Json(_) => "Json",
            LintError::Regex(_) => "Regex",
        }
    }
}

/// Result type alias for datalint operations.
pub type Result<T> = std::result::Result<T, LintError>;
