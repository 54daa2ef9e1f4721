//! Table-level metadata.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::column::ColumnMetadata;
use super::validate::validate_metadata;
use crate::error::{LintError, Result};

/// Metadata for an entire table: an ordered list of column declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Optional table name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Column declarations in expected dataset order.
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Create table metadata with the given columns.
    pub fn with_columns(columns: Vec<ColumnMetadata>) -> Self {
        Self { name: None, columns }
    }

    /// Set the table name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validate a raw JSON document and deserialize it.
    pub fn from_json_value(document: &serde_json::Value) -> Result<Self> {
        validate_metadata(document)?;
        Ok(serde_json::from_value(document.clone())?)
    }

    /// Parse, validate and deserialize a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(&document)
    }

    /// Load metadata from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Run the metadata validator over this (possibly hand-built) metadata.
    pub fn validate(&self) -> Result<()> {
        validate_metadata(&serde_json::to_value(self)?)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column by name, failing if it is not declared.
    pub fn require_column(&self, name: &str) -> Result<&ColumnMetadata> {
        self.column(name)
            .ok_or_else(|| LintError::ColumnNotFound(name.to_string()))
    }

    /// Zero-based declared position of a column.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get all column names in declared order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
