//! Column metadata.

use serde::{Deserialize, Serialize};

use super::types::SemanticType;

/// Declared expectations for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name, unique within the document.
    pub name: String,
    /// Declared semantic type.
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    /// Free text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether nulls are allowed. `None` means the key was omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Allowed values, if the column is enumerated.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<serde_json::Value>>,
    /// Regular expression every value must contain a match for.
    #[serde(alias = "regex", default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ColumnMetadata {
    /// Create column metadata with only a name and type.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            description: None,
            nullable: None,
            allowed_values: None,
            pattern: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Set the allowed values.
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Effective nullability; omitted means nullable.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(true)
    }
}
