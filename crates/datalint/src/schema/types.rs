//! Semantic column types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LintError;

/// Agnostic semantic type declared for a column in table metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Whole numbers within the 32-bit range.
    Int,
    /// Whole numbers within the 64-bit range.
    Long,
    /// Floating-point numbers.
    Float,
    /// Double precision floating-point numbers.
    Double,
    /// Text/string values.
    Character,
    /// Boolean values (true/false).
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
}

impl SemanticType {
    /// Every known semantic type.
    pub const ALL: [SemanticType; 8] = [
        SemanticType::Int,
        SemanticType::Long,
        SemanticType::Float,
        SemanticType::Double,
        SemanticType::Character,
        SemanticType::Boolean,
        SemanticType::Date,
        SemanticType::Datetime,
    ];

    /// Name as written in metadata documents.
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Int => "int",
            SemanticType::Long => "long",
            SemanticType::Float => "float",
            SemanticType::Double => "double",
            SemanticType::Character => "character",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Datetime => "datetime",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticType {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| LintError::UnknownType(s.to_string()))
    }
}
