//! Check kinds and per-check outcomes.

use std::error::Error as _;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LintError;

/// One category of validation.
///
/// Declaration order is the order `check_all` runs them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckKind {
    /// Column is present and at its declared position.
    #[serde(rename = "check_column_exists_and_order")]
    ExistsAndOrder,
    /// Null content agrees with `nullable`.
    #[serde(rename = "check_nulls")]
    Nullable,
    /// Values contain a match for `pattern`.
    #[serde(rename = "check_pattern")]
    Pattern,
    /// Values are members of `enum`.
    #[serde(rename = "check_enums")]
    Enum,
    /// Runtime representation matches the declared type.
    #[serde(rename = "check_types")]
    Type,
}

impl CheckKind {
    /// Every check kind, in run order.
    pub const ALL: [CheckKind; 5] = [
        CheckKind::ExistsAndOrder,
        CheckKind::Nullable,
        CheckKind::Pattern,
        CheckKind::Enum,
        CheckKind::Type,
    ];

    /// Stable identifier used as the validation description in exports.
    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::ExistsAndOrder => "check_column_exists_and_order",
            CheckKind::Nullable => "check_nulls",
            CheckKind::Pattern => "check_pattern",
            CheckKind::Enum => "check_enums",
            CheckKind::Type => "check_types",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::ExistsAndOrder => "Exists and in order",
            CheckKind::Nullable => "Nulls",
            CheckKind::Pattern => "Pattern",
            CheckKind::Enum => "Enum",
            CheckKind::Type => "Type",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Details of an error raised while evaluating a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub raised_exception: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_traceback: Option<String>,
}

impl ExceptionInfo {
    /// Capture an error and its source chain.
    pub fn from_error(err: &LintError) -> Self {
        let mut chain = vec![format!("{}: {}", err.kind_name(), err)];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            raised_exception: true,
            exception_message: Some(err.to_string()),
            exception_traceback: Some(chain.join("\n")),
        }
    }
}

/// Result of evaluating one check against one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub result: IndexMap<String, Value>,
    pub exception_info: Option<ExceptionInfo>,
}

impl Outcome {
    /// Create an outcome with empty detail.
    pub fn new(success: bool) -> Self {
        Self {
            success,
            result: IndexMap::new(),
            exception_info: None,
        }
    }

    /// A failed outcome carrying the error that caused it.
    pub fn fault(err: &LintError) -> Self {
        Self {
            success: false,
            result: IndexMap::new(),
            exception_info: Some(ExceptionInfo::from_error(err)),
        }
    }

    /// Add a detail key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.result.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_matches_all() {
        let mut sorted = CheckKind::ALL;
        sorted.sort();
        assert_eq!(sorted, CheckKind::ALL);
    }

    #[test]
    fn test_kind_serializes_as_description() {
        for kind in CheckKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, Value::String(kind.description().to_string()));
        }
    }

    #[test]
    fn test_fault_captures_message() {
        let err = LintError::ColumnNotFound("x".into());
        let outcome = Outcome::fault(&err);
        assert!(!outcome.success);
        let info = outcome.exception_info.unwrap();
        assert!(info.raised_exception);
        assert_eq!(info.exception_message.as_deref(), Some("Column not found: x"));
        assert!(info.exception_traceback.unwrap().starts_with("ColumnNotFound"));
    }
}
