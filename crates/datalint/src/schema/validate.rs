//! Structural validation of metadata documents.
//!
//! The document shape is checked against a bundled JSON Schema. Rules the
//! schema cannot express (regex compilation, unique names, `pattern` and
//! `regex` given together) run afterwards. Errors carry a location such as
//! `columns[2].type`.

use std::collections::HashSet;

use jsonschema::error::ValidationErrorKind;
use regex::Regex;
use serde_json::Value;

use crate::error::{ColumnOrigin, LintError, Result};

/// JSON Schema for a table metadata document.
pub const METADATA_SCHEMA: &str = include_str!("metadata.schema.json");

/// Validate a table metadata document, failing on the first violation.
pub fn validate_metadata(document: &Value) -> Result<()> {
    check_shape(document)?;

    let columns = document
        .get("columns")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    for (idx, column) in columns.iter().enumerate() {
        let path = format!("columns[{idx}]");
        check_pattern(&path, column)?;
        if let Some(name) = column.get("name").and_then(Value::as_str)
            && !seen.insert(name)
        {
            return Err(LintError::DuplicateColumn {
                name: name.to_string(),
                origin: ColumnOrigin::Metadata,
            });
        }
    }

    Ok(())
}

/// Check the document against [`METADATA_SCHEMA`], reporting the first error.
fn check_shape(document: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(METADATA_SCHEMA)?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| LintError::schema("$schema", format!("bundled schema is invalid: {e}")))?;

    let Some(error) = validator.iter_errors(document).next() else {
        return Ok(());
    };

    let mut path = dotted_path(&error.instance_path.to_string());
    let message = match &error.kind {
        ValidationErrorKind::Required { property } => {
            path = join(&path, property.as_str().unwrap_or_default());
            "required key is missing".to_string()
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            if let Some(key) = unexpected.first() {
                path = join(&path, key);
            }
            "unknown column key".to_string()
        }
        _ => error.to_string(),
    };
    Err(LintError::schema(path, message))
}

/// `pattern`/`regex` are aliases and must compile.
fn check_pattern(path: &str, column: &Value) -> Result<()> {
    if column.get("pattern").is_some() && column.get("regex").is_some() {
        return Err(LintError::schema(
            format!("{path}.regex"),
            "'pattern' and 'regex' are aliases; give only one",
        ));
    }
    for key in ["pattern", "regex"] {
        if let Some(pattern) = column.get(key).and_then(Value::as_str)
            && let Err(e) = Regex::new(pattern)
        {
            return Err(LintError::schema(
                format!("{path}.{key}"),
                format!("invalid regular expression: {e}"),
            ));
        }
    }
    Ok(())
}

/// Turn a JSON pointer (`/columns/0/type`) into `columns[0].type`.
fn dotted_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.parse::<usize>().is_ok() {
            path.push_str(&format!("[{segment}]"));
        } else {
            path = join(&path, &segment);
        }
    }
    if path.is_empty() { "$".to_string() } else { path }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() || path == "$" {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
