//! Linter configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LintError, Result};
use crate::impose::{CoercionPolicy, TypeConversionTable};
use crate::input::ReaderConfig;

/// Default bound on offending values and rows reported per check.
pub const DEFAULT_MAX_UNEXPECTED: usize = 20;

/// Default compiled size bound for pattern regexes, matching the regex crate.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Configuration for a [`Linter`](crate::Linter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Semantic type to representation mapping.
    pub conversions: TypeConversionTable,
    /// What to do when a value cannot be coerced.
    pub coercion: CoercionPolicy,
    /// Whether to coerce columns toward their declared types at construction.
    pub impose_types: bool,
    /// Maximum offending values and rows reported per check.
    pub max_unexpected: usize,
    /// Compiled size bound for pattern regexes.
    pub regex_size_limit: usize,
    /// Dataset reader configuration.
    pub reader: ReaderConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            conversions: TypeConversionTable::default(),
            coercion: CoercionPolicy::default(),
            impose_types: true,
            max_unexpected: DEFAULT_MAX_UNEXPECTED,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            reader: ReaderConfig::default(),
        }
    }
}

impl LintConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        if config.regex_size_limit == 0 {
            return Err(LintError::Config("regex_size_limit must be positive".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Representation;
    use crate::schema::SemanticType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"coercion": "raise", "max_unexpected": 5}}"#).unwrap();

        let config = LintConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.coercion, CoercionPolicy::Raise);
        assert_eq!(config.max_unexpected, 5);
        assert!(config.impose_types);
        assert_eq!(config.conversions, TypeConversionTable::default());
    }

    #[test]
    fn test_incomplete_conversions_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"conversions": {{"int": "int64"}}}}"#).unwrap();
        assert!(LintConfig::from_json_path(file.path()).is_err());
    }

    #[test]
    fn test_custom_conversions() {
        let mut table = TypeConversionTable::default();
        let mut json = serde_json::to_value(&table).unwrap();
        json["int"] = serde_json::json!("int64");
        table = serde_json::from_value(json).unwrap();
        assert_eq!(table.representation_for(SemanticType::Int), Representation::Int64);
    }
}
