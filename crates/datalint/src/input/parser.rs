//! Readers for delimited text and line-delimited JSON.
//!
//! Every cell is loaded as text (or null). No type guessing happens here so
//! that the type imposer has full control over coercion.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::dataset::{Column, Dataset};
use super::source::{SourceFormat, SourceMetadata};
use crate::error::{LintError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Tokens read as null by default.
const DEFAULT_NULL_VALUES: &[&str] = &["NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL", "None", "nil"];

/// Reader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<char>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Quote character.
    pub quote: char,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Cell contents treated as null, in addition to empty cells.
    pub null_values: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: '"',
            max_rows: None,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReaderConfig {
    /// Check if a raw cell represents a missing value.
    ///
    /// Only empty cells and exact null tokens count; whitespace is data.
    pub fn is_null_value(&self, value: &str) -> bool {
        value.is_empty() || self.null_values.iter().any(|n| n == value)
    }

    fn ascii_byte(c: char, what: &str) -> Result<u8> {
        u8::try_from(c)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| LintError::Config(format!("{what} must be a single ASCII character, got {c:?}")))
    }
}

/// Reads tabular data files into text datasets.
pub struct Parser {
    config: ReaderConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file, choosing the format by extension.
    ///
    /// `.jsonl`, `.ndjson` and `.json` are read as line-delimited JSON,
    /// everything else as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = read_all(path)?;
        let hash = format!("sha256:{:x}", Sha256::digest(&contents));
        let size_bytes = contents.len() as u64;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "jsonl" | "ndjson" | "json"));

        let (dataset, format) = if is_json {
            (self.parse_jsonl_bytes(&contents)?, SourceFormat::Jsonl)
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => ReaderConfig::ascii_byte(d, "delimiter")?,
                None => detect_delimiter(&contents)?,
            };
            (
                self.parse_delimited_bytes(&contents, delimiter)?,
                SourceFormat::from_delimiter(delimiter),
            )
        };

        tracing::debug!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            ?format,
            "read dataset"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.row_count(),
            dataset.column_count(),
        );

        Ok((dataset, source))
    }

    /// Parse delimited bytes directly.
    pub fn parse_delimited_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let quote = ReaderConfig::ascii_byte(self.config.quote, "quote")?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            if !self.config.has_header && headers.is_empty() {
                headers = (0..record.len()).map(|i| format!("column_{}", i + 1)).collect();
            }
            let row: Vec<Option<String>> = record
                .iter()
                .map(|s| (!self.config.is_null_value(s)).then(|| s.to_string()))
                .collect();
            rows.push(row);
        }

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(LintError::EmptyData("No columns found".to_string()));
        }

        Dataset::from_text_rows(headers, rows)
    }

    /// Parse line-delimited JSON.
    ///
    /// Each non-blank line must be a JSON object. Columns are ordered by first
    /// appearance; keys missing from a line read as null. Scalars are kept as
    /// their text form, nested values as compact JSON.
    pub fn parse_jsonl_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut columns: IndexMap<String, Vec<Option<String>>> = IndexMap::new();
        let mut row_count = 0;

        for (line_idx, line) in BufReader::new(bytes).lines().enumerate() {
            let line = line.map_err(|e| LintError::NotTabular(format!("line {}: {e}", line_idx + 1)))?;
            if line.trim().is_empty() {
                continue;
            }
            if self.config.max_rows.is_some_and(|max| row_count >= max) {
                break;
            }

            let record: serde_json::Value = serde_json::from_str(&line)?;
            let serde_json::Value::Object(object) = record else {
                return Err(LintError::NotTabular(format!(
                    "line {} is not a JSON object",
                    line_idx + 1
                )));
            };

            for (key, value) in object {
                let cells = columns
                    .entry(key)
                    .or_insert_with(|| vec![None; row_count]);
                cells.push(json_cell_to_text(value));
            }
            row_count += 1;
            for cells in columns.values_mut() {
                cells.resize(row_count, None);
            }
        }

        if columns.is_empty() {
            return Err(LintError::EmptyData("No JSON records found".to_string()));
        }

        Dataset::from_columns(columns.into_iter().map(|(name, cells)| (name, Column::Text(cells))))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a delimited text file.
pub fn read_csv(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<(Dataset, SourceMetadata)> {
    Parser::with_config(config.clone()).parse_file(path)
}

/// Read a line-delimited JSON file regardless of its extension.
pub fn read_jsonl(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    Parser::new().parse_jsonl_bytes(&read_all(path)?)
}

fn read_all(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| LintError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| LintError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(contents)
}

fn json_cell_to_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(std::result::Result::ok)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(LintError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines beat higher but ragged counts.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + usize::from(delim == b'\t') * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
