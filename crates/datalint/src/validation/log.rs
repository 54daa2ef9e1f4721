//! The validation log: every check outcome, per column and check kind.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::outcome::{CheckKind, ExceptionInfo, Outcome};
use crate::error::{LintError, Result};

/// Outcome of one check kind on one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(skip)]
    col_name: String,
    #[serde(skip)]
    kind: CheckKind,
    success: Option<bool>,
    result: IndexMap<String, Value>,
    exception_info: Option<ExceptionInfo>,
}

impl LogEntry {
    fn new(col_name: &str, kind: CheckKind) -> Self {
        Self {
            col_name: col_name.to_string(),
            kind,
            success: None,
            result: IndexMap::new(),
            exception_info: None,
        }
    }

    /// Column this entry belongs to.
    pub fn col_name(&self) -> &str {
        &self.col_name
    }

    /// Check kind this entry records.
    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    /// `None` until the check has determined an outcome.
    pub fn success(&self) -> Option<bool> {
        self.success
    }

    /// Check-specific detail.
    pub fn result(&self) -> &IndexMap<String, Value> {
        &self.result
    }

    /// Look up one detail key.
    pub fn result_key(&self, key: &str) -> Option<&Value> {
        self.result.get(key)
    }

    /// Populated only if evaluation raised.
    pub fn exception_info(&self) -> Option<&ExceptionInfo> {
        self.exception_info.as_ref()
    }

    /// Set one detail key.
    pub fn set_result_key(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.result.insert(key.into(), value.into());
    }

    /// Set the success status.
    pub fn set_success(&mut self, success: bool) {
        self.success = Some(success);
    }

    /// Attach exception detail.
    pub fn set_exception_info(&mut self, info: ExceptionInfo) {
        self.exception_info = Some(info);
    }

    /// Overwrite this entry with a fresh outcome.
    pub fn apply(&mut self, outcome: Outcome) {
        self.success = Some(outcome.success);
        self.result = outcome.result;
        self.exception_info = outcome.exception_info;
    }

    /// Human readable status.
    pub fn status(&self) -> &'static str {
        match self.success {
            None => "Status not yet determined",
            Some(true) => "Success",
            Some(false) => "Failure",
        }
    }

    /// Full detail as JSON: `{success, result, exception_info}`.
    pub fn as_dict(&self) -> Value {
        json!({
            "success": self.success,
            "result": self.result,
            "exception_info": self.exception_info,
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on column '{}': {}",
            self.kind.description(),
            self.col_name,
            self.status()
        )
    }
}

/// All entries for one column, keyed by check kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLog {
    col_name: String,
    entries: IndexMap<CheckKind, LogEntry>,
}

impl ColumnLog {
    fn new(col_name: &str) -> Self {
        Self {
            col_name: col_name.to_string(),
            entries: IndexMap::new(),
        }
    }

    /// Column name.
    pub fn col_name(&self) -> &str {
        &self.col_name
    }

    /// Get the entry for a kind, creating an undetermined one if needed.
    pub fn get_or_create(&mut self, kind: CheckKind) -> &mut LogEntry {
        let col_name = &self.col_name;
        self.entries
            .entry(kind)
            .or_insert_with(|| LogEntry::new(col_name, kind))
    }

    /// Get the entry for a kind.
    pub fn get(&self, kind: CheckKind) -> Option<&LogEntry> {
        self.entries.get(&kind)
    }

    /// Entries in the order they were created.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no check has recorded anything for this column.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Conjunction of this column's entries.
    ///
    /// Fails if any entry is still undetermined.
    pub fn success(&self) -> Result<bool> {
        let mut all = true;
        for entry in self.entries.values() {
            match entry.success {
                Some(success) => all &= success,
                None => {
                    return Err(LintError::ChecksNotRun(format!(
                        "{} on column '{}' is undetermined",
                        entry.kind, self.col_name
                    )));
                }
            }
        }
        Ok(all)
    }
}

/// One row of the flat table export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub col_name: String,
    pub validation_description: String,
    pub success: Option<bool>,
}

/// Structured record of every check outcome across all metadata columns.
///
/// Entries are pre-created per column (empty) so a column with no checks run
/// is distinguishable from one whose checks passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationLog {
    columns: IndexMap<String, ColumnLog>,
    ran: BTreeSet<CheckKind>,
}

impl ValidationLog {
    /// Create an empty log for the given columns.
    pub fn new<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|name| (name.to_string(), ColumnLog::new(name)))
                .collect(),
            ran: BTreeSet::new(),
        }
    }

    /// Entries for one column.
    pub fn column(&self, name: &str) -> Result<&ColumnLog> {
        self.columns
            .get(name)
            .ok_or_else(|| LintError::ColumnNotFound(name.to_string()))
    }

    /// All column logs in metadata order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnLog> {
        self.columns.values()
    }

    /// Get or lazily create the entry for `(column, kind)`.
    pub fn get_or_create(&mut self, column: &str, kind: CheckKind) -> Result<&mut LogEntry> {
        self.columns
            .get_mut(column)
            .map(|log| log.get_or_create(kind))
            .ok_or_else(|| LintError::ColumnNotFound(column.to_string()))
    }

    /// Record an outcome, replacing any previous one for the same key.
    pub fn record(&mut self, column: &str, kind: CheckKind, outcome: Outcome) -> Result<()> {
        self.get_or_create(column, kind)?.apply(outcome);
        Ok(())
    }

    /// Get the entry for `(column, kind)` if one exists.
    pub fn entry(&self, column: &str, kind: CheckKind) -> Option<&LogEntry> {
        self.columns.get(column)?.get(kind)
    }

    /// Every entry, column by column.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.columns.values().flat_map(ColumnLog::entries)
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.columns.values().map(ColumnLog::len).sum()
    }

    /// Whether no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Note that a check kind has been run over every column.
    pub(crate) fn mark_ran(&mut self, kind: CheckKind) {
        self.ran.insert(kind);
    }

    /// Whether a check kind has been run.
    pub fn has_run(&self, kind: CheckKind) -> bool {
        self.ran.contains(&kind)
    }

    /// Conjunction of every recorded entry across every column.
    ///
    /// Fails with [`LintError::ChecksNotRun`] if some check kind has not been
    /// run yet or any entry is undetermined.
    pub fn overall_success(&self) -> Result<bool> {
        let pending: Vec<&str> = CheckKind::ALL
            .iter()
            .filter(|k| !self.ran.contains(*k))
            .map(CheckKind::description)
            .collect();
        if !pending.is_empty() {
            return Err(LintError::ChecksNotRun(pending.join(", ")));
        }

        let mut all = true;
        for column in self.columns.values() {
            all &= column.success()?;
        }
        Ok(all)
    }

    /// Conjunction of one column's entries.
    pub fn column_success(&self, name: &str) -> Result<bool> {
        self.column(name)?.success()
    }

    /// Nested export: column -> check description -> `{success, result, exception_info}`.
    pub fn as_dict(&self) -> Value {
        let mut columns = serde_json::Map::new();
        for column in self.columns.values() {
            let mut checks = serde_json::Map::new();
            for entry in column.entries() {
                checks.insert(entry.kind.description().to_string(), entry.as_dict());
            }
            columns.insert(column.col_name.clone(), Value::Object(checks));
        }
        Value::Object(columns)
    }

    /// Flat export: one row per column and check kind.
    pub fn as_table_rows(&self) -> Vec<TableRow> {
        self.entries()
            .map(|entry| TableRow {
                col_name: entry.col_name.clone(),
                validation_description: entry.kind.description().to_string(),
                success: entry.success,
            })
            .collect()
    }
}

impl fmt::Display for ValidationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
