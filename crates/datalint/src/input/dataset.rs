//! Columnar in-memory dataset.
//!
//! A [`Dataset`] is an ordered map from column name to a [`Column`], where
//! each column is a tagged union over the supported in-memory
//! representations. Text readers produce [`Column::Text`] only; the type
//! imposer replaces those with typed variants.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ColumnOrigin, LintError, Result};

/// Format used when rendering date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when rendering datetime cells.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Concrete in-memory representation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Untyped text, as loaded from a text source.
    Text,
    /// 32-bit signed integer (nullable).
    Int32,
    /// 64-bit signed integer (nullable).
    Int64,
    /// 64-bit float.
    Float64,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time without zone.
    DateTime,
}

impl Representation {
    /// Every representation, in declaration order.
    pub const ALL: [Representation; 7] = [
        Representation::Text,
        Representation::Int32,
        Representation::Int64,
        Representation::Float64,
        Representation::Boolean,
        Representation::Date,
        Representation::DateTime,
    ];

    /// Stable lowercase name, matching the serde form.
    pub fn name(&self) -> &'static str {
        match self {
            Representation::Text => "text",
            Representation::Int32 => "int32",
            Representation::Int64 => "int64",
            Representation::Float64 => "float64",
            Representation::Boolean => "boolean",
            Representation::Date => "date",
            Representation::DateTime => "datetime",
        }
    }

    /// Parse a representation from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single non-null cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i32),
    Long(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// The representation this value belongs to.
    pub fn representation(&self) -> Representation {
        match self {
            Value::Text(_) => Representation::Text,
            Value::Int(_) => Representation::Int32,
            Value::Long(_) => Representation::Int64,
            Value::Float(_) => Representation::Float64,
            Value::Boolean(_) => Representation::Boolean,
            Value::Date(_) => Representation::Date,
            Value::DateTime(_) => Representation::DateTime,
        }
    }

    /// Convert to a JSON value for reporting.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => json!(s),
            Value::Int(i) => json!(i),
            Value::Long(i) => json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| json!(f.to_string())),
            Value::Boolean(b) => json!(b),
            Value::Date(_) | Value::DateTime(_) => json!(self.to_string()),
        }
    }

    /// Compare this cell against an allowed value from a metadata document.
    ///
    /// Numbers compare numerically, strings and booleans compare exactly.
    /// Date cells compare against their rendered form. Text cells never equal
    /// JSON numbers: `"1"` is not a member of `[1]`.
    pub fn matches_json(&self, expected: &serde_json::Value) -> bool {
        use serde_json::Value as Json;

        match (self, expected) {
            (Value::Text(s), Json::String(e)) => s == e,
            (Value::Int(i), Json::Number(n)) => n.as_i64() == Some(i64::from(*i)),
            (Value::Long(i), Json::Number(n)) => n.as_i64() == Some(*i),
            (Value::Float(f), Json::Number(n)) => n.as_f64() == Some(*f),
            (Value::Boolean(b), Json::Bool(e)) => b == e,
            (Value::Date(_) | Value::DateTime(_), Json::String(e)) => self.to_string() == *e,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// A column of nullable cells sharing one representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Int(Vec<Option<i32>>),
    Long(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Date(Vec<Option<NaiveDate>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl Column {
    /// Build a text column from string cells.
    pub fn text<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Column::Text(cells.into_iter().map(|c| c.map(Into::into)).collect())
    }

    /// The runtime representation of this column.
    pub fn representation(&self) -> Representation {
        match self {
            Column::Text(_) => Representation::Text,
            Column::Int(_) => Representation::Int32,
            Column::Long(_) => Representation::Int64,
            Column::Float(_) => Representation::Float64,
            Column::Boolean(_) => Representation::Boolean,
            Column::Date(_) => Representation::Date,
            Column::DateTime(_) => Representation::DateTime,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Long(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Boolean(v) => v.len(),
            Column::Date(v) => v.len(),
            Column::DateTime(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a cell by row index. Null cells and out-of-range rows return `None`.
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Text(v) => v.get(row)?.clone().map(Value::Text),
            Column::Int(v) => v.get(row).copied().flatten().map(Value::Int),
            Column::Long(v) => v.get(row).copied().flatten().map(Value::Long),
            Column::Float(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|f| !f.is_nan())
                .map(Value::Float),
            Column::Boolean(v) => v.get(row).copied().flatten().map(Value::Boolean),
            Column::Date(v) => v.get(row).copied().flatten().map(Value::Date),
            Column::DateTime(v) => v.get(row).copied().flatten().map(Value::DateTime),
        }
    }

    /// Whether the cell at `row` is null. NaN floats count as null.
    pub fn is_null(&self, row: usize) -> bool {
        self.get(row).is_none()
    }

    /// Iterate over all cells in row order.
    pub fn cells(&self) -> impl Iterator<Item = Option<Value>> + '_ {
        (0..self.len()).map(move |row| self.get(row))
    }

    /// Row indices of null cells.
    pub fn null_rows(&self) -> Vec<usize> {
        (0..self.len()).filter(|&row| self.is_null(row)).collect()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_null(row)).count()
    }

    /// A column of `len` nulls with the given representation.
    pub fn nulls(repr: Representation, len: usize) -> Self {
        match repr {
            Representation::Text => Column::Text(vec![None; len]),
            Representation::Int32 => Column::Int(vec![None; len]),
            Representation::Int64 => Column::Long(vec![None; len]),
            Representation::Float64 => Column::Float(vec![None; len]),
            Representation::Boolean => Column::Boolean(vec![None; len]),
            Representation::Date => Column::Date(vec![None; len]),
            Representation::DateTime => Column::DateTime(vec![None; len]),
        }
    }
}

/// Tabular, column-oriented data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from named columns.
    ///
    /// Fails on duplicate names or columns of differing length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, column) in columns {
            let name = name.into();
            if dataset.columns.contains_key(&name) {
                return Err(LintError::DuplicateColumn {
                    name,
                    origin: ColumnOrigin::Dataset,
                });
            }
            dataset.push_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Build a text dataset from a header and row-major cells.
    ///
    /// Short rows are padded with nulls, long rows are rejected.
    pub fn from_text_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let width = headers.len();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); width];

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(LintError::NotTabular(format!(
                    "row {} has {} cells but the header has {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
            let mut row = row;
            row.resize(width, None);
            for (col_idx, cell) in row.into_iter().enumerate() {
                cells[col_idx].push(cell);
            }
        }

        Self::from_columns(headers.into_iter().zip(cells.into_iter().map(Column::Text)))
    }

    fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(LintError::NotTabular(format!(
                "column '{}' has {} rows, expected {}",
                name,
                column.len(),
                self.row_count
            )));
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Zero-based position of a column.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Whether a column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate over `(name, column)` pairs in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace an existing column in place, keeping its position.
    pub(crate) fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        if column.len() != self.row_count {
            return Err(LintError::NotTabular(format!(
                "replacement for '{}' has {} rows, expected {}",
                name,
                column.len(),
                self.row_count
            )));
        }
        match self.columns.get_mut(name) {
            Some(slot) => {
                *slot = column;
                Ok(())
            }
            None => Err(LintError::ColumnNotFound(name.to_string())),
        }
    }

    /// Remove a column, keeping the order of the rest.
    pub(crate) fn remove_column(&mut self, name: &str) -> Option<Column> {
        self.columns.shift_remove(name)
    }

    /// Append a column at the end.
    pub(crate) fn append_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(LintError::DuplicateColumn {
                name,
                origin: ColumnOrigin::Dataset,
            });
        }
        self.push_column(name, column)
    }
}
