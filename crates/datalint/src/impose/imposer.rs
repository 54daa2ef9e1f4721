//! Coerce text columns toward their declared semantic types.

use serde::{Deserialize, Serialize};

use super::conversion::TypeConversionTable;
use super::parse;
use crate::error::{LintError, Result};
use crate::input::{Column, Dataset, Representation, Value};
use crate::schema::TableMetadata;

/// What to do when a cell cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Leave the column unconverted (dates: null the bad cells).
    #[default]
    Ignore,
    /// Fail on the first bad cell.
    Raise,
}

/// Outcome of converting one column's cells.
struct Converted<T> {
    cells: Vec<Option<T>>,
    /// Rows whose non-null value failed to convert.
    failures: Vec<usize>,
}

fn convert<T>(column: &Column, cast: impl Fn(&Value) -> Option<T>) -> Converted<T> {
    let mut cells = Vec::with_capacity(column.len());
    let mut failures = Vec::new();
    for (row, cell) in column.cells().enumerate() {
        match cell {
            None => cells.push(None),
            Some(value) => {
                let cast_value = cast(&value);
                if cast_value.is_none() {
                    failures.push(row);
                }
                cells.push(cast_value);
            }
        }
    }
    Converted { cells, failures }
}

/// Imposes metadata types on a dataset.
pub struct TypeImposer<'a> {
    conversions: &'a TypeConversionTable,
    policy: CoercionPolicy,
}

impl<'a> TypeImposer<'a> {
    /// Create an imposer over a conversion table.
    pub fn new(conversions: &'a TypeConversionTable, policy: CoercionPolicy) -> Self {
        Self {
            conversions,
            policy,
        }
    }

    /// Return a copy of `dataset` with metadata columns coerced toward their
    /// declared types.
    ///
    /// Columns not in the metadata pass through unchanged and metadata
    /// columns missing from the dataset are skipped. Under
    /// [`CoercionPolicy::Ignore`] this never fails.
    pub fn impose(&self, dataset: &Dataset, metadata: &TableMetadata) -> Result<Dataset> {
        let mut imposed = dataset.clone();

        for meta in &metadata.columns {
            let Some(column) = dataset.column(&meta.name) else {
                continue;
            };
            let target = self.conversions.representation_for(meta.semantic_type);
            if column.representation() == target {
                continue;
            }

            if let Some(converted) = self.coerce_column(&meta.name, column, target)? {
                imposed.replace_column(&meta.name, converted)?;
            }
        }

        Ok(imposed)
    }

    /// Check that every metadata column present in the dataset already has
    /// the representation its declared type requires.
    pub fn types_match(&self, dataset: &Dataset, metadata: &TableMetadata) -> bool {
        metadata.columns.iter().all(|meta| {
            dataset.column(&meta.name).is_none_or(|column| {
                column.representation() == self.conversions.representation_for(meta.semantic_type)
            })
        })
    }

    /// Convert one column. `Ok(None)` means leave the column as it is.
    fn coerce_column(&self, name: &str, column: &Column, target: Representation) -> Result<Option<Column>> {
        let coerced = match target {
            Representation::Text => {
                let converted = convert(column, parse::to_text);
                Some(Column::Text(converted.cells))
            }
            Representation::Int32 => self
                .all_or_nothing(name, column, target, convert(column, parse::to_int))?
                .map(Column::Int),
            Representation::Int64 => self
                .all_or_nothing(name, column, target, convert(column, parse::to_long))?
                .map(Column::Long),
            Representation::Float64 => self
                .all_or_nothing(name, column, target, convert(column, parse::to_float))?
                .map(Column::Float),
            Representation::Boolean => self
                .all_or_nothing(name, column, target, convert(column, parse::to_boolean))?
                .map(Column::Boolean),
            Representation::Date => Some(Column::Date(self.null_failures(
                name,
                column,
                target,
                convert(column, parse::to_date),
            )?)),
            Representation::DateTime => Some(Column::DateTime(self.null_failures(
                name,
                column,
                target,
                convert(column, parse::to_datetime),
            )?)),
        };
        Ok(coerced)
    }

    /// Accept the conversion only if every non-null cell converted.
    fn all_or_nothing<T>(
        &self,
        name: &str,
        column: &Column,
        target: Representation,
        converted: Converted<T>,
    ) -> Result<Option<Vec<Option<T>>>> {
        let Some(&first) = converted.failures.first() else {
            return Ok(Some(converted.cells));
        };
        match self.policy {
            CoercionPolicy::Raise => Err(coercion_error(name, column, first, target)),
            CoercionPolicy::Ignore => {
                tracing::warn!(
                    column = name,
                    target = %target,
                    failures = converted.failures.len(),
                    first_row = first,
                    "column left unconverted"
                );
                Ok(None)
            }
        }
    }

    /// Keep the conversion, with unparseable cells becoming null.
    fn null_failures<T>(
        &self,
        name: &str,
        column: &Column,
        target: Representation,
        converted: Converted<T>,
    ) -> Result<Vec<Option<T>>> {
        if let Some(&first) = converted.failures.first() {
            if self.policy == CoercionPolicy::Raise {
                return Err(coercion_error(name, column, first, target));
            }
            tracing::warn!(
                column = name,
                target = %target,
                nulled = converted.failures.len(),
                "unparseable values set to null"
            );
        }
        Ok(converted.cells)
    }
}

fn coercion_error(name: &str, column: &Column, row: usize, target: Representation) -> LintError {
    LintError::Coercion {
        column: name.to_string(),
        row,
        value: column.get(row).map(|v| v.to_string()).unwrap_or_default(),
        target: target.to_string(),
    }
}

/// Align the dataset's column set with the metadata.
///
/// Missing metadata columns are appended as all-null columns of the declared
/// representation when `create_missing` is set; dataset columns absent from
/// the metadata are removed when `drop_extra` is set. Any mismatch that is not
/// allowed fails with [`LintError::SchemaMismatch`].
pub fn reconcile_columns(
    dataset: &Dataset,
    metadata: &TableMetadata,
    conversions: &TypeConversionTable,
    create_missing: bool,
    drop_extra: bool,
) -> Result<Dataset> {
    let missing: Vec<String> = metadata
        .columns
        .iter()
        .filter(|c| !dataset.contains(&c.name))
        .map(|c| c.name.clone())
        .collect();
    let extra: Vec<String> = dataset
        .column_names()
        .filter(|name| metadata.column(name).is_none())
        .map(str::to_string)
        .collect();

    let missing_blocked = !missing.is_empty() && !create_missing;
    let extra_blocked = !extra.is_empty() && !drop_extra;
    if missing_blocked || extra_blocked {
        return Err(LintError::SchemaMismatch {
            missing: if missing_blocked { missing } else { Vec::new() },
            extra: if extra_blocked { extra } else { Vec::new() },
        });
    }

    let mut reconciled = dataset.clone();
    for name in &extra {
        reconciled.remove_column(name);
    }
    for name in &missing {
        let meta = metadata.require_column(name)?;
        let repr = conversions.representation_for(meta.semantic_type);
        reconciled.append_column(name.clone(), Column::nulls(repr, dataset.row_count()))?;
    }
    Ok(reconciled)
}
