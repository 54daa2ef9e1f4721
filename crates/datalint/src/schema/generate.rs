//! Scaffold table metadata from a dataset.

use crate::impose::parse;
use crate::input::{Column, Dataset, Representation};

use super::column::ColumnMetadata;
use super::table::TableMetadata;
use super::types::SemanticType;

/// Generate metadata with one entry per dataset column.
///
/// Typed columns map back through their representation. Text columns are
/// sniffed: every non-null value must agree on a type, otherwise the column is
/// `character`. Columns with no non-null values are `character`.
pub fn generate_metadata(dataset: &Dataset, name: Option<&str>) -> TableMetadata {
    let columns = dataset
        .columns()
        .map(|(col_name, column)| {
            ColumnMetadata::new(col_name, infer_column_type(column)).with_description("")
        })
        .collect();

    let metadata = TableMetadata::with_columns(columns);
    match name {
        Some(name) => metadata.with_name(name),
        None => metadata,
    }
}

fn infer_column_type(column: &Column) -> SemanticType {
    match column.representation() {
        Representation::Int32 => SemanticType::Int,
        Representation::Int64 => SemanticType::Long,
        Representation::Float64 => SemanticType::Float,
        Representation::Boolean => SemanticType::Boolean,
        Representation::Date => SemanticType::Date,
        Representation::DateTime => SemanticType::Datetime,
        Representation::Text => match column {
            Column::Text(cells) => sniff(cells.iter().flatten().map(String::as_str)),
            _ => SemanticType::Character,
        },
    }
}

fn sniff<'a>(values: impl Iterator<Item = &'a str>) -> SemanticType {
    let mut inferred: Option<SemanticType> = None;

    for value in values {
        let detected = detect_value_type(value);
        inferred = match inferred {
            None => Some(detected),
            Some(current) => match widen(current, detected) {
                Some(t) => Some(t),
                None => return SemanticType::Character,
            },
        };
    }

    inferred.unwrap_or(SemanticType::Character)
}

/// Detect the type of a single value.
fn detect_value_type(value: &str) -> SemanticType {
    let trimmed = value.trim();

    if let Some(i) = parse::parse_integer(trimmed) {
        return if i32::try_from(i).is_ok() {
            SemanticType::Int
        } else {
            SemanticType::Long
        };
    }

    if parse::parse_float(trimmed).is_some() {
        return SemanticType::Float;
    }

    if parse::parse_boolean(trimmed).is_some() {
        return SemanticType::Boolean;
    }

    if trimmed.contains(':') || trimmed.contains('T') {
        if parse::parse_datetime(trimmed).is_some() {
            return SemanticType::Datetime;
        }
    } else if parse::parse_date(trimmed).is_some() {
        return SemanticType::Date;
    }

    SemanticType::Character
}

/// Common type of two detections, if any.
fn widen(a: SemanticType, b: SemanticType) -> Option<SemanticType> {
    use SemanticType::*;

    match (a, b) {
        _ if a == b => Some(a),
        (Int, Long) | (Long, Int) => Some(Long),
        (Int | Long, Float) | (Float, Int | Long) => Some(Float),
        (Date, Datetime) | (Datetime, Date) => Some(Datetime),
        _ => None,
    }
}
