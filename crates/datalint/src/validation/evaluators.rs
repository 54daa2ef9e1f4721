//! Rule evaluators, one per check kind, and the engine that runs them.

use regex::RegexBuilder;
use serde_json::{Value as Json, json};

use crate::error::{LintError, Result};
use crate::impose::TypeConversionTable;
use crate::input::{Column, Dataset, Value};
use crate::schema::{ColumnMetadata, TableMetadata};

use super::log::ValidationLog;
use super::outcome::{CheckKind, Outcome};

/// Everything an evaluator may look at. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub dataset: &'a Dataset,
    pub metadata: &'a TableMetadata,
    pub conversions: &'a TypeConversionTable,
    /// Maximum number of offending values and rows to report.
    pub max_unexpected: usize,
    /// Compiled size bound applied when building pattern regexes.
    pub regex_size_limit: usize,
}

/// Trait for evaluators.
pub trait Evaluator {
    /// The check kind this evaluator records.
    fn kind(&self) -> CheckKind;

    /// Evaluate one metadata column.
    ///
    /// `Ok(None)` means the check does not apply to this column.
    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>>;
}

/// Column is present at the position the metadata declares.
pub struct ExistsAndOrderCheck;

impl Evaluator for ExistsAndOrderCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ExistsAndOrder
    }

    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>> {
        let expected_pos = ctx
            .metadata
            .position(&column.name)
            .ok_or_else(|| LintError::ColumnNotFound(column.name.clone()))?;
        let actual_pos = ctx.dataset.position(&column.name);
        let column_exists = actual_pos.is_some();
        let order_match = actual_pos == Some(expected_pos);

        Ok(Some(
            Outcome::new(column_exists && order_match)
                .with("expected_pos", expected_pos)
                .with("actual_pos", actual_pos)
                .with("column_exists", column_exists)
                .with("order_match", order_match),
        ))
    }
}

/// Null content agrees with a declared `nullable`.
pub struct NullCheck;

impl Evaluator for NullCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Nullable
    }

    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>> {
        let Some(nullable) = column.nullable else {
            return Ok(None);
        };
        let Some(data) = ctx.dataset.column(&column.name) else {
            return Ok(None);
        };

        // Every null row is recorded; reports bound what they print.
        let null_rows = data.null_rows();
        let null_count = null_rows.len();
        let (unexpected_count, unexpected_rows) = if nullable {
            (0, Vec::new())
        } else {
            (null_count, null_rows.clone())
        };

        Ok(Some(
            Outcome::new(nullable || null_count == 0)
                .with("nullable", nullable)
                .with("element_count", data.len())
                .with("null_count", null_count)
                .with("null_index_list", null_rows)
                .with("unexpected_count", unexpected_count)
                .with("unexpected_index_list", unexpected_rows),
        ))
    }
}

/// Every non-null value contains a match for `pattern`.
pub struct PatternCheck;

impl Evaluator for PatternCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Pattern
    }

    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>> {
        let Some(pattern) = column.pattern.as_deref() else {
            return Ok(None);
        };
        let Some(data) = ctx.dataset.column(&column.name) else {
            return Ok(None);
        };

        let regex = RegexBuilder::new(pattern)
            .size_limit(ctx.regex_size_limit)
            .build()?;
        let outcome = unexpected_values(data, ctx.max_unexpected, |value| {
            regex.is_match(&value.to_string())
        })
        .with("pattern", pattern);

        Ok(Some(outcome))
    }
}

/// Every non-null value is a member of `enum`.
pub struct EnumCheck;

impl Evaluator for EnumCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Enum
    }

    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>> {
        let Some(allowed) = column.allowed_values.as_deref() else {
            return Ok(None);
        };
        let Some(data) = ctx.dataset.column(&column.name) else {
            return Ok(None);
        };

        let outcome = unexpected_values(data, ctx.max_unexpected, |value| {
            allowed.iter().any(|expected| value.matches_json(expected))
        })
        .with("value_set", allowed.to_vec());

        Ok(Some(outcome))
    }
}

/// Runtime representation matches the declared semantic type.
pub struct TypeCheck;

impl Evaluator for TypeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Type
    }

    fn evaluate(&self, ctx: &CheckContext<'_>, column: &ColumnMetadata) -> Result<Option<Outcome>> {
        let Some(data) = ctx.dataset.column(&column.name) else {
            return Ok(None);
        };

        let expected = ctx.conversions.representation_for(column.semantic_type);
        let observed = data.representation();

        Ok(Some(
            Outcome::new(expected == observed)
                .with("expected_type", column.semantic_type.name())
                .with("expected_representation", expected.name())
                .with("observed_representation", observed.name()),
        ))
    }
}

/// Shared reporting for value-level checks. Nulls always pass.
fn unexpected_values(
    data: &Column,
    max_unexpected: usize,
    mut accept: impl FnMut(&Value) -> bool,
) -> Outcome {
    let element_count = data.len();
    let mut missing_count = 0usize;
    let mut unexpected_count = 0usize;
    let mut unexpected_list: Vec<Json> = Vec::new();
    let mut unexpected_index_list: Vec<usize> = Vec::new();

    for (row, cell) in data.cells().enumerate() {
        let Some(value) = cell else {
            missing_count += 1;
            continue;
        };
        if accept(&value) {
            continue;
        }
        unexpected_count += 1;
        if unexpected_list.len() < max_unexpected {
            unexpected_list.push(value.to_json());
            unexpected_index_list.push(row);
        }
    }

    let checked = element_count - missing_count;
    let unexpected_percent = if checked == 0 {
        0.0
    } else {
        unexpected_count as f64 / checked as f64 * 100.0
    };

    Outcome::new(unexpected_count == 0)
        .with("element_count", element_count)
        .with("missing_count", missing_count)
        .with("unexpected_count", unexpected_count)
        .with("unexpected_percent", json!(unexpected_percent))
        .with("unexpected_list", unexpected_list)
        .with("unexpected_index_list", unexpected_index_list)
}

/// Runs evaluators over every metadata column and records into a log.
pub struct ValidationEngine {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl ValidationEngine {
    /// Create an engine with one evaluator per check kind.
    pub fn new() -> Self {
        Self {
            evaluators: vec![
                Box::new(ExistsAndOrderCheck),
                Box::new(NullCheck),
                Box::new(PatternCheck),
                Box::new(EnumCheck),
                Box::new(TypeCheck),
            ],
        }
    }

    fn evaluator(&self, kind: CheckKind) -> Option<&dyn Evaluator> {
        self.evaluators
            .iter()
            .find(|e| e.kind() == kind)
            .map(|e| e.as_ref())
    }

    /// Run one check kind over every metadata column.
    ///
    /// An evaluator error is recorded against its column as a failed outcome
    /// and does not stop the remaining columns.
    pub fn run(&self, kind: CheckKind, ctx: &CheckContext<'_>, log: &mut ValidationLog) -> Result<()> {
        let Some(evaluator) = self.evaluator(kind) else {
            return Ok(());
        };

        for column in &ctx.metadata.columns {
            match evaluator.evaluate(ctx, column) {
                Ok(Some(outcome)) => {
                    tracing::debug!(
                        check = kind.description(),
                        column = %column.name,
                        success = outcome.success,
                        "check evaluated"
                    );
                    log.record(&column.name, kind, outcome)?;
                }
                Ok(None) => {
                    tracing::debug!(
                        check = kind.description(),
                        column = %column.name,
                        "check not applicable"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        check = kind.description(),
                        column = %column.name,
                        error = %err,
                        "check raised, recording failure"
                    );
                    log.record(&column.name, kind, Outcome::fault(&err))?;
                }
            }
        }

        log.mark_ran(kind);
        Ok(())
    }

    /// Run every check kind in fixed order.
    pub fn run_all(&self, ctx: &CheckContext<'_>, log: &mut ValidationLog) -> Result<()> {
        for kind in CheckKind::ALL {
            self.run(kind, ctx, log)?;
        }
        Ok(())
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SemanticType;

    const REGEX_LIMIT: usize = 10 * (1 << 20);

    fn text(cells: &[Option<&str>]) -> Column {
        Column::text(cells.iter().copied())
    }

    fn run(dataset: &Dataset, metadata: &TableMetadata, kind: CheckKind) -> ValidationLog {
        let conversions = TypeConversionTable::default();
        let ctx = CheckContext {
            dataset,
            metadata,
            conversions: &conversions,
            max_unexpected: 20,
            regex_size_limit: REGEX_LIMIT,
        };
        let mut log = ValidationLog::new(metadata.column_names());
        ValidationEngine::new().run(kind, &ctx, &mut log).unwrap();
        log
    }

    #[test]
    fn test_order_mismatch() {
        let dataset = Dataset::from_columns(vec![
            ("a", text(&[Some("1")])),
            ("c", text(&[Some("1")])),
            ("b", text(&[Some("1")])),
        ])
        .unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character),
            ColumnMetadata::new("b", SemanticType::Character),
            ColumnMetadata::new("c", SemanticType::Character),
        ]);

        let log = run(&dataset, &metadata, CheckKind::ExistsAndOrder);
        let a = log.entry("a", CheckKind::ExistsAndOrder).unwrap();
        assert_eq!(a.result_key("order_match"), Some(&json!(true)));
        let b = log.entry("b", CheckKind::ExistsAndOrder).unwrap();
        assert_eq!(b.success(), Some(false));
        assert_eq!(b.result_key("actual_pos"), Some(&json!(2)));
        assert_eq!(b.result_key("expected_pos"), Some(&json!(1)));
        let c = log.entry("c", CheckKind::ExistsAndOrder).unwrap();
        assert_eq!(c.result_key("actual_pos"), Some(&json!(1)));
        assert_eq!(c.result_key("order_match"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_column() {
        let dataset = Dataset::from_columns(vec![("a", text(&[Some("1")]))]).unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character),
            ColumnMetadata::new("d", SemanticType::Int).with_nullable(false),
        ]);

        let log = run(&dataset, &metadata, CheckKind::ExistsAndOrder);
        let d = log.entry("d", CheckKind::ExistsAndOrder).unwrap();
        assert_eq!(d.success(), Some(false));
        assert_eq!(d.result_key("column_exists"), Some(&json!(false)));
        assert_eq!(d.result_key("order_match"), Some(&json!(false)));
        assert_eq!(d.result_key("actual_pos"), Some(&Json::Null));

        for kind in [CheckKind::Nullable, CheckKind::Type] {
            let log = run(&dataset, &metadata, kind);
            assert!(log.entry("d", kind).is_none());
        }
    }

    #[test]
    fn test_nullable_false_with_nulls_fails() {
        let dataset = Dataset::from_columns(vec![("a", text(&[Some("x"), None, None]))]).unwrap();
        let strict = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_nullable(false),
        ]);
        let log = run(&dataset, &strict, CheckKind::Nullable);
        let entry = log.entry("a", CheckKind::Nullable).unwrap();
        assert_eq!(entry.success(), Some(false));
        assert_eq!(entry.result_key("unexpected_index_list"), Some(&json!([1, 2])));

        let lenient = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_nullable(true),
        ]);
        let log = run(&dataset, &lenient, CheckKind::Nullable);
        let entry = log.entry("a", CheckKind::Nullable).unwrap();
        assert_eq!(entry.success(), Some(true));
        assert_eq!(entry.result_key("null_count"), Some(&json!(2)));
    }

    #[test]
    fn test_nullable_false_records_every_null_row() {
        let cells: Vec<Option<&str>> = (0..30)
            .map(|i| if i % 6 == 0 { Some("x") } else { None })
            .collect();
        let dataset = Dataset::from_columns(vec![("a", text(&cells))]).unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_nullable(false),
        ]);
        let log = run(&dataset, &metadata, CheckKind::Nullable);
        let entry = log.entry("a", CheckKind::Nullable).unwrap();

        let expected: Vec<usize> = (0..30).filter(|i| i % 6 != 0).collect();
        assert_eq!(expected.len(), 25);
        assert_eq!(entry.result_key("unexpected_count"), Some(&json!(25)));
        assert_eq!(entry.result_key("unexpected_index_list"), Some(&json!(expected)));
        assert_eq!(entry.result_key("null_index_list"), Some(&json!(expected)));
    }

    #[test]
    fn test_nullable_omitted_skips() {
        let dataset = Dataset::from_columns(vec![("a", text(&[None]))]).unwrap();
        let metadata =
            TableMetadata::with_columns(vec![ColumnMetadata::new("a", SemanticType::Character)]);
        let log = run(&dataset, &metadata, CheckKind::Nullable);
        assert!(log.entry("a", CheckKind::Nullable).is_none());
        assert!(log.has_run(CheckKind::Nullable));
    }

    #[test]
    fn test_enum_membership() {
        let dataset =
            Dataset::from_columns(vec![("a", text(&[Some("x"), Some("y"), Some("z"), None]))]).unwrap();
        let narrow = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_enum(["x", "y"]),
        ]);
        let log = run(&dataset, &narrow, CheckKind::Enum);
        let entry = log.entry("a", CheckKind::Enum).unwrap();
        assert_eq!(entry.success(), Some(false));
        assert_eq!(entry.result_key("unexpected_list"), Some(&json!(["z"])));
        assert_eq!(entry.result_key("unexpected_index_list"), Some(&json!([2])));
        assert_eq!(entry.result_key("missing_count"), Some(&json!(1)));

        let wide = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_enum(["x", "y", "z"]),
        ]);
        let log = run(&dataset, &wide, CheckKind::Enum);
        assert_eq!(log.entry("a", CheckKind::Enum).unwrap().success(), Some(true));
    }

    #[test]
    fn test_enum_report_is_bounded() {
        let cells: Vec<Option<&str>> = vec![Some("bad"); 50];
        let dataset = Dataset::from_columns(vec![("a", text(&cells))]).unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_enum(["ok"]),
        ]);
        let log = run(&dataset, &metadata, CheckKind::Enum);
        let entry = log.entry("a", CheckKind::Enum).unwrap();
        assert_eq!(entry.result_key("unexpected_count"), Some(&json!(50)));
        assert_eq!(
            entry.result_key("unexpected_list").and_then(Json::as_array).map(Vec::len),
            Some(20)
        );
    }

    #[test]
    fn test_pattern_is_search_not_full_match() {
        let dataset =
            Dataset::from_columns(vec![("a", text(&[Some("ab12"), Some("zz"), None]))]).unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_pattern("[0-9]+"),
        ]);
        let log = run(&dataset, &metadata, CheckKind::Pattern);
        let entry = log.entry("a", CheckKind::Pattern).unwrap();
        assert_eq!(entry.success(), Some(false));
        assert_eq!(entry.result_key("unexpected_list"), Some(&json!(["zz"])));
    }

    #[test]
    fn test_pattern_fault_is_contained() {
        let dataset = Dataset::from_columns(vec![
            ("a", text(&[Some("x")])),
            ("b", text(&[Some("x")])),
        ])
        .unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_pattern(r"\w{1000}\w{1000}"),
            ColumnMetadata::new("b", SemanticType::Character).with_pattern("x"),
        ]);
        let conversions = TypeConversionTable::default();
        let ctx = CheckContext {
            dataset: &dataset,
            metadata: &metadata,
            conversions: &conversions,
            max_unexpected: 20,
            regex_size_limit: 1024,
        };
        let mut log = ValidationLog::new(metadata.column_names());
        ValidationEngine::new()
            .run(CheckKind::Pattern, &ctx, &mut log)
            .unwrap();

        let a = log.entry("a", CheckKind::Pattern).unwrap();
        assert_eq!(a.success(), Some(false));
        assert!(a.exception_info().unwrap().raised_exception);
        let b = log.entry("b", CheckKind::Pattern).unwrap();
        assert_eq!(b.success(), Some(true));
        assert!(b.exception_info().is_none());
    }

    #[test]
    fn test_type_check_reports_observed_representation() {
        let dataset = Dataset::from_columns(vec![
            ("a", Column::Int(vec![Some(1)])),
            ("b", text(&[Some("1")])),
        ])
        .unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Int),
            ColumnMetadata::new("b", SemanticType::Int),
        ]);
        let log = run(&dataset, &metadata, CheckKind::Type);
        assert_eq!(log.entry("a", CheckKind::Type).unwrap().success(), Some(true));
        let b = log.entry("b", CheckKind::Type).unwrap();
        assert_eq!(b.success(), Some(false));
        assert_eq!(b.result_key("observed_representation"), Some(&json!("text")));
        assert_eq!(b.result_key("expected_representation"), Some(&json!("int32")));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dataset = Dataset::from_columns(vec![("a", text(&[Some("x"), Some("q")]))]).unwrap();
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("a", SemanticType::Character).with_enum(["x"]),
        ]);
        let conversions = TypeConversionTable::default();
        let ctx = CheckContext {
            dataset: &dataset,
            metadata: &metadata,
            conversions: &conversions,
            max_unexpected: 20,
            regex_size_limit: REGEX_LIMIT,
        };
        let engine = ValidationEngine::new();
        let mut log = ValidationLog::new(metadata.column_names());
        engine.run_all(&ctx, &mut log).unwrap();
        let first = log.clone();
        engine.run(CheckKind::Enum, &ctx, &mut log).unwrap();
        assert_eq!(log, first);
    }
}
