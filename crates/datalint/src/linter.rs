//! The linter: owns a dataset, its metadata and the validation log.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::LintConfig;
use crate::error::{LintError, Result};
use crate::impose::TypeImposer;
use crate::input::Dataset;
use crate::schema::{ColumnMetadata, TableMetadata};
use crate::validation::{CheckContext, CheckKind, ValidationEngine, ValidationLog};

/// How far a linter has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LintState {
    /// Metadata validated and types imposed, no checks run.
    Constructed,
    /// Some check kinds have run.
    PartiallyChecked,
    /// Every check kind has run at least once.
    FullyChecked,
}

/// Compact per-column result: `None` where the check did not apply or has
/// not run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub nullable: Option<bool>,
    #[serde(rename = "enum")]
    pub allowed_values: Option<bool>,
    pub regex: Option<bool>,
}

/// Builder for a [`Linter`] whose inputs arrive separately.
#[derive(Debug, Default)]
pub struct LinterBuilder {
    dataset: Option<Dataset>,
    metadata: Option<TableMetadata>,
    config: LintConfig,
}

impl LinterBuilder {
    /// Create an empty builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset.
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Set the metadata.
    pub fn metadata(mut self, metadata: TableMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: LintConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the linter.
    pub fn build(self) -> Result<Linter> {
        let dataset = self.dataset.ok_or(LintError::DataNotSet)?;
        let metadata = self.metadata.ok_or(LintError::MetadataNotSet)?;
        Linter::with_config(dataset, metadata, self.config)
    }
}

/// Validates a dataset against table metadata.
///
/// Construction validates the metadata and imposes declared types on a copy
/// of the dataset. Checks then record into the validation log; re-running a
/// check replaces its previous entries.
///
/// # Example
///
/// ```
/// use datalint::{Column, ColumnMetadata, Dataset, Linter, SemanticType, TableMetadata};
///
/// let dataset = Dataset::from_columns(vec![
///     ("id", Column::text([Some("1"), Some("2")])),
/// ])
/// .unwrap();
/// let metadata = TableMetadata::with_columns(vec![
///     ColumnMetadata::new("id", SemanticType::Int).with_nullable(false),
/// ]);
///
/// let mut linter = Linter::new(dataset, metadata).unwrap();
/// linter.check_all();
/// assert!(linter.overall_success().unwrap());
/// ```
#[derive(Debug)]
pub struct Linter {
    dataset: Dataset,
    metadata: TableMetadata,
    config: LintConfig,
    log: ValidationLog,
}

impl Linter {
    /// Create a linter with default configuration.
    pub fn new(dataset: Dataset, metadata: TableMetadata) -> Result<Self> {
        Self::with_config(dataset, metadata, LintConfig::default())
    }

    /// Create a linter with custom configuration.
    pub fn with_config(dataset: Dataset, metadata: TableMetadata, config: LintConfig) -> Result<Self> {
        metadata.validate()?;

        let dataset = if config.impose_types {
            TypeImposer::new(&config.conversions, config.coercion).impose(&dataset, &metadata)?
        } else {
            dataset
        };

        let log = ValidationLog::new(metadata.column_names());
        tracing::debug!(
            columns = metadata.column_count(),
            rows = dataset.row_count(),
            "linter constructed"
        );

        Ok(Self {
            dataset,
            metadata,
            config,
            log,
        })
    }

    /// Run one check kind over every metadata column.
    pub fn run_check(&mut self, kind: CheckKind) {
        let ctx = CheckContext {
            dataset: &self.dataset,
            metadata: &self.metadata,
            conversions: &self.config.conversions,
            max_unexpected: self.config.max_unexpected,
            regex_size_limit: self.config.regex_size_limit,
        };
        // Only fails if the log lacks a metadata column.
        if let Err(err) = ValidationEngine::new().run(kind, &ctx, &mut self.log) {
            tracing::error!(check = kind.description(), error = %err, "failed to record check");
        }
    }

    /// Check every metadata column exists at its declared position.
    pub fn check_column_exists_and_order(&mut self) {
        self.run_check(CheckKind::ExistsAndOrder);
    }

    /// Check null content against declared nullability.
    pub fn check_nulls(&mut self) {
        self.run_check(CheckKind::Nullable);
    }

    /// Check values against declared patterns.
    pub fn check_pattern(&mut self) {
        self.run_check(CheckKind::Pattern);
    }

    /// Check values against declared enums.
    pub fn check_enums(&mut self) {
        self.run_check(CheckKind::Enum);
    }

    /// Check column representations against declared types.
    pub fn check_types(&mut self) {
        self.run_check(CheckKind::Type);
    }

    /// Run every check kind in fixed order.
    pub fn check_all(&mut self) {
        for kind in CheckKind::ALL {
            self.run_check(kind);
        }

        let (passed, failed) = self
            .log
            .entries()
            .fold((0usize, 0usize), |(p, f), entry| match entry.success() {
                Some(true) => (p + 1, f),
                Some(false) => (p, f + 1),
                None => (p, f),
            });
        tracing::info!(
            columns = self.metadata.column_count(),
            checks = self.log.len(),
            passed,
            failed,
            "lint complete"
        );
    }

    /// The validation log.
    pub fn log(&self) -> &ValidationLog {
        &self.log
    }

    /// The dataset after type imposition.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The table metadata.
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// The configuration in use.
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Metadata for one column.
    pub fn meta_column(&self, name: &str) -> Result<&ColumnMetadata> {
        self.metadata.require_column(name)
    }

    /// Conjunction of every recorded check.
    pub fn overall_success(&self) -> Result<bool> {
        self.log.overall_success()
    }

    /// Conjunction of one column's recorded checks.
    pub fn column_success(&self, name: &str) -> Result<bool> {
        self.log.column_success(name)
    }

    /// Nullable, enum and pattern outcomes per column.
    pub fn test_columns(&self) -> IndexMap<String, ColumnSummary> {
        self.log
            .columns()
            .map(|column| {
                let status = |kind: CheckKind| column.get(kind).and_then(|entry| entry.success());
                let summary = ColumnSummary {
                    nullable: status(CheckKind::Nullable),
                    allowed_values: status(CheckKind::Enum),
                    regex: status(CheckKind::Pattern),
                };
                (column.col_name().to_string(), summary)
            })
            .collect()
    }

    /// How far checking has progressed.
    pub fn state(&self) -> LintState {
        let ran = CheckKind::ALL
            .iter()
            .filter(|kind| self.log.has_run(**kind))
            .count();
        match ran {
            0 => LintState::Constructed,
            n if n == CheckKind::ALL.len() => LintState::FullyChecked,
            _ => LintState::PartiallyChecked,
        }
    }
}
