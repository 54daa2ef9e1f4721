//! Datalint: validate tabular datasets against declarative column metadata.
//!
//! A [`Linter`] takes a [`Dataset`] and [`TableMetadata`], imposes the
//! declared types on a copy of the data, and runs one check per column and
//! check kind: existence and order, nullability, pattern, enum membership and
//! type conformance. Every outcome lands in a [`ValidationLog`] that can be
//! queried for overall or per-column success and rendered as reports.
//!
//! # Example
//!
//! ```no_run
//! use datalint::{Linter, ReaderConfig, TableMetadata, read_csv, render_summary_markdown};
//!
//! let (dataset, _source) = read_csv("people.csv", &ReaderConfig::default()).unwrap();
//! let metadata = TableMetadata::from_path("people.json").unwrap();
//!
//! let mut linter = Linter::new(dataset, metadata).unwrap();
//! linter.check_all();
//!
//! println!("{}", render_summary_markdown(linter.log()));
//! println!("Passed: {}", linter.overall_success().unwrap());
//! ```

pub mod config;
pub mod error;
pub mod impose;
pub mod input;
pub mod report;
pub mod schema;
pub mod validation;

mod linter;

pub use crate::linter::{ColumnSummary, LintState, Linter, LinterBuilder};
pub use config::LintConfig;
pub use error::{ColumnOrigin, LintError, Result};
pub use impose::parse::{parse_date, parse_datetime};
pub use impose::{CoercionPolicy, TypeConversionTable, TypeImposer, reconcile_columns};
pub use input::{Column, Dataset, Parser, ReaderConfig, Representation, SourceMetadata, Value, read_csv, read_jsonl};
pub use report::{render_detailed_markdown, render_summary_markdown};
pub use schema::{ColumnMetadata, SemanticType, TableMetadata, generate_metadata, validate_metadata};
pub use validation::{CheckKind, ExceptionInfo, LogEntry, Outcome, TableRow, ValidationLog};
