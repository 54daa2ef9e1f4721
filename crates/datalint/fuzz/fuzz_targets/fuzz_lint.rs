//! Fuzz target for type imposition and the checks.
//!
//! Arbitrary cell text is imposed as every semantic type and linted with a
//! pattern and an enum. Nothing here may panic.

#![no_main]

use arbitrary::Arbitrary;
use datalint::{Column, ColumnMetadata, Dataset, Linter, SemanticType, TableMetadata};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    cells: Vec<Option<String>>,
    allowed: Vec<String>,
}

fuzz_target!(|input: Input| {
    if input.cells.len() > 1_000 {
        return;
    }

    for semantic_type in SemanticType::ALL {
        let dataset = match Dataset::from_columns(vec![("value", Column::Text(input.cells.clone()))]) {
            Ok(dataset) => dataset,
            Err(_) => return,
        };
        let metadata = TableMetadata::with_columns(vec![
            ColumnMetadata::new("value", semantic_type)
                .with_nullable(false)
                .with_enum(input.allowed.clone())
                .with_pattern("^[A-Za-z0-9_]+$"),
        ]);

        if let Ok(mut linter) = Linter::new(dataset, metadata) {
            linter.check_all();
            let _ = linter.overall_success();
            let _ = datalint::render_detailed_markdown(linter.log(), linter.metadata());
        }
    }
});
