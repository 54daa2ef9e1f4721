//! Integration tests for datalint.

use std::io::Write;
use tempfile::NamedTempFile;

use datalint::input::SourceFormat;
use datalint::{
    CheckKind, CoercionPolicy, LintConfig, LintError, LintState, Linter, ReaderConfig,
    Representation, TableMetadata, generate_metadata, read_csv, read_jsonl,
    render_detailed_markdown, render_summary_markdown,
};
use serde_json::json;

/// Helper to create a temporary file with given content and suffix.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const PEOPLE_CSV: &str = "id,name,status,joined,score\n\
                          1,Alice,active,2020-01-15,3.5\n\
                          2,Bob,inactive,2021-06-30,4\n\
                          3,Carol,active,2019-11-02,NA\n";

const PEOPLE_META: &str = r#"{
    "name": "people",
    "columns": [
        {"name": "id", "type": "int", "nullable": false},
        {"name": "name", "type": "character", "pattern": "^[A-Z][a-z]+$"},
        {"name": "status", "type": "character", "enum": ["active", "inactive"]},
        {"name": "joined", "type": "date", "description": "Date the person joined"},
        {"name": "score", "type": "float", "nullable": true}
    ]
}"#;

fn lint_people(csv: &str, meta: &str) -> Linter {
    let data = create_test_file(csv, ".csv");
    let meta = create_test_file(meta, ".json");
    let (dataset, _) = read_csv(data.path(), &ReaderConfig::default()).expect("read failed");
    let metadata = TableMetadata::from_path(meta.path()).expect("metadata failed");
    let mut linter = Linter::new(dataset, metadata).expect("construction failed");
    linter.check_all();
    linter
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_clean_csv_passes() {
    let linter = lint_people(PEOPLE_CSV, PEOPLE_META);

    assert_eq!(linter.state(), LintState::FullyChecked);
    assert!(linter.overall_success().unwrap());

    let dataset = linter.dataset();
    assert_eq!(dataset.column("id").unwrap().representation(), Representation::Int32);
    assert_eq!(dataset.column("joined").unwrap().representation(), Representation::Date);
    assert_eq!(dataset.column("score").unwrap().representation(), Representation::Float64);
}

#[test]
fn test_entry_count_matches_applicable_checks() {
    let linter = lint_people(PEOPLE_CSV, PEOPLE_META);

    // 5 existence + 5 type + 2 nullable + 1 pattern + 1 enum
    assert_eq!(linter.log().len(), 14);
    assert_eq!(linter.log().as_table_rows().len(), 14);
    assert!(linter.log().entry("joined", CheckKind::Nullable).is_none());
}

#[test]
fn test_dirty_csv_reports_each_failure() {
    let csv = "id,status,name,joined,score\n\
               1,active,alice,2020-01-15,3.5\n\
               x,retired,Bob,not a date,4\n\
               ,active,Carol,2019-11-02,\n";
    let linter = lint_people(csv, PEOPLE_META);
    let log = linter.log();

    assert!(!linter.overall_success().unwrap());

    // id: "x" blocks integer coercion, so the type check fails; the null fails nullability.
    assert_eq!(log.entry("id", CheckKind::Type).unwrap().success(), Some(false));
    let nulls = log.entry("id", CheckKind::Nullable).unwrap();
    assert_eq!(nulls.success(), Some(false));
    assert_eq!(nulls.result_key("unexpected_index_list"), Some(&json!([2])));

    // name and status swapped.
    let name = log.entry("name", CheckKind::ExistsAndOrder).unwrap();
    assert_eq!(name.result_key("actual_pos"), Some(&json!(2)));
    assert_eq!(name.result_key("order_match"), Some(&json!(false)));

    let pattern = log.entry("name", CheckKind::Pattern).unwrap();
    assert_eq!(pattern.result_key("unexpected_list"), Some(&json!(["alice"])));

    let status = log.entry("status", CheckKind::Enum).unwrap();
    assert_eq!(status.result_key("unexpected_list"), Some(&json!(["retired"])));

    // Unparseable dates become null under the ignore policy.
    assert_eq!(log.entry("joined", CheckKind::Type).unwrap().success(), Some(true));
    assert!(linter.dataset().column("joined").unwrap().is_null(1));

    // Declared nullable: passes despite the null.
    assert_eq!(log.entry("score", CheckKind::Nullable).unwrap().success(), Some(true));

    let legacy = linter.test_columns();
    assert_eq!(legacy["status"].allowed_values, Some(false));
    assert_eq!(legacy["name"].regex, Some(false));
    assert_eq!(legacy["joined"].nullable, None);
}

#[test]
fn test_missing_column() {
    let csv = "id,name,status,joined\n1,Alice,active,2020-01-15\n";
    let linter = lint_people(csv, PEOPLE_META);

    let score = linter.log().entry("score", CheckKind::ExistsAndOrder).unwrap();
    assert_eq!(score.success(), Some(false));
    assert_eq!(score.result_key("column_exists"), Some(&json!(false)));
    assert_eq!(score.result_key("actual_pos"), Some(&json!(null)));
    assert!(linter.log().entry("score", CheckKind::Type).is_none());
    assert!(!linter.column_success("score").unwrap());
    assert!(linter.column_success("id").unwrap());
}

#[test]
fn test_jsonl_source() {
    let content = r#"{"id": 1, "name": "Alice", "status": "active", "joined": "2020-01-15", "score": 3.5}
{"id": 2, "name": "Bob", "status": "inactive", "joined": "2021-06-30", "score": null}
"#;
    let data = create_test_file(content, ".jsonl");
    let dataset = read_jsonl(data.path()).unwrap();
    assert_eq!(dataset.column_count(), 5);
    assert_eq!(dataset.row_count(), 2);

    let metadata = TableMetadata::from_json_str(PEOPLE_META).unwrap();
    let mut linter = Linter::new(dataset, metadata).unwrap();
    linter.check_all();
    assert!(linter.overall_success().unwrap());
}

#[test]
fn test_tsv_detection_and_source_metadata() {
    let data = create_test_file("a\tb\n1\tx\n2\ty\n", ".tsv");
    let (dataset, source) = read_csv(data.path(), &ReaderConfig::default()).unwrap();
    assert_eq!(source.format, SourceFormat::Tsv);
    assert_eq!(source.row_count, 2);
    assert_eq!(source.column_count, 2);
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(dataset.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
}

// =============================================================================
// Construction failures
// =============================================================================

#[test]
fn test_invalid_metadata_rejected() {
    let err = TableMetadata::from_json_str(r#"{"columns": [{"name": "a", "type": "integer"}]}"#)
        .unwrap_err();
    match err {
        LintError::Schema { path, .. } => assert_eq!(path, "columns[0].type"),
        other => panic!("unexpected error: {other}"),
    }

    let err = TableMetadata::from_json_str(r#"{"cols": []}"#).unwrap_err();
    assert!(matches!(err, LintError::Schema { .. }));

    let err = TableMetadata::from_json_str(
        r#"{"columns": [{"name": "a", "type": "character", "pattern": "("}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, LintError::Schema { .. }));
}

#[test]
fn test_duplicate_header_rejected() {
    let data = create_test_file("a,a\n1,2\n", ".csv");
    let err = read_csv(data.path(), &ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, LintError::DuplicateColumn { .. }));
}

#[test]
fn test_strict_policy_fails_construction() {
    let data = create_test_file("id\n1\nx\n", ".csv");
    let (dataset, _) = read_csv(data.path(), &ReaderConfig::default()).unwrap();
    let metadata =
        TableMetadata::from_json_str(r#"{"columns": [{"name": "id", "type": "int"}]}"#).unwrap();
    let config = LintConfig {
        coercion: CoercionPolicy::Raise,
        ..LintConfig::default()
    };
    let err = Linter::with_config(dataset, metadata, config).unwrap_err();
    assert!(matches!(err, LintError::Coercion { row: 1, .. }));
}

#[test]
fn test_no_impose_leaves_text() {
    let data = create_test_file("id\n1\n2\n", ".csv");
    let (dataset, _) = read_csv(data.path(), &ReaderConfig::default()).unwrap();
    let metadata =
        TableMetadata::from_json_str(r#"{"columns": [{"name": "id", "type": "int"}]}"#).unwrap();
    let config = LintConfig {
        impose_types: false,
        ..LintConfig::default()
    };
    let mut linter = Linter::with_config(dataset, metadata, config).unwrap();
    linter.check_types();
    assert_eq!(
        linter.log().entry("id", CheckKind::Type).unwrap().success(),
        Some(false)
    );
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn test_reports_render() {
    let csv = "id,name,status,joined,score\n1,alice,gone,2020-01-15,1\n";
    let linter = lint_people(csv, PEOPLE_META);

    let summary = render_summary_markdown(linter.log());
    assert!(summary.contains("| name | Pattern | ❌ |"));
    assert!(summary.contains("| id | Type | ✅ |"));

    let detailed = render_detailed_markdown(linter.log(), linter.metadata());
    assert!(detailed.starts_with("# people"));
    assert!(detailed.contains("_Date the person joined_"));
    assert!(detailed.contains("offending rows: 0: \"gone\""));

    let dict = linter.log().as_dict();
    assert_eq!(dict["status"]["check_enums"]["success"], json!(false));
    assert_eq!(
        dict["status"]["check_enums"]["result"]["unexpected_list"],
        json!(["gone"])
    );
}

#[test]
fn test_generated_metadata_lints_its_source() {
    let data = create_test_file(PEOPLE_CSV, ".csv");
    let (dataset, _) = read_csv(data.path(), &ReaderConfig::default()).unwrap();

    let metadata = generate_metadata(&dataset, Some("people"));
    let json = metadata.to_json_pretty().unwrap();
    let reloaded = TableMetadata::from_json_str(&json).unwrap();
    assert_eq!(reloaded, metadata);

    let mut linter = Linter::new(dataset, reloaded).unwrap();
    linter.check_all();
    assert!(linter.overall_success().unwrap());
}
