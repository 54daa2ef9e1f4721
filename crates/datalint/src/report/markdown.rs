//! Markdown rendering of a validation log.

use std::fmt::Write as _;

use serde_json::Value;

use crate::schema::TableMetadata;
use crate::validation::{CheckKind, LogEntry, ValidationLog};

fn glyph(success: Option<bool>) -> &'static str {
    match success {
        Some(true) => "✅",
        Some(false) => "❌",
        None => "❔",
    }
}

/// One row per column and check kind, with a pass/fail glyph.
pub fn render_summary_markdown(log: &ValidationLog) -> String {
    let mut out = String::from("| Column | Check | Result |\n|---|---|---|\n");
    for entry in log.entries() {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(entry.col_name()),
            entry.kind().label(),
            glyph(entry.success())
        );
    }
    out
}

/// Per-column narrative: description, one line per check, sample offending rows.
pub fn render_detailed_markdown(log: &ValidationLog, metadata: &TableMetadata) -> String {
    let mut out = String::new();
    if let Some(name) = &metadata.name {
        let _ = writeln!(out, "# {name}\n");
    }

    for column in log.columns() {
        let _ = writeln!(out, "## {}\n", column.col_name());
        if let Some(description) = metadata
            .column(column.col_name())
            .and_then(|c| c.description.as_deref())
            .filter(|d| !d.is_empty())
        {
            let _ = writeln!(out, "_{description}_\n");
        }

        if column.is_empty() {
            out.push_str("No checks run.\n\n");
            continue;
        }

        for entry in column.entries() {
            let _ = writeln!(
                out,
                "- {} **{}**: {}",
                glyph(entry.success()),
                entry.kind().label(),
                describe(entry)
            );
            if let Some(samples) = samples(entry) {
                let _ = writeln!(out, "  - offending rows: {samples}");
            }
        }
        out.push('\n');
    }
    out
}

fn describe(entry: &LogEntry) -> String {
    if let Some(message) = entry
        .exception_info()
        .and_then(|info| info.exception_message.as_deref())
    {
        return format!("check raised an error: {message}");
    }
    if entry.success().is_none() {
        return entry.status().to_string();
    }

    let key = |k: &str| entry.result_key(k).cloned().unwrap_or(Value::Null);
    match entry.kind() {
        CheckKind::ExistsAndOrder => match key("actual_pos") {
            Value::Null => format!(
                "column missing from the data (expected at position {})",
                key("expected_pos")
            ),
            actual => format!(
                "found at position {} (expected {})",
                actual,
                key("expected_pos")
            ),
        },
        CheckKind::Nullable => {
            let permitted = if key("nullable") == Value::Bool(true) {
                "permitted"
            } else {
                "not permitted"
            };
            format!("{} null values, nulls {}", key("null_count"), permitted)
        }
        CheckKind::Pattern => format!(
            "{} of {} values do not match `{}`",
            key("unexpected_count"),
            key("element_count"),
            key("pattern").as_str().unwrap_or_default()
        ),
        CheckKind::Enum => format!(
            "{} of {} values are outside {}",
            key("unexpected_count"),
            key("element_count"),
            key("value_set")
        ),
        CheckKind::Type => format!(
            "declared {} needs {}, data is {}",
            key("expected_type").as_str().unwrap_or_default(),
            key("expected_representation").as_str().unwrap_or_default(),
            key("observed_representation").as_str().unwrap_or_default()
        ),
    }
}

/// Offending rows printed per check before the rest are summarised.
const SAMPLE_ROWS: usize = 20;

/// Offending `row: value` pairs, if the check recorded any.
fn samples(entry: &LogEntry) -> Option<String> {
    let rows = entry.result_key("unexpected_index_list")?.as_array()?;
    if rows.is_empty() {
        return None;
    }
    let values = entry
        .result_key("unexpected_list")
        .and_then(Value::as_array);

    let mut pairs: Vec<String> = rows
        .iter()
        .take(SAMPLE_ROWS)
        .enumerate()
        .map(|(i, row)| match values.and_then(|v| v.get(i)) {
            Some(value) => format!("{row}: {value}"),
            None => row.to_string(),
        })
        .collect();
    if rows.len() > SAMPLE_ROWS {
        pairs.push(format!("and {} more", rows.len() - SAMPLE_ROWS));
    }
    Some(pairs.join(", "))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
