use std::borrow::Cow;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};
use serde_json::Value;

use super::{FormatOptions, OutputFormatter};

/// Maximum width for nested JSON cells (status subtrees, raw objects)
const MAX_JSON_COLUMN_WIDTH: usize = 60;

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

/// Render one cell. Lists of scalars are joined with commas, objects are
/// compact JSON cut to a readable width.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(|v| cell(Some(v)))
            .collect::<Vec<_>>()
            .join(","),
        Some(v @ (Value::Object(_) | Value::Array(_))) => {
            let json = v.to_string();
            truncate_value(&json, MAX_JSON_COLUMN_WIDTH).into_owned()
        }
        Some(other) => other.to_string(),
    }
}

/// Column names in first-seen order across all rows
fn columns(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn rows_table(rows: &[Value], options: &FormatOptions) -> String {
    if rows.is_empty() {
        return "(0 rows)".to_string();
    }

    let mut table = Table::new();
    // ASCII_BORDERS_ONLY_CONDENSED is close to kubectl/psql style
    table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

    let columns = columns(rows);
    if !options.no_headers {
        table.set_header(columns.iter().map(|c| c.to_uppercase()));
    }

    for row in rows {
        table.add_row(columns.iter().map(|col| cell(row.get(col))));
    }

    format!("{}\n({} rows)", table, rows.len())
}

pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format(value: &Value, options: &FormatOptions) -> String {
        match value {
            Value::Array(rows) => rows_table(rows, options),
            // Discovery listing: tabulate the types, then the summary line
            Value::Object(map) if map.get("discoveredTypes").is_some_and(Value::is_array) => {
                let types = map
                    .get("discoveredTypes")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let message = map.get("message").and_then(Value::as_str).unwrap_or_default();
                format!("{}\n{}", rows_table(types, options), message)
            }
            other => rows_table(std::slice::from_ref(other), options),
        }
    }
}
