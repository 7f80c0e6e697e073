/*
 * frontmatter_table.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render frontmatter values as tables.
 */

//! Frontmatter values as tables.
//!
//! A value is read as a list of entries (a non-sequence value is a list
//! of one). Each mapping entry becomes a row; its keys become columns in
//! first-seen order. A column that first appears in a later entry is
//! back-filled with `<` sentinels in the rows emitted before it, and a
//! column an entry has no value for gets a `^` sentinel. The finished
//! table is passed through [`merge_cells`], which turns those sentinels
//! into spans.
//!
//! Cell and header text is rendered by a caller-supplied function, which
//! in the converter runs the whole conversion on the text and lifts the
//! resulting blocks into the cell.

use adf_types::{Node, paragraph_text, table, table_cell, table_header, table_row};
use serde_yaml::Value;

use crate::Result;
use crate::frontmatter::{is_truthy, value_to_text};
use crate::table::{COL_SENTINEL, ROW_SENTINEL, merge_cells};

/// Column used for scalar entries.
pub const SCALAR_COLUMN: &str = "Value";

/// Build a table from `value`, rendering every header and cell through
/// `render`.
pub fn yaml_to_table<F>(value: &Value, mut render: F) -> Result<Node>
where
    F: FnMut(&str) -> Result<Vec<Node>>,
{
    let entries: Vec<&Value> = match value {
        Value::Sequence(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut labels: Vec<String> = Vec::new();
    let mut headers: Vec<Node> = Vec::new();
    let mut rows: Vec<Node> = Vec::new();

    for entry in entries {
        let fields = entry_fields(entry);

        for (label, _) in &fields {
            if labels.iter().any(|known| known == label) {
                continue;
            }
            tracing::debug!(column = labels.len(), label = %label, "Adding frontmatter table column");
            labels.push(label.clone());
            headers.push(table_header(render(label)?));
            for row in rows.iter_mut() {
                row.content_mut().push(sentinel_cell(COL_SENTINEL));
            }
        }

        let mut cells = Vec::with_capacity(labels.len());
        for label in &labels {
            let value = fields
                .iter()
                .find(|(key, _)| key == label)
                .map(|(_, value)| *value)
                .filter(|value| is_truthy(value));
            match value {
                Some(value) => cells.push(table_cell(render(&value_to_text(value))?)),
                None => cells.push(sentinel_cell(ROW_SENTINEL)),
            }
        }
        rows.push(table_row(cells));
    }

    let mut all_rows = Vec::with_capacity(rows.len() + 1);
    all_rows.push(table_row(headers));
    all_rows.extend(rows);

    let mut table = table(all_rows);
    merge_cells(&mut table);
    Ok(table)
}

/// The `(label, value)` pairs of one entry, in source order.
fn entry_fields(entry: &Value) -> Vec<(String, &Value)> {
    match entry {
        Value::Mapping(mapping) => mapping
            .iter()
            .map(|(key, value)| (value_to_text(key), value))
            .collect(),
        Value::Tagged(tagged) => entry_fields(&tagged.value),
        scalar => vec![(SCALAR_COLUMN.to_string(), scalar)],
    }
}

fn sentinel_cell(sentinel: &str) -> Node {
    table_cell(vec![paragraph_text(sentinel)])
}
