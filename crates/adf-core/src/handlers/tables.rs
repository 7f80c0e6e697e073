/*
 * tables.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Table and table cell handlers.
 */

use adf_types::{Attrs, Node};
use serde_json::Value;

use crate::Result;
use crate::context::ConversionContext;
use crate::table::merge_cells;
use crate::traverse::{Ancestors, Visit};

pub(super) fn table(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    _ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    if node.attr("isNumberColumnEnabled") == Some(&Value::Bool(false)) {
        node.remove_attr("isNumberColumnEnabled");
    }
    merge_cells(node);
    Ok(Visit::Keep)
}

/// Shared by `tableHeader` and `tableCell`.
pub(super) fn table_cell(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    _ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    let attrs = node.attrs.get_or_insert_with(Attrs::new);
    for key in ["colspan", "rowspan"] {
        if !attrs.get(key).is_some_and(is_truthy_json) {
            attrs.insert(key.to_string(), Value::from(1));
        }
    }
    Ok(Visit::Keep)
}

fn is_truthy_json(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
