/*
 * table.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Sentinel cell merging for tables.
 */

//! Span merging for tables.
//!
//! Tables written in markdown cannot express merged cells directly. A
//! cell whose only text is `^` asks to be merged into the cell above it;
//! a cell whose only text is `<` asks to be merged into the cell to its
//! left. [`merge_cells`] resolves those requests into `rowspan` and
//! `colspan` attributes and removes the sentinel cells.

use adf_types::{Node, node_type};

/// Merge into the cell directly above.
pub const ROW_SENTINEL: &str = "^";

/// Merge into the cell immediately to the left.
pub const COL_SENTINEL: &str = "<";

const ROWSPAN: &str = "rowspan";
const COLSPAN: &str = "colspan";

/// Resolve every sentinel cell of `table` into spans.
///
/// Rows and cells are walked back to front so removing a sentinel never
/// shifts a cell that has yet to be visited. A sentinel with no target
/// (a `^` in the first row, a `<` in the first column) is removed and
/// otherwise ignored.
pub fn merge_cells(table: &mut Node) {
    let Some(rows) = table.content.as_mut() else {
        return;
    };

    for row_index in (0..rows.len()).rev() {
        let cell_count = rows[row_index].children().len();
        for col_index in (0..cell_count).rev() {
            let cell = &rows[row_index].children()[col_index];
            let request = if is_sentinel(cell, ROW_SENTINEL) {
                Some((row_index.checked_sub(1), Some(col_index), ROWSPAN))
            } else if is_sentinel(cell, COL_SENTINEL) {
                Some((Some(row_index), col_index.checked_sub(1), COLSPAN))
            } else {
                None
            };

            let Some((target_row, target_col, key)) = request else {
                continue;
            };
            let amount = span_amount(cell, key);
            match (target_row, target_col) {
                (Some(row), Some(col)) => increment_span(rows, row, col, key, amount),
                _ => tracing::debug!(row = row_index, col = col_index, "Dropping edge sentinel"),
            }
            rows[row_index].content_mut().remove(col_index);
        }
    }
}

/// Whether `cell` holds exactly `sentinel`, looking through one wrapping
/// paragraph.
pub fn is_sentinel(cell: &Node, sentinel: &str) -> bool {
    let Some(first) = cell.first_child() else {
        return false;
    };
    let inner = if first.is(node_type::PARAGRAPH) {
        first.first_child()
    } else {
        Some(first)
    };
    inner.and_then(|node| node.text.as_deref()) == Some(sentinel)
}

/// A span attribute read with JS-style defaulting: missing, zero or
/// non-numeric counts as 1.
fn span_amount(cell: &Node, key: &str) -> u64 {
    cell.attr_u64(key).filter(|v| *v > 0).unwrap_or(1)
}

/// Add `amount` to `key` on the cell of row `row_index` covering column
/// position `col_index`.
///
/// The column position is found by walking the row left to right and
/// consuming each cell's colspan. A target without the attribute gets
/// `1 + amount`; one with it gets `existing + amount`.
fn increment_span(rows: &mut [Node], row_index: usize, col_index: usize, key: &str, amount: u64) {
    let Some(row) = rows.get_mut(row_index) else {
        return;
    };

    let mut remaining = col_index as i64;
    for cell in row.content_mut() {
        if cell.attrs.is_none() {
            cell.attrs = Some(Default::default());
        }
        remaining -= span_amount(cell, COLSPAN) as i64;
        if remaining == -1 {
            let value = match cell.attr_u64(key).filter(|v| *v > 0) {
                Some(existing) => existing + amount,
                None => 1 + amount,
            };
            tracing::debug!(row = row_index, col = col_index, key, value, "Merged sentinel");
            cell.set_attr(key, value);
            return;
        }
        if remaining < 0 {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adf_types::{Attrs, paragraph_text, table, table_cell, table_header, table_row};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn cell(text: &str) -> Node {
        table_cell(vec![paragraph_text(text)])
    }

    fn texts(row: &Node) -> Vec<String> {
        row.children().iter().map(Node::plain_text).collect()
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(is_sentinel(&cell("^"), ROW_SENTINEL));
        assert!(is_sentinel(&cell("<"), COL_SENTINEL));
        assert!(!is_sentinel(&cell("^ "), ROW_SENTINEL));
        assert!(!is_sentinel(&cell("<"), ROW_SENTINEL));
        assert!(!is_sentinel(&table_cell(vec![]), ROW_SENTINEL));
        let bare = Node::new(node_type::TABLE_CELL).with_content(vec![adf_types::text("^")]);
        assert!(is_sentinel(&bare, ROW_SENTINEL));
    }

    #[test]
    fn test_row_sentinel_merges_upward() {
        let mut t = table(vec![
            table_row(vec![cell("a"), cell("b")]),
            table_row(vec![cell("^"), cell("c")]),
        ]);
        merge_cells(&mut t);
        let rows = t.children();
        assert_eq!(rows[0].children()[0].attr_u64("rowspan"), Some(2));
        assert_eq!(texts(&rows[1]), vec!["c"]);
    }

    #[test]
    fn test_col_sentinel_merges_left() {
        let mut t = table(vec![table_row(vec![cell("a"), cell("<"), cell("<"), cell("d")])]);
        merge_cells(&mut t);
        let row = &t.children()[0];
        assert_eq!(texts(row), vec!["a", "d"]);
        // Right to left: the last `<` widens the middle one, which then
        // carries its colspan of 2 into `a`.
        assert_eq!(row.children()[0].attr_u64("colspan"), Some(3));
    }

    #[test]
    fn test_row_sentinels_chain() {
        let mut t = table(vec![
            table_row(vec![cell("a")]),
            table_row(vec![cell("^")]),
            table_row(vec![cell("^")]),
        ]);
        merge_cells(&mut t);
        let rows = t.children();
        assert_eq!(rows[0].children()[0].attr_u64("rowspan"), Some(3));
        assert!(rows[1].children().is_empty());
        assert!(rows[2].children().is_empty());
    }

    #[test]
    fn test_unset_target_gets_one_plus_amount() {
        // Quirk kept as-is: an unset target becomes 1 + amount rather
        // than amount, a set one becomes existing + amount.
        let mut wide = cell("<");
        wide.set_attr("colspan", 3);
        let mut t = table(vec![table_row(vec![cell("a"), wide])]);
        merge_cells(&mut t);
        assert_eq!(t.children()[0].children()[0].attr_u64("colspan"), Some(4));

        let mut wide = cell("<");
        wide.set_attr("colspan", 3);
        let mut target = cell("a");
        target.set_attr("colspan", 1);
        let mut t = table(vec![table_row(vec![target, wide])]);
        merge_cells(&mut t);
        assert_eq!(t.children()[0].children()[0].attr_u64("colspan"), Some(4));
    }

    #[test]
    fn test_row_sentinel_respects_colspans_above() {
        let mut wide = table_header(vec![paragraph_text("wide")]);
        wide.set_attr("colspan", 2);
        let mut t = table(vec![
            table_row(vec![wide, table_header(vec![paragraph_text("c")])]),
            table_row(vec![cell("x"), cell("y"), cell("^")]),
        ]);
        merge_cells(&mut t);
        let header = &t.children()[0];
        assert_eq!(header.children()[0].attr_u64("rowspan"), None);
        assert_eq!(header.children()[1].attr_u64("rowspan"), Some(2));
    }

    #[test]
    fn test_edge_sentinels_are_dropped() {
        let mut t = table(vec![
            table_row(vec![cell("^"), cell("b")]),
            table_row(vec![cell("<"), cell("d")]),
        ]);
        merge_cells(&mut t);
        let rows = t.children();
        assert_eq!(texts(&rows[0]), vec!["b"]);
        assert_eq!(texts(&rows[1]), vec!["d"]);
        assert_eq!(rows[0].children()[0].attrs, Some(Attrs::new()));
    }

    #[test]
    fn test_row_sentinel_past_row_width_is_dropped() {
        let mut t = table(vec![
            table_row(vec![cell("a")]),
            table_row(vec![cell("b"), cell("c"), cell("^")]),
        ]);
        merge_cells(&mut t);
        let rows = t.children();
        assert_eq!(rows[0].children()[0].attr_u64("rowspan"), None);
        assert_eq!(texts(&rows[1]), vec!["b", "c"]);
    }

    #[test]
    fn test_table_without_rows() {
        let mut t = Node::new(node_type::TABLE);
        merge_cells(&mut t);
        assert_eq!(t, Node::new(node_type::TABLE));
    }

    fn plain_cell() -> impl Strategy<Value = Node> {
        ("[a-z0-9 ]{0,6}", proptest::option::of(1u64..4)).prop_map(|(text, span)| {
            let mut c = cell(&text);
            if let Some(span) = span {
                c.set_attr("colspan", span);
            }
            c
        })
    }

    proptest! {
        #[test]
        fn merge_without_sentinels_is_identity(
            rows in proptest::collection::vec(proptest::collection::vec(plain_cell(), 0..5), 0..5)
        ) {
            let original = table(rows.into_iter().map(table_row).collect());
            let mut merged = original.clone();
            merge_cells(&mut merged);
            prop_assert_eq!(merged, original);
        }
    }
}
