/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-node-type handlers of the document pass.
 */

//! Handlers of the main document pass.
//!
//! Each handler rewrites one node type into the shape the publishing
//! platform expects. They run in a single [`Traversal`] after special
//! sections have been extracted. `tableRow` nodes need no rewrite and
//! have no handler.

mod code_block;
mod lists;
mod panel;
mod tables;
mod text;

use adf_types::node_type;

use crate::context::ConversionContext;
use crate::traverse::Traversal;

pub use code_block::map_language;
pub use text::badge_color;

/// The traversal run over every converted document.
pub fn document_traversal<'a>() -> Traversal<'static, ConversionContext<'a>> {
    Traversal::new()
        .on(node_type::TEXT, text::text)
        .on(node_type::TABLE, tables::table)
        .on(node_type::TABLE_HEADER, tables::table_cell)
        .on(node_type::TABLE_CELL, tables::table_cell)
        .on(node_type::ORDERED_LIST, lists::ordered_list)
        .on(node_type::BULLET_LIST, lists::bullet_list)
        .on(node_type::CODE_BLOCK, code_block::code_block)
        .on(node_type::PANEL, panel::panel)
}
