/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Convert comrak's CommonMark AST to an ADF document tree.
 *
 * This crate provides direct conversion from comrak's arena-based AST
 * to owned adf-types nodes. GFM tables and strikethrough are enabled;
 * node kinds without an ADF counterpart (raw HTML, footnotes, front
 * matter) are skipped.
 */

mod block;
mod inline;

pub use block::convert_document;

use comrak::{Arena, Options, parse_document};

use adf_types::Node;

/// Comrak options used by [`markdown_to_adf`].
pub fn default_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

/// Parse markdown and convert it to an ADF `doc` node.
pub fn markdown_to_adf(markdown: &str) -> Node {
    let arena = Arena::new();
    let options = default_options();
    let root = parse_document(&arena, markdown, &options);
    convert_document(root)
}
