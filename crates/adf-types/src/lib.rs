/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Atlassian Document Format (ADF) tree types.
 *
 * This crate provides pure data type definitions for the ADF document
 * tree: a tagged node record with optional attributes, marks, children
 * and text. It has minimal dependencies (serde, serde_json, indexmap)
 * and can be used by any crate that needs to build or rewrite ADF trees.
 */

pub mod builders;
pub mod mark;
pub mod node;

// Re-export commonly used types at the crate root
pub use builders::{
    code_block, doc, hard_break, heading, media_single, paragraph, paragraph_text, table,
    table_cell, table_header, table_row, text,
};
pub use mark::{Mark, mark_type};
pub use node::{Attrs, Node, node_type};

/// ADF schema version written on document roots.
pub const ADF_VERSION: u32 = 1;
