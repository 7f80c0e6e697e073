/*
 * encoder.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The markdown-to-tree encoder seam.
 */

//! Markdown encoding.
//!
//! The conversion pipeline does not parse markdown itself. It asks a
//! [`MarkdownEncoder`] for the raw tree, both for the document being
//! converted and for every frontmatter table cell it renders.

use adf_types::Node;

use crate::Result;

/// Produces the initial ADF tree for a markdown string.
pub trait MarkdownEncoder: Send + Sync {
    /// Encode `markdown` into a `doc` node.
    fn encode(&self, markdown: &str) -> Result<Node>;
}

/// Encoder backed by comrak.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakEncoder;

impl MarkdownEncoder for ComrakEncoder {
    fn encode(&self, markdown: &str) -> Result<Node> {
        Ok(comrak_to_adf::markdown_to_adf(markdown))
    }
}
