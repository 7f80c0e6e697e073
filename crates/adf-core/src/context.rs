/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-conversion state shared by the special-section pass and the
 * node handlers.
 */

use std::cell::Cell;

use adf_types::{Node, paragraph_text};
use serde_yaml::Value;

use crate::Result;
use crate::convert::AdfConverter;
use crate::diagnostic::Diagnostic;
use crate::frontmatter::Frontmatter;
use crate::frontmatter_table::yaml_to_table;

/// Nesting limit for markdown rendered inside frontmatter tables.
///
/// A table cell is rendered by a full conversion, which can itself hit a
/// section marker that renders the same frontmatter again.
pub const MAX_RENDER_DEPTH: usize = 8;

/// Limit on nested renders across one top-level conversion.
///
/// The depth limit alone still allows every level to render many cells,
/// each of which may render the frontmatter again.
pub const MAX_NESTED_RENDERS: usize = 256;

/// State for one conversion run.
///
/// Holds the converter's services, the read-only frontmatter, and the
/// diagnostics recorded so far. Nested conversions (table cells) get
/// their own context one level deeper and hand their diagnostics back.
/// All contexts of one top-level conversion share the render counter.
pub struct ConversionContext<'a> {
    converter: &'a AdfConverter,
    frontmatter: &'a Frontmatter,
    depth: usize,
    renders: &'a Cell<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ConversionContext<'a> {
    pub(crate) fn new(
        converter: &'a AdfConverter,
        frontmatter: &'a Frontmatter,
        depth: usize,
        renders: &'a Cell<usize>,
    ) -> Self {
        Self {
            converter,
            frontmatter,
            depth,
            renders,
            diagnostics: Vec::new(),
        }
    }

    pub fn frontmatter(&self) -> &'a Frontmatter {
        self.frontmatter
    }

    pub fn base_url(&self) -> &'a str {
        let converter = self.converter;
        &converter.settings().confluence_base_url
    }

    pub fn is_safe_url(&self, url: &str) -> bool {
        self.converter.is_safe_url(url)
    }

    /// Record a recoverable problem and log it.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(node_type = ?diagnostic.node_type, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Convert `markdown` with the full pipeline and return the blocks of
    /// the resulting document.
    pub fn render_markdown(&mut self, markdown: &str) -> Result<Vec<Node>> {
        if self.depth >= MAX_RENDER_DEPTH {
            self.warn(Diagnostic::warning(format!(
                "Frontmatter rendering nested deeper than {MAX_RENDER_DEPTH} levels; using plain text"
            )));
            return Ok(vec![paragraph_text(markdown)]);
        }
        if self.renders.get() >= MAX_NESTED_RENDERS {
            self.warn(Diagnostic::warning(format!(
                "Frontmatter rendering exceeded {MAX_NESTED_RENDERS} nested conversions; using plain text"
            )));
            return Ok(vec![paragraph_text(markdown)]);
        }
        self.renders.set(self.renders.get() + 1);
        let conversion = self.converter.convert_nested(
            markdown,
            self.frontmatter,
            self.depth + 1,
            self.renders,
        )?;
        self.diagnostics.extend(conversion.diagnostics);
        Ok(conversion.document.content.unwrap_or_default())
    }

    /// Render a frontmatter value as a table.
    pub fn render_table(&mut self, value: &Value) -> Result<Node> {
        yaml_to_table(value, |text| self.render_markdown(text))
    }

    /// Look up the frontmatter data for section `name` and render it.
    ///
    /// Returns the key that was resolved (exact or slug form) and the
    /// table, when the frontmatter holds data for the section.
    pub fn section_table(&mut self, name: &str) -> Result<(String, Option<Node>)> {
        let frontmatter = self.frontmatter;
        let (key, value) = frontmatter.section_data(name);
        let table = match value {
            Some(value) => Some(self.render_table(value)?),
            None => None,
        };
        Ok((key, table))
    }
}
