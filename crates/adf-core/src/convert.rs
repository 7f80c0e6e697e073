/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Conversion entry points.
 */

//! Markdown to ADF conversion.
//!
//! [`AdfConverter`] ties the stages together:
//!
//! 1. the [`MarkdownEncoder`] produces the raw tree
//! 2. special sections are extracted from the top-level blocks
//! 3. the document traversal rewrites individual nodes
//! 4. for [`AdfConverter::publish`], the plugin pipeline runs last
//!
//! The converter holds no per-call state and can be shared between
//! threads.

use std::cell::Cell;
use std::sync::Arc;

use adf_types::Node;

use crate::Result;
use crate::context::ConversionContext;
use crate::diagnostic::Diagnostic;
use crate::encoder::{ComrakEncoder, MarkdownEncoder};
use crate::frontmatter::Frontmatter;
use crate::handlers::document_traversal;
use crate::plugin::{PluginPipeline, PublisherFunctions};
use crate::sections::extract_special_sections;
use crate::settings::ConversionSettings;
use crate::url::{UrlPredicate, is_safe_url};

/// The converted document and the recoverable problems met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: Node,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone)]
pub struct AdfConverter {
    settings: ConversionSettings,
    encoder: Arc<dyn MarkdownEncoder>,
    url_predicate: UrlPredicate,
}

impl AdfConverter {
    /// A converter using the comrak encoder.
    pub fn new(settings: ConversionSettings) -> Self {
        Self::with_encoder(settings, Arc::new(ComrakEncoder))
    }

    pub fn with_encoder(settings: ConversionSettings, encoder: Arc<dyn MarkdownEncoder>) -> Self {
        Self {
            settings,
            encoder,
            url_predicate: Arc::new(is_safe_url),
        }
    }

    /// Replace the link safety predicate.
    pub fn with_url_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.url_predicate = Arc::new(predicate);
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn is_safe_url(&self, url: &str) -> bool {
        (self.url_predicate)(url)
    }

    /// Encode `markdown` and convert the result.
    ///
    /// # Errors
    ///
    /// Fails when the encoder fails or the encoded tree is not a usable
    /// document. Malformed embedded blocks are reported as diagnostics
    /// instead.
    pub fn convert_markdown(&self, markdown: &str, frontmatter: &Frontmatter) -> Result<Conversion> {
        self.convert_nested(markdown, frontmatter, 0, &Cell::new(0))
    }

    /// Convert an already encoded document.
    pub fn process_document(&self, document: Node, frontmatter: &Frontmatter) -> Result<Conversion> {
        self.process_nested(document, frontmatter, 0, &Cell::new(0))
    }

    /// Convert `markdown`, then run `plugins` over the result.
    ///
    /// Plugins only ever see a fully converted document. The first plugin
    /// failure aborts the run.
    pub async fn publish(
        &self,
        markdown: &str,
        frontmatter: &Frontmatter,
        plugins: &PluginPipeline,
        functions: &dyn PublisherFunctions,
    ) -> Result<Conversion> {
        let Conversion {
            document,
            diagnostics,
        } = self.convert_markdown(markdown, frontmatter)?;
        let document = plugins.run(document, functions).await?;
        Ok(Conversion {
            document,
            diagnostics,
        })
    }

    pub(crate) fn convert_nested(
        &self,
        markdown: &str,
        frontmatter: &Frontmatter,
        depth: usize,
        renders: &Cell<usize>,
    ) -> Result<Conversion> {
        let document = self.encoder.encode(markdown)?;
        self.process_nested(document, frontmatter, depth, renders)
    }

    fn process_nested(
        &self,
        mut document: Node,
        frontmatter: &Frontmatter,
        depth: usize,
        renders: &Cell<usize>,
    ) -> Result<Conversion> {
        let mut ctx = ConversionContext::new(self, frontmatter, depth, renders);
        extract_special_sections(&mut document, &mut ctx)?;
        let document = document_traversal().run(document, &mut ctx)?;
        Ok(Conversion {
            document,
            diagnostics: ctx.into_diagnostics(),
        })
    }
}

impl Default for AdfConverter {
    fn default() -> Self {
        Self::new(ConversionSettings::default())
    }
}

impl std::fmt::Debug for AdfConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdfConverter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
