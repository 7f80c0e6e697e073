/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Extract/transform/load plugins over converted documents.
 */

//! Document plugins.
//!
//! A plugin rewrites a converted document with the help of side effects
//! it cannot perform on its own, such as uploading a referenced image.
//! Each plugin splits its work into three phases:
//!
//! - `extract` scans the tree for work items without changing it
//! - `transform` performs the external effects for those items; this is
//!   the only phase that awaits, and items may be processed concurrently
//! - `load` rewrites the tree with the results
//!
//! [`PluginPipeline`] runs plugins one after another. Each plugin's three
//! phases complete before the next plugin extracts, so later plugins see
//! every rewrite made by earlier ones. A failing `transform` aborts the
//! run before its `load`, leaving no half-applied rewrite.
//!
//! The side effects themselves are provided by the host application
//! through [`PublisherFunctions`].

mod asset_upload;
mod jira_link;
mod mermaid;

pub use asset_upload::AssetUploadPlugin;
pub use jira_link::JiraLinkPlugin;
pub use mermaid::{ChartData, ChartRenderer, MermaidRendererPlugin};

use adf_types::{Node, node_type};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of plugin side effects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin '{plugin}' failed: {message}")]
    Effect { plugin: String, message: String },

    #[error("Chart rendering failed: {0}")]
    Render(String),
}

impl PluginError {
    pub fn effect(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Effect {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

/// A file stored by the publishing platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub id: String,
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}

impl UploadedAsset {
    /// A `media` node referencing this asset.
    pub fn to_media(&self) -> Node {
        let mut media = Node::new(node_type::MEDIA)
            .with_attr("type", "file")
            .with_attr("id", self.id.as_str())
            .with_attr("collection", self.collection.as_str());
        if let Some(width) = self.width {
            media.set_attr("width", width);
        }
        if let Some(height) = self.height {
            media.set_attr("height", height);
        }
        media
    }
}

/// Side effects provided by the host application.
///
/// An upload may resolve to `None` when the host decides the asset needs
/// no upload; the referencing node is then left alone.
#[async_trait]
pub trait PublisherFunctions: Send + Sync {
    /// Upload the file at `path`, relative to the document being
    /// published.
    async fn upload_file(&self, path: &str) -> Result<Option<UploadedAsset>, PluginError>;

    /// Upload an in-memory file under `name`.
    async fn upload_buffer(
        &self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<Option<UploadedAsset>, PluginError>;
}

/// A three-phase document plugin.
#[async_trait]
pub trait AdfProcessingPlugin: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    fn name(&self) -> &str;

    /// Collect work items. Must not change the tree.
    fn extract(&self, tree: &Node) -> Self::Extracted;

    /// Perform the side effects for `items`.
    async fn transform(
        &self,
        items: Self::Extracted,
        functions: &dyn PublisherFunctions,
    ) -> Result<Self::Transformed, PluginError>;

    /// Apply the results to the tree.
    fn load(&self, tree: Node, transformed: Self::Transformed) -> crate::Result<Node>;
}

/// Object-safe form of [`AdfProcessingPlugin`], implemented for every
/// plugin so pipelines can hold plugins with different item types.
#[async_trait]
pub trait DocumentPlugin: Send + Sync {
    fn plugin_name(&self) -> &str;

    /// Run extract, transform and load in order.
    async fn apply(&self, tree: Node, functions: &dyn PublisherFunctions) -> crate::Result<Node>;
}

#[async_trait]
impl<P> DocumentPlugin for P
where
    P: AdfProcessingPlugin,
{
    fn plugin_name(&self) -> &str {
        self.name()
    }

    async fn apply(&self, tree: Node, functions: &dyn PublisherFunctions) -> crate::Result<Node> {
        let items = self.extract(&tree);
        tracing::debug!(plugin = self.name(), "Extracted plugin items");
        let transformed = self.transform(items, functions).await?;
        tracing::debug!(plugin = self.name(), "Transformed plugin items");
        self.load(tree, transformed)
    }
}

/// Plugins run in insertion order, fixed plugins first.
pub struct PluginPipeline {
    plugins: Vec<Box<dyn DocumentPlugin>>,
}

impl PluginPipeline {
    /// A pipeline with no plugins at all.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// A pipeline holding the always-active plugins.
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.push(AssetUploadPlugin::new());
        pipeline
    }

    /// The always-active plugins followed by `configured`.
    pub fn with_configured(configured: impl IntoIterator<Item = Box<dyn DocumentPlugin>>) -> Self {
        let mut pipeline = Self::with_defaults();
        pipeline.extend(configured);
        pipeline
    }

    pub fn push<P>(&mut self, plugin: P)
    where
        P: AdfProcessingPlugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
    }

    pub fn extend(&mut self, plugins: impl IntoIterator<Item = Box<dyn DocumentPlugin>>) {
        self.plugins.extend(plugins);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.plugin_name()).collect()
    }

    /// Run every plugin over `tree`.
    ///
    /// # Errors
    ///
    /// Returns the first plugin failure. Plugins after the failing one do
    /// not run and the failing plugin's `load` is skipped.
    pub async fn run(&self, tree: Node, functions: &dyn PublisherFunctions) -> crate::Result<Node> {
        let mut tree = tree;
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.plugin_name(), "Running plugin");
            tree = plugin.apply(tree, functions).await?;
        }
        Ok(tree)
    }
}

impl Default for PluginPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
