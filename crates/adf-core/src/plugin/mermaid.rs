/*
 * mermaid.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render mermaid code blocks to uploaded images.
 */

use std::collections::HashMap;
use std::sync::Arc;

use adf_types::{Node, media_single, node_type};
use async_trait::async_trait;
use futures::future::try_join_all;
use sha1::{Digest, Sha1};

use super::{AdfProcessingPlugin, PluginError, PublisherFunctions, UploadedAsset};
use crate::traverse::{Traversal, Visit, visit_all};

/// One chart to render: its upload name and mermaid source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    pub name: String,
    pub data: String,
}

/// Renders mermaid sources to PNG images.
///
/// Rendering needs a browser or similar runtime, so the host provides it.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render every chart, returning PNG bytes keyed by chart name.
    async fn capture_charts(&self, charts: &[ChartData]) -> Result<HashMap<String, Vec<u8>>, PluginError>;
}

/// Replaces `mermaid` code blocks with images of the rendered charts.
#[derive(Clone)]
pub struct MermaidRendererPlugin {
    renderer: Arc<dyn ChartRenderer>,
}

impl MermaidRendererPlugin {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { renderer }
    }
}

/// Upload name of a chart, derived from its source.
pub fn chart_name(source: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source.as_bytes());
    let digest = hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>();
    format!("RenderedMermaidChart-{digest}.png")
}

fn mermaid_source(node: &Node) -> Option<&str> {
    if node.is(node_type::CODE_BLOCK) && node.attr_str("language") == Some("mermaid") {
        Some(node.first_child_text().unwrap_or_default())
    } else {
        None
    }
}

#[async_trait]
impl AdfProcessingPlugin for MermaidRendererPlugin {
    type Extracted = Vec<ChartData>;
    type Transformed = HashMap<String, UploadedAsset>;

    fn name(&self) -> &str {
        "mermaid-renderer"
    }

    fn extract(&self, tree: &Node) -> Vec<ChartData> {
        let mut charts: Vec<ChartData> = Vec::new();
        visit_all(tree, &mut |node: &Node| {
            if let Some(source) = mermaid_source(node) {
                let name = chart_name(source);
                if !charts.iter().any(|c| c.name == name) {
                    charts.push(ChartData {
                        name,
                        data: source.to_string(),
                    });
                }
            }
        });
        charts
    }

    async fn transform(
        &self,
        charts: Vec<ChartData>,
        functions: &dyn PublisherFunctions,
    ) -> Result<HashMap<String, UploadedAsset>, PluginError> {
        if charts.is_empty() {
            return Ok(HashMap::new());
        }

        let mut rendered = self.renderer.capture_charts(&charts).await?;
        let mut images = Vec::with_capacity(charts.len());
        for chart in charts {
            let bytes = rendered
                .remove(&chart.name)
                .ok_or_else(|| PluginError::Render(format!("no image produced for {}", chart.name)))?;
            images.push((chart.name, bytes));
        }

        let uploads = images.into_iter().map(|(name, bytes)| async move {
            let asset = functions.upload_buffer(&name, bytes).await?;
            Ok::<_, PluginError>((name, asset))
        });
        Ok(try_join_all(uploads)
            .await?
            .into_iter()
            .filter_map(|(name, asset)| asset.map(|asset| (name, asset)))
            .collect())
    }

    fn load(&self, tree: Node, mut uploaded: HashMap<String, UploadedAsset>) -> crate::Result<Node> {
        if uploaded.is_empty() {
            return Ok(tree);
        }
        Traversal::new()
            .on(node_type::CODE_BLOCK, |node, _, uploaded: &mut HashMap<String, UploadedAsset>| {
                let Some(asset) = mermaid_source(node).and_then(|s| uploaded.get(&chart_name(s))) else {
                    return Ok(Visit::Keep);
                };
                Ok(Visit::Replace(media_single(asset.to_media())))
            })
            .run(tree, &mut uploaded)
    }
}
