/*
 * asset_upload.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Upload locally referenced images and point media nodes at them.
 */

use std::collections::HashMap;

use adf_types::{Node, node_type};
use async_trait::async_trait;
use futures::future::try_join_all;

use super::{AdfProcessingPlugin, PluginError, PublisherFunctions, UploadedAsset};
use crate::traverse::{Traversal, Visit, visit_all};

/// Uploads the files behind `external` media nodes that reference local
/// paths, then rewrites those nodes to reference the uploaded files.
///
/// Absolute `http(s)` and `data:` URLs are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetUploadPlugin;

impl AssetUploadPlugin {
    pub fn new() -> Self {
        Self
    }
}

fn local_path(media: &Node) -> Option<&str> {
    if !media.is(node_type::MEDIA) || media.attr_str("type") != Some("external") {
        return None;
    }
    let url = media.attr_str("url")?;
    let lower = url.to_ascii_lowercase();
    if url.is_empty()
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
    {
        return None;
    }
    Some(url)
}

#[async_trait]
impl AdfProcessingPlugin for AssetUploadPlugin {
    type Extracted = Vec<String>;
    type Transformed = HashMap<String, UploadedAsset>;

    fn name(&self) -> &str {
        "asset-upload"
    }

    fn extract(&self, tree: &Node) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        visit_all(tree, &mut |node: &Node| {
            if let Some(path) = local_path(node) {
                if !paths.iter().any(|p| p == path) {
                    paths.push(path.to_string());
                }
            }
        });
        paths
    }

    async fn transform(
        &self,
        paths: Vec<String>,
        functions: &dyn PublisherFunctions,
    ) -> Result<HashMap<String, UploadedAsset>, PluginError> {
        let uploads = paths.into_iter().map(|path| async move {
            let asset = functions.upload_file(&path).await?;
            Ok::<_, PluginError>((path, asset))
        });
        let uploaded = try_join_all(uploads).await?;
        Ok(uploaded
            .into_iter()
            .filter_map(|(path, asset)| asset.map(|asset| (path, asset)))
            .collect())
    }

    fn load(&self, tree: Node, mut uploaded: HashMap<String, UploadedAsset>) -> crate::Result<Node> {
        if uploaded.is_empty() {
            return Ok(tree);
        }
        Traversal::new()
            .on(node_type::MEDIA, |node, _, uploaded: &mut HashMap<String, UploadedAsset>| {
                let Some(asset) = local_path(node).and_then(|path| uploaded.get(path)) else {
                    return Ok(Visit::Keep);
                };
                let mut media = asset.to_media();
                if let Some(alt) = node.attr("alt") {
                    media.set_attr("alt", alt.clone());
                }
                Ok(Visit::Replace(media))
            })
            .run(tree, &mut uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::DocumentPlugin;
    use crate::plugin::test_support::RecordingPublisher;
    use adf_types::{doc, media_single};
    use pretty_assertions::assert_eq;

    fn image(url: &str) -> Node {
        media_single(
            Node::new(node_type::MEDIA)
                .with_attr("type", "external")
                .with_attr("url", url)
                .with_attr("alt", "diagram"),
        )
    }

    #[test]
    fn test_extract_local_paths_once() {
        let tree = doc(vec![
            image("img/a.png"),
            image("https://example.com/b.png"),
            image("img/a.png"),
            image("data:image/png;base64,AAAA"),
            image("../c.svg"),
        ]);
        assert_eq!(AssetUploadPlugin.extract(&tree), vec!["img/a.png", "../c.svg"]);
    }

    #[tokio::test]
    async fn test_media_rewritten_to_uploaded_file() {
        let tree = doc(vec![image("img/a.png"), image("https://example.com/b.png")]);
        let publisher = RecordingPublisher::default();
        let out = AssetUploadPlugin.apply(tree, &publisher).await.unwrap();

        assert_eq!(publisher.calls(), vec!["img/a.png"]);
        let media = &out.children()[0].children()[0];
        assert_eq!(media.attr_str("type"), Some("file"));
        assert_eq!(media.attr_str("id"), Some("id-img/a.png"));
        assert_eq!(media.attr_str("alt"), Some("diagram"));
        assert!(media.attr("url").is_none());
        let remote = &out.children()[1].children()[0];
        assert_eq!(remote.attr_str("type"), Some("external"));
    }

    #[tokio::test]
    async fn test_skipped_upload_leaves_node() {
        let tree = doc(vec![image("img/a.png")]);
        let publisher = RecordingPublisher {
            skip: Some("img/a.png".to_string()),
            ..Default::default()
        };
        let out = AssetUploadPlugin.apply(tree.clone(), &publisher).await.unwrap();
        assert_eq!(out, tree);
    }

    #[tokio::test]
    async fn test_failed_upload_is_error() {
        let tree = doc(vec![image("img/a.png"), image("img/b.png")]);
        let publisher = RecordingPublisher {
            fail_on: Some("img/b.png".to_string()),
            ..Default::default()
        };
        let err = AssetUploadPlugin.apply(tree, &publisher).await.unwrap_err();
        assert!(matches!(err, crate::ConvertError::Plugin(_)));
    }
}
