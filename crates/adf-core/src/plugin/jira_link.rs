/*
 * jira_link.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Turn `JIRA:` code spans into issue cards.
 */

use adf_types::{Node, mark_type, node_type};
use async_trait::async_trait;

use super::{AdfProcessingPlugin, PluginError, PublisherFunctions};
use crate::traverse::{Traversal, Visit};

/// Replaces inline code such as `` `JIRA:ABC-123` `` with an inline card
/// linking to the issue on the configured Jira instance.
#[derive(Debug, Clone)]
pub struct JiraLinkPlugin {
    jira_url: String,
}

impl JiraLinkPlugin {
    pub fn new(jira_url: impl Into<String>) -> Self {
        let jira_url = jira_url.into().trim_end_matches('/').to_string();
        Self { jira_url }
    }

    pub fn jira_url(&self) -> &str {
        &self.jira_url
    }
}

fn issue_id(node: &Node) -> Option<&str> {
    let text = node.text.as_deref()?;
    if !node.first_mark().is_some_and(|m| m.is(mark_type::CODE)) {
        return None;
    }
    text.strip_prefix("JIRA:-")
        .or_else(|| text.strip_prefix("JIRA:"))
}

#[async_trait]
impl AdfProcessingPlugin for JiraLinkPlugin {
    type Extracted = ();
    type Transformed = ();

    fn name(&self) -> &str {
        "jira-link"
    }

    fn extract(&self, _tree: &Node) {}

    async fn transform(&self, _items: (), _functions: &dyn PublisherFunctions) -> Result<(), PluginError> {
        Ok(())
    }

    fn load(&self, tree: Node, _transformed: ()) -> crate::Result<Node> {
        if tree.children().is_empty() {
            return Ok(tree);
        }
        let jira_url = self.jira_url.as_str();
        Traversal::new()
            .on(node_type::TEXT, move |node, _, _: &mut ()| {
                let Some(issue) = issue_id(node) else {
                    return Ok(Visit::Keep);
                };
                let url = format!("{jira_url}/browse/{issue}");
                Ok(Visit::Replace(Node::new(node_type::INLINE_CARD).with_attr("url", url)))
            })
            .run(tree, &mut ())
    }
}
