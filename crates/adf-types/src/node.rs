/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The ADF tree node.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mark::Mark;

/// Node attributes. Insertion order is kept so serialized output is stable.
pub type Attrs = IndexMap<String, Value>;

/// Node type names. The set is open: rewrites may introduce other tags.
pub mod node_type {
    pub const BLOCKQUOTE: &str = "blockquote";
    pub const BODIED_EXTENSION: &str = "bodiedExtension";
    pub const BULLET_LIST: &str = "bulletList";
    pub const CODE_BLOCK: &str = "codeBlock";
    pub const DOC: &str = "doc";
    pub const EXTENSION: &str = "extension";
    pub const HARD_BREAK: &str = "hardBreak";
    pub const HEADING: &str = "heading";
    pub const INLINE_CARD: &str = "inlineCard";
    pub const LIST_ITEM: &str = "listItem";
    pub const MEDIA: &str = "media";
    pub const MEDIA_SINGLE: &str = "mediaSingle";
    pub const ORDERED_LIST: &str = "orderedList";
    pub const PANEL: &str = "panel";
    pub const PARAGRAPH: &str = "paragraph";
    pub const RULE: &str = "rule";
    pub const STATUS: &str = "status";
    pub const TABLE: &str = "table";
    pub const TABLE_CELL: &str = "tableCell";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const TABLE_ROW: &str = "tableRow";
    pub const TASK_ITEM: &str = "taskItem";
    pub const TASK_LIST: &str = "taskList";
    pub const TEXT: &str = "text";
}

/// A node of the document tree.
///
/// Text nodes carry `text` (and optionally `marks`); every other node
/// carries `content`. Child order is always significant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    /// Only set on `doc` roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Mark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(node_type: impl Into<String>) -> Self {
        Node {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = Some(marks);
        self
    }

    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)?.as_str()
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attr(key)?.as_u64()
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert(key.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<Value> {
        self.attrs.as_mut()?.shift_remove(key)
    }

    pub fn first_mark(&self) -> Option<&Mark> {
        self.marks.as_ref()?.first()
    }

    pub fn first_mark_mut(&mut self) -> Option<&mut Mark> {
        self.marks.as_mut()?.first_mut()
    }

    /// Children in document order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children().first()
    }

    /// Mutable children, creating an empty list when absent.
    pub fn content_mut(&mut self) -> &mut Vec<Node> {
        self.content.get_or_insert_with(Vec::new)
    }

    /// Text of the first child, if that child is a text-bearing node.
    pub fn first_child_text(&self) -> Option<&str> {
        self.first_child()?.text.as_deref()
    }

    /// Concatenated text of every descendant text node.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in node.children() {
        collect_text(child, out);
    }
}
