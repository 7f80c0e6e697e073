/*
 * builders.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Shorthand constructors for common nodes.
 */

use crate::ADF_VERSION;
use crate::node::{Attrs, Node, node_type};

pub fn doc(content: Vec<Node>) -> Node {
    Node {
        node_type: node_type::DOC.to_string(),
        version: Some(ADF_VERSION),
        content: Some(content),
        ..Default::default()
    }
}

pub fn text(value: impl Into<String>) -> Node {
    Node {
        node_type: node_type::TEXT.to_string(),
        text: Some(value.into()),
        ..Default::default()
    }
}

pub fn paragraph(content: Vec<Node>) -> Node {
    Node::new(node_type::PARAGRAPH).with_content(content)
}

/// A paragraph holding a single text run; an empty string gives an
/// empty paragraph.
pub fn paragraph_text(value: &str) -> Node {
    if value.is_empty() {
        paragraph(Vec::new())
    } else {
        paragraph(vec![text(value)])
    }
}

pub fn heading(level: u8, content: Vec<Node>) -> Node {
    Node::new(node_type::HEADING)
        .with_attr("level", level)
        .with_content(content)
}

pub fn hard_break() -> Node {
    Node::new(node_type::HARD_BREAK)
}

pub fn code_block(language: Option<&str>, body: &str) -> Node {
    let mut node = Node::new(node_type::CODE_BLOCK);
    if let Some(language) = language {
        node.set_attr("language", language);
    }
    let content = if body.is_empty() {
        Vec::new()
    } else {
        vec![text(body)]
    };
    node.with_content(content)
}

pub fn table(rows: Vec<Node>) -> Node {
    Node::new(node_type::TABLE)
        .with_attrs(Attrs::new())
        .with_content(rows)
}

pub fn table_row(cells: Vec<Node>) -> Node {
    Node::new(node_type::TABLE_ROW).with_content(cells)
}

pub fn table_header(content: Vec<Node>) -> Node {
    Node::new(node_type::TABLE_HEADER)
        .with_attrs(Attrs::new())
        .with_content(content)
}

pub fn table_cell(content: Vec<Node>) -> Node {
    Node::new(node_type::TABLE_CELL)
        .with_attrs(Attrs::new())
        .with_content(content)
}

/// A centered `mediaSingle` wrapping one `media` node.
pub fn media_single(media: Node) -> Node {
    Node::new(node_type::MEDIA_SINGLE)
        .with_attr("layout", "center")
        .with_content(vec![media])
}
