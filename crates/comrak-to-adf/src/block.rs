/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Convert comrak block nodes to ADF block nodes.
 */

use crate::inline::{collect_text, convert_children_to_inlines, convert_inline_nodes};
use adf_types::{
    Node, code_block, doc, hard_break, heading, media_single, node_type, paragraph, table,
    table_cell, table_header, table_row, text,
};
use comrak::nodes::{AstNode, ListType, NodeCodeBlock, NodeList, NodeValue};
use once_cell::sync::Lazy;
use regex::Regex;

static CALLOUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[!([\w-]+)\][+-]?\s*").unwrap());

/// Convert a comrak document to an ADF `doc` node.
///
/// A root that is not a comrak document yields an empty `doc`.
pub fn convert_document<'a>(root: &'a AstNode<'a>) -> Node {
    if !matches!(root.data.borrow().value, NodeValue::Document) {
        return doc(Vec::new());
    }
    doc(convert_children_to_blocks(root))
}

/// Convert a comrak node's block children to ADF blocks.
fn convert_children_to_blocks<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    node.children().filter_map(convert_block).collect()
}

/// Convert a comrak block node, or `None` for kinds that are skipped.
fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<Node> {
    let ast = node.data.borrow();

    match &ast.value {
        NodeValue::Paragraph => {
            if let Some(media) = image_only_paragraph(node) {
                return Some(media);
            }
            Some(paragraph(convert_children_to_inlines(node)))
        }

        NodeValue::Heading(h) => Some(heading(h.level, convert_children_to_inlines(node))),

        NodeValue::CodeBlock(block) => Some(convert_code_block(block)),

        NodeValue::BlockQuote => Some(convert_block_quote(node)),

        NodeValue::List(list) => Some(convert_list(node, list)),

        NodeValue::Item(_) => Some(
            Node::new(node_type::LIST_ITEM).with_content(convert_children_to_blocks(node)),
        ),

        NodeValue::ThematicBreak => Some(Node::new(node_type::RULE)),

        NodeValue::Table(_) => Some(table(
            node.children().map(convert_table_row).collect(),
        )),

        // Front matter is parsed separately; raw HTML and the remaining
        // extensions have no ADF counterpart.
        _ => None,
    }
}

fn convert_code_block(block: &NodeCodeBlock) -> Node {
    let info = block.info.trim();
    let language = (!info.is_empty()).then_some(info);
    let body = block.literal.strip_suffix('\n').unwrap_or(&block.literal);
    code_block(language, body)
}

fn convert_list<'a>(node: &'a AstNode<'a>, list: &NodeList) -> Node {
    let items = convert_children_to_blocks(node);
    match list.list_type {
        ListType::Bullet => Node::new(node_type::BULLET_LIST).with_content(items),
        ListType::Ordered => Node::new(node_type::ORDERED_LIST)
            .with_attr("order", list.start as u64)
            .with_content(items),
    }
}

fn convert_table_row<'a>(row: &'a AstNode<'a>) -> Node {
    let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
    let cells = row
        .children()
        .map(|cell| {
            let content = vec![paragraph(convert_children_to_inlines(cell))];
            if header {
                table_header(content)
            } else {
                table_cell(content)
            }
        })
        .collect();
    table_row(cells)
}

/// A paragraph whose only meaningful child is an image becomes a
/// `mediaSingle` referencing the image location.
fn image_only_paragraph<'a>(node: &'a AstNode<'a>) -> Option<Node> {
    let mut image = None;
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(link) if image.is_none() => {
                image = Some((link.url.clone(), collect_text(child)));
            }
            NodeValue::Text(value) if value.trim().is_empty() => {}
            NodeValue::SoftBreak => {}
            _ => return None,
        }
    }
    let (url, alt) = image?;
    let mut media = Node::new(node_type::MEDIA)
        .with_attr("type", "external")
        .with_attr("url", url);
    if !alt.is_empty() {
        media.set_attr("alt", alt);
    }
    Some(media_single(media))
}

/// Block quotes opening with `[!kind]` become panels; the rest of that
/// first line is kept as a leading title run followed by a hard break.
fn convert_block_quote<'a>(node: &'a AstNode<'a>) -> Node {
    let Some(first) = node.first_child() else {
        return Node::new(node_type::BLOCKQUOTE).with_content(Vec::new());
    };
    if !matches!(first.data.borrow().value, NodeValue::Paragraph) {
        return Node::new(node_type::BLOCKQUOTE).with_content(convert_children_to_blocks(node));
    }

    // Split the first paragraph at its first line break.
    let line_end = first.children().position(|child| {
        matches!(
            child.data.borrow().value,
            NodeValue::SoftBreak | NodeValue::LineBreak
        )
    });
    let (first_line, rest) = match line_end {
        Some(end) => (
            convert_inline_nodes(first.children().take(end)),
            convert_inline_nodes(first.children().skip(end + 1)),
        ),
        None => (convert_children_to_inlines(first), Vec::new()),
    };

    let Some((kind, title)) = parse_callout_line(&first_line) else {
        return Node::new(node_type::BLOCKQUOTE).with_content(convert_children_to_blocks(node));
    };

    let mut lead = Vec::new();
    if !title.is_empty() {
        lead.extend(title);
        lead.push(hard_break());
    }
    lead.extend(rest);

    let mut content = Vec::new();
    if !lead.is_empty() {
        content.push(paragraph(lead));
    }
    content.extend(node.children().skip(1).filter_map(convert_block));

    Node::new(node_type::PANEL)
        .with_attr("panelType", panel_type(&kind))
        .with_content(content)
}

/// Returns the callout kind and the remaining title inlines.
fn parse_callout_line(line: &[Node]) -> Option<(String, Vec<Node>)> {
    let first = line.first()?;
    if !first.is(node_type::TEXT) || first.marks.is_some() {
        return None;
    }
    let value = first.text.as_deref()?;
    let captures = CALLOUT_RE.captures(value)?;
    let kind = captures[1].to_lowercase();
    let remainder = &value[captures[0].len()..];

    let mut title = Vec::new();
    if !remainder.is_empty() {
        title.push(text(remainder));
    }
    title.extend(line[1..].iter().cloned());
    Some((kind, title))
}

fn panel_type(kind: &str) -> &str {
    match kind {
        "note" | "info" | "todo" | "abstract" | "summary" => "info",
        "tip" | "hint" | "success" | "check" | "done" => "success",
        "warning" | "caution" | "attention" => "warning",
        "danger" | "error" | "bug" | "fail" | "failure" | "missing" => "error",
        "toc" | "excerpt" | "properties" => kind,
        _ => "note",
    }
}
