/*
 * inline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Convert comrak inline nodes to ADF inline nodes.
 */

use adf_types::{Mark, Node, hard_break, mark_type, node_type, text};
use comrak::nodes::{AstNode, NodeValue};

/// Convert a comrak node's inline children to ADF inlines.
pub(crate) fn convert_children_to_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    convert_inline_nodes(node.children())
}

/// Convert a run of comrak inline nodes, merging adjacent text runs that
/// carry identical marks.
pub(crate) fn convert_inline_nodes<'a>(nodes: impl Iterator<Item = &'a AstNode<'a>>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        convert_inline(node, &[], &mut out);
    }
    merge_adjacent_text(out)
}

fn convert_inline<'a>(node: &'a AstNode<'a>, marks: &[Mark], out: &mut Vec<Node>) {
    let ast = node.data.borrow();

    match &ast.value {
        NodeValue::Text(value) => out.push(marked_text(value, marks)),

        // Soft breaks collapse to a space, as they do when rendered
        NodeValue::SoftBreak => out.push(marked_text(" ", marks)),

        NodeValue::LineBreak => out.push(hard_break()),

        NodeValue::Code(code) => {
            let marks = with_mark(marks, Mark::new(mark_type::CODE));
            out.push(marked_text(&code.literal, &marks));
        }

        NodeValue::HtmlInline(html) => out.push(marked_text(html, marks)),

        NodeValue::Emph => convert_marked_children(node, marks, Mark::new(mark_type::EM), out),

        NodeValue::Strong => {
            convert_marked_children(node, marks, Mark::new(mark_type::STRONG), out)
        }

        NodeValue::Strikethrough => {
            convert_marked_children(node, marks, Mark::new(mark_type::STRIKE), out)
        }

        NodeValue::Link(link) => {
            let mark = Mark::link(link.url.clone(), Some(link.title.as_str()));
            convert_marked_children(node, marks, mark, out)
        }

        NodeValue::Image(link) => {
            // Images inside running text have no inline ADF form; keep
            // them reachable as a link on their alt text.
            let alt = collect_text(node);
            let label = if alt.is_empty() { link.url.clone() } else { alt };
            let marks = with_mark(marks, Mark::link(link.url.clone(), None));
            out.push(marked_text(&label, &marks));
        }

        // Escaped characters and any other containers: flatten children
        _ => {
            for child in node.children() {
                convert_inline(child, marks, out);
            }
        }
    }
}

fn convert_marked_children<'a>(
    node: &'a AstNode<'a>,
    marks: &[Mark],
    mark: Mark,
    out: &mut Vec<Node>,
) {
    let marks = with_mark(marks, mark);
    for child in node.children() {
        convert_inline(child, &marks, out);
    }
}

fn with_mark(marks: &[Mark], mark: Mark) -> Vec<Mark> {
    let mut marks = marks.to_vec();
    marks.push(mark);
    marks
}

fn marked_text(value: &str, marks: &[Mark]) -> Node {
    let mut node = text(value);
    if !marks.is_empty() {
        node.marks = Some(marks.to_vec());
    }
    node
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(value) => out.push_str(value),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

fn merge_adjacent_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(last) = merged.last_mut() {
            if last.is(node_type::TEXT) && node.is(node_type::TEXT) && last.marks == node.marks {
                if let (Some(acc), Some(more)) = (last.text.as_mut(), node.text.as_deref()) {
                    acc.push_str(more);
                    continue;
                }
            }
        }
        merged.push(node);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{Arena, parse_document};

    fn first_paragraph_inlines(markdown: &str) -> Vec<Node> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &crate::default_options());
        let para = root.first_child().unwrap();
        convert_children_to_inlines(para)
    }

    #[test]
    fn test_soft_breaks_merge_into_text() {
        let inlines = first_paragraph_inlines("one\ntwo\n");
        assert_eq!(inlines.len(), 1);
        assert_eq!(inlines[0].text.as_deref(), Some("one two"));
    }

    #[test]
    fn test_nested_marks_accumulate() {
        let inlines = first_paragraph_inlines("**bold *both***\n");
        assert_eq!(inlines.len(), 2);
        assert_eq!(inlines[0].marks.as_ref().unwrap().len(), 1);
        let both = inlines[1].marks.as_ref().unwrap();
        assert_eq!(both.len(), 2);
        assert!(both[0].is(mark_type::STRONG));
        assert!(both[1].is(mark_type::EM));
    }

    #[test]
    fn test_link_mark() {
        let inlines = first_paragraph_inlines("[site](https://example.com)\n");
        assert_eq!(inlines.len(), 1);
        let mark = inlines[0].first_mark().unwrap();
        assert!(mark.is(mark_type::LINK));
        assert_eq!(mark.href(), Some("https://example.com"));
        assert_eq!(inlines[0].text.as_deref(), Some("site"));
    }

    #[test]
    fn test_inline_code_mark() {
        let inlines = first_paragraph_inlines("run `cargo` now\n");
        assert_eq!(inlines.len(), 3);
        assert!(inlines[1].first_mark().unwrap().is(mark_type::CODE));
        assert_eq!(inlines[1].text.as_deref(), Some("cargo"));
    }

    #[test]
    fn test_hard_break() {
        let inlines = first_paragraph_inlines("one  \ntwo\n");
        assert_eq!(inlines.len(), 3);
        assert!(inlines[1].is(node_type::HARD_BREAK));
    }

    #[test]
    fn test_bracketed_text_stays_literal() {
        let inlines = first_paragraph_inlines("[ ] todo\n");
        assert_eq!(inlines.len(), 1);
        assert_eq!(inlines[0].text.as_deref(), Some("[ ] todo"));
    }
}
