/*
 * lists.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * List handlers: ordered list attrs and checkbox task lists.
 */

use adf_types::{Attrs, Node, node_type};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Result;
use crate::context::ConversionContext;
use crate::traverse::{Ancestors, Visit};

static CHECKBOX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.?)\]\s*").unwrap());

pub(super) fn ordered_list(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    _ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    node.attrs = Some(Attrs::new());
    node.set_attr("order", 1);
    Ok(Visit::Keep)
}

/// A bullet list whose items start with `[ ]`, `[x]` and the like
/// becomes a task list.
pub(super) fn bullet_list(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    _ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    if !is_task_list(node) {
        return Ok(Visit::Keep);
    }
    let items = node.content.take().unwrap_or_default();
    let task_list = Node::new(node_type::TASK_LIST)
        .with_attrs(Attrs::new())
        .with_content(items.into_iter().map(task_item).collect());
    Ok(Visit::Replace(task_list))
}

fn is_task_list(list: &Node) -> bool {
    let items = list.children();
    items.iter().all(|item| item.is(node_type::LIST_ITEM))
        && items.iter().any(|item| {
            item.children().iter().any(|child| {
                child.is(node_type::PARAGRAPH)
                    && child
                        .first_child_text()
                        .is_some_and(|text| CHECKBOX_RE.is_match(text))
            })
        })
}

/// Convert a list item to a task item holding just its leading text.
///
/// Items without a checkbox become open tasks with their text as-is.
fn task_item(item: Node) -> Node {
    let mut lead = item
        .content
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|first| first.content)
        .and_then(|inlines| inlines.into_iter().next());

    let mut state = "TODO";
    if let Some(text) = lead.as_mut().and_then(|node| node.text.as_mut()) {
        if let Some(captures) = CHECKBOX_RE.captures(text) {
            let check = captures.get(1).map_or("", |m| m.as_str());
            if !matches!(check, "" | " ") {
                state = "DONE";
            }
            let len = captures[0].len();
            text.replace_range(..len, "");
        }
    }

    Node::new(node_type::TASK_ITEM)
        .with_attr("state", state)
        .with_content(lead.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use crate::convert::AdfConverter;
    use crate::frontmatter::Frontmatter;
    use crate::settings::ConversionSettings;
    use adf_types::{Node, doc, node_type, paragraph, text};
    use pretty_assertions::assert_eq;

    fn process(tree: Node) -> Node {
        AdfConverter::new(ConversionSettings::default())
            .process_document(tree, &Frontmatter::new())
            .unwrap()
            .document
    }

    fn bullets(items: &[&str]) -> Node {
        Node::new(node_type::BULLET_LIST).with_content(
            items
                .iter()
                .map(|t| Node::new(node_type::LIST_ITEM).with_content(vec![paragraph(vec![text(*t)])]))
                .collect(),
        )
    }

    #[test]
    fn test_checkbox_states() {
        let out = process(doc(vec![bullets(&["[ ] x", "[x] x", "[X] x", "[*] x", "[] x"])]));
        let list = &out.children()[0];
        assert!(list.is(node_type::TASK_LIST));
        let states: Vec<_> = list.children().iter().map(|i| i.attr_str("state").unwrap()).collect();
        assert_eq!(states, vec!["TODO", "DONE", "DONE", "DONE", "TODO"]);
        for item in list.children() {
            assert!(item.is(node_type::TASK_ITEM));
            assert_eq!(item.children(), &[text("x")]);
        }
    }

    #[test]
    fn test_plain_bullet_list_is_kept() {
        let out = process(doc(vec![bullets(&["one", "two"])]));
        assert!(out.children()[0].is(node_type::BULLET_LIST));
    }

    #[test]
    fn test_item_without_checkbox_in_task_list() {
        let out = process(doc(vec![bullets(&["[x] done", "plain"])]));
        let list = &out.children()[0];
        assert_eq!(list.children()[1].attr_str("state"), Some("TODO"));
        assert_eq!(list.children()[1].children(), &[text("plain")]);
    }

    #[test]
    fn test_ordered_list_order_reset() {
        let list = Node::new(node_type::ORDERED_LIST)
            .with_attr("order", 7)
            .with_content(vec![]);
        let out = process(doc(vec![list]));
        assert_eq!(out.children()[0].attr_u64("order"), Some(1));
    }
}
