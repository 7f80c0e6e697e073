/*
 * text.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Text node handler: checkbox glyphs, status badges and link cards.
 */

use adf_types::{Node, mark_type, node_type};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::Result;
use crate::context::ConversionContext;
use crate::traverse::{Ancestors, Visit};
use crate::url::clean_up_url_if_confluence;

static STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[!!(\w+):(.+)\]").unwrap());

const CHECKBOX_GLYPHS: &[(&[&str], &str)] = &[
    (&["[x]", "[X]"], "\u{2705}"),
    (&["[ ]"], "\u{1F532}"),
    (&["[*]"], "\u{2B50}\u{FE0F}"),
];

/// Hrefs kept even though the safety predicate rejects them; they are
/// resolved by the publisher.
const PUBLISHER_SCHEMES: &[&str] = &["wikilinks:", "mention:"];

pub(super) fn text(
    node: &mut Node,
    ancestors: &Ancestors<'_>,
    ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    if ancestors.grandparent_is(node_type::LIST_ITEM) {
        if let Some(text) = node.text.as_mut() {
            replace_checkbox(text);
        }
    }

    let Some(mark) = node.first_mark() else {
        return Ok(Visit::Keep);
    };

    if mark.is(mark_type::CODE) {
        let Some(captures) = node.text.as_deref().and_then(|t| STATUS_RE.captures(t)) else {
            return Ok(Visit::Keep);
        };
        let status = Node::new(node_type::STATUS)
            .with_attr("text", &captures[2])
            .with_attr("color", badge_color(&captures[1]));
        return Ok(Visit::Replace(status));
    }

    if !mark.has_href() {
        return Ok(Visit::Keep);
    }

    let href = mark.href().unwrap_or_default().to_string();
    let href = if href.is_empty()
        || (!ctx.is_safe_url(&href) && !PUBLISHER_SCHEMES.iter().any(|s| href.starts_with(s)))
    {
        tracing::debug!(href = %href, "Replacing unsafe link target");
        "#".to_string()
    } else {
        href
    };
    if let Some(mark) = node.first_mark_mut() {
        mark.set_href(href.as_str());
    }

    if node.text.as_deref() == Some(href.as_str()) {
        let url = clean_up_url_if_confluence(&href, ctx.base_url());
        let card = Node::new(node_type::INLINE_CARD).with_attr("url", url);
        return Ok(Visit::Replace(card));
    }

    Ok(Visit::Keep)
}

fn replace_checkbox(text: &mut String) {
    for (boxes, glyph) in CHECKBOX_GLYPHS {
        if let Some(checkbox) = boxes.iter().find(|b| text.starts_with(**b)) {
            text.replace_range(..checkbox.len(), glyph);
            return;
        }
    }
}

/// Status badge color for a `[!!kind:label]` kind.
pub fn badge_color(kind: &str) -> &'static str {
    match kind {
        "example" | "hint" | "important" | "tip" => "purple",
        "info" | "note" | "todo" => "blue",
        "check" | "success" | "done" => "green",
        "faq" | "help" | "question" | "attention" | "caution" | "warning" => "yellow",
        "bug" | "danger" | "error" | "fail" | "failure" | "missing" => "red",
        _ => "grey",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::AdfConverter;
    use crate::frontmatter::Frontmatter;
    use crate::settings::ConversionSettings;
    use adf_types::{Mark, doc, paragraph, text};
    use pretty_assertions::assert_eq;

    fn process(tree: Node) -> Node {
        AdfConverter::new(ConversionSettings::with_base_url("https://example.atlassian.net"))
            .process_document(tree, &Frontmatter::new())
            .unwrap()
            .document
    }

    fn single_inline(tree: &Node) -> &Node {
        &tree.children()[0].children()[0]
    }

    fn linked(label: &str, href: &str) -> Node {
        doc(vec![paragraph(vec![
            text(label).with_marks(vec![Mark::link(href, None)]),
        ])])
    }

    #[test]
    fn test_badge_colors() {
        assert_eq!(badge_color("tip"), "purple");
        assert_eq!(badge_color("todo"), "blue");
        assert_eq!(badge_color("done"), "green");
        assert_eq!(badge_color("warning"), "yellow");
        assert_eq!(badge_color("failure"), "red");
        assert_eq!(badge_color("whatever"), "grey");
    }

    #[test]
    fn test_code_status_badge() {
        let tree = doc(vec![paragraph(vec![
            text("[!!done:Shipped]").with_marks(vec![Mark::new(mark_type::CODE)]),
        ])]);
        let out = process(tree);
        let status = single_inline(&out);
        assert!(status.is(node_type::STATUS));
        assert_eq!(status.attr_str("text"), Some("Shipped"));
        assert_eq!(status.attr_str("color"), Some("green"));
        assert!(status.text.is_none());
    }

    #[test]
    fn test_plain_code_is_untouched() {
        let tree = doc(vec![paragraph(vec![
            text("let x = 1;").with_marks(vec![Mark::new(mark_type::CODE)]),
        ])]);
        assert_eq!(process(tree.clone()), tree);
    }

    #[test]
    fn test_link_card() {
        let out = process(linked("https://example.com/a", "https://example.com/a"));
        let card = single_inline(&out);
        assert!(card.is(node_type::INLINE_CARD));
        assert_eq!(card.attr_str("url"), Some("https://example.com/a"));
        assert!(card.text.is_none());
        assert!(card.marks.is_none());
    }

    #[test]
    fn test_link_card_url_is_cleaned() {
        let url = "https://example.atlassian.net/wiki/spaces/X/pages/42/Some+Page?focus=1";
        let out = process(linked(url, url));
        assert_eq!(
            single_inline(&out).attr_str("url"),
            Some("https://example.atlassian.net/wiki/spaces/X/pages/42")
        );
    }

    #[test]
    fn test_empty_href_becomes_fragment_not_card() {
        let out = process(linked("", ""));
        let node = single_inline(&out);
        assert!(node.is(node_type::TEXT));
        assert_eq!(node.first_mark().and_then(|m| m.href()), Some("#"));
    }

    #[test]
    fn test_unsafe_href_is_sanitized() {
        let out = process(linked("click", "javascript:alert(1)"));
        assert_eq!(single_inline(&out).first_mark().and_then(|m| m.href()), Some("#"));
    }

    #[test]
    fn test_publisher_schemes_are_kept() {
        let out = process(linked("Other", "wikilinks:Other Page"));
        assert_eq!(
            single_inline(&out).first_mark().and_then(|m| m.href()),
            Some("wikilinks:Other Page")
        );
    }

    #[test]
    fn test_custom_url_predicate() {
        let converter = AdfConverter::new(ConversionSettings::default())
            .with_url_predicate(|url| url.starts_with("https://"));
        let out = converter
            .process_document(linked("plain", "http://example.com"), &Frontmatter::new())
            .unwrap()
            .document;
        assert_eq!(single_inline(&out).first_mark().and_then(|m| m.href()), Some("#"));
    }

    #[test]
    fn test_checkbox_glyphs_in_list_items() {
        let tree = doc(vec![Node::new(node_type::ORDERED_LIST).with_content(vec![
            Node::new(node_type::LIST_ITEM).with_content(vec![paragraph(vec![text("[x] done")])]),
            Node::new(node_type::LIST_ITEM).with_content(vec![paragraph(vec![text("[ ] open")])]),
            Node::new(node_type::LIST_ITEM).with_content(vec![paragraph(vec![text("[*] star")])]),
        ])]);
        let out = process(tree);
        let texts: Vec<String> = out.children()[0]
            .children()
            .iter()
            .map(Node::plain_text)
            .collect();
        assert_eq!(texts, vec!["\u{2705} done", "\u{1F532} open", "\u{2B50}\u{FE0F} star"]);
    }

    #[test]
    fn test_checkbox_outside_list_is_kept() {
        let tree = doc(vec![paragraph(vec![text("[x] not a list")])]);
        assert_eq!(process(tree.clone()), tree);
    }
}
