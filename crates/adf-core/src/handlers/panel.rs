/*
 * panel.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Panel handler: toc, excerpt and properties callouts.
 */

use adf_types::Node;

use crate::Result;
use crate::context::ConversionContext;
use crate::sections::{panel_as_excerpt, panel_as_properties, toc_node};
use crate::traverse::{Ancestors, Visit};

pub(super) fn panel(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    let panel_type = node.attr_str("panelType").map(str::to_string);
    let replacement = match panel_type.as_deref() {
        Some("toc") => toc_node(),
        Some("excerpt") => panel_as_excerpt(std::mem::take(node), ctx)?,
        Some("properties") => panel_as_properties(std::mem::take(node), ctx)?,
        _ => return Ok(Visit::Keep),
    };
    Ok(Visit::Replace(replacement))
}

#[cfg(test)]
mod tests {
    use crate::convert::AdfConverter;
    use crate::frontmatter::Frontmatter;
    use crate::sections::extension_key;
    use crate::settings::ConversionSettings;
    use adf_types::{Node, doc, node_type, paragraph_text};
    use pretty_assertions::assert_eq;

    fn panel(kind: &str, content: Vec<Node>) -> Node {
        Node::new(node_type::PANEL)
            .with_attr("panelType", kind)
            .with_content(content)
    }

    fn process(tree: Node, frontmatter: &Frontmatter) -> Node {
        AdfConverter::new(ConversionSettings::default())
            .process_document(tree, frontmatter)
            .unwrap()
            .document
    }

    #[test]
    fn test_toc_panel() {
        let out = process(doc(vec![panel("toc", vec![])]), &Frontmatter::new());
        assert_eq!(extension_key(&out.children()[0]), Some("toc"));
    }

    #[test]
    fn test_excerpt_panel_body_is_processed() {
        let frontmatter = Frontmatter::from_yaml_str("excerpt:\n  a: 1\n").unwrap();
        let out = process(
            doc(vec![panel("excerpt", vec![paragraph_text("body")])]),
            &frontmatter,
        );
        let block = &out.children()[0];
        assert!(block.is(node_type::BODIED_EXTENSION));
        assert_eq!(extension_key(block), Some("excerpt"));
        let table = &block.children()[1];
        assert!(table.is(node_type::TABLE));
        // Cells inside the synthesized table still get their defaults.
        assert_eq!(table.children()[1].children()[0].attr_u64("colspan"), Some(1));
    }

    #[test]
    fn test_other_panels_are_kept() {
        let tree = doc(vec![panel("warning", vec![paragraph_text("careful")])]);
        assert_eq!(process(tree.clone(), &Frontmatter::new()), tree);
    }
}
