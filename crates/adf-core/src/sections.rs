/*
 * sections.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Excerpt, page-properties and table-of-contents blocks.
 */

//! Special sections.
//!
//! A paragraph holding nothing but a marker such as `^excerpt`,
//! `^excerpt-2` or `^properties-2-Release Info` closes a section. The
//! section starts right after the last heading (or the last heading of
//! the given level) and ends right before the marker:
//!
//! ```markdown
//! ## Summary
//!
//! This paragraph ends up in the excerpt.
//!
//! ^excerpt
//! ```
//!
//! The blocks in that range move into a `bodiedExtension` that replaces
//! the marker. When the frontmatter holds data under the section's name,
//! a table rendered from it is appended to the body.
//!
//! The same blocks are produced from `[!excerpt]`, `[!properties]` and
//! `[!toc]` callouts by the panel handler.

use adf_types::{Attrs, Node, node_type};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::context::ConversionContext;
use crate::{ConvertError, Result};

// A marker is the whole text of its paragraph; `see ^excerpt` is prose.
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\^(excerpt|properties)(?:-(\d))?(?:-(.*))?$").unwrap());

const MACRO_EXTENSION_TYPE: &str = "com.atlassian.confluence.macro.core";
const EXCERPT_MACRO_ID: &str = "f638cbb0-4cf8-403a-af66-7a5be22b744e";
const PROPERTIES_MACRO_ID: &str =
    "fa274a790b8e7d05612ca1a9de859c8b1063d72d6a8f8dcd59b651715fe220b6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Excerpt,
    Properties,
}

impl SectionKind {
    pub fn default_name(self) -> &'static str {
        match self {
            SectionKind::Excerpt => "Excerpt",
            SectionKind::Properties => "Properties",
        }
    }
}

/// A parsed `^excerpt` / `^properties` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarker {
    pub kind: SectionKind,
    /// Heading level the section is anchored to.
    pub level: Option<usize>,
    /// Explicit section name.
    pub name: Option<String>,
}

impl SectionMarker {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_name())
    }
}

/// Parse `node` as a marker paragraph: a paragraph with a single text
/// child whose text is a marker.
pub fn parse_marker(node: &Node) -> Option<SectionMarker> {
    if !node.is(node_type::PARAGRAPH) {
        return None;
    }
    let [child] = node.children() else {
        return None;
    };
    if !child.is(node_type::TEXT) {
        return None;
    }
    let captures = MARKER_RE.captures(child.text.as_deref()?.trim())?;
    let kind = match &captures[1] {
        "excerpt" => SectionKind::Excerpt,
        _ => SectionKind::Properties,
    };
    let level = captures.get(2).and_then(|m| m.as_str().parse().ok());
    let name = captures
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty());
    Some(SectionMarker { kind, level, name })
}

/// Replace every marker among the top-level blocks of `doc` with its
/// section block.
///
/// A marker anchored to a heading level that has not been seen yet (or
/// to a level outside 1 to 6) starts its section at the top of the
/// document.
pub fn extract_special_sections(doc: &mut Node, ctx: &mut ConversionContext<'_>) -> Result<()> {
    let Some(content) = doc.content.as_mut() else {
        return Err(ConvertError::malformed_root(format!(
            "'{}' root has no content",
            doc.node_type
        )));
    };

    let mut last_by_level: [Option<usize>; 7] = [None; 7];
    let mut last_heading: Option<usize> = None;

    let mut i = 0;
    while i < content.len() {
        if let Some(level) = heading_level(&content[i]) {
            last_by_level[level] = Some(i);
            last_heading = Some(i);
        }

        if let Some(marker) = parse_marker(&content[i]) {
            let anchor = match marker.level {
                Some(level) => last_by_level.get(level).copied().flatten(),
                None => last_heading,
            };
            let start = anchor.map_or(0, |index| index + 1);
            let mut body: Vec<Node> = content.drain(start..i).collect();
            i = start;

            tracing::debug!(
                kind = ?marker.kind,
                name = marker.name(),
                blocks = body.len(),
                "Extracting special section"
            );

            let (_, table) = ctx.section_table(marker.name())?;
            body.extend(table);
            content[i] = match marker.kind {
                SectionKind::Excerpt => excerpt_node(marker.name(), body),
                SectionKind::Properties => properties_node(marker.name(), body),
            };
        }

        i += 1;
    }

    Ok(())
}

fn heading_level(node: &Node) -> Option<usize> {
    if !node.is(node_type::HEADING) {
        return None;
    }
    node.attr_u64("level")
        .filter(|level| (1..=6).contains(level))
        .map(|level| level as usize)
}

/// Turn an `excerpt` panel into an excerpt block.
///
/// A leading `text` + `hardBreak` in the first paragraph names the
/// excerpt and is removed.
pub fn panel_as_excerpt(panel: Node, ctx: &mut ConversionContext<'_>) -> Result<Node> {
    let mut body = panel.content.unwrap_or_default();
    let mut name = SectionKind::Excerpt.default_name().to_string();

    if let Some(first) = body.first_mut().filter(|n| n.is(node_type::PARAGRAPH)) {
        let inlines = first.content_mut();
        let titled = inlines.len() >= 2
            && inlines[0].is(node_type::TEXT)
            && inlines[1].is(node_type::HARD_BREAK);
        if titled {
            if let Some(title) = inlines[0].text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                name = title.to_string();
            }
            inlines.drain(..2);
        }
    }
    drop_empty_lead_paragraph(&mut body);

    let (_, table) = ctx.section_table(&name)?;
    body.extend(table);
    Ok(excerpt_node(&name, body))
}

/// Turn a `properties` panel into a page-properties block.
///
/// The first inline of the first paragraph names the section and the
/// first two inlines are removed. The stored id is the frontmatter key
/// that was resolved for that name.
pub fn panel_as_properties(panel: Node, ctx: &mut ConversionContext<'_>) -> Result<Node> {
    let mut body = panel.content.unwrap_or_default();
    let mut name = SectionKind::Properties.default_name().to_string();

    if let Some(first) = body.first_mut().filter(|n| n.is(node_type::PARAGRAPH)) {
        let inlines = first.content_mut();
        if let Some(title) = inlines
            .first()
            .and_then(|n| n.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            name = title.to_string();
        }
        let count = inlines.len().min(2);
        inlines.drain(..count);
    }
    drop_empty_lead_paragraph(&mut body);

    let (key, table) = ctx.section_table(&name)?;
    body.extend(table);
    Ok(properties_node(&key, body))
}

fn drop_empty_lead_paragraph(body: &mut Vec<Node>) {
    if body
        .first()
        .is_some_and(|n| n.is(node_type::PARAGRAPH) && n.children().is_empty())
    {
        body.remove(0);
    }
}

/// The excerpt macro wrapping `body`.
pub fn excerpt_node(name: &str, body: Vec<Node>) -> Node {
    Node::new(node_type::BODIED_EXTENSION)
        .with_attrs(macro_attrs(json!({
            "layout": "default",
            "extensionType": MACRO_EXTENSION_TYPE,
            "extensionKey": "excerpt",
            "parameters": {
                "macroParams": {
                    "name": { "value": name },
                    "atlassian-macro-output-type": { "value": "INLINE" },
                },
                "macroMetadata": {
                    "macroId": { "value": EXCERPT_MACRO_ID },
                    "schemaVersion": { "value": "1" },
                    "title": "Excerpt",
                },
            },
        })))
        .with_content(body)
}

/// The page-properties macro wrapping `body`.
pub fn properties_node(id: &str, body: Vec<Node>) -> Node {
    Node::new(node_type::BODIED_EXTENSION)
        .with_attrs(macro_attrs(json!({
            "layout": "default",
            "extensionType": MACRO_EXTENSION_TYPE,
            "extensionKey": "details",
            "parameters": {
                "macroParams": {
                    "id": { "value": id },
                },
                "macroMetadata": {
                    "macroId": { "value": PROPERTIES_MACRO_ID },
                    "schemaVersion": { "value": "1" },
                    "title": "Page Properties",
                },
            },
        })))
        .with_content(body)
}

/// The table-of-contents macro.
pub fn toc_node() -> Node {
    Node::new(node_type::EXTENSION).with_attrs(macro_attrs(json!({
        "layout": "default",
        "extensionType": MACRO_EXTENSION_TYPE,
        "extensionKey": "toc",
        "parameters": {
            "macroParams": {
                "style": { "value": "default" },
            },
            "macroMetadata": {
                "title": "Table of Contents",
            },
        },
    })))
}

fn macro_attrs(value: serde_json::Value) -> Attrs {
    match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => Attrs::new(),
    }
}

/// The `extensionKey` of an extension node.
pub fn extension_key(node: &Node) -> Option<&str> {
    node.attr_str("extensionKey")
}
