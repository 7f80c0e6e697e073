/*
 * mark.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Inline decorations attached to text nodes.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::Attrs;

/// Mark type names used by the conversion pipeline.
pub mod mark_type {
    pub const CODE: &str = "code";
    pub const EM: &str = "em";
    pub const LINK: &str = "link";
    pub const STRIKE: &str = "strike";
    pub const STRONG: &str = "strong";
}

/// An inline decoration such as `strong` or `link`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl Mark {
    pub fn new(mark_type: impl Into<String>) -> Self {
        Mark {
            mark_type: mark_type.into(),
            attrs: None,
        }
    }

    /// A `link` mark pointing at `href`, with an optional title.
    pub fn link(href: impl Into<String>, title: Option<&str>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            attrs.insert("title".to_string(), Value::String(title.to_string()));
        }
        Mark {
            mark_type: mark_type::LINK.to_string(),
            attrs: Some(attrs),
        }
    }

    pub fn is(&self, mark_type: &str) -> bool {
        self.mark_type == mark_type
    }

    /// The `href` attribute, when this mark carries one.
    pub fn href(&self) -> Option<&str> {
        self.attrs.as_ref()?.get("href")?.as_str()
    }

    /// Whether an `href` key is present, whatever its value.
    pub fn has_href(&self) -> bool {
        self.attrs
            .as_ref()
            .is_some_and(|attrs| attrs.contains_key("href"))
    }

    pub fn set_href(&mut self, href: impl Into<String>) {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert("href".to_string(), Value::String(href.into()));
    }
}
