/*
 * frontmatter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document frontmatter: parsing, lookup and value rendering.
 */

//! Document frontmatter.
//!
//! Frontmatter is the YAML block at the top of a markdown document. The
//! conversion pipeline treats it as read-only data: special sections
//! (excerpt, properties) look up their table data here by section name.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*?---\n([\s\S]*?)\n---\s*").unwrap());

/// Read-only key/value metadata accompanying a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    values: IndexMap<String, Value>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML mapping. A document that is not a mapping (including
    /// an empty one) yields empty frontmatter.
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(source)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        let mut values = IndexMap::new();
        if let Value::Mapping(mapping) = value {
            for (key, value) in mapping {
                values.insert(value_to_text(&key), value);
            }
        }
        Self { values }
    }

    /// Split a leading `---` delimited block off `source`.
    ///
    /// Returns the parsed frontmatter and the remaining body. When the
    /// block is not valid YAML the frontmatter is empty and the source is
    /// returned untouched.
    pub fn split(source: &str) -> (Self, String) {
        let Some(captures) = FRONTMATTER_RE.captures(source) else {
            return (Self::new(), source.to_string());
        };
        match Self::from_yaml_str(&captures[1]) {
            Ok(frontmatter) => {
                let body = source[captures[0].len()..].to_string();
                (frontmatter, body)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid frontmatter block");
                (Self::new(), source.to_string())
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve the data for a named section.
    ///
    /// The exact name is tried first; if it holds no truthy value the
    /// slug form (lowercase, spaces as hyphens) is tried. Returns the key
    /// that was tried last together with its value when truthy.
    pub fn section_data(&self, name: &str) -> (String, Option<&Value>) {
        if let Some(value) = self.get(name).filter(|v| is_truthy(v)) {
            return (name.to_string(), Some(value));
        }
        let slug = section_slug(name);
        let value = self.get(&slug).filter(|v| is_truthy(v));
        (slug, value)
    }
}

/// Lowercase with spaces turned into hyphens.
pub fn section_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Whether a value counts as present: null, `false`, zero and the empty
/// string do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Render a value as the text that is fed back through markdown
/// conversion for table cells and headers.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(value_to_text).collect::<Vec<_>>().join(","),
        Value::Mapping(mapping) => mapping
            .iter()
            .map(|(k, v)| format!("{}: {}", value_to_text(k), value_to_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Tagged(tagged) => value_to_text(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_strips_block() {
        let (fm, body) = Frontmatter::split("---\ntitle: Hello\ntags: [a, b]\n---\n# Body\n");
        assert_eq!(fm.len(), 2);
        assert_eq!(fm.get("title"), Some(&Value::String("Hello".into())));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_without_block() {
        let (fm, body) = Frontmatter::split("# Just a heading\n");
        assert!(fm.is_empty());
        assert_eq!(body, "# Just a heading\n");
    }

    #[test]
    fn test_split_invalid_yaml_keeps_source() {
        let source = "---\nkey: [unclosed\n---\nbody\n";
        let (fm, body) = Frontmatter::split(source);
        assert!(fm.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn test_section_data_falls_back_to_slug() {
        let fm = Frontmatter::from_yaml_str("release-notes:\n  version: 2\n").unwrap();
        let (key, value) = fm.section_data("Release Notes");
        assert_eq!(key, "release-notes");
        assert!(value.is_some());
    }

    #[test]
    fn test_section_data_prefers_exact_key() {
        let fm = Frontmatter::from_yaml_str("Properties:\n  a: 1\nproperties:\n  b: 2\n").unwrap();
        let (key, value) = fm.section_data("Properties");
        assert_eq!(key, "Properties");
        assert!(value.unwrap().get("a").is_some());
    }

    #[test]
    fn test_section_data_missing_reports_slug() {
        let fm = Frontmatter::new();
        let (key, value) = fm.section_data("My Props");
        assert_eq!(key, "my-props");
        assert!(value.is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Bool(false)));
        assert!(!is_truthy(&serde_yaml::from_str::<Value>("0").unwrap()));
        assert!(!is_truthy(&Value::String(String::new())));
        assert!(is_truthy(&serde_yaml::from_str::<Value>("[]").unwrap()));
        assert!(is_truthy(&serde_yaml::from_str::<Value>("1.5").unwrap()));
    }

    #[test]
    fn test_value_to_text() {
        let value: Value = serde_yaml::from_str("[1, two, true]").unwrap();
        assert_eq!(value_to_text(&value), "1,two,true");
        let value: Value = serde_yaml::from_str("{a: 1, b: x}").unwrap();
        assert_eq!(value_to_text(&value), "a: 1, b: x");
        let value: Value = serde_yaml::from_str("2.5").unwrap();
        assert_eq!(value_to_text(&value), "2.5");
    }
}
