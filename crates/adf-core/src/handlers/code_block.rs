/*
 * code_block.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Code block handler: language aliases, embedded ADF and YAML tables.
 */

use adf_types::{Node, node_type};

use crate::Result;
use crate::context::ConversionContext;
use crate::diagnostic::Diagnostic;
use crate::traverse::{Ancestors, Visit};

/// Map a markdown fence language to the platform's language name.
/// Unknown languages pass through.
pub fn map_language(language: &str) -> &str {
    match language {
        "js" | "jsx" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "py" | "python3" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "yml" => "yaml",
        "c++" | "cc" | "hpp" => "cpp",
        "c#" | "cs" => "csharp",
        "f#" | "fs" => "fsharp",
        "md" => "markdown",
        "golang" => "go",
        "kt" | "kts" => "kotlin",
        "ps" | "ps1" | "pwsh" => "powershell",
        "dockerfile" => "docker",
        "objc" | "objective-c" => "objectivec",
        "tf" | "hcl" => "terraform",
        "plaintext" | "txt" => "text",
        "html" | "xhtml" => "xml",
        other => other,
    }
}

pub(super) fn code_block(
    node: &mut Node,
    _ancestors: &Ancestors<'_>,
    ctx: &mut ConversionContext<'_>,
) -> Result<Visit> {
    let Some(attrs) = node.attrs.as_ref() else {
        return Ok(Visit::Keep);
    };
    if attrs.is_empty() {
        node.attrs = None;
        return Ok(Visit::Keep);
    }
    let Some(language) = node.attr_str("language").map(str::to_string) else {
        return Ok(Visit::Keep);
    };

    let mapped = map_language(&language);
    if mapped != language {
        node.set_attr("language", mapped);
    }

    if language == "adf" {
        return Ok(embedded_adf(node, ctx));
    }
    if language.starts_with("yaml-table") || language.starts_with("yaml table") {
        return yaml_table(node, ctx);
    }
    Ok(Visit::Keep)
}

/// Substitute the JSON tree held in an `adf` block.
fn embedded_adf(node: &Node, ctx: &mut ConversionContext<'_>) -> Visit {
    let Some(source) = node.first_child_text().filter(|s| !s.is_empty()) else {
        return Visit::Keep;
    };
    match serde_json::from_str::<Node>(source) {
        Ok(embedded) => Visit::Replace(embedded),
        Err(e) => {
            ctx.warn(
                Diagnostic::warning(format!("Invalid ADF in code block: {e}"))
                    .on_node(node_type::CODE_BLOCK),
            );
            Visit::Keep
        }
    }
}

/// Render the YAML held in a `yaml-table` block as a table.
fn yaml_table(node: &Node, ctx: &mut ConversionContext<'_>) -> Result<Visit> {
    let Some(source) = node.first_child_text().filter(|s| !s.is_empty()) else {
        return Ok(Visit::Keep);
    };
    match serde_yaml::from_str::<serde_yaml::Value>(source) {
        Ok(value) => Ok(Visit::Replace(ctx.render_table(&value)?)),
        Err(e) => {
            ctx.warn(
                Diagnostic::warning(format!("Invalid YAML in table code block: {e}"))
                    .on_node(node_type::CODE_BLOCK),
            );
            Ok(Visit::Keep)
        }
    }
}
