/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Non-fatal diagnostics collected during conversion.
 */

//! Diagnostics for recoverable conversion problems.
//!
//! A malformed embedded block (invalid JSON in an `adf` code block,
//! invalid YAML in a `yaml-table` block) does not abort the conversion:
//! the original node is kept, a `tracing` warning is emitted, and a
//! [`Diagnostic`] is recorded on the conversion output.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Type of the node the problem was found on, when known.
    pub node_type: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            node_type: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
            node_type: None,
        }
    }

    pub fn on_node(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Warning => "warning",
        };
        match &self.node_type {
            Some(node_type) => write!(f, "{level} [{node_type}]: {}", self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_node_type() {
        let d = Diagnostic::warning("invalid JSON").on_node("codeBlock");
        assert_eq!(d.to_string(), "warning [codeBlock]: invalid JSON");
    }

    #[test]
    fn test_display_without_node_type() {
        assert_eq!(Diagnostic::info("done").to_string(), "info: done");
    }
}
