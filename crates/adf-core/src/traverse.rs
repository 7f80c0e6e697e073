/*
 * traverse.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Depth-first rewrite traversal with per-node-type handlers.
 */

//! Depth-first tree rewriting.
//!
//! A [`Traversal`] maps node type names to handlers. Running it visits
//! every node in document order (pre-order): the handler registered for
//! the node's type runs first, then the node's children are visited.
//! Unregistered types are left alone.
//!
//! A handler receives the node mutably, the chain of its ancestors, and
//! a caller-chosen context value. It answers with a [`Visit`]:
//!
//! - [`Visit::Keep`] keeps the node, including any in-place edits
//! - [`Visit::Replace`] substitutes another node at the same position;
//!   the replacement's children are visited next
//! - [`Visit::Remove`] drops the node from its parent
//!
//! The traversal takes the tree by value and hands it back, so exactly
//! one owner exists for the duration of a pass.
//!
//! # Example
//!
//! ```ignore
//! let traversal = Traversal::new().on("text", |node, ancestors, _ctx: &mut ()| {
//!     if ancestors.parent_is("heading") {
//!         node.text = node.text.take().map(|t| t.to_uppercase());
//!     }
//!     Ok(Visit::Keep)
//! });
//! let doc = traversal.run(doc, &mut ())?;
//! ```

use std::collections::HashMap;

use adf_types::{Attrs, Node};

use crate::{ConvertError, Result};

/// What a handler wants done with the node it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    Keep,
    Replace(Node),
    Remove,
}

/// Snapshot of an ancestor taken after its own handler ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub node_type: String,
    pub attrs: Option<Attrs>,
}

impl Frame {
    fn of(node: &Node) -> Self {
        Self {
            node_type: node.node_type.clone(),
            attrs: node.attrs.clone(),
        }
    }
}

/// The ancestor chain of the node being visited, nearest last.
#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'s> {
    frames: &'s [Frame],
}

impl<'s> Ancestors<'s> {
    /// The `n`th ancestor: 0 is the parent, 1 the grandparent.
    pub fn nth(&self, n: usize) -> Option<&'s Frame> {
        let len = self.frames.len();
        if n < len {
            self.frames.get(len - 1 - n)
        } else {
            None
        }
    }

    pub fn parent(&self) -> Option<&'s Frame> {
        self.nth(0)
    }

    pub fn grandparent(&self) -> Option<&'s Frame> {
        self.nth(1)
    }

    pub fn parent_is(&self, node_type: &str) -> bool {
        self.parent().is_some_and(|f| f.node_type == node_type)
    }

    pub fn grandparent_is(&self, node_type: &str) -> bool {
        self.grandparent().is_some_and(|f| f.node_type == node_type)
    }

    /// Number of ancestors (0 at the root).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Ancestors from the parent outward.
    pub fn iter(&self) -> impl Iterator<Item = &'s Frame> + 's {
        self.frames.iter().rev()
    }
}

pub type Handler<'h, C> = Box<dyn Fn(&mut Node, &Ancestors<'_>, &mut C) -> Result<Visit> + 'h>;

/// A set of per-type handlers applied in one depth-first pass.
pub struct Traversal<'h, C> {
    handlers: HashMap<String, Handler<'h, C>>,
}

impl<'h, C> Traversal<'h, C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for `node_type`, replacing any earlier one.
    pub fn on<F>(mut self, node_type: &str, handler: F) -> Self
    where
        F: Fn(&mut Node, &Ancestors<'_>, &mut C) -> Result<Visit> + 'h,
    {
        self.handlers.insert(node_type.to_string(), Box::new(handler));
        self
    }

    pub fn handles(&self, node_type: &str) -> bool {
        self.handlers.contains_key(node_type)
    }

    /// Run the pass over `root` and return the rewritten tree.
    ///
    /// # Errors
    ///
    /// Fails when the root has no content array, when a handler removes
    /// the root, or when any handler fails. No partial tree is returned.
    pub fn run(&self, root: Node, ctx: &mut C) -> Result<Node> {
        if root.content.is_none() {
            return Err(ConvertError::malformed_root(format!(
                "'{}' root has no content",
                root.node_type
            )));
        }
        let mut stack = Vec::new();
        self.walk(root, &mut stack, ctx)?
            .ok_or(ConvertError::RootRemoved)
    }

    fn walk(&self, mut node: Node, stack: &mut Vec<Frame>, ctx: &mut C) -> Result<Option<Node>> {
        if let Some(handler) = self.handlers.get(node.node_type.as_str()) {
            let ancestors = Ancestors { frames: stack };
            match handler(&mut node, &ancestors, ctx)? {
                Visit::Keep => {}
                Visit::Replace(replacement) => node = replacement,
                Visit::Remove => return Ok(None),
            }
        }

        if let Some(children) = node.content.take() {
            stack.push(Frame::of(&node));
            let mut visited = Vec::with_capacity(children.len());
            for child in children {
                match self.walk(child, stack, ctx) {
                    Ok(Some(child)) => visited.push(child),
                    Ok(None) => {}
                    Err(e) => {
                        stack.pop();
                        return Err(e);
                    }
                }
            }
            stack.pop();
            node.content = Some(visited);
        }

        Ok(Some(node))
    }
}

impl<C> Default for Traversal<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only pre-order walk over `node` and its descendants.
pub fn visit_all<'n, F>(node: &'n Node, visit: &mut F)
where
    F: FnMut(&'n Node),
{
    visit(node);
    for child in node.children() {
        visit_all(child, visit);
    }
}
