//! The node capability interface consumed by the navigation core.
//!
//! The navigator, classifier, and resolver never touch `tree_sitter::Node`
//! directly; they operate on [`SyntaxNode`], implemented here for
//! Tree-sitter nodes and by a hand-built fixture tree in the navigation
//! crate's tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::{Point, Span};

/// Capability interface over a parsed syntax tree node.
///
/// Implementations are cheap handles into a tree (Tree-sitter nodes are
/// `Copy`); cloning does not copy tree contents.
///
/// Two nodes are structurally equal when their kind and span match. The
/// tree may be re-parsed between queries, so reference identity is never
/// meaningful; [`SyntaxNode::matches`] and [`NodeHandle`] capture the
/// identity that survives a re-parse.
pub trait SyntaxNode: Clone {
    /// Returns the node's type tag, e.g. `function_item`.
    fn kind(&self) -> &str;

    /// Returns whether the node is named (as opposed to punctuation and
    /// other anonymous grammar tokens).
    fn is_named(&self) -> bool;

    /// Returns the half-open range the node covers.
    fn span(&self) -> Span;

    /// Returns the node's parent, or `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Returns the node's named children in source order.
    fn named_children(&self) -> Vec<Self>;

    /// Returns the number of named children.
    fn named_child_count(&self) -> usize;

    /// Returns whether two nodes are structurally equal (kind and span).
    fn matches(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.span() == other.span()
    }

    /// Returns an owned handle carrying this node's structural identity.
    fn handle(&self) -> NodeHandle {
        NodeHandle::new(self.kind(), self.span())
    }
}

impl<'t> SyntaxNode for tree_sitter::Node<'t> {
    fn kind(&self) -> &str {
        tree_sitter::Node::kind(self)
    }

    fn is_named(&self) -> bool {
        tree_sitter::Node::is_named(self)
    }

    fn span(&self) -> Span {
        Span::new(self.start_position().into(), self.end_position().into())
    }

    fn parent(&self) -> Option<Self> {
        tree_sitter::Node::parent(self)
    }

    fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.walk();
        tree_sitter::Node::named_children(self, &mut cursor).collect()
    }

    fn named_child_count(&self) -> usize {
        tree_sitter::Node::named_child_count(self)
    }
}

/// Owned structural identity of a syntax node.
///
/// Safe to retain across re-parses: the sticky layer and the resolver's
/// stability cache store handles, then re-locate the matching node in
/// whichever tree is current when they are next consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle {
    /// The node's type tag.
    pub kind: String,
    /// The half-open range the node covered when captured.
    pub span: Span,
}

impl NodeHandle {
    /// Creates a handle from a kind and span.
    #[must_use]
    pub fn new(kind: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    /// Returns whether `node` is structurally equal to this handle.
    #[must_use]
    pub fn matches<N: SyntaxNode>(&self, node: &N) -> bool {
        self.kind == node.kind() && self.span == node.span()
    }

    /// Returns the position a cursor should land on for this node.
    #[must_use]
    pub const fn target_position(&self) -> Point {
        self.span.start
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span.start)
    }
}
