//! The sticky layer: a temporarily activated node set the cursor cycles
//! through with wraparound until explicitly exited.
//!
//! Exactly one layer is ever active: activation always clears any prior
//! state first, including when the fresh node set turns out to be empty.

use arbor_syntax::NodeHandle;

/// State machine for the sticky cycling layer.
///
/// Nodes are stored as owned handles, so the layer survives re-parses;
/// hosts re-locate the current handle in whichever tree is live.
#[derive(Debug, Clone, Default)]
pub struct StickyLayer {
    active: bool,
    nodes: Vec<NodeHandle>,
    /// One-based index into `nodes`; meaningful only while active.
    index: usize,
    label: String,
}

impl StickyLayer {
    /// Creates an inactive layer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: false,
            nodes: Vec::new(),
            index: 1,
            label: String::new(),
        }
    }

    /// Activates the layer over `nodes`, replacing any active layer.
    ///
    /// Deactivation happens first even when `nodes` is empty, so a
    /// zero-result picker still tears down the previous layer; in that
    /// case the layer stays inactive and `false` is returned.
    ///
    /// The starting index is the position of the entry matching
    /// `cursor_node` (structural equality), or 1 when the cursor is not
    /// on a collected node.
    pub fn activate(
        &mut self,
        nodes: Vec<NodeHandle>,
        label: impl Into<String>,
        cursor_node: Option<&NodeHandle>,
    ) -> bool {
        self.deactivate();
        if nodes.is_empty() {
            return false;
        }

        self.index = cursor_node
            .and_then(|cursor| nodes.iter().position(|n| n == cursor))
            .map_or(1, |zero_based| zero_based.saturating_add(1));
        self.nodes = nodes;
        self.label = label.into();
        self.active = true;
        true
    }

    /// Advances to the next node, wrapping past the end.
    ///
    /// No-op while inactive.
    pub fn step_next(&mut self) {
        if !self.active || self.nodes.is_empty() {
            return;
        }
        self.index = if self.index >= self.nodes.len() {
            1
        } else {
            self.index.saturating_add(1)
        };
    }

    /// Steps back to the previous node, wrapping past the start.
    ///
    /// No-op while inactive.
    pub fn step_prev(&mut self) {
        if !self.active || self.nodes.is_empty() {
            return;
        }
        self.index = if self.index <= 1 {
            self.nodes.len()
        } else {
            self.index.saturating_sub(1)
        };
    }

    /// Clears the node set and label and returns to the inactive state.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.nodes.clear();
        self.index = 1;
        self.label.clear();
    }

    /// Returns the node the layer currently points at, while active.
    #[must_use]
    pub fn current(&self) -> Option<&NodeHandle> {
        if !self.active {
            return None;
        }
        self.index
            .checked_sub(1)
            .and_then(|zero_based| self.nodes.get(zero_based))
    }

    /// Returns whether a layer is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the one-based index of the current node.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the number of nodes in the active layer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the layer holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the display label of the active layer.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the stored node handles in order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }
}
