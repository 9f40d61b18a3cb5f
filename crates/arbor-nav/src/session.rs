//! The navigation session: explicit per-buffer context.
//!
//! A session owns the rule set, the resolution cache, the sticky layer,
//! and the picker registry. Hosts construct one session per buffer and
//! pass it into every entry point; nothing here is global, so sessions
//! are independent and trivially testable.

use std::str::FromStr;

use tracing::{debug, warn};

use arbor_syntax::{NodeHandle, Point, Span, SupportedLanguage, SyntaxNode};

use crate::error::NavError;
use crate::navigator::{self, Direction, LineFilter, StepOutcome, Traversal, flatten};
use crate::picker::{PickerContext, PickerRegistry, PickerSpec, SymbolKind};
use crate::resolve::{NavigationCache, locate, resolve};
use crate::rules::NavRules;
use crate::sticky::StickyLayer;

/// Result of a navigation entry point: an optional target plus a
/// human-readable reason the host can surface.
///
/// A `None` target is ordinary absence ("nothing to move to"), never an
/// error; the host leaves the cursor unchanged and may show the reason.
#[derive(Debug, Clone)]
pub struct NavOutcome<T> {
    /// The node to move to, when one was found.
    pub target: Option<T>,
    /// Why the operation ended the way it did.
    pub reason: String,
}

impl<T> NavOutcome<T> {
    fn found(target: T, reason: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            reason: reason.into(),
        }
    }

    fn none(reason: impl Into<String>) -> Self {
        Self {
            target: None,
            reason: reason.into(),
        }
    }

    /// Returns whether a target was found.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.target.is_some()
    }
}

/// Declarative transient-highlight instruction for the host.
///
/// The core never owns timers: the host schedules clearing after
/// `duration_ms` and cancels the schedule itself when a newer request
/// supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRequest {
    /// Ranges to highlight.
    pub spans: Vec<Span>,
    /// How long the highlight should stay visible.
    pub duration_ms: u64,
}

/// Per-buffer navigation context.
#[derive(Debug, Clone)]
pub struct NavSession {
    language: SupportedLanguage,
    buffer: u64,
    rules: NavRules,
    cache: NavigationCache,
    last_resolved: Option<NodeHandle>,
    sticky: StickyLayer,
    pickers: PickerRegistry,
}

impl NavSession {
    /// Creates a session for buffer 0 of the given language.
    #[must_use]
    pub fn new(language: SupportedLanguage, rules: NavRules) -> Self {
        Self {
            language,
            buffer: 0,
            rules,
            cache: NavigationCache::new(),
            last_resolved: None,
            sticky: StickyLayer::new(),
            pickers: PickerRegistry::new(),
        }
    }

    /// Returns the session's language.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Points the session at a different buffer.
    ///
    /// Changing buffers drops the cache, the stability state, and any
    /// active sticky layer; registered pickers survive.
    pub fn set_buffer(&mut self, buffer: u64) {
        if buffer == self.buffer {
            return;
        }
        self.buffer = buffer;
        self.cache.clear();
        self.last_resolved = None;
        self.sticky.deactivate();
    }

    /// Resolves the cursor to the smallest enclosing node, with the
    /// boundary stability rule applied (see [`resolve`]).
    pub fn resolve_cursor_node<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> Option<N> {
        if let Some(handle) = self.cache.lookup(self.buffer, cursor)
            && let Some(node) = locate(root, handle)
        {
            return Some(node);
        }

        let resolved = resolve(root, cursor, self.last_resolved.as_ref())?;
        self.remember(resolved.handle(), cursor);
        Some(resolved)
    }

    /// Moves to the nearest navigable ancestor.
    pub fn parent<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(root, cursor, "no navigable ancestor", |node, rules, language| {
            navigator::navigable_parent(node, rules, language)
        })
    }

    /// Moves to the first navigable node in the subtree below the cursor.
    pub fn child<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(
            root,
            cursor,
            "no navigable node below",
            |node, rules, language| navigator::navigable_child(node, rules, language),
        )
    }

    /// Moves to the first navigable sibling after the cursor node.
    pub fn next_sibling<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(
            root,
            cursor,
            "no navigable following sibling",
            |node, rules, language| navigator::next_sibling(node, rules, language),
        )
    }

    /// Moves to the last navigable sibling before the cursor node.
    pub fn prev_sibling<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(
            root,
            cursor,
            "no navigable preceding sibling",
            |node, rules, language| navigator::prev_sibling(node, rules, language),
        )
    }

    /// Composite forward scan: sibling, descent, then ancestor ascent.
    pub fn following<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(root, cursor, "no following node", |node, rules, language| {
            navigator::following(node, rules, language)
        })
    }

    /// Composite backward scan: sibling, then ancestor ascent only.
    pub fn preceding<N: SyntaxNode>(&mut self, root: &N, cursor: Point) -> NavOutcome<N> {
        self.structural_op(root, cursor, "no preceding node", |node, rules, language| {
            navigator::preceding(node, rules, language)
        })
    }

    /// Steps to the traversal-order neighbour at a different position.
    pub fn step<N: SyntaxNode>(
        &mut self,
        root: &N,
        cursor: Point,
        direction: Direction,
        traversal: Traversal,
    ) -> NavOutcome<N> {
        let Some(origin) = self.resolve_cursor_node(root, cursor) else {
            return NavOutcome::none("no node at cursor position");
        };
        match navigator::step(root, &origin, direction, traversal) {
            StepOutcome::Found(target) => self.accept(target, "stepped to neighbour"),
            StepOutcome::EndOfTraversal => NavOutcome::none("no further node in this direction"),
            StepOutcome::NoMovement => {
                NavOutcome::none("no movement found within the attempt bound")
            }
        }
    }

    /// Steps to the nearest pre-order node of the cursor node's kind.
    pub fn same_kind_step<N: SyntaxNode>(
        &mut self,
        root: &N,
        cursor: Point,
        direction: Direction,
        filter: LineFilter,
    ) -> NavOutcome<N> {
        let Some(origin) = self.resolve_cursor_node(root, cursor) else {
            return NavOutcome::none("no node at cursor position");
        };
        let kind = origin.kind().to_owned();
        navigator::same_kind_step(root, &origin, direction, filter).map_or_else(
            || NavOutcome::none(format!("no other '{kind}' node in this direction")),
            |target| self.accept(target, format!("moved to next '{kind}'")),
        )
    }

    /// Moves to the nearest node of an explicitly requested kind.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownNodeKind`] when the grammar does not
    /// define `kind`; the session state is left unchanged.
    pub fn goto_kind<N: SyntaxNode>(
        &mut self,
        root: &N,
        cursor: Point,
        direction: Direction,
        kind: &str,
    ) -> Result<NavOutcome<N>, NavError> {
        if !self.language.knows_node_kind(kind) {
            warn!(%kind, language = %self.language, "go-to-kind query for unknown node kind");
            return Err(NavError::unknown_node_kind(self.language, kind));
        }
        let Some(origin) = self.resolve_cursor_node(root, cursor) else {
            return Ok(NavOutcome::none("no node at cursor position"));
        };
        Ok(
            navigator::goto_kind(root, &origin, direction, kind).map_or_else(
                || NavOutcome::none(format!("no '{kind}' node in this direction")),
                |target| self.accept(target, format!("moved to '{kind}'")),
            ),
        )
    }

    /// Registers a picker under `name`.
    pub fn register_picker(&mut self, name: impl Into<String>, spec: PickerSpec) {
        self.pickers.register(name, spec);
    }

    /// Registers a symbol-kind picker, parsing the kind name.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownSymbolKind`] when `kind_name` does not
    /// name a known symbol kind; nothing is registered in that case.
    pub fn register_symbol_picker(
        &mut self,
        name: impl Into<String>,
        kind_name: &str,
    ) -> Result<(), NavError> {
        let kind = SymbolKind::from_str(kind_name).inspect_err(|_| {
            warn!(%kind_name, "picker registration with unknown symbol kind");
        })?;
        self.pickers.register(
            name,
            PickerSpec::SymbolKind {
                kind,
                label: None,
                keymap: None,
            },
        );
        Ok(())
    }

    /// Activates the sticky layer from a registered picker.
    ///
    /// Any active layer is deactivated first, even when the picker
    /// produces no nodes; a zero-result invocation therefore always ends
    /// with no layer active.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownPicker`] when no picker is registered
    /// under `name`; the session state is left unchanged.
    pub fn activate_picker<N: SyntaxNode>(
        &mut self,
        name: &str,
        root: &N,
        cursor: Point,
    ) -> Result<NavOutcome<NodeHandle>, NavError> {
        let Some(picker) = self.pickers.get(name).cloned() else {
            warn!(%name, "sticky activation for unregistered picker");
            return Err(NavError::unknown_picker(name));
        };

        let flat: Vec<NodeHandle> = flatten(root, Traversal::PreOrder)
            .iter()
            .map(SyntaxNode::handle)
            .collect();
        let context = PickerContext {
            nodes: &flat,
            language: self.language,
        };
        let nodes = picker.collect(&context);
        let cursor_handle = self.resolve_cursor_node(root, cursor).map(|n| n.handle());

        let label = picker.label().to_owned();
        let activated = self
            .sticky
            .activate(nodes, label.clone(), cursor_handle.as_ref());
        if !activated {
            debug!(%name, "picker produced no nodes; layer stays inactive");
            return Ok(NavOutcome::none(format!(
                "picker '{name}' produced no nodes"
            )));
        }

        let reason = format!(
            "activated layer '{label}' with {} node(s)",
            self.sticky.len()
        );
        debug!(%label, size = self.sticky.len(), "sticky layer activated");
        Ok(NavOutcome {
            target: self.sticky.current().cloned(),
            reason,
        })
    }

    /// Cycles the sticky layer forward, wrapping past the end.
    pub fn step_next(&mut self) -> NavOutcome<NodeHandle> {
        self.sticky_step(StickyLayer::step_next)
    }

    /// Cycles the sticky layer backward, wrapping past the start.
    pub fn step_prev(&mut self) -> NavOutcome<NodeHandle> {
        self.sticky_step(StickyLayer::step_prev)
    }

    /// Exits the sticky layer.
    pub fn deactivate(&mut self) {
        self.sticky.deactivate();
    }

    /// Returns the sticky layer's current node, while one is active.
    #[must_use]
    pub fn current_target(&self) -> Option<&NodeHandle> {
        self.sticky.current()
    }

    /// Returns whether a sticky layer is active.
    #[must_use]
    pub const fn layer_active(&self) -> bool {
        self.sticky.is_active()
    }

    /// Builds a transient-highlight request for the active layer's nodes.
    ///
    /// Returns `None` while no layer is active. The host owns the timer
    /// lifecycle (see [`HighlightRequest`]).
    #[must_use]
    pub fn sticky_highlight(&self, duration_ms: u64) -> Option<HighlightRequest> {
        if !self.sticky.is_active() {
            return None;
        }
        Some(HighlightRequest {
            spans: self.sticky.nodes().iter().map(|n| n.span).collect(),
            duration_ms,
        })
    }

    fn structural_op<N, F>(
        &mut self,
        root: &N,
        cursor: Point,
        miss_reason: &str,
        op: F,
    ) -> NavOutcome<N>
    where
        N: SyntaxNode,
        F: FnOnce(&N, &NavRules, SupportedLanguage) -> Option<N>,
    {
        let Some(origin) = self.resolve_cursor_node(root, cursor) else {
            return NavOutcome::none("no node at cursor position");
        };
        op(&origin, &self.rules, self.language).map_or_else(
            || NavOutcome::none(miss_reason),
            |target| {
                let summary = target_summary(&target);
                self.accept(target, format!("moved to {summary}"))
            },
        )
    }

    fn sticky_step(&mut self, advance: fn(&mut StickyLayer)) -> NavOutcome<NodeHandle> {
        if !self.sticky.is_active() {
            return NavOutcome::none("no active layer");
        }
        advance(&mut self.sticky);
        let Some(handle) = self.sticky.current().cloned() else {
            return NavOutcome::none("layer is empty");
        };
        self.remember(handle.clone(), handle.target_position());
        let reason = format!(
            "layer '{}' node {}/{}",
            self.sticky.label(),
            self.sticky.index(),
            self.sticky.len()
        );
        NavOutcome::found(handle, reason)
    }

    fn accept<N: SyntaxNode>(&mut self, target: N, reason: impl Into<String>) -> NavOutcome<N> {
        let handle = target.handle();
        debug!(node = %handle, "navigation target");
        self.remember(handle.clone(), handle.target_position());
        NavOutcome::found(target, reason)
    }

    /// Records a resolution or navigation result so the cache can
    /// short-circuit and the stability rule can see it next time.
    fn remember(&mut self, handle: NodeHandle, cursor: Point) {
        self.cache.record(self.buffer, cursor, handle.clone());
        self.last_resolved = Some(handle);
    }
}

fn target_summary<N: SyntaxNode>(node: &N) -> String {
    format!("{} at {}", node.kind(), node.span().start)
}
