//! Cursor position resolution.
//!
//! Resolution descends from the root into whichever named child contains
//! the cursor point, stopping at the smallest enclosing node. A stability
//! rule keeps upward navigation from collapsing straight back into the
//! innermost node when an ancestor shares its start position.

use arbor_syntax::{NodeHandle, Point, SyntaxNode};

/// Cache of the last resolution, keyed by buffer identity and cursor.
///
/// Purely an optimisation: it short-circuits repeated resolution while the
/// cursor has not moved. Removing it must not change navigation outcomes
/// (covered by `resolve_ignores_cache_for_outcomes` in the tests).
#[derive(Debug, Clone, Default)]
pub struct NavigationCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    buffer: u64,
    cursor: Point,
    node: NodeHandle,
}

impl NavigationCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached node when buffer and cursor both match.
    #[must_use]
    pub fn lookup(&self, buffer: u64, cursor: Point) -> Option<&NodeHandle> {
        self.entry
            .as_ref()
            .filter(|e| e.buffer == buffer && e.cursor == cursor)
            .map(|e| &e.node)
    }

    /// Records a resolution, replacing any prior entry.
    pub fn record(&mut self, buffer: u64, cursor: Point, node: NodeHandle) {
        self.entry = Some(CacheEntry {
            buffer,
            cursor,
            node,
        });
    }

    /// Drops the cached entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Finds the smallest node containing `point`, with boundary stability.
///
/// Returns `None` when the point lies outside the root's span.
///
/// `previous` is the last node the session resolved or navigated to in the
/// same buffer. When it starts exactly where the freshly resolved smallest
/// node starts, differs from it, and still contains the cursor, the
/// resolver prefers the matching ancestor so that upward motion onto a
/// shared boundary is not immediately undone. Stabilisation is bounded:
/// only ancestors in the descent chain that share the smallest node's
/// start position are considered.
pub fn resolve<N: SyntaxNode>(root: &N, point: Point, previous: Option<&NodeHandle>) -> Option<N> {
    if !root.span().contains(point) {
        return None;
    }

    let chain = descend(root, point);
    let smallest = chain.last()?;

    if let Some(prev) = previous
        && prev.span.start == smallest.span().start
        && !prev.matches(smallest)
        && prev.span.contains(point)
        && let Some(stable) = chain
            .iter()
            .rev()
            .take_while(|node| node.span().start == smallest.span().start)
            .find(|node| prev.matches(*node))
    {
        return Some(stable.clone());
    }

    Some(smallest.clone())
}

/// Re-locates the node matching `handle` in the current tree.
///
/// Used to turn a retained [`NodeHandle`] (sticky layer entries, cached
/// resolutions) back into a live node after a possible re-parse. Returns
/// `None` when no structurally equal node exists any more.
pub fn locate<N: SyntaxNode>(root: &N, handle: &NodeHandle) -> Option<N> {
    if !root.span().contains_span(handle.span) {
        return None;
    }
    if handle.matches(root) {
        return Some(root.clone());
    }
    root.named_children()
        .into_iter()
        .filter(|child| child.span().contains_span(handle.span))
        .find_map(|child| locate(&child, handle))
}

/// Walks from the root to the smallest node containing `point`.
///
/// # Panics
///
/// Panics when the tree access layer reports a child whose span is not
/// contained by its parent; continuing on such a tree risks an endless
/// descent, so the defect is surfaced immediately.
fn descend<N: SyntaxNode>(root: &N, point: Point) -> Vec<N> {
    let mut chain = vec![root.clone()];
    let mut current = root.clone();
    loop {
        let next = current
            .named_children()
            .into_iter()
            .find(|child| child.span().contains(point));
        let Some(child) = next else {
            return chain;
        };
        assert!(
            current.span().contains_span(child.span()),
            "tree invariant violated: child {} escapes parent {}",
            child.span(),
            current.span(),
        );
        chain.push(child.clone());
        current = child;
    }
}
