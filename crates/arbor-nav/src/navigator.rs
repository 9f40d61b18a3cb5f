//! Structural traversal algorithms.
//!
//! Every operation here is a pure function of (node, root, rules,
//! language). Lookups return `None` for "no target"; only a broken tree
//! (a parent cycle) panics, because continuing a walk over one cannot
//! terminate.

use std::collections::VecDeque;

use arbor_syntax::{SupportedLanguage, SyntaxNode};

use crate::rules::NavRules;

/// Movement direction through an ordered node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the list.
    Next,
    /// Towards the start of the list.
    Previous,
}

/// Flattening policy for traversal-order stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Root first, then each named child recursively, left to right.
    PreOrder,
    /// Breadth-first, layer by layer.
    LevelOrder,
}

/// Extra constraint on same-kind stepping candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFilter {
    /// Any candidate qualifies.
    AnyLine,
    /// Candidates must start on a different row than the origin.
    DifferentLine,
}

/// Result of a traversal-order step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<N> {
    /// A neighbour at a different start position was found.
    Found(N),
    /// The list ran out in the requested direction.
    EndOfTraversal,
    /// Every neighbour within the attempt bound shared the origin's
    /// start position, so the cursor would not visibly move.
    NoMovement,
}

/// Neighbours sharing the origin's start are skipped at most this many
/// times before a step gives up rather than looping.
const STEP_ATTEMPTS: usize = 20;

/// Parent walks beyond this depth are treated as a cycle in the tree
/// access layer.
const MAX_ASCENT: usize = 10_000;

/// Finds the nearest navigable ancestor, or `None` at the root.
///
/// # Panics
///
/// Panics when the parent chain exceeds [`MAX_ASCENT`] links, which means
/// the tree access layer has a parent cycle.
pub fn navigable_parent<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    let mut current = node.clone();
    for _ in 0..MAX_ASCENT {
        let parent = current.parent()?;
        if rules.is_navigable(&parent, language) {
            return Some(parent);
        }
        current = parent;
    }
    panic!("tree invariant violated: parent chain exceeds {MAX_ASCENT} links");
}

/// Finds the first navigable node in the subtree below `node`.
///
/// Immediate named children are checked before any recursion, so a
/// navigable child always wins over a navigable grandchild; only
/// non-navigable children's subtrees are descended into, in order.
pub fn navigable_child<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    let children = node.named_children();
    if let Some(hit) = children
        .iter()
        .find(|child| rules.is_navigable(*child, language))
    {
        return Some(hit.clone());
    }
    children
        .iter()
        .find_map(|child| navigable_child(child, rules, language))
}

/// Finds the first navigable sibling strictly after `node`.
pub fn next_sibling<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    let parent = node.parent()?;
    let siblings = parent.named_children();
    let index = siblings.iter().position(|s| s.matches(node))?;
    siblings
        .iter()
        .skip(index.saturating_add(1))
        .find(|s| rules.is_navigable(*s, language))
        .cloned()
}

/// Finds the last navigable sibling strictly before `node`.
pub fn prev_sibling<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    let parent = node.parent()?;
    let siblings = parent.named_children();
    let index = siblings.iter().position(|s| s.matches(node))?;
    siblings
        .iter()
        .take(index)
        .rev()
        .find(|s| rules.is_navigable(*s, language))
        .cloned()
}

/// Flattens the tree into an ordered list under the given policy.
///
/// Both policies visit named nodes only, starting at the root.
#[must_use]
pub fn flatten<N: SyntaxNode>(root: &N, traversal: Traversal) -> Vec<N> {
    match traversal {
        Traversal::PreOrder => {
            let mut out = Vec::new();
            preorder_into(root, &mut out);
            out
        }
        Traversal::LevelOrder => {
            let mut out = Vec::new();
            let mut queue = VecDeque::from([root.clone()]);
            while let Some(node) = queue.pop_front() {
                queue.extend(node.named_children());
                out.push(node);
            }
            out
        }
    }
}

fn preorder_into<N: SyntaxNode>(node: &N, out: &mut Vec<N>) {
    out.push(node.clone());
    for child in node.named_children() {
        preorder_into(&child, out);
    }
}

/// Steps to the traversal-order neighbour at a different start position.
///
/// Neighbours sharing the origin's exact start are skipped (they would
/// leave the cursor visibly unmoved), bounded at [`STEP_ATTEMPTS`]; the
/// bound exhausting reports [`StepOutcome::NoMovement`] instead of
/// looping.
pub fn step<N: SyntaxNode>(
    root: &N,
    origin: &N,
    direction: Direction,
    traversal: Traversal,
) -> StepOutcome<N> {
    let flat = flatten(root, traversal);
    let Some(mut index) = flat.iter().position(|n| n.matches(origin)) else {
        return StepOutcome::EndOfTraversal;
    };
    let origin_start = origin.span().start;

    for _ in 0..STEP_ATTEMPTS {
        index = match direction {
            Direction::Next => index.saturating_add(1),
            Direction::Previous => match index.checked_sub(1) {
                Some(prev) => prev,
                None => return StepOutcome::EndOfTraversal,
            },
        };
        let Some(candidate) = flat.get(index) else {
            return StepOutcome::EndOfTraversal;
        };
        if candidate.span().start != origin_start {
            return StepOutcome::Found(candidate.clone());
        }
    }
    StepOutcome::NoMovement
}

/// Steps through pre-order nodes of the origin's kind.
///
/// The flattened list is restricted to the origin's kind before the
/// neighbour search; the scan is not cyclic, so stepping past either end
/// yields `None`. [`LineFilter::DifferentLine`] additionally requires the
/// candidate to start on a different row than the origin.
pub fn same_kind_step<N: SyntaxNode>(
    root: &N,
    origin: &N,
    direction: Direction,
    filter: LineFilter,
) -> Option<N> {
    kind_step(root, origin, direction, origin.kind(), filter)
}

/// Steps through pre-order nodes of an explicitly requested kind.
///
/// Unlike [`same_kind_step`] the origin need not be of the target kind;
/// the neighbour is chosen by start position relative to the origin.
/// Callers are expected to have validated `kind` against the grammar
/// first (see `SupportedLanguage::knows_node_kind`).
pub fn goto_kind<N: SyntaxNode>(
    root: &N,
    origin: &N,
    direction: Direction,
    kind: &str,
) -> Option<N> {
    kind_step(root, origin, direction, kind, LineFilter::AnyLine)
}

fn kind_step<N: SyntaxNode>(
    root: &N,
    origin: &N,
    direction: Direction,
    kind: &str,
    filter: LineFilter,
) -> Option<N> {
    let origin_start = origin.span().start;
    let qualifies = |candidate: &&N| match filter {
        LineFilter::AnyLine => true,
        LineFilter::DifferentLine => candidate.span().start.row != origin_start.row,
    };

    let flat: Vec<N> = flatten(root, Traversal::PreOrder)
        .into_iter()
        .filter(|n| n.kind() == kind)
        .collect();

    match direction {
        Direction::Next => flat
            .iter()
            .filter(|n| n.span().start > origin_start)
            .find(qualifies)
            .cloned(),
        Direction::Previous => flat
            .iter()
            .rev()
            .filter(|n| n.span().start < origin_start)
            .find(qualifies)
            .cloned(),
    }
}

/// Composite forward scan: sibling, descent, then ancestor ascent.
///
/// Tries the navigable next sibling; failing that, the next sibling of
/// the first descendant that has one; failing that, walks up through
/// ancestors and takes the first navigable next sibling found there.
///
/// # Panics
///
/// Panics when the parent chain exceeds [`MAX_ASCENT`] links.
pub fn following<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    if let Some(sibling) = next_sibling(node, rules, language) {
        return Some(sibling);
    }
    if let Some(sibling) = descendant_next_sibling(node, rules, language) {
        return Some(sibling);
    }
    ancestor_sibling(node, Direction::Next, rules, language)
}

/// Composite backward scan: sibling, then ancestor ascent.
///
/// The structural mirror of [`following`] minus the descent stage: the
/// backward scan never dives into the current node's subtree. The
/// asymmetry is deliberate (scan forward through everything, back up
/// structurally) and is pinned by a test.
///
/// # Panics
///
/// Panics when the parent chain exceeds [`MAX_ASCENT`] links.
pub fn preceding<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    if let Some(sibling) = prev_sibling(node, rules, language) {
        return Some(sibling);
    }
    ancestor_sibling(node, Direction::Previous, rules, language)
}

/// Pre-order search for a descendant with a navigable next sibling;
/// returns that sibling.
fn descendant_next_sibling<N: SyntaxNode>(
    node: &N,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    for child in node.named_children() {
        if let Some(sibling) = next_sibling(&child, rules, language) {
            return Some(sibling);
        }
        if let Some(sibling) = descendant_next_sibling(&child, rules, language) {
            return Some(sibling);
        }
    }
    None
}

fn ancestor_sibling<N: SyntaxNode>(
    node: &N,
    direction: Direction,
    rules: &NavRules,
    language: SupportedLanguage,
) -> Option<N> {
    let mut current = node.clone();
    for _ in 0..MAX_ASCENT {
        let parent = current.parent()?;
        let sibling = match direction {
            Direction::Next => next_sibling(&parent, rules, language),
            Direction::Previous => prev_sibling(&parent, rules, language),
        };
        if let Some(target) = sibling {
            return Some(target);
        }
        current = parent;
    }
    panic!("tree invariant violated: parent chain exceeds {MAX_ASCENT} links");
}
