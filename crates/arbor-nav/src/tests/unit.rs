//! Cross-module tests over hand-built trees.
//!
//! Shapes and spans are pinned exactly, so every traversal property from
//! the navigator contract is checked without a grammar in the loop.

use std::sync::Arc;

use arbor_syntax::{Point, SupportedLanguage, SyntaxNode};

use super::fixture::{FakeNode, node, span};
use crate::error::NavError;
use crate::navigator::{self, Direction, LineFilter, StepOutcome, Traversal, flatten};
use crate::picker::{PickerContext, PickerSpec};
use crate::resolve::resolve;
use crate::rules::NavRules;
use crate::session::NavSession;

fn find(root: &FakeNode, kind: &str) -> FakeNode {
    flatten(root, Traversal::PreOrder)
        .into_iter()
        .find(|n| n.kind() == kind)
        .expect("fixture contains the node")
}

/// `Program[FunctionDecl[Block[If[Block[Return]]]]]` with only the inner
/// chain populated; blocks are not navigable under [`chain_rules`].
fn chain_tree() -> FakeNode {
    node(
        "Program",
        span(0, 0, 10, 0),
        vec![node(
            "FunctionDecl",
            span(1, 0, 8, 1),
            vec![node(
                "Block",
                span(1, 10, 8, 1),
                vec![node(
                    "If",
                    span(2, 2, 7, 3),
                    vec![node(
                        "InnerBlock",
                        span(2, 10, 7, 3),
                        vec![node("Return", span(3, 4, 3, 11), Vec::new())],
                    )],
                )],
            )],
        )],
    )
}

fn chain_rules() -> NavRules {
    NavRules::new(["FunctionDecl", "If", "Return"])
}

/// Three navigable declarations under one root.
fn flat_tree() -> FakeNode {
    node(
        "Program",
        span(0, 0, 12, 0),
        vec![
            node("FunctionDecl", span(1, 0, 3, 1), Vec::new()),
            node("FunctionDecl", span(5, 0, 7, 1), Vec::new()),
            node("FunctionDecl", span(9, 0, 11, 1), Vec::new()),
        ],
    )
}

// =============================================================================
// Parent / Child
// =============================================================================

#[test]
fn parent_skips_non_navigable_layers() {
    let root = chain_tree();
    let rules = chain_rules();

    let from_return = navigator::navigable_parent(
        &find(&root, "Return"),
        &rules,
        SupportedLanguage::Rust,
    )
    .expect("parent");
    assert_eq!(from_return.kind(), "If");

    let from_if =
        navigator::navigable_parent(&from_return, &rules, SupportedLanguage::Rust).expect("parent");
    assert_eq!(from_if.kind(), "FunctionDecl");
}

#[test]
fn parent_returns_none_above_the_root() {
    let root = chain_tree();
    assert!(navigator::navigable_parent(&root, &chain_rules(), SupportedLanguage::Rust).is_none());
}

#[test]
fn child_skips_non_navigable_layers() {
    let root = chain_tree();
    let target = navigator::navigable_child(
        &find(&root, "FunctionDecl"),
        &chain_rules(),
        SupportedLanguage::Rust,
    )
    .expect("child");
    assert_eq!(target.kind(), "If");
}

#[test]
fn child_prefers_an_immediate_child_over_a_deeper_one() {
    // The deep Return sits in an earlier subtree than the immediate If.
    let root = node(
        "Program",
        span(0, 0, 10, 0),
        vec![
            node(
                "Block",
                span(1, 0, 4, 0),
                vec![node("Return", span(2, 2, 2, 9), Vec::new())],
            ),
            node("If", span(5, 0, 7, 0), Vec::new()),
        ],
    );
    let target =
        navigator::navigable_child(&root, &chain_rules(), SupportedLanguage::Rust).expect("child");
    assert_eq!(target.kind(), "If");
}

#[test]
fn child_returns_none_when_the_subtree_has_no_navigable_node() {
    let root = node(
        "Program",
        span(0, 0, 4, 0),
        vec![node("Block", span(1, 0, 3, 0), Vec::new())],
    );
    assert!(navigator::navigable_child(&root, &chain_rules(), SupportedLanguage::Rust).is_none());
}

#[test]
fn parent_of_child_never_descends_below_the_origin() {
    let root = chain_tree();
    let rules = chain_rules();
    for origin in flatten(&root, Traversal::PreOrder) {
        let Some(down) = navigator::navigable_child(&origin, &rules, SupportedLanguage::Rust)
        else {
            continue;
        };
        let Some(up) = navigator::navigable_parent(&down, &rules, SupportedLanguage::Rust) else {
            continue;
        };
        assert!(
            up.span().contains_span(origin.span()),
            "{up:?} is below {origin:?}"
        );
    }
}

// =============================================================================
// Siblings
// =============================================================================

#[test]
fn sibling_round_trip_across_one_hop() {
    let root = flat_tree();
    let rules = chain_rules();
    let middle = resolve(&root, Point::new(5, 0), None).expect("middle");

    let previous =
        navigator::prev_sibling(&middle, &rules, SupportedLanguage::Rust).expect("prev");
    let back = navigator::next_sibling(&previous, &rules, SupportedLanguage::Rust).expect("next");
    assert!(back.matches(&middle));
}

#[test]
fn siblings_skip_non_navigable_entries() {
    let root = node(
        "Program",
        span(0, 0, 10, 0),
        vec![
            node("FunctionDecl", span(1, 0, 2, 1), Vec::new()),
            node("Comment", span(3, 0, 3, 20), Vec::new()),
            node("FunctionDecl", span(5, 0, 6, 1), Vec::new()),
        ],
    );
    let first = resolve(&root, Point::new(1, 0), None).expect("first");
    let target =
        navigator::next_sibling(&first, &chain_rules(), SupportedLanguage::Rust).expect("next");
    assert_eq!(target.span().start, Point::new(5, 0));
}

#[test]
fn sibling_lookup_misses_for_an_only_child() {
    let root = chain_tree();
    let rules = chain_rules();
    let only = find(&root, "If");
    assert!(navigator::next_sibling(&only, &rules, SupportedLanguage::Rust).is_none());
    assert!(navigator::prev_sibling(&only, &rules, SupportedLanguage::Rust).is_none());
}

// =============================================================================
// Traversal-order stepping
// =============================================================================

#[test]
fn preorder_step_is_anti_symmetric() {
    let root = flat_tree();
    let origin = resolve(&root, Point::new(1, 0), None).expect("origin");

    let StepOutcome::Found(forward) =
        navigator::step(&root, &origin, Direction::Next, Traversal::PreOrder)
    else {
        panic!("expected a forward neighbour");
    };
    let StepOutcome::Found(back) =
        navigator::step(&root, &forward, Direction::Previous, Traversal::PreOrder)
    else {
        panic!("expected a backward neighbour");
    };
    assert!(back.matches(&origin));
}

#[test]
fn level_order_visits_siblings_before_grandchildren() {
    let root = node(
        "Program",
        span(0, 0, 6, 0),
        vec![
            node(
                "A",
                span(1, 0, 2, 0),
                vec![node("C", span(1, 2, 1, 8), Vec::new())],
            ),
            node(
                "B",
                span(3, 0, 4, 0),
                vec![node("D", span(3, 2, 3, 8), Vec::new())],
            ),
        ],
    );
    let kinds: Vec<String> = flatten(&root, Traversal::LevelOrder)
        .iter()
        .map(|n| n.kind().to_owned())
        .collect();
    assert_eq!(kinds, ["Program", "A", "B", "C", "D"]);

    // Stepping forward from B crosses into the grandchild layer.
    let origin = find(&root, "B");
    let StepOutcome::Found(target) =
        navigator::step(&root, &origin, Direction::Next, Traversal::LevelOrder)
    else {
        panic!("expected a neighbour");
    };
    assert_eq!(target.kind(), "C");
}

#[test]
fn step_skips_neighbours_sharing_the_origin_start() {
    // B and C start exactly where A does; D is the first visible move.
    let root = node(
        "A",
        span(0, 0, 5, 0),
        vec![node(
            "B",
            span(0, 0, 4, 0),
            vec![node(
                "C",
                span(0, 0, 3, 0),
                vec![node("D", span(1, 0, 2, 0), Vec::new())],
            )],
        )],
    );
    let StepOutcome::Found(target) =
        navigator::step(&root, &root, Direction::Next, Traversal::PreOrder)
    else {
        panic!("expected a neighbour");
    };
    assert_eq!(target.kind(), "D");
}

#[test]
fn step_gives_up_after_the_attempt_bound() {
    // More same-start wrappers than the bound allows.
    let mut current = node("Wrap", span(0, 0, 0, 5), Vec::new());
    for extra in 1..=25 {
        current = node("Wrap", span(0, 0, 0, 5 + extra), vec![current]);
    }
    let outcome = navigator::step(&current, &current, Direction::Next, Traversal::PreOrder);
    assert_eq!(outcome, StepOutcome::NoMovement);
}

#[test]
fn step_reports_end_of_traversal_at_the_edges() {
    let root = flat_tree();
    let last = resolve(&root, Point::new(9, 0), None).expect("last");
    let outcome = navigator::step(&root, &last, Direction::Next, Traversal::PreOrder);
    assert_eq!(outcome, StepOutcome::EndOfTraversal);

    let outcome = navigator::step(&root, &root, Direction::Previous, Traversal::PreOrder);
    assert_eq!(outcome, StepOutcome::EndOfTraversal);
}

// =============================================================================
// Same-kind stepping
// =============================================================================

#[test]
fn same_kind_step_is_not_cyclic() {
    let root = node(
        "Program",
        span(0, 0, 14, 0),
        vec![
            node("FunctionDecl", span(2, 0, 4, 1), Vec::new()),
            node("FunctionDecl", span(10, 0, 12, 1), Vec::new()),
        ],
    );
    let first = resolve(&root, Point::new(2, 0), None).expect("first");

    let second = navigator::same_kind_step(&root, &first, Direction::Next, LineFilter::AnyLine)
        .expect("second declaration");
    assert_eq!(second.span().start, Point::new(10, 0));

    // No wrap back to row 2.
    assert!(
        navigator::same_kind_step(&root, &second, Direction::Next, LineFilter::AnyLine).is_none()
    );
}

#[test]
fn different_line_filter_skips_same_row_candidates() {
    let root = node(
        "Program",
        span(0, 0, 8, 0),
        vec![
            node("FunctionDecl", span(2, 0, 2, 10), Vec::new()),
            node("FunctionDecl", span(2, 20, 2, 30), Vec::new()),
            node("FunctionDecl", span(5, 0, 5, 10), Vec::new()),
        ],
    );
    let first = resolve(&root, Point::new(2, 0), None).expect("first");

    let any = navigator::same_kind_step(&root, &first, Direction::Next, LineFilter::AnyLine)
        .expect("same-row neighbour");
    assert_eq!(any.span().start, Point::new(2, 20));

    let other_line =
        navigator::same_kind_step(&root, &first, Direction::Next, LineFilter::DifferentLine)
            .expect("different-row neighbour");
    assert_eq!(other_line.span().start, Point::new(5, 0));
}

// =============================================================================
// Composite following / preceding
// =============================================================================

/// `Program[FunctionDecl[Block[If, Return]]]`: the declaration has no
/// siblings, but its grandchildren do.
fn descent_tree() -> FakeNode {
    node(
        "Program",
        span(0, 0, 10, 0),
        vec![node(
            "FunctionDecl",
            span(1, 0, 9, 0),
            vec![node(
                "Block",
                span(1, 5, 9, 0),
                vec![
                    node("If", span(2, 2, 4, 3), Vec::new()),
                    node("Return", span(5, 4, 5, 11), Vec::new()),
                ],
            )],
        )],
    )
}

#[test]
fn following_descends_to_a_sibling_pair_inside_the_subtree() {
    let root = descent_tree();
    let origin = find(&root, "FunctionDecl");
    let target =
        navigator::following(&origin, &chain_rules(), SupportedLanguage::Rust).expect("target");
    assert_eq!(target.kind(), "Return");
}

#[test]
fn preceding_never_descends() {
    // Deliberate asymmetry: the backward scan uses previous-sibling and
    // ancestor ascent only, so the sibling pair inside the subtree is
    // invisible to it.
    let root = descent_tree();
    let origin = find(&root, "FunctionDecl");
    assert!(navigator::preceding(&origin, &chain_rules(), SupportedLanguage::Rust).is_none());
}

#[test]
fn following_ascends_when_the_subtree_is_exhausted() {
    let root = node(
        "Program",
        span(0, 0, 12, 0),
        vec![
            node(
                "FunctionDecl",
                span(1, 0, 4, 1),
                vec![node("Return", span(2, 2, 2, 9), Vec::new())],
            ),
            node("FunctionDecl", span(6, 0, 8, 1), Vec::new()),
        ],
    );
    let origin = find(&root, "Return");
    let target =
        navigator::following(&origin, &chain_rules(), SupportedLanguage::Rust).expect("target");
    assert_eq!(target.span().start, Point::new(6, 0));
}

#[test]
fn preceding_takes_the_ancestor_previous_sibling() {
    let root = node(
        "Program",
        span(0, 0, 12, 0),
        vec![
            node("FunctionDecl", span(1, 0, 3, 1), Vec::new()),
            node(
                "FunctionDecl",
                span(6, 0, 9, 1),
                vec![node("Return", span(7, 2, 7, 9), Vec::new())],
            ),
        ],
    );
    let origin = find(&root, "Return");
    let target =
        navigator::preceding(&origin, &chain_rules(), SupportedLanguage::Rust).expect("target");
    assert_eq!(target.span().start, Point::new(1, 0));
}

// =============================================================================
// Session integration
// =============================================================================

/// A fake tree using real Rust grammar kind names, so grammar-validated
/// session operations work against it.
fn rusty_tree() -> FakeNode {
    node(
        "source_file",
        span(0, 0, 12, 0),
        vec![
            node("function_item", span(1, 0, 3, 1), Vec::new()),
            node("function_item", span(5, 0, 7, 1), Vec::new()),
        ],
    )
}

fn rusty_session() -> NavSession {
    NavSession::new(
        SupportedLanguage::Rust,
        NavRules::new(["function_item", "source_file"]),
    )
}

#[test]
fn session_parent_motion_is_stable_on_a_shared_boundary() {
    // FunctionDecl and Block share a start; after moving up to the
    // declaration, re-resolving at the same cursor stays there instead of
    // collapsing back into the block.
    let root = node(
        "Program",
        span(0, 0, 10, 0),
        vec![node(
            "FunctionDecl",
            span(1, 0, 8, 0),
            vec![node("Block", span(1, 0, 8, 0), Vec::new())],
        )],
    );
    let mut session = NavSession::new(SupportedLanguage::Rust, NavRules::new(["FunctionDecl"]));
    let cursor = Point::new(1, 0);

    let first = session
        .resolve_cursor_node(&root, cursor)
        .expect("resolved");
    assert_eq!(first.kind(), "Block");

    let outcome = session.parent(&root, cursor);
    assert_eq!(outcome.target.expect("target").kind(), "FunctionDecl");

    let second = session
        .resolve_cursor_node(&root, cursor)
        .expect("resolved");
    assert_eq!(second.kind(), "FunctionDecl");
}

#[test]
fn repeated_resolution_matches_a_fresh_session() {
    let root = rusty_tree();
    let cursor = Point::new(1, 0);

    let mut warm = rusty_session();
    let _ = warm.resolve_cursor_node(&root, cursor);
    let cached = warm.resolve_cursor_node(&root, cursor).expect("cached");

    let mut cold = rusty_session();
    let fresh = cold.resolve_cursor_node(&root, cursor).expect("fresh");

    assert!(cached.matches(&fresh));
}

#[test]
fn session_goto_kind_rejects_unknown_kinds() {
    let root = rusty_tree();
    let mut session = rusty_session();

    let error = session
        .goto_kind(&root, Point::new(0, 0), Direction::Next, "flux_capacitor")
        .expect_err("unknown kind");
    assert!(matches!(error, NavError::UnknownNodeKind { .. }));
}

#[test]
fn session_goto_kind_moves_to_the_requested_kind() {
    let root = rusty_tree();
    let mut session = rusty_session();

    let outcome = session
        .goto_kind(&root, Point::new(0, 0), Direction::Next, "function_item")
        .expect("known kind");
    let target = outcome.target.expect("target");
    assert_eq!(target.span().start, Point::new(1, 0));
}

#[test]
fn session_activates_and_cycles_a_symbol_layer() {
    let root = rusty_tree();
    let mut session = rusty_session();
    session
        .register_symbol_picker("functions", "function")
        .expect("register");

    let outcome = session
        .activate_picker("functions", &root, Point::new(1, 0))
        .expect("activate");
    assert!(outcome.moved());
    assert!(session.layer_active());

    let start = session.current_target().cloned().expect("current");
    session.step_next();
    session.step_next();
    let wrapped = session.current_target().cloned().expect("current");
    assert_eq!(start, wrapped, "two steps over two nodes wrap around");

    let highlight = session.sticky_highlight(250).expect("highlight");
    assert_eq!(highlight.spans.len(), 2);
    assert_eq!(highlight.duration_ms, 250);

    session.deactivate();
    assert!(!session.layer_active());
    assert!(session.current_target().is_none());
}

#[test]
fn zero_result_picker_still_deactivates_the_previous_layer() {
    let root = rusty_tree();
    let mut session = rusty_session();
    session
        .register_symbol_picker("functions", "function")
        .expect("register");
    session.register_picker(
        "nothing",
        PickerSpec::Custom {
            collect: Arc::new(|_: &PickerContext<'_>| Vec::new()),
            label: None,
            keymap: None,
        },
    );

    session
        .activate_picker("functions", &root, Point::new(1, 0))
        .expect("activate");
    assert!(session.layer_active());

    let outcome = session
        .activate_picker("nothing", &root, Point::new(1, 0))
        .expect("activation itself succeeds");
    assert!(!outcome.moved());
    assert!(!session.layer_active(), "layer A must not survive");
}

#[test]
fn unknown_picker_name_is_a_misconfiguration() {
    let root = rusty_tree();
    let mut session = rusty_session();

    let error = session
        .activate_picker("missing", &root, Point::new(0, 0))
        .expect_err("unknown picker");
    assert!(matches!(error, NavError::UnknownPicker { .. }));
}

#[test]
fn unknown_symbol_kind_registers_nothing() {
    let mut session = rusty_session();
    let error = session
        .register_symbol_picker("gadgets", "gadget")
        .expect_err("unknown symbol kind");
    assert!(matches!(error, NavError::UnknownSymbolKind { .. }));

    let root = rusty_tree();
    assert!(
        session
            .activate_picker("gadgets", &root, Point::new(0, 0))
            .is_err()
    );
}

#[test]
fn changing_buffers_drops_navigation_state() {
    let root = rusty_tree();
    let mut session = rusty_session();
    session
        .register_symbol_picker("functions", "function")
        .expect("register");
    session
        .activate_picker("functions", &root, Point::new(1, 0))
        .expect("activate");

    session.set_buffer(7);
    assert!(!session.layer_active());

    // Pickers survive the buffer switch.
    assert!(session.activate_picker("functions", &root, Point::new(1, 0)).is_ok());
}
