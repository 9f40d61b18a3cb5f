//! Structural code navigation over parsed syntax trees.
//!
//! Given a syntax tree and a cursor position, this crate determines which
//! nodes are "navigable" (per a merged rule set) and computes movement
//! targets: parent, child, previous/following sibling, and traversal-order
//! neighbours. A sticky layer cycles the cursor through a picker-collected
//! node set until explicitly exited.
//!
//! The crate is host-agnostic: it never touches buffers, windows, or
//! timers. Hosts feed it a root node and a cursor [`Point`] and receive a
//! target node plus a human-readable outcome reason; transient
//! highlighting is expressed as a declarative [`HighlightRequest`] the
//! host schedules itself.
//!
//! All state lives in an explicit [`NavSession`] constructed by the host,
//! so independent sessions (for example one per buffer) coexist without
//! shared globals.
//!
//! # Example
//!
//! ```
//! use arbor_nav::{NavRules, NavSession};
//! use arbor_syntax::{Parser, Point, SupportedLanguage};
//!
//! let mut parser = Parser::new(SupportedLanguage::Rust)?;
//! let parsed = parser.parse("fn main() { if true { return; } }")?;
//!
//! let rules = NavRules::new(["function_item", "if_expression", "return_expression"]);
//! let mut session = NavSession::new(SupportedLanguage::Rust, rules);
//!
//! // Cursor on `return`: the navigable parent is the `if`, skipping the
//! // non-navigable block in between.
//! let outcome = session.parent(&parsed.root_node(), Point::new(0, 22));
//! let target = outcome.target.expect("target");
//! # use arbor_syntax::SyntaxNode;
//! assert_eq!(target.kind(), "if_expression");
//! # Ok::<(), arbor_syntax::SyntaxError>(())
//! ```

mod error;
mod navigator;
mod picker;
mod resolve;
mod rules;
mod session;
mod sticky;

pub use arbor_syntax::{NodeHandle, Point, Span, SupportedLanguage, SyntaxNode};
pub use error::NavError;
pub use navigator::{Direction, LineFilter, StepOutcome, Traversal, flatten};
pub use picker::{PickerContext, PickerFn, PickerRegistry, PickerSpec, RegisteredPicker, SymbolKind};
pub use resolve::{NavigationCache, locate, resolve};
pub use rules::{NavPredicate, NavRules, NodeFacts, RulesFile};
pub use session::{HighlightRequest, NavOutcome, NavSession};
pub use sticky::StickyLayer;

#[cfg(test)]
mod tests;
