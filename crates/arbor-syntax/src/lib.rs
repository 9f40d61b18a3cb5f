//! Tree access layer for the Arbor structural navigation engine.
//!
//! This crate wraps Tree-sitter parsing behind a small capability surface:
//!
//! - [`Parser`] and [`ParseResult`] for error-tolerant parsing
//! - [`SyntaxNode`], the trait the navigation core consumes for all tree
//!   queries (kind, named-ness, span, parent, named children)
//! - [`NodeHandle`], an owned structural identity that survives re-parses
//! - [`SupportedLanguage`] for grammar selection and node-kind validation
//!
//! The navigation core (`arbor-nav`) depends only on [`SyntaxNode`], never
//! on `tree_sitter::Node` directly, so tests can substitute a hand-built
//! tree for the real parser.
//!
//! # Example
//!
//! ```
//! use arbor_syntax::{Parser, Point, SupportedLanguage, SyntaxNode};
//!
//! let mut parser = Parser::new(SupportedLanguage::Rust)?;
//! let parsed = parser.parse("fn main() { let x = 1; }")?;
//!
//! let root = parsed.root_node();
//! assert_eq!(root.kind(), "source_file");
//! assert!(root.span().contains(Point::new(0, 3)));
//! # Ok::<(), arbor_syntax::SyntaxError>(())
//! ```

mod error;
mod language;
mod node;
mod parser;
mod position;

pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use node::{NodeHandle, SyntaxNode};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use position::{Point, Span};
