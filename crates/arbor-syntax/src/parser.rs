//! Tree-sitter parsing wrapper with error tolerance.
//!
//! Tree-sitter always produces a tree, inserting ERROR and missing nodes
//! where the source does not match the grammar. Navigation works on such
//! trees unchanged; [`ParseResult::errors`] exists so hosts can tell the
//! user why structure looks odd.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::Point;

/// Result of parsing source code.
///
/// Owns the syntax tree together with the source it was parsed from; the
/// root node borrows from this value.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns whether the tree contains any ERROR or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects all syntax errors found in the tree, in source order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Start of the error node (zero-based).
    pub position: Point,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let context = source
            .get(node.byte_range())
            .map(|text| {
                if text.len() > 50 {
                    let truncated: String = text.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    text.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        Self {
            position: node.start_position().into(),
            context,
            message,
        }
    }
}

/// Tree-sitter parser wrapper for a single language.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code and returns the result.
    ///
    /// Tree-sitter is error-tolerant, so a result is returned even when
    /// the source contains syntax errors; use [`ParseResult::has_errors`]
    /// to check.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails to produce a tree at all,
    /// which indicates a parser configuration problem rather than bad
    /// input.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}
