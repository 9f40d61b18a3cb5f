//! Error types for navigation operations.
//!
//! Only misconfiguration is an error here: a name or kind the engine was
//! never taught. Ordinary "nothing to move to" outcomes are `None` targets
//! with a reason string, never errors.

use thiserror::Error;

use arbor_syntax::SupportedLanguage;

/// Errors from navigation configuration and picker lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavError {
    /// No picker is registered under the requested name.
    #[error("unknown picker: '{name}'")]
    UnknownPicker {
        /// The name that was looked up.
        name: String,
    },

    /// A picker specification named a symbol kind the engine does not know.
    #[error("unknown symbol kind: '{name}'")]
    UnknownSymbolKind {
        /// The symbol kind name that failed to parse.
        name: String,
    },

    /// A direct go-to-kind query named a node kind absent from the grammar.
    #[error("unknown node kind for {language}: '{kind}'")]
    UnknownNodeKind {
        /// The language whose grammar was consulted.
        language: SupportedLanguage,
        /// The node kind that the grammar does not define.
        kind: String,
    },

    /// A rules file keyed a kind list by an unrecognised language name.
    #[error("unknown language in rules: '{name}'")]
    UnknownLanguage {
        /// The language name that failed to parse.
        name: String,
    },
}

impl NavError {
    /// Creates an unknown picker error.
    #[must_use]
    pub fn unknown_picker(name: impl Into<String>) -> Self {
        Self::UnknownPicker { name: name.into() }
    }

    /// Creates an unknown symbol kind error.
    #[must_use]
    pub fn unknown_symbol_kind(name: impl Into<String>) -> Self {
        Self::UnknownSymbolKind { name: name.into() }
    }

    /// Creates an unknown node kind error.
    #[must_use]
    pub fn unknown_node_kind(language: SupportedLanguage, kind: impl Into<String>) -> Self {
        Self::UnknownNodeKind {
            language,
            kind: kind.into(),
        }
    }

    /// Creates an unknown language error.
    #[must_use]
    pub fn unknown_language(name: impl Into<String>) -> Self {
        Self::UnknownLanguage { name: name.into() }
    }
}
