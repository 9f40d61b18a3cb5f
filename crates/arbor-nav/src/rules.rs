//! Navigability classification.
//!
//! A node is navigable when its kind appears in the global set, in the
//! active language's additional set, or when the custom predicate accepts
//! it. Lookup short-circuits in that order, so set membership bounds the
//! per-node cost during tree walks and the predicate only ever sees nodes
//! the sets rejected.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use arbor_syntax::{Span, SupportedLanguage, SyntaxNode};

use crate::error::NavError;

/// The view of a node handed to custom predicates.
///
/// Predicates are only ever evaluated for real nodes, so implementations
/// need no absence checks.
#[derive(Debug, Clone, Copy)]
pub struct NodeFacts<'a> {
    /// The node's type tag.
    pub kind: &'a str,
    /// Whether the node is named.
    pub named: bool,
    /// The node's half-open range.
    pub span: Span,
}

/// Custom classification fallback consulted after both kind sets.
pub type NavPredicate = Arc<dyn Fn(&NodeFacts<'_>) -> bool + Send + Sync>;

/// Immutable-per-session classification rule set.
#[derive(Clone, Default)]
pub struct NavRules {
    global: HashSet<String>,
    by_language: HashMap<SupportedLanguage, HashSet<String>>,
    predicate: Option<NavPredicate>,
}

impl NavRules {
    /// Creates a rule set from globally navigable node kinds.
    #[must_use]
    pub fn new<I, S>(global: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            global: global.into_iter().map(Into::into).collect(),
            by_language: HashMap::new(),
            predicate: None,
        }
    }

    /// Adds kinds navigable only when `language` is active.
    ///
    /// Per-language kinds merge with the global set; they never replace it.
    #[must_use]
    pub fn with_language<I, S>(mut self, language: SupportedLanguage, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_language
            .entry(language)
            .or_default()
            .extend(kinds.into_iter().map(Into::into));
        self
    }

    /// Installs a custom predicate consulted when both kind sets miss.
    #[must_use]
    pub fn with_predicate(mut self, predicate: NavPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Returns whether `node` is a navigation target under `language`.
    ///
    /// Checks the global set, then the language set, then the predicate,
    /// short-circuiting on the first hit.
    #[must_use]
    pub fn is_navigable<N: SyntaxNode>(&self, node: &N, language: SupportedLanguage) -> bool {
        let kind = node.kind();
        if self.global.contains(kind) {
            return true;
        }
        if self
            .by_language
            .get(&language)
            .is_some_and(|kinds| kinds.contains(kind))
        {
            return true;
        }
        self.predicate.as_ref().is_some_and(|accepts| {
            accepts(&NodeFacts {
                kind,
                named: node.is_named(),
                span: node.span(),
            })
        })
    }

    /// Returns whether no kinds and no predicate are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_language.is_empty() && self.predicate.is_none()
    }
}

impl fmt::Debug for NavRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavRules")
            .field("global", &self.global)
            .field("by_language", &self.by_language)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Serialisable shape of a navigation rules file.
///
/// Hosts load this with serde and convert it into [`NavRules`]; the custom
/// predicate has no file representation and is attached programmatically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    /// Node kinds navigable in every language.
    #[serde(default)]
    pub global: Vec<String>,
    /// Additional node kinds keyed by language name.
    #[serde(default)]
    pub languages: BTreeMap<String, Vec<String>>,
}

impl RulesFile {
    /// Converts the file shape into an in-memory rule set.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownLanguage`] when a per-language key does
    /// not name a supported language.
    pub fn into_rules(self) -> Result<NavRules, NavError> {
        let mut rules = NavRules::new(self.global);
        for (name, kinds) in self.languages {
            let language = SupportedLanguage::from_str(&name)
                .map_err(|_| NavError::unknown_language(&name))?;
            rules = rules.with_language(language, kinds);
        }
        Ok(rules)
    }
}
