//! Picker registration and resolution.
//!
//! A picker produces the node set backing a sticky layer. Specifications
//! come in exactly two shapes: a symbol kind filter and a custom
//! collection closure. Both are resolved into a uniform collection
//! function at registration time, so activation never inspects the
//! specification shape again.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arbor_syntax::{NodeHandle, SupportedLanguage};

use crate::error::NavError;

/// Input handed to picker collection functions.
///
/// `nodes` is the pre-order flattening of the current tree as owned
/// handles; pickers select from it rather than walking the tree
/// themselves.
#[derive(Debug, Clone, Copy)]
pub struct PickerContext<'a> {
    /// Pre-order flattening of the current tree.
    pub nodes: &'a [NodeHandle],
    /// The active buffer's language.
    pub language: SupportedLanguage,
}

/// Uniform collection function stored in the registry.
pub type PickerFn = Arc<dyn Fn(&PickerContext<'_>) -> Vec<NodeHandle> + Send + Sync>;

/// Source-level symbol categories pickers can filter by.
///
/// Each category maps to the node kinds that represent it per language,
/// which keeps picker configuration language-neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Free functions.
    Function,
    /// Methods on a type or class.
    Method,
    /// Struct definitions.
    Struct,
    /// Enum definitions.
    Enum,
    /// Class definitions.
    Class,
    /// Interfaces and traits.
    Interface,
    /// Modules and namespaces.
    Module,
}

impl SymbolKind {
    /// Returns the node kinds representing this symbol under `language`.
    ///
    /// An empty slice means the language has no such construct.
    #[must_use]
    pub const fn node_kinds(self, language: SupportedLanguage) -> &'static [&'static str] {
        match (self, language) {
            (Self::Function | Self::Method, SupportedLanguage::Rust) => &["function_item"],
            (Self::Struct, SupportedLanguage::Rust) => &["struct_item"],
            (Self::Enum, SupportedLanguage::Rust) => &["enum_item"],
            (Self::Interface, SupportedLanguage::Rust) => &["trait_item"],
            (Self::Module, SupportedLanguage::Rust) => &["mod_item"],

            (Self::Function | Self::Method, SupportedLanguage::Python) => &["function_definition"],
            (Self::Class, SupportedLanguage::Python) => &["class_definition"],

            (Self::Function, SupportedLanguage::TypeScript) => {
                &["function_declaration", "arrow_function"]
            }
            (Self::Method, SupportedLanguage::TypeScript) => &["method_definition"],
            (Self::Class, SupportedLanguage::TypeScript) => &["class_declaration"],
            (Self::Interface, SupportedLanguage::TypeScript) => &["interface_declaration"],
            (Self::Enum, SupportedLanguage::TypeScript) => &["enum_declaration"],
            (Self::Module, SupportedLanguage::TypeScript) => &["internal_module"],

            _ => &[],
        }
    }

    /// Returns the lower-case name of this symbol kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Module => "module",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = NavError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "struct" => Ok(Self::Struct),
            "enum" => Ok(Self::Enum),
            "class" => Ok(Self::Class),
            "interface" | "trait" => Ok(Self::Interface),
            "module" => Ok(Self::Module),
            other => Err(NavError::unknown_symbol_kind(other)),
        }
    }
}

/// Declarative picker specification.
///
/// Resolved into a [`PickerFn`] at registration time; the two variants
/// are the only shapes a picker can take.
pub enum PickerSpec {
    /// Collects all nodes representing one symbol kind.
    SymbolKind {
        /// The symbol category to collect.
        kind: SymbolKind,
        /// Optional display label; defaults to the kind name.
        label: Option<String>,
        /// Optional transient key binding hint for the host.
        keymap: Option<String>,
    },
    /// Runs an arbitrary collection function.
    Custom {
        /// The collection function.
        collect: PickerFn,
        /// Optional display label; defaults to the registered name.
        label: Option<String>,
        /// Optional transient key binding hint for the host.
        keymap: Option<String>,
    },
}

impl fmt::Debug for PickerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymbolKind { kind, label, keymap } => f
                .debug_struct("SymbolKind")
                .field("kind", kind)
                .field("label", label)
                .field("keymap", keymap)
                .finish(),
            Self::Custom { label, keymap, .. } => f
                .debug_struct("Custom")
                .field("collect", &"<fn>")
                .field("label", label)
                .field("keymap", keymap)
                .finish(),
        }
    }
}

/// A picker after registration: uniform collection function plus display
/// metadata.
#[derive(Clone)]
pub struct RegisteredPicker {
    collect: PickerFn,
    label: String,
    keymap: Option<String>,
}

impl RegisteredPicker {
    /// Runs the collection function over the given context.
    #[must_use]
    pub fn collect(&self, context: &PickerContext<'_>) -> Vec<NodeHandle> {
        (self.collect)(context)
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the host key binding hint, if any.
    #[must_use]
    pub fn keymap(&self) -> Option<&str> {
        self.keymap.as_deref()
    }
}

impl fmt::Debug for RegisteredPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPicker")
            .field("collect", &"<fn>")
            .field("label", &self.label)
            .field("keymap", &self.keymap)
            .finish()
    }
}

/// Name-keyed registry of resolved pickers.
#[derive(Debug, Clone, Default)]
pub struct PickerRegistry {
    pickers: HashMap<String, RegisteredPicker>,
}

impl PickerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a picker under `name`, resolving the specification into
    /// its uniform collection function.
    ///
    /// Re-registering a name replaces the previous picker.
    pub fn register(&mut self, name: impl Into<String>, spec: PickerSpec) {
        let picker_name = name.into();
        let picker = match spec {
            PickerSpec::SymbolKind { kind, label, keymap } => RegisteredPicker {
                collect: Arc::new(move |context: &PickerContext<'_>| {
                    let kinds = kind.node_kinds(context.language);
                    context
                        .nodes
                        .iter()
                        .filter(|node| kinds.contains(&node.kind.as_str()))
                        .cloned()
                        .collect()
                }),
                label: label.unwrap_or_else(|| kind.as_str().to_owned()),
                keymap,
            },
            PickerSpec::Custom { collect, label, keymap } => RegisteredPicker {
                collect,
                label: label.unwrap_or_else(|| picker_name.clone()),
                keymap,
            },
        };
        self.pickers.insert(picker_name, picker);
    }

    /// Looks up a picker by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredPicker> {
        self.pickers.get(name)
    }

    /// Returns the registered picker names in arbitrary order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.pickers.keys().map(String::as_str).collect()
    }
}
