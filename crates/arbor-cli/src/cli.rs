//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use arbor_syntax::Point;

/// Structural code navigation over syntax trees.
#[derive(Debug, Parser)]
#[command(name = "arbor", version, about)]
pub(crate) struct Cli {
    /// Output format for results.
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub(crate) output: OutputFormat,
    /// Path to a JSON navigation rules file.
    #[arg(long, value_name = "PATH", global = true)]
    pub(crate) rules: Option<PathBuf>,
    /// Log filter expression, overriding the `ARBOR_LOG` environment
    /// variable.
    #[arg(long, value_name = "FILTER", global = true)]
    pub(crate) log_filter: Option<String>,
    /// The subcommand to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Subcommands recognised by the `arbor` binary.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Parse a file and report syntax errors.
    Check {
        /// Source file to parse.
        file: PathBuf,
    },
    /// Resolve the cursor to the smallest enclosing node.
    Resolve {
        /// Source file to parse.
        file: PathBuf,
        /// Cursor position.
        #[command(flatten)]
        cursor: CursorArgs,
    },
    /// Run a navigation operation from the cursor.
    Nav {
        /// Operation to run.
        #[arg(value_enum)]
        operation: Operation,
        /// Source file to parse.
        file: PathBuf,
        /// Cursor position.
        #[command(flatten)]
        cursor: CursorArgs,
        /// Target node kind; required by `goto-kind`.
        #[arg(long, value_name = "KIND")]
        kind: Option<String>,
        /// Search backwards; applies to `goto-kind`.
        #[arg(long)]
        backwards: bool,
        /// Skip candidates on the cursor line; applies to the same-kind
        /// operations.
        #[arg(long)]
        different_line: bool,
    },
    /// List nodes of a symbol kind and the entry the cursor selects.
    Pick {
        /// Symbol kind to collect, e.g. `function` or `class`.
        symbol: String,
        /// Source file to parse.
        file: PathBuf,
        /// Cursor position.
        #[command(flatten)]
        cursor: CursorArgs,
    },
}

/// Cursor position flags shared by the cursor-based subcommands.
#[derive(Debug, Args)]
pub(crate) struct CursorArgs {
    /// One-based cursor line.
    #[arg(long)]
    pub(crate) line: usize,
    /// One-based cursor column.
    #[arg(long, default_value_t = 1)]
    pub(crate) col: usize,
}

impl CursorArgs {
    /// Converts the one-based flags to the engine's zero-based point.
    pub(crate) const fn point(&self) -> Point {
        Point::new(self.line.saturating_sub(1), self.col.saturating_sub(1))
    }
}

/// Navigation operations exposed by `arbor nav`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Operation {
    /// Nearest navigable ancestor.
    Parent,
    /// First navigable node in the subtree below the cursor.
    Child,
    /// Next navigable sibling.
    NextSibling,
    /// Previous navigable sibling.
    PrevSibling,
    /// Forward composite scan: sibling, descent, then ancestor ascent.
    Following,
    /// Backward composite scan: sibling, then ancestor ascent.
    Preceding,
    /// Next node in pre-order.
    Next,
    /// Previous node in pre-order.
    Prev,
    /// Next node in level-order.
    NextLevel,
    /// Previous node in level-order.
    PrevLevel,
    /// Next node of the cursor node's kind.
    NextSameKind,
    /// Previous node of the cursor node's kind.
    PrevSameKind,
    /// Nearest node of the kind given with `--kind`.
    GotoKind,
}

/// Output rendering for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Single-line human-readable text.
    #[default]
    Human,
    /// Machine-readable JSON on stdout.
    Json,
}
