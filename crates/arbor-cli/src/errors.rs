//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use arbor_nav::NavError;
use arbor_syntax::SyntaxError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to read {path:?}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("failed to read rules file {path:?}: {source}")]
    ReadRules { path: PathBuf, source: io::Error },
    #[error("failed to parse rules file {path:?}: {source}")]
    ParseRules {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot detect a supported language for {path:?}")]
    UnknownLanguage { path: PathBuf },
    #[error("the goto-kind operation requires --kind")]
    MissingKind,
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
}
