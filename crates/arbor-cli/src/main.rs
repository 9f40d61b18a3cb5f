//! CLI entrypoint for the Arbor structural navigation tool.
//!
//! The binary delegates to [`arbor_cli::run`], which parses arguments,
//! loads navigation rules, parses the target file, and renders outcomes.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    arbor_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
