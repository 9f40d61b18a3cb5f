//! Command-line runtime for the Arbor structural navigation engine.
//!
//! Owns argument parsing, navigation rule loading, parsing of the target
//! file, and rendering of outcomes as human-readable lines or JSON. The
//! runtime is exercised both from the binary entrypoint and from
//! integration tests, so [`run`] takes its IO streams as arguments.
//!
//! Absence of a navigation target is an ordinary outcome, not an error:
//! the reason is reported and the exit code stays successful. Only
//! misconfiguration (unreadable files, unknown languages, unknown kinds)
//! fails the process.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use clap::error::ErrorKind;
use serde::Serialize;

use arbor_nav::{
    Direction, LineFilter, NavRules, NavSession, NodeHandle, RulesFile, Span, SupportedLanguage,
    SyntaxNode, Traversal,
};
use arbor_syntax::{ParseResult, Parser};

mod cli;
mod errors;
pub mod telemetry;

use cli::{Cli, Command, CursorArgs, Operation, OutputFormat};
use errors::AppError;

/// Exit code for command-line usage errors, matching clap's convention.
const USAGE_EXIT: u8 = 2;

/// Runs the CLI with the provided arguments and IO streams.
///
/// Returns success when the command completed (including "nothing to move
/// to" outcomes), [`USAGE_EXIT`] for argument errors, and failure for
/// runtime errors such as unreadable files or unknown node kinds.
pub fn run<I, T, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return render_usage_error(&error, stdout, stderr),
    };

    if let Err(error) = telemetry::initialise(cli.log_filter.as_deref()) {
        let _ = writeln!(stderr, "arbor: {error}");
        return ExitCode::FAILURE;
    }

    match execute(&cli, stdout) {
        Ok(code) => code,
        Err(error) => {
            let _ = writeln!(stderr, "arbor: {error}");
            ExitCode::FAILURE
        }
    }
}

fn render_usage_error<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        let _ = write!(stdout, "{rendered}");
        return ExitCode::SUCCESS;
    }
    let _ = write!(stderr, "{rendered}");
    ExitCode::from(USAGE_EXIT)
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<ExitCode, AppError> {
    let rules = load_rules(cli.rules.as_deref())?;
    match &cli.command {
        Command::Check { file } => check(file, cli.output, stdout),
        Command::Resolve { file, cursor } => {
            resolve_cursor(file, cursor, &rules, cli.output, stdout)
        }
        Command::Nav {
            operation,
            file,
            cursor,
            kind,
            backwards,
            different_line,
        } => {
            let invocation = NavInvocation {
                operation: *operation,
                kind: kind.as_deref(),
                backwards: *backwards,
                different_line: *different_line,
            };
            navigate(&invocation, file, cursor, &rules, cli.output, stdout)
        }
        Command::Pick {
            symbol,
            file,
            cursor,
        } => pick(symbol, file, cursor, &rules, cli.output, stdout),
    }
}

/// Flags bundled for a single `arbor nav` invocation.
struct NavInvocation<'a> {
    operation: Operation,
    kind: Option<&'a str>,
    backwards: bool,
    different_line: bool,
}

impl NavInvocation<'_> {
    const fn direction(&self) -> Direction {
        if self.backwards {
            Direction::Previous
        } else {
            Direction::Next
        }
    }

    const fn line_filter(&self) -> LineFilter {
        if self.different_line {
            LineFilter::DifferentLine
        } else {
            LineFilter::AnyLine
        }
    }
}

/// Loads navigation rules from `path`, or the built-in defaults.
fn load_rules(path: Option<&Path>) -> Result<NavRules, AppError> {
    let Some(path) = path else {
        return Ok(default_rules());
    };
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadRules {
        path: path.to_owned(),
        source,
    })?;
    let file: RulesFile = serde_json::from_str(&text).map_err(|source| AppError::ParseRules {
        path: path.to_owned(),
        source,
    })?;
    Ok(file.into_rules()?)
}

/// Built-in navigable kinds used when no rules file is given.
///
/// Covers definitions and the common control-flow constructs of each
/// supported grammar; a rules file replaces this set entirely.
fn default_rules() -> NavRules {
    NavRules::new(Vec::<String>::new())
        .with_language(
            SupportedLanguage::Rust,
            [
                "function_item",
                "struct_item",
                "enum_item",
                "trait_item",
                "impl_item",
                "mod_item",
                "if_expression",
                "match_expression",
                "loop_expression",
                "while_expression",
                "for_expression",
                "closure_expression",
                "let_declaration",
                "return_expression",
            ],
        )
        .with_language(
            SupportedLanguage::Python,
            [
                "function_definition",
                "class_definition",
                "if_statement",
                "for_statement",
                "while_statement",
                "with_statement",
                "try_statement",
                "return_statement",
            ],
        )
        .with_language(
            SupportedLanguage::TypeScript,
            [
                "function_declaration",
                "class_declaration",
                "method_definition",
                "arrow_function",
                "interface_declaration",
                "if_statement",
                "for_statement",
                "while_statement",
                "return_statement",
            ],
        )
}

fn parse_file(path: &Path) -> Result<ParseResult, AppError> {
    let language =
        SupportedLanguage::from_path(path).ok_or_else(|| AppError::UnknownLanguage {
            path: path.to_owned(),
        })?;
    let source = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    let mut parser = Parser::new(language)?;
    Ok(parser.parse(&source)?)
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    language: &'static str,
    errors: Vec<CheckDiagnostic>,
}

#[derive(Serialize)]
struct CheckDiagnostic {
    line: usize,
    col: usize,
    message: String,
    context: String,
}

fn check<W: Write>(
    path: &Path,
    output: OutputFormat,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let parsed = parse_file(path)?;
    let errors = parsed.errors();

    match output {
        OutputFormat::Human => {
            if errors.is_empty() {
                writeln!(stdout, "{}: no syntax errors", path.display())?;
            } else {
                for error in &errors {
                    writeln!(
                        stdout,
                        "{}:{} {} ({})",
                        path.display(),
                        error.position,
                        error.message,
                        error.context
                    )?;
                }
            }
        }
        OutputFormat::Json => {
            let report = CheckReport {
                file: path.display().to_string(),
                language: parsed.language().as_str(),
                errors: errors
                    .iter()
                    .map(|error| {
                        let (line, col) = error.position.one_based();
                        CheckDiagnostic {
                            line,
                            col,
                            message: error.message.clone(),
                            context: error.context.clone(),
                        }
                    })
                    .collect(),
            };
            let line = serde_json::to_string(&report)?;
            writeln!(stdout, "{line}")?;
        }
    }

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn resolve_cursor<W: Write>(
    path: &Path,
    cursor: &CursorArgs,
    rules: &NavRules,
    output: OutputFormat,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let parsed = parse_file(path)?;
    let mut session = NavSession::new(parsed.language(), rules.clone());

    let (target, reason) = match session.resolve_cursor_node(&parsed.root_node(), cursor.point()) {
        Some(node) => {
            let handle = node.handle();
            let reason = format!("cursor is on {handle}");
            (Some(handle), reason)
        }
        None => (None, "no node at cursor position".to_owned()),
    };
    emit(target.as_ref(), &reason, output, stdout)
}

fn navigate<W: Write>(
    invocation: &NavInvocation<'_>,
    path: &Path,
    cursor: &CursorArgs,
    rules: &NavRules,
    output: OutputFormat,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let parsed = parse_file(path)?;
    let mut session = NavSession::new(parsed.language(), rules.clone());
    let root = parsed.root_node();
    let point = cursor.point();

    let outcome = match invocation.operation {
        Operation::Parent => session.parent(&root, point),
        Operation::Child => session.child(&root, point),
        Operation::NextSibling => session.next_sibling(&root, point),
        Operation::PrevSibling => session.prev_sibling(&root, point),
        Operation::Following => session.following(&root, point),
        Operation::Preceding => session.preceding(&root, point),
        Operation::Next => session.step(&root, point, Direction::Next, Traversal::PreOrder),
        Operation::Prev => session.step(&root, point, Direction::Previous, Traversal::PreOrder),
        Operation::NextLevel => session.step(&root, point, Direction::Next, Traversal::LevelOrder),
        Operation::PrevLevel => {
            session.step(&root, point, Direction::Previous, Traversal::LevelOrder)
        }
        Operation::NextSameKind => {
            session.same_kind_step(&root, point, Direction::Next, invocation.line_filter())
        }
        Operation::PrevSameKind => {
            session.same_kind_step(&root, point, Direction::Previous, invocation.line_filter())
        }
        Operation::GotoKind => {
            let kind = invocation.kind.ok_or(AppError::MissingKind)?;
            session.goto_kind(&root, point, invocation.direction(), kind)?
        }
    };

    let target = outcome.target.map(|node| node.handle());
    emit(target.as_ref(), &outcome.reason, output, stdout)
}

#[derive(Serialize)]
struct PickReport<'a> {
    reason: &'a str,
    current: Option<&'a NodeHandle>,
    spans: &'a [Span],
}

fn pick<W: Write>(
    symbol: &str,
    path: &Path,
    cursor: &CursorArgs,
    rules: &NavRules,
    output: OutputFormat,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let parsed = parse_file(path)?;
    let mut session = NavSession::new(parsed.language(), rules.clone());
    session.register_symbol_picker(symbol, symbol)?;

    let root = parsed.root_node();
    let outcome = session.activate_picker(symbol, &root, cursor.point())?;
    let spans: Vec<Span> = session
        .sticky_highlight(0)
        .map(|request| request.spans)
        .unwrap_or_default();
    let current = session.current_target().cloned();

    match output {
        OutputFormat::Human => {
            writeln!(stdout, "{}", outcome.reason)?;
            for span in &spans {
                let marker = if current.as_ref().is_some_and(|h| h.span == *span) {
                    '>'
                } else {
                    ' '
                };
                writeln!(stdout, "{marker} {}", span.start)?;
            }
        }
        OutputFormat::Json => {
            let report = PickReport {
                reason: &outcome.reason,
                current: current.as_ref(),
                spans: &spans,
            };
            let line = serde_json::to_string(&report)?;
            writeln!(stdout, "{line}")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct NavReport<'a> {
    target: Option<&'a NodeHandle>,
    reason: &'a str,
}

/// Renders a navigation outcome on stdout.
///
/// Human output puts the one-based target position first so editors can
/// jump straight to it; JSON output carries the full handle.
fn emit<W: Write>(
    target: Option<&NodeHandle>,
    reason: &str,
    output: OutputFormat,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    match output {
        OutputFormat::Human => match target {
            Some(handle) => writeln!(stdout, "{} {}", handle.span.start, handle.kind)?,
            None => writeln!(stdout, "{reason}")?,
        },
        OutputFormat::Json => {
            let line = serde_json::to_string(&NavReport { target, reason })?;
            writeln!(stdout, "{line}")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
