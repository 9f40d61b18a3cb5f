//! Integration tests for the `arbor` binary.
//!
//! Each test writes a fixture source file to a temporary directory and
//! drives the binary end to end, asserting on exit status and output.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

const RUST_SOURCE: &str = "fn alpha() {\n    if true {\n        return;\n    }\n}\n\nfn beta() {}\n";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_reports_a_clean_file() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command.arg("check").arg(&file);
    command
        .assert()
        .success()
        .stdout(contains("no syntax errors"));
    Ok(())
}

#[test]
fn check_fails_on_a_broken_file() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "broken.rs", "fn broken() {\n")?;

    let mut command = cargo_bin_cmd!("arbor");
    command.arg("check").arg(&file);
    command.assert().failure().stdout(contains("broken.rs:"));
    Ok(())
}

// =============================================================================
// resolve and nav
// =============================================================================

#[test]
fn resolve_outside_the_tree_reports_absence() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command.arg("resolve").arg(&file).args(["--line", "99"]);
    command
        .assert()
        .success()
        .stdout(contains("no node at cursor position"));
    Ok(())
}

#[test]
fn nav_parent_moves_to_the_enclosing_if() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("nav")
        .arg("parent")
        .arg(&file)
        .args(["--line", "3", "--col", "9"]);
    command
        .assert()
        .success()
        .stdout(contains("if_expression"));
    Ok(())
}

#[test]
fn nav_json_output_carries_target_and_reason() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("nav")
        .arg("next-same-kind")
        .arg(&file)
        .args(["--line", "1", "--col", "1", "--output", "json"]);
    command
        .assert()
        .success()
        .stdout(contains("\"reason\""))
        .stdout(contains("function_item"));
    Ok(())
}

#[test]
fn goto_kind_requires_the_kind_flag() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("nav")
        .arg("goto-kind")
        .arg(&file)
        .args(["--line", "1"]);
    command
        .assert()
        .failure()
        .stderr(contains("requires --kind"));
    Ok(())
}

#[test]
fn rules_file_replaces_the_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;
    let rules = write_fixture(
        &dir,
        "rules.json",
        r#"{"global": [], "languages": {"rust": ["function_item"]}}"#,
    )?;

    // With only `function_item` navigable, the parent of the `return`
    // statement is the enclosing function, not the `if`.
    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("nav")
        .arg("parent")
        .arg(&file)
        .args(["--line", "3", "--col", "9"])
        .arg("--rules")
        .arg(&rules);
    command
        .assert()
        .success()
        .stdout(contains("function_item"));
    Ok(())
}

// =============================================================================
// pick
// =============================================================================

#[test]
fn pick_lists_functions() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("pick")
        .arg("function")
        .arg(&file)
        .args(["--line", "1"]);
    command
        .assert()
        .success()
        .stdout(contains("activated layer 'function' with 2 node(s)"));
    Ok(())
}

#[test]
fn pick_unknown_symbol_kind_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "clean.rs", RUST_SOURCE)?;

    let mut command = cargo_bin_cmd!("arbor");
    command
        .arg("pick")
        .arg("gadget")
        .arg(&file)
        .args(["--line", "1"]);
    command
        .assert()
        .failure()
        .stderr(contains("unknown symbol kind"));
    Ok(())
}

// =============================================================================
// usage errors
// =============================================================================

#[test]
fn unknown_extension_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_fixture(&dir, "notes.txt", "hello")?;

    let mut command = cargo_bin_cmd!("arbor");
    command.arg("check").arg(&file);
    command
        .assert()
        .failure()
        .stderr(contains("cannot detect a supported language"));
    Ok(())
}

#[test]
fn missing_subcommand_prints_usage() {
    let mut command = cargo_bin_cmd!("arbor");
    command.assert().failure().stderr(contains("Usage"));
}
