//! Integration tests for the interactive `route` command.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/small")
}

fn prepare_command() -> (Command, TempDir) {
    let temp_dir = tempdir().expect("create temp dir");
    for name in ["nodes.txt", "edges.txt", "pois.txt"] {
        fs::copy(fixtures_dir().join(name), temp_dir.path().join(name)).expect("copy fixture");
    }
    let mut cmd = cargo_bin_cmd!("altroute");
    cmd.env("RUST_LOG", "error")
        .arg("--data-dir")
        .arg(temp_dir.path());
    (cmd, temp_dir)
}

#[test]
fn session_answers_queries_until_quit() {
    let (mut pre, temp) = prepare_command();
    pre.args(["pre", "0", "8"]).assert().success();

    let mut cmd = cargo_bin_cmd!("altroute");
    cmd.env("RUST_LOG", "error")
        .arg("--data-dir")
        .arg(temp.path())
        .arg("route")
        .write_stdin("djik 0 9\nalt 9 5 leg.csv\nfuel 0 1\nquit\ncharger 0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("with landmark tables"))
        .stdout(predicate::str::contains("(cost 1920)"))
        .stdout(predicate::str::contains("algorithm: alt"))
        .stdout(predicate::str::contains("(cost 670)"))
        .stdout(predicate::str::contains("Circle K Moholt (5)"))
        .stdout(predicate::str::contains("Tesla").not());

    let csv = fs::read_to_string(temp.path().join("leg.csv")).expect("csv written");
    assert!(csv.starts_with("nr,node,latitude,longitude\n1,9,"));
}

#[test]
fn unknown_commands_get_suggestions() {
    let (mut cmd, _temp) = prepare_command();
    cmd.arg("route")
        .write_stdin("fule 0\nhelp\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "unknown command 'fule'. Did you mean 'fuel'?",
        ))
        .stdout(predicate::str::contains("fuel|charger <node> [count] [file]"));
}

#[test]
fn alt_without_cache_reports_and_continues() {
    let (mut cmd, _temp) = prepare_command();
    cmd.arg("route")
        .write_stdin("alt 0 9\ndjik 0 4\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("landmark tables are not loaded"))
        .stdout(predicate::str::contains("(cost 600)"));
}

#[test]
fn explicit_missing_cache_is_fatal() {
    let (mut cmd, _temp) = prepare_command();
    cmd.args(["route", "--cache", "nope.bin"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.bin"));
}
