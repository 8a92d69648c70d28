//! Integration tests for the one-shot subcommands.
//!
//! Each test copies the small Trondheim fixture network into a temporary
//! data directory and drives the `altroute` binary against it.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/small")
}

/// Temporary data directory seeded with the fixture files.
struct TestEnv {
    temp_dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        for name in ["nodes.txt", "edges.txt", "pois.txt"] {
            fs::copy(fixtures_dir().join(name), temp_dir.path().join(name)).expect("copy fixture");
        }
        Self { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("altroute");
        cmd.env("RUST_LOG", "error")
            .env_remove("ALTROUTE_DATA_DIR")
            .arg("--data-dir")
            .arg(self.path());
        cmd
    }

    fn preprocess(&self) {
        self.cmd().args(["pre", "0", "8"]).assert().success();
    }
}

#[test]
fn dijkstra_prints_route_summary() {
    let env = TestEnv::new();
    env.cmd()
        .args(["dijkstra", "--pois", "pois.txt", "0", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Route from 0 to Trondheim S (9) (8 hops; algorithm: dijkstra):",
        ))
        .stdout(predicate::str::contains(
            "Path: 0 -> 1 -> 2 -> 5 -> 3 -> 6 -> 7 -> 8 -> 9",
        ))
        .stdout(predicate::str::contains("Travel time: 0:00:19 (cost 1920)"))
        .stdout(predicate::str::contains("Completed in"));
}

#[test]
fn djik_alias_writes_path_csv() {
    let env = TestEnv::new();
    env.cmd()
        .args(["djik", "--out", "trip.csv", "0", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path written to"));

    let csv = fs::read_to_string(env.path().join("trip.csv")).expect("csv written");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "nr,node,latitude,longitude");
    assert_eq!(lines[1], "1,0,63.4305149,10.3950528");
    assert_eq!(lines.len(), 6);
    assert!(lines[5].starts_with("5,3,"));
}

#[test]
fn pre_writes_cache_and_alt_uses_it() {
    let env = TestEnv::new();
    env.cmd()
        .args(["pre", "0", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preprocessed 2 landmarks (0, 8)"));

    let cache = fs::read(env.path().join("landmarks.bin")).expect("cache written");
    assert_eq!(cache.len(), 4 * (1 + 2 + 2 * 10 * 2));

    env.cmd()
        .args(["alt", "0", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("algorithm: alt"))
        .stdout(predicate::str::contains("(cost 1920)"));
}

#[test]
fn alt_without_cache_fails_naming_the_file() {
    let env = TestEnv::new();
    env.cmd()
        .args(["alt", "0", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("landmarks.bin"));
}

#[test]
fn pre_requires_landmarks() {
    let env = TestEnv::new();
    env.cmd().arg("pre").assert().failure();
}

#[test]
fn fuel_lists_nearest_station() {
    let env = TestEnv::new();
    env.cmd()
        .args(["fuel", "--count", "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nearest fuel stations from 0 (1 of 1 requested):",
        ))
        .stdout(predicate::str::contains("1. Circle K Moholt (5)  0:00:06"))
        .stdout(predicate::str::contains("Esso").not());
}

#[test]
fn fewer_stations_than_requested_is_not_an_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["fuel", "--out", "fuel.csv", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 of 10 requested)"));

    let csv = fs::read_to_string(env.path().join("fuel.csv")).expect("csv written");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "mode,node,latitude,longitude");
    assert_eq!(lines[1], "2,5,63.42014320,10.40688200");
    assert!(lines[2].starts_with("2,7,"));
}

#[test]
fn charger_json_output() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args(["--format", "json", "charger", "0"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["kind"], "charger");
    assert_eq!(value["stations"][0]["node"], 4);
    assert_eq!(value["stations"][0]["distance"], 600);
    assert_eq!(value["stations"][0]["name"], "Tesla Supercharger Sluppen");
}

#[test]
fn route_json_output() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args(["dijkstra", "0", "3", "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["cost"], 770);
    assert_eq!(value["path"], serde_json::json!([0, 1, 2, 5, 3]));
    assert_eq!(value["found"], true);
}

#[test]
fn unreachable_destination_is_reported() {
    let env = TestEnv::new();
    fs::write(env.path().join("island.txt"), "3\n0 1.0 1.0\n1 1.0 2.0\n2 2.0 2.0\n")
        .expect("write nodes");
    fs::write(env.path().join("bridge.txt"), "1\n0 1 10 10 50\n").expect("write edges");

    env.cmd()
        .args([
            "dijkstra",
            "--nodes",
            "island.txt",
            "--edges",
            "bridge.txt",
            "1",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No route found from 1 to 2"));
}

#[test]
fn unknown_node_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["dijkstra", "0", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown node 42"));
}

#[test]
fn missing_input_names_the_path() {
    let env = TestEnv::new();
    env.cmd()
        .args(["dijkstra", "--nodes", "absent.txt", "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn malformed_edge_file_reports_line() {
    let env = TestEnv::new();
    fs::write(env.path().join("edges.txt"), "2\n0 1 10 5 50\n1 x 10 5 50\n").expect("write edges");

    env.cmd()
        .args(["dijkstra", "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("edges.txt:3"));
}

#[test]
fn data_dir_falls_back_to_environment() {
    let env = TestEnv::new();
    let mut cmd = cargo_bin_cmd!("altroute");
    cmd.env("RUST_LOG", "error")
        .env("ALTROUTE_DATA_DIR", env.path())
        .args(["dijkstra", "0", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(cost 600)"));
}

#[test]
fn alt_matches_dijkstra_on_sample_pairs() {
    let env = TestEnv::new();
    env.preprocess();

    for (from, to, cost) in [("9", "5", 670), ("3", "0", 770), ("8", "4", 750)] {
        for algorithm in ["dijkstra", "alt"] {
            env.cmd()
                .args([algorithm, from, to])
                .assert()
                .success()
                .stdout(predicate::str::contains(format!("(cost {cost})")));
        }
    }
}
