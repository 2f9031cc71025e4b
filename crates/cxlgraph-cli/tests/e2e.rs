//! E2E tests for the `cxg` binary.
//!
//! Covers: JSON schema of every subcommand, config loading, flag overrides
//! and failure exits for missing or malformed input.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

/// sun → sea → cloud → rain → river → sea.
const WATER_CYCLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cmap xmlns="http://cmap.ihmc.us/xml/cmap/">
  <res-meta/>
  <map>
    <concept-list>
      <concept id="sun" label="Sun"/>
      <concept id="sea" label="Sea"/>
      <concept id="cloud" label="Clouds"/>
      <concept id="rain" label="Rain"/>
      <concept id="river" label="River"/>
    </concept-list>
    <linking-phrase-list>
      <linking-phrase id="p1" label="heats"/>
      <linking-phrase id="p2" label="forms"/>
      <linking-phrase id="p3" label="produce"/>
      <linking-phrase id="p4" label="feeds"/>
      <linking-phrase id="p5" label="flows into"/>
    </linking-phrase-list>
    <connection-list>
      <connection id="l1" from-id="sun" to-id="p1"/>
      <connection id="l2" from-id="p1" to-id="sea"/>
      <connection id="l3" from-id="sea" to-id="p2"/>
      <connection id="l4" from-id="p2" to-id="cloud"/>
      <connection id="l5" from-id="cloud" to-id="p3"/>
      <connection id="l6" from-id="p3" to-id="rain"/>
      <connection id="l7" from-id="rain" to-id="p4"/>
      <connection id="l8" from-id="p4" to-id="river"/>
      <connection id="l9" from-id="river" to-id="p5"/>
      <connection id="l10" from-id="p5" to-id="sea"/>
    </connection-list>
  </map>
</cmap>"#;

fn cxg_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cxg"));
    cmd.current_dir(dir);
    cmd.env("CXG_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd
}

fn write_map(dir: &Path, name: &str, xml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, xml).expect("write map");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = cxg_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("cxg should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// cxg stats
// ---------------------------------------------------------------------------

#[test]
fn stats_json_has_expected_fields() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["stats", "water.cxl"]);
    assert_eq!(json["name"], "water");
    assert_eq!(json["summary"], "water: 5 nodes with 5 connections between them");
    assert_eq!(json["concepts"], 5);
    assert_eq!(json["linking_phrases"], 5);
    assert_eq!(json["raw_links"], 10);
    assert_eq!(json["connections"], 5);
    assert_eq!(json["mode"], "directed");
    assert_eq!(json["node_count"], 5);
    assert_eq!(json["edge_count"], 5);
    assert!((json["density"].as_f64().unwrap() - 0.25).abs() < 1e-12);
    assert!(json["fingerprint"].as_str().unwrap().starts_with("blake3:"));
    assert!(json["community_count"].as_u64().unwrap() >= 1);
}

#[test]
fn stats_human_output_names_the_map() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    cxg_cmd(dir.path())
        .args(["stats", "water.cxl", "--name", "Water cycle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water cycle: 5 nodes with 5 connections"))
        .stdout(predicate::str::contains("density:"));
}

#[test]
fn stats_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    cxg_cmd(dir.path())
        .args(["stats", "nope.cxl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]: failed to import nope.cxl"))
        .stderr(predicate::str::contains("hint: Check the path and read permissions."));
}

#[test]
fn stats_missing_file_json_error() {
    let dir = TempDir::new().unwrap();
    let output = cxg_cmd(dir.path())
        .args(["stats", "nope.cxl", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let value: Value = serde_json::from_slice(&output.stderr).expect("json error on stderr");
    assert_eq!(value["error"]["error_code"], "E1002");
}

#[test]
fn missing_config_file_names_the_config() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);
    cxg_cmd(dir.path())
        .args(["--config", "absent.toml", "stats", "water.cxl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1004]"))
        .stderr(predicate::str::contains("config file not found or unreadable: absent.toml"))
        .stderr(predicate::str::contains("concept map").not());
}

#[test]
fn stats_malformed_file_fails() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "broken.cxl", "<cmap><res-meta/></cmap>");
    cxg_cmd(dir.path())
        .args(["stats", "broken.cxl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed concept map"));
}

// ---------------------------------------------------------------------------
// cxg centers
// ---------------------------------------------------------------------------

#[test]
fn centers_reports_each_measure_when_they_disagree() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["centers", "water.cxl"]);
    let multi = &json["centers"]["multi"];
    assert_eq!(multi["barycenter"]["set"], serde_json::json!(["sea"]));
    assert_eq!(multi["center"]["set"], serde_json::json!(["cloud", "river", "sea"]));
    assert!(multi["pagerank"]["scores"].is_object());
    assert_eq!(json["labels"]["cloud"], "Clouds");
}

#[test]
fn centers_single_measure() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["centers", "water.cxl", "--measures", "barycenter"]);
    assert_eq!(json["measures"], serde_json::json!(["barycenter"]));
    assert_eq!(json["centers"]["single"]["set"], serde_json::json!(["sea"]));
}

#[test]
fn centers_default_on_disconnected_map_skips_distance_measures() {
    let dir = TempDir::new().unwrap();
    let islands = r#"<cmap><res-meta/><map>
<concept-list>
  <concept id="a" label="A"/><concept id="b" label="B"/>
  <concept id="c" label="C"/><concept id="d" label="D"/>
</concept-list>
<linking-phrase-list>
  <linking-phrase id="p" label="is"/><linking-phrase id="q" label="has"/>
</linking-phrase-list>
<connection-list>
  <connection id="1" from-id="a" to-id="p"/><connection id="2" from-id="p" to-id="b"/>
  <connection id="3" from-id="c" to-id="q"/><connection id="4" from-id="q" to-id="d"/>
</connection-list>
</map></cmap>"#;
    write_map(dir.path(), "islands.cxl", islands);

    let json = run_json(dir.path(), &["centers", "islands.cxl"]);
    assert_eq!(json["measures"], serde_json::json!(["eigenvector", "pagerank"]));
    assert!(json["centers"]["multi"]["pagerank"]["scores"].is_object());

    cxg_cmd(dir.path())
        .args(["centers", "islands.cxl", "--measures", "center"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

// ---------------------------------------------------------------------------
// cxg links
// ---------------------------------------------------------------------------

#[test]
fn links_counts_cross_links_by_default() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["links", "water.cxl", "--root", "sun"]);
    assert_eq!(json["root"], "sun");
    assert_eq!(json["kinds"], serde_json::json!(["cross"]));
    assert_eq!(json["count"], 1);
    assert!(json.get("events").is_none());
}

#[test]
fn links_with_events_lists_the_search() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(
        dir.path(),
        &["links", "water.cxl", "--root", "sun", "--kind", "tree,reverse", "--events"],
    );
    assert_eq!(json["count"], 10);
    let events = json["events"].as_array().unwrap();
    assert_eq!(events.len(), 11);
    assert_eq!(events[0], serde_json::json!({"from": "sun", "to": "sun", "kind": "forward"}));
}

#[test]
fn links_depth_limit_from_config() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);
    std::fs::write(dir.path().join("cxg.toml"), "[traversal]\ndepth_limit = 1\n").unwrap();

    let json = run_json(
        dir.path(),
        &["--config", "cxg.toml", "links", "water.cxl", "--root", "sun", "--kind", "tree"],
    );
    // The root and its one child; the child is not expanded.
    assert_eq!(json["count"], 2);
}

#[test]
fn links_unknown_root_fails() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    cxg_cmd(dir.path())
        .args(["links", "water.cxl", "--root", "moon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("moon"));
}

// ---------------------------------------------------------------------------
// cxg leaves / nearness / communities / render
// ---------------------------------------------------------------------------

#[test]
fn leaves_json() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["leaves", "water.cxl"]);
    assert_eq!(json["no_incoming"], serde_json::json!(["sun"]));
    assert_eq!(json["no_outgoing"], serde_json::json!([]));
    assert_eq!(json["removed"], serde_json::json!([]));
}

#[test]
fn nearness_directed_marks_unreachable_pairs() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["nearness", "water.cxl", "--directed"]);
    assert_eq!(json["directed"], true);
    let ids: Vec<&str> = json["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let sun = ids.iter().position(|&id| id == "sun").unwrap();
    let sea = ids.iter().position(|&id| id == "sea").unwrap();

    assert_eq!(json["values"][sun][sea], 1.0);
    assert_eq!(json["values"][sea][sun], 0.0);
    assert!(json["values"][sun][sun].is_null());
}

#[test]
fn communities_cover_every_concept() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["communities", "water.cxl", "--seed", "7"]);
    let members: usize = json["communities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_array().unwrap().len())
        .sum();
    assert_eq!(members, 5);
}

#[test]
fn render_with_colors() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    let json = run_json(dir.path(), &["render", "water.cxl", "--colors"]);
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(json["edges"].as_array().unwrap().len(), 5);

    let max = nodes
        .iter()
        .map(|n| n["color"].as_f64().unwrap())
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((max - 1.0).abs() < 1e-12);
}

#[test]
fn fuzzy_flag_rejects_word_labels() {
    let dir = TempDir::new().unwrap();
    write_map(dir.path(), "water.cxl", WATER_CYCLE);

    cxg_cmd(dir.path())
        .args(["stats", "water.cxl", "--fuzzy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a numeric weight"));
}
