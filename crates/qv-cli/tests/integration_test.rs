//! Integration tests for the quiver pipeline.
//!
//! The first group drives the libraries end to end; the second runs the
//! `qv-cli` binary the way a user would.

use std::io::Write;
use std::process::{Command, Output};

use qv_core::{CompileOptions, RenderConfig, SelfLoopPolicy};
use qv_export::{ExportFormat, export};
use qv_parser::{compile, compile_traced, compile_with_options};
use qv_render::{RenderTarget, render};

const SESSION: &str = "Home > Work\n> Gym\n^ Cafe\n\nnot an edge\nGym > Gym\nHome > Work\n";

fn qv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qv-cli"))
        .args(args)
        .output()
        .expect("qv-cli should launch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn temp_file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(body.as_bytes()).expect("write temp file");
    file
}

// =============================================================================
// Library pipeline
// =============================================================================

#[test]
fn session_compiles_to_ordered_edges() {
    let edges = compile(SESSION);
    assert_eq!(
        edges.pairs(),
        vec![
            ("Home", "Work"),
            ("Work", "Gym"),
            ("Work", "Cafe"),
            ("Gym", "Gym"),
        ]
    );
}

#[test]
fn traced_report_explains_every_line() {
    let report = compile_traced(SESSION, &CompileOptions::default());
    assert_eq!(report.lines.len(), 7);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.duplicate_count(), 1);
    assert_eq!(report.skipped().next().map(|(line, _)| line), Some(5));
}

#[test]
fn removing_self_loops_only_drops_the_loop() {
    let options = CompileOptions::default().with_self_loops(SelfLoopPolicy::Remove);
    let edges = compile_with_options(SESSION, &options);
    assert_eq!(edges.len(), 3);
    assert_eq!(edges.self_loop_count(), 0);
}

#[test]
fn every_export_format_mentions_every_node() {
    let edges = compile(SESSION);
    for format in ExportFormat::ALL {
        let text = export(&edges, format);
        for node in edges.nodes() {
            assert!(
                text.contains(node.as_str()),
                "{format} export is missing {node}"
            );
        }
    }
}

#[test]
fn rendered_documents_share_topology() {
    let edges = compile(SESSION);
    let vis = render(&edges, &RenderConfig::default(), RenderTarget::VisNetwork)
        .expect("vis renders");
    let value: serde_json::Value = serde_json::from_str(&vis).expect("vis output is JSON");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(4));

    let dot = render(&edges, &RenderConfig::default(), RenderTarget::Dot).expect("dot renders");
    assert_eq!(dot.matches(" -> ").count(), 4);
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn cli_compile_prints_edge_json() {
    let output = qv(&["compile", "A > B\n> C"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON output");
    assert_eq!(
        value,
        serde_json::json!([{ "from": "A", "to": "B" }, { "from": "B", "to": "C" }])
    );
}

#[test]
fn cli_compile_summary_counts_lines() {
    let input = temp_file(".txt", SESSION);
    let path = input.path().to_str().expect("utf-8 temp path");
    let output = qv(&["compile", path, "--summary", "--self-loops", "remove"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON output");
    assert_eq!(value["edge_count"], 3);
    assert_eq!(value["skipped_count"], 1);
}

#[test]
fn cli_export_writes_csv_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = dir.path().join("edges.csv");
    let target_str = target.to_str().expect("utf-8 temp path");
    let output = qv(&["export", "A > B\n^ C", "-f", "csv", "-o", target_str]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(&target).expect("export file written");
    assert_eq!(written, "\"from\",\"to\"\n\"A\",\"B\"\n\"A\",\"C\"\n");
}

#[test]
fn cli_render_applies_config_file_then_flags() {
    let config = temp_file(".toml", "node_shape = \"diamond\"\nline_style = \"dashed\"\n");
    let config_path = config.path().to_str().expect("utf-8 temp path");
    let output = qv(&[
        "render",
        "A > B",
        "-t",
        "dot",
        "-c",
        config_path,
        "--line-style",
        "dotted",
    ]);
    assert!(output.status.success());
    let dot = stdout(&output);
    assert!(dot.contains("shape=diamond"));
    assert!(dot.contains("style=dotted"));
}

#[test]
fn cli_render_reads_yaml_config() {
    let config = temp_file(".yaml", "node_size: 42\n");
    let config_path = config.path().to_str().expect("utf-8 temp path");
    let output = qv(&["render", "A > B", "-c", config_path]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON output");
    assert_eq!(value["nodes"][0]["size"], 42.0);
}

#[test]
fn cli_render_rejects_out_of_range_config() {
    let config = temp_file(".json", r#"{ "node_size": 5000 }"#);
    let config_path = config.path().to_str().expect("utf-8 temp path");
    let output = qv(&["render", "A > B", "-c", config_path]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("node_size"), "stderr was: {stderr}");
}

#[test]
fn cli_check_is_lenient_unless_strict() {
    let lenient = qv(&["check", "A > B\nnonsense"]);
    assert!(lenient.status.success());
    assert!(stdout(&lenient).contains("line 2: skipped"));

    let strict = qv(&["check", "A > B\nnonsense", "--strict"]);
    assert!(!strict.status.success());

    let clean = qv(&["check", "A > B\n\n> C", "--strict"]);
    assert!(clean.status.success());
}

#[test]
fn cli_check_json_lists_line_outcomes() {
    let output = qv(&["check", "A > B\nA > B", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON output");
    assert_eq!(value["valid"], true);
    assert_eq!(value["duplicate_count"], 1);
    assert_eq!(value["lines"][1]["outcome"]["kind"], "duplicate");
}
