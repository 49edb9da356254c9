use std::fs;
use std::process::Command;

use serde_json::Value;

fn network3d() -> Command {
    Command::new(env!("CARGO_BIN_EXE_network3d"))
}

#[test]
fn layout_writes_normalized_positions() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("layout.json");

    let status = network3d()
        .args([
            "layout",
            "--data",
            "tests/fixtures/network.json",
            "--frames",
            "25",
            "--output",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute network3d");
    assert!(status.success(), "network3d exited with error");

    let report: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["iterations"], 25);

    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 15);
    for node in nodes {
        for c in node["position"].as_array().unwrap() {
            let c = c.as_f64().unwrap();
            assert!((-1.0..=1.0).contains(&c), "{c} outside the unit cube");
        }
    }

    let hub = nodes.iter().find(|n| n["id"] == "401.1").unwrap();
    assert_eq!(hub["name"], "Essential hypertension");
    assert_eq!(hub["degree"], 5);
    assert!(report["selected"].is_null());
}

#[test]
fn layout_prints_to_stdout_and_honors_settings() {
    let out = network3d()
        .args([
            "layout",
            "--data",
            "tests/fixtures/network.json",
            "--settings",
            "tests/fixtures/settings.yaml",
        ])
        .output()
        .expect("Failed to execute network3d");
    assert!(out.status.success());

    let report: Value = serde_json::from_slice(&out.stdout).unwrap();
    // frames default to the iteration budget from the settings file
    assert_eq!(report["iterations"], 40);
}

#[test]
fn unknown_edge_endpoint_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("broken.json");
    fs::write(
        &data,
        r##"{"vertices": [{"id": "a", "color": "#000"}],
            "edges": [{"source": "a", "target": "ghost"}]}"##,
    )
    .unwrap();

    let out = network3d()
        .args(["layout", "--data", data.to_str().unwrap()])
        .output()
        .expect("Failed to execute network3d");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("edge 0 references unknown node id 'ghost'"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn no_subcommand_prints_guidance() {
    let out = network3d().output().expect("Failed to execute network3d");
    assert!(out.status.success());
    insta::assert_snapshot!(
        String::from_utf8_lossy(&out.stdout).trim_end(),
        @"network3d: no command specified. Use --help for usage."
    );
}
