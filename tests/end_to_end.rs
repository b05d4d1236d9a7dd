//! End-to-end tests: edge list on disk, model calculation, statistics and the `netctrl` binary.

use std::{fs, path::Path, process::Command};

use netctrl::{io::*, model::*, prelude::*};
use tempfile::TempDir;

/// Stem 0 -> 1 -> 2 feeding the cycle 2 -> 3 -> 4 -> 2
const NETWORK: &str = "\
# stem and cycle
0 1
1 2
2 3
3 4
4 2
";

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to write fixture");
    path
}

fn netctrl_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_netctrl"))
}

fn run(args: &[&str], input: &Path) -> String {
    let output = netctrl_bin()
        .args(args)
        .arg(input)
        .output()
        .expect("failed to run netctrl");
    assert!(
        output.status.success(),
        "netctrl {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("output is utf-8")
}

#[test]
fn liu_from_file_to_statistics() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.edges", NETWORK);

    let graph: Network = EdgeListReader::new()
        .min_nodes(6)
        .try_read_graph_file(&path)
        .unwrap();
    assert_eq!(graph.number_of_nodes(), 6);

    let mut model = LiuControllabilityModel::new().with_graph(&graph);
    model.calculate().unwrap();

    // 0 and the isolated node 5 are never matched
    assert_eq!(model.driver_nodes(), &[0, 5]);

    let stats = ControlStatistics::from_model(&model).unwrap();
    assert_eq!(stats.driver_nodes, 2);
    let total: usize = stats.edge_classes.iter().map(|c| c.count).sum();
    assert_eq!(total, graph.number_of_edges() as usize);

    let stems = model
        .control_paths()
        .iter()
        .filter(|p| p.kind() == PathKind::Stem)
        .count();
    assert_eq!(stems, 2);
}

#[test]
fn switchboard_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.txt", NETWORK);

    let graph = Network::try_from_file(&path, FileFormat::from_path(&path).unwrap()).unwrap();
    let mut model = SwitchboardControllabilityModel::new().with_graph(&graph);
    model.calculate().unwrap();

    assert_eq!(model.driver_nodes(), &[0]);
    assert_eq!(model.control_paths().len(), 1);
    assert_eq!(model.control_paths()[0].kind(), PathKind::OpenWalk);
    assert_eq!(model.edge_classes().unwrap().len(), 5);
}

#[test]
fn models_are_interchangeable() {
    let graph = Network::try_read_edge_list(NETWORK.as_bytes()).unwrap();
    for kind in [ModelKind::Liu, ModelKind::Switchboard] {
        let mut model = kind.build();
        model.set_graph(Some(&graph));
        model.calculate().unwrap();
        assert_eq!(model.driver_nodes(), &[0]);
        assert!(model.controllability() > 0.0);
    }
}

#[test]
fn cli_driver_nodes() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.edges", NETWORK);

    assert_eq!(run(&["-q"], &path), "0\n");
    assert_eq!(run(&["-q", "--model", "switchboard"], &path), "0\n");
}

#[test]
fn cli_control_paths_and_statistics() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.edges", NETWORK);

    let paths = run(&["-q", "-M", "control-paths"], &path);
    assert!(paths.lines().next().unwrap().starts_with("Stem: 0 1"));

    let stats = run(&["-q", "-M", "statistics"], &path);
    let lines = stats.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].split(' ').count(), 5);
    assert!(lines[0].starts_with("1 "));
}

#[test]
fn cli_targets_and_graph_output() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.edges", NETWORK);
    let targets = write_file(&dir, "targets.txt", "1\n");
    let output = dir.path().join("out.json");

    let stdout = run(
        &[
            "-q",
            "-M",
            "graph",
            "-t",
            targets.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        &path,
    );
    assert!(stdout.is_empty());

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(document["model"], "liu");
    assert_eq!(document["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(document["nodes"][1]["is_driver"], true);
    assert!(document["edges"][0]["edge_class"].is_null());
}

#[test]
fn cli_rejects_targets_for_switchboard() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "net.edges", NETWORK);
    let targets = write_file(&dir, "targets.txt", "1 2");

    let output = netctrl_bin()
        .args(["-q", "-m", "switchboard", "-t", targets.to_str().unwrap()])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("target nodes"));
}

#[test]
fn cli_reports_missing_input() {
    let output = netctrl_bin().arg("does-not-exist.edges").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.edges"));
}
