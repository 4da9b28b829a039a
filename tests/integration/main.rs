//! Integration tests for Grove
//!
//! These tests drive the whole pipeline, from source files on disk to the
//! render scene, with a layout engine double standing in for Graphviz.

use std::fs;
use std::path::Path;
use std::process::Command;

use grove_core::{NodeKind, NodeRef, VisibilityFilter, node_key};
use grove_indexer::{AnalysisConfig, scan_path};
use grove_layout::{LayoutConfig, LayoutEngine, LayoutError, interpret};
use grove_viewer::{InteractionController, ToggleOutcome, ViewerConfig};
use tempfile::TempDir;

const GAME: &str = r#"
import json

def load_level(n):
    return json.load(open("levels.json"))

class Entity:
    def update(self):
        pass

class Player(Entity):
    def update(self):
        self.read_config(settings)
        load_level(1)

    def draw(self):
        pass
"#;

const HELPERS: &str = "def helper():\n    return 1\n";

fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("proj");
    fs::create_dir_all(root.join("util")).unwrap();
    fs::write(root.join("game.py"), GAME).unwrap();
    fs::write(root.join("util/helpers.py"), HELPERS).unwrap();
    fs::write(root.join("notes.txt"), "not source").unwrap();
    temp_dir
}

/// Lays every DOT node out on one row and joins edges with straight lines.
struct RowEngine;

impl LayoutEngine for RowEngine {
    fn layout(&self, dot: &str) -> Result<String, LayoutError> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for line in dot.lines().map(str::trim).filter(|l| l.starts_with('"')) {
            let parts: Vec<&str> = line.split('"').collect();
            if parts.len() > 3 && parts[2].trim() == "->" {
                edges.push((parts[1].to_string(), parts[3].to_string()));
            } else if parts.len() > 1 {
                nodes.push(parts[1].to_string());
            }
        }
        let x_of = |key: &str| nodes.iter().position(|n| n == key).map(|i| i as f64 * 2.0 + 0.5);

        let mut plain = format!("graph 1 {} 1\n", nodes.len() * 2);
        for (i, key) in nodes.iter().enumerate() {
            let x = i as f64 * 2.0 + 0.5;
            plain.push_str(&format!("node {key} {x} 0.5 1 0.5 {key} solid box black white\n"));
        }
        for (tail, head) in &edges {
            let (Some(a), Some(b)) = (x_of(tail), x_of(head)) else {
                return Err(LayoutError::Empty);
            };
            plain.push_str(&format!("edge {tail} {head} 2 {a} 0.5 {b} 0.5 solid black\n"));
        }
        plain.push_str("stop\n");
        Ok(plain)
    }
}

fn controller_for(root: &Path) -> InteractionController {
    let corpus = scan_path(root, &AnalysisConfig::default()).unwrap();
    InteractionController::new(
        corpus,
        ViewerConfig::default(),
        LayoutConfig::default(),
        VisibilityFilter::default(),
    )
}

#[test]
fn test_scan_assemble_layout_scene() {
    let project = create_project();
    let mut controller = controller_for(&project.path().join("proj"));

    assert_eq!(controller.corpus().modules, vec!["proj.game", "proj.util.helpers"]);
    let diagram = controller.diagram();
    assert!(diagram.contains(&NodeRef::StaticResource("levels.json".into())));
    assert!(diagram.contains(&NodeRef::DynamicResource("<SETTINGS> (CONFIG)".into())));
    assert!(diagram.contains(&NodeRef::Group("proj.util.helpers".into())));
    assert!(diagram.edges().any(|e| e.tail.node == NodeRef::symbol("proj.game.Player")
        && e.head.node == NodeRef::symbol("proj.game.Entity")));
    assert!(diagram.edges().any(|e| e.tail.node == NodeRef::symbol("proj.game.Player.update")
        && e.head.node == NodeRef::symbol("proj.game.load_level")));

    assert!(controller.scene().is_empty());
    assert!(controller.relayout(&RowEngine));

    let scene = controller.scene();
    assert_eq!(scene.nodes.len(), controller.diagram().node_count());
    assert_eq!(scene.edges.len(), controller.diagram().edge_count());
    assert!(scene.nodes.iter().all(|n| n.visible));
}

#[test]
fn test_hide_restore_through_controller() {
    let project = create_project();
    let mut controller = controller_for(&project.path().join("proj"));
    controller.relayout(&RowEngine);
    let before = controller.scene().visible_nodes().count();

    let player = NodeRef::symbol("proj.game.Player");
    assert_eq!(controller.toggle_node(&player), ToggleOutcome::Hidden);
    // The class and both of its methods.
    assert_eq!(controller.scene().visible_nodes().count(), before - 3);
    assert_eq!(controller.bookmarks()[0].label, "game.Player");
    let outline: Vec<String> = controller.class_outline().into_iter().map(|t| t.label).collect();
    assert_eq!(outline, vec!["game.Entity"]);

    assert_eq!(controller.restore_bookmark(0), ToggleOutcome::Restored);
    assert_eq!(controller.scene().visible_nodes().count(), before);
}

#[test]
fn test_dynamic_resource_preview() {
    let project = create_project();
    let controller = controller_for(&project.path().join("proj"));
    let key = node_key(&NodeRef::DynamicResource("<SETTINGS> (CONFIG)".into()));

    let preview = controller.preview(&key).unwrap();
    let mut lines = preview.lines();
    assert_eq!(lines.next(), Some("Code block relying on data: game.Player.update"));
    assert_eq!(lines.nth(1), Some("def update(self):"));
}

#[test]
fn test_filter_change_needs_new_layout() {
    let project = create_project();
    let mut controller = controller_for(&project.path().join("proj"));
    let request = controller.request_layout();

    controller.set_filter(VisibilityFilter { methods: false, ..VisibilityFilter::default() });
    let stale = interpret(&RowEngine.layout(&request.dot).unwrap());
    assert!(!controller.apply_layout(request.revision, stale));
    assert!(controller.scene().is_empty());

    assert!(controller.relayout(&RowEngine));
    let scene = controller.scene();
    assert!(!scene.is_empty());
    assert!(scene.nodes.iter().all(|n| n.kind != NodeKind::Method));
}

fn grove(cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_grove"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to execute grove")
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let temp_dir = TempDir::new().unwrap();
    let output = grove(temp_dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("grove"));
    assert!(stdout.contains("Structure and dependency diagrams for Python sources"));
}

#[test]
fn test_cli_analyze() {
    let project = create_project();
    let output = grove(project.path(), &["analyze", "proj"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Modules:          2"));
    assert!(stdout.contains("Classes:          2"));
    assert!(stdout.contains("Static data:      1"));
}

#[test]
fn test_cli_source_and_missing_symbol() {
    let project = create_project();
    let output = grove(project.path(), &["source", "proj", "proj.game.load_level"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("def load_level(n):"));

    let output = grove(project.path(), &["source", "proj", "proj.game.nothing"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(No source code found for proj.game.nothing)"));
}

#[test]
fn test_cli_missing_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = grove(temp_dir.path(), &["analyze", "does-not-exist"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_layout_without_engine_is_empty() {
    let project = create_project();
    let output = grove(
        project.path(),
        &["--dot", "grove-no-such-layout-program", "layout", "proj"],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
