//! Unit tests for grove-viewer module

use crate::*;
use grove_core::style::HOVER_FILL;
use grove_core::{
    Corpus, DependencyEdge, DependencyKind, Diagram, EdgeKind, NodeRef, Resolution, Symbol,
    SymbolKind, VisibilityFilter,
};
use grove_layout::{Layout, LayoutConfig, LayoutEdge, LayoutEngine, LayoutError, LayoutNode, Point};

const EPS: f64 = 1e-9;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

fn symbol(id: &str, kind: SymbolKind, parent: &str) -> Symbol {
    Symbol {
        id: id.to_string(),
        label: id.rsplit('.').next().unwrap_or(id).to_string(),
        kind,
        module: "proj.m".to_string(),
        parent: Some(parent.to_string()),
        source: Some(format!("# {id}")),
    }
}

fn edge(source: &str, target: NodeRef, kind: DependencyKind) -> DependencyEdge {
    DependencyEdge {
        source: source.to_string(),
        target,
        kind,
        resolution: Resolution::Exact,
        line: None,
    }
}

/// Module `proj.m` with function `f`, classes `B` and `C`, methods `C.g`
/// and `C.h`; `g` calls `f`, `C` inherits `B`, `f` opens `config.json`.
fn sample_corpus() -> Corpus {
    let mut corpus = Corpus::new();
    corpus.add_module("proj.m");
    corpus.add_symbol(symbol("proj.m.f", SymbolKind::Function, "proj.m"));
    corpus.add_symbol(symbol("proj.m.B", SymbolKind::Class, "proj.m"));
    corpus.add_symbol(symbol("proj.m.C", SymbolKind::Class, "proj.m"));
    corpus.add_symbol(symbol("proj.m.C.g", SymbolKind::Method, "proj.m.C"));
    corpus.add_symbol(symbol("proj.m.C.h", SymbolKind::Method, "proj.m.C"));
    corpus.add_edge(edge("proj.m.C.g", NodeRef::symbol("proj.m.f"), DependencyKind::Call));
    corpus.add_edge(edge("proj.m.C", NodeRef::symbol("proj.m.B"), DependencyKind::Inherit));
    corpus.add_edge(edge(
        "proj.m.f",
        NodeRef::StaticResource("config.json".into()),
        DependencyKind::Data,
    ));
    corpus.add_static_resource("config.json");
    corpus
}

/// Every node on one row, 200px apart; edges run centre to centre.
fn grid_layout(diagram: &Diagram) -> Layout {
    let nodes: Vec<LayoutNode> = diagram
        .nodes()
        .enumerate()
        .map(|(i, n)| LayoutNode {
            key: n.key.clone(),
            label: n.label.clone(),
            center: Point::new(100.0 + 200.0 * i as f64, 100.0),
            width: 100.0,
            height: 40.0,
        })
        .collect();
    let center = |key: &str| {
        nodes
            .iter()
            .find(|n| n.key == key)
            .map(|n| n.center)
            .unwrap()
    };
    let edges = diagram
        .edges()
        .map(|e| {
            let (a, b) = (center(&e.tail.key), center(&e.head.key));
            LayoutEdge {
                tail: e.tail.key.clone(),
                head: e.head.key.clone(),
                points: vec![a, Point::new((a.x + b.x) / 2.0, 60.0), b],
            }
        })
        .collect();
    Layout {
        width: 200.0 * diagram.node_count() as f64,
        height: 200.0,
        nodes,
        edges,
    }
}

fn controller() -> InteractionController {
    InteractionController::new(
        sample_corpus(),
        ViewerConfig::default(),
        LayoutConfig::default(),
        VisibilityFilter::default(),
    )
}

fn laid_out() -> InteractionController {
    let mut c = controller();
    let layout = grid_layout(c.diagram());
    let revision = c.revision();
    assert!(c.apply_layout(revision, layout));
    c
}

fn device_center(c: &InteractionController, key: &str) -> Point {
    let center = c.layout().unwrap().node(key).unwrap().center;
    c.viewport().to_device(center)
}

struct FailingEngine;

impl LayoutEngine for FailingEngine {
    fn layout(&self, _dot: &str) -> Result<String, LayoutError> {
        Err(LayoutError::Empty)
    }
}

// ── Hide / restore ──────────────────────────────────────

#[test]
fn test_hide_class_cascades_to_methods() {
    let mut c = controller();
    let class = NodeRef::symbol("proj.m.C");
    assert_eq!(c.toggle_node(&class), ToggleOutcome::Hidden);

    for id in ["proj.m.C", "proj.m.C.g", "proj.m.C.h"] {
        assert!(!c.is_visible(&NodeRef::symbol(id)), "{id} should be hidden");
    }
    assert!(c.is_visible(&NodeRef::symbol("proj.m.B")));
    assert_eq!(c.visible_nodes().len(), 5);

    let edges = c.visible_edges();
    assert_eq!(edges.len(), 4);
    assert!(!edges.iter().any(|(tail, _, kind)| tail == &NodeRef::symbol("proj.m.C.g")
        && *kind == EdgeKind::Call));

    let bookmarks = c.bookmarks();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].label, "m.C");
}

#[test]
fn test_hide_then_restore_is_identity_for_every_node() {
    let mut c = controller();
    let nodes: Vec<NodeRef> = c.diagram().nodes().map(|n| n.node.clone()).collect();
    let before = (c.visible_nodes(), c.visible_edges());

    for node in nodes {
        assert_eq!(c.toggle_node(&node), ToggleOutcome::Hidden);
        assert_eq!(c.toggle_node(&node), ToggleOutcome::Restored);
        assert_eq!((c.visible_nodes(), c.visible_edges()), before, "{node}");
        assert!(c.bookmarks().is_empty());
    }
}

#[test]
fn test_toggle_ignores_unknown_and_covered_nodes() {
    let mut c = controller();
    assert_eq!(c.toggle_node(&NodeRef::symbol("proj.m.nope")), ToggleOutcome::Ignored);
    assert_eq!(c.click_node("no_such_key"), ToggleOutcome::Ignored);

    c.toggle_node(&NodeRef::symbol("proj.m.C"));
    assert_eq!(c.toggle_node(&NodeRef::symbol("proj.m.C.g")), ToggleOutcome::Ignored);
    assert_eq!(c.bookmarks().len(), 1);
}

#[test]
fn test_bookmark_indices_after_restore() {
    let mut c = controller();
    for id in ["proj.m.f", "proj.m.C", "proj.m.B"] {
        c.toggle_node(&NodeRef::symbol(id));
    }
    assert_eq!(c.restore_bookmark(1), ToggleOutcome::Restored);

    let labels: Vec<(usize, String)> = c
        .bookmarks()
        .into_iter()
        .map(|b| (b.index, b.label))
        .collect();
    assert_eq!(labels, vec![(0, "m.f".to_string()), (1, "m.B".to_string())]);
    assert_eq!(c.restore_bookmark(5), ToggleOutcome::Ignored);
}

#[test]
fn test_restoring_method_restores_its_class() {
    let mut c = controller();
    let method = NodeRef::symbol("proj.m.C.g");
    let class = NodeRef::symbol("proj.m.C");
    c.toggle_node(&method);
    c.toggle_node(&class);
    assert_eq!(c.bookmarks().len(), 2);

    assert_eq!(c.restore_bookmark(0), ToggleOutcome::Restored);
    assert!(c.is_visible(&class));
    assert!(c.is_visible(&method));
    assert!(c.bookmarks().is_empty());
}

#[test]
fn test_clicking_method_under_hidden_class_restores_both() {
    let mut c = controller();
    let method = NodeRef::symbol("proj.m.C.g");
    let class = NodeRef::symbol("proj.m.C");
    c.toggle_node(&method);
    c.toggle_node(&class);

    assert_eq!(c.toggle_node(&method), ToggleOutcome::Restored);
    assert!(c.is_visible(&method));
    assert!(c.is_visible(&class));
    assert!(c.is_visible(&NodeRef::symbol("proj.m.C.h")));
    assert!(c.bookmarks().is_empty());
}

#[test]
fn test_bookmark_list_snapshot() {
    let mut c = controller();
    c.toggle_node(&NodeRef::symbol("proj.m.C"));
    c.toggle_node(&NodeRef::StaticResource("config.json".into()));
    insta::assert_json_snapshot!(c.bookmarks(), @r#"
    [
      {
        "index": 0,
        "label": "m.C",
        "node": {
          "type": "Symbol",
          "key": "proj.m.C"
        }
      },
      {
        "index": 1,
        "label": "config.json",
        "node": {
          "type": "StaticResource",
          "key": "config.json"
        }
      }
    ]
    "#);
}

#[test]
fn test_load_resets_view_state() {
    let mut c = laid_out();
    c.toggle_node(&NodeRef::symbol("proj.m.C"));
    let revision = c.revision();

    c.load(sample_corpus());
    assert!(c.bookmarks().is_empty());
    assert!(c.revision() > revision);
    assert!(c.layout().is_none());
    assert_eq!(c.viewport().scale(), 1.0);
}

// ── Viewport ────────────────────────────────────────────

#[test]
fn test_unusable_scale_range_does_not_panic() {
    let config = ViewerConfig {
        min_scale: 10.0,
        max_scale: 1.0,
        ..ViewerConfig::default()
    };
    let mut c = InteractionController::new(
        sample_corpus(),
        config,
        LayoutConfig::default(),
        VisibilityFilter::default(),
    );
    let revision = c.revision();
    let layout = grid_layout(c.diagram());
    assert!(c.apply_layout(revision, layout));
    assert!(c.viewport().scale() > 0.0);
    assert!(c.zoom_in(None));
}

#[test]
fn test_reciprocal_zoom_is_idempotent() {
    for factor in [1.05, 2.0, 0.3, 7.5] {
        for anchor in [Point::new(0.0, 0.0), Point::new(123.4, 56.7), Point::new(800.0, 400.0)] {
            let mut vp = Viewport::new(1600.0, 800.0, 0.05, 50.0);
            vp.pan(37.0, -12.0);
            let before = vp.clone();

            assert!(vp.zoom_at(factor, anchor));
            assert!(vp.zoom_at(1.0 / factor, anchor));
            assert!((vp.scale() - before.scale()).abs() < EPS);
            assert!(close(vp.offset(), before.offset()));
        }
    }
}

#[test]
fn test_zoom_keeps_anchor_under_clamp() {
    let mut vp = Viewport::new(1600.0, 800.0, 0.05, 50.0);
    let anchor = Point::new(300.0, 200.0);
    let image = vp.to_image(anchor);

    assert!(vp.zoom_at(1000.0, anchor));
    assert_eq!(vp.scale(), 50.0);
    assert!(close(vp.to_device(image), anchor));
    assert!(!vp.zoom_at(2.0, anchor));

    assert!(vp.zoom_at(1e-6, anchor));
    assert_eq!(vp.scale(), 0.05);
    assert!(close(vp.to_device(image), anchor));
}

#[test]
fn test_marquee_zoom_centres_rectangle() {
    let mut vp = Viewport::new(800.0, 400.0, 0.05, 50.0);
    assert!(vp.zoom_to_rect(Point::new(300.0, 200.0), Point::new(100.0, 100.0), 8.0));
    assert!((vp.scale() - 4.0).abs() < EPS);
    assert!(close(vp.to_device(Point::new(200.0, 150.0)), vp.center()));
}

#[test]
fn test_degenerate_marquee_is_noop() {
    let mut c = laid_out();
    let before = c.viewport().clone();

    c.pointer_down(PointerButton::Secondary, Point::new(10.0, 10.0));
    c.pointer_move(Point::new(15.0, 300.0));
    assert!(c.marquee().is_some());
    assert!(!c.pointer_up(Point::new(15.0, 300.0)));
    assert_eq!(c.viewport(), &before);
    assert!(c.marquee().is_none());

    c.pointer_down(PointerButton::Secondary, Point::new(10.0, 10.0));
    assert!(!c.pointer_up(Point::new(500.0, 13.0)));
    assert_eq!(c.viewport(), &before);
}

#[test]
fn test_pan_translates_without_scaling() {
    let mut c = controller();
    let scale = c.viewport().scale();
    c.pointer_down(PointerButton::Primary, Point::new(0.0, 0.0));
    c.pointer_move(Point::new(10.0, 5.0));
    assert!(c.pointer_up(Point::new(20.0, 5.0)));
    assert_eq!(c.viewport().offset(), Point::new(20.0, 5.0));
    assert_eq!(c.viewport().scale(), scale);
}

#[test]
fn test_wheel_and_keyboard_zoom() {
    let mut c = controller();
    assert!(c.wheel(120.0, Point::new(50.0, 50.0)));
    assert!((c.viewport().scale() - 1.05).abs() < EPS);
    assert!(c.wheel(-120.0, Point::new(50.0, 50.0)));
    assert!((c.viewport().scale() - 1.0).abs() < EPS);
    assert!(!c.wheel(0.0, Point::new(50.0, 50.0)));

    // A pointer outside the viewport anchors at the centre.
    let center = c.viewport().center();
    let image = c.viewport().to_image(center);
    assert!(c.zoom_in(Some(Point::new(-5.0, 10.0))));
    assert!(close(c.viewport().to_device(image), center));
    assert!(c.zoom_out(None));
    assert!(close(c.viewport().to_device(image), center));
}

#[test]
fn test_layout_fits_view() {
    let c = laid_out();
    let bounds = c.layout().unwrap().bounds().unwrap();
    // 8 nodes plus edge bends: 1500 x 60 image pixels into 1600 x 800.
    assert!((c.viewport().scale() - 1600.0 / 1500.0 * 0.9).abs() < EPS);
    assert!(close(c.viewport().to_device(bounds.center()), c.viewport().center()));
}

// ── Layout revisions ────────────────────────────────────

#[test]
fn test_stale_layout_rejected() {
    let mut c = controller();
    let request = c.request_layout();
    assert!(request.dot.contains("proj_m_C_g"));

    c.set_filter(VisibilityFilter { methods: false, ..VisibilityFilter::default() });
    let stale = grid_layout(c.diagram());
    assert!(!c.apply_layout(request.revision, stale));
    assert!(c.layout().is_none());
    assert!(c.scene().is_empty());

    let fresh = grid_layout(c.diagram());
    let revision = c.revision();
    assert!(c.apply_layout(revision, fresh));
    assert_eq!(c.scene().nodes.len(), 6);
}

#[test]
fn test_failed_layout_renders_nothing() {
    let mut c = laid_out();
    assert!(!c.scene().is_empty());
    c.set_filter(VisibilityFilter { static_data: false, ..VisibilityFilter::default() });
    assert!(c.relayout(&FailingEngine));
    assert!(c.scene().is_empty());
    assert!(c.node_at(Point::new(100.0, 100.0)).is_none());
    assert!(c.class_outline().is_empty());
}

// ── Scene and lookups ───────────────────────────────────

#[test]
fn test_scene_geometry_and_styles() {
    let c = laid_out();
    let scene = c.scene();
    assert_eq!(scene.nodes.len(), 8);
    assert_eq!(scene.edges.len(), 9);

    let call = scene
        .edges
        .iter()
        .find(|e| e.tail == "proj_m_C_g" && e.head == "proj_m_f")
        .unwrap();
    assert_eq!(call.kind, EdgeKind::Call);
    assert_eq!(call.polyline.len(), 2);
    let Some(EdgeEnd::Arrow { tip, .. }) = call.end else {
        panic!("call edges end in an arrow");
    };
    assert!(close(tip, device_center(&c, "proj_m_f")));

    let data = scene.edges.iter().find(|e| e.kind == EdgeKind::Data).unwrap();
    assert!(data.style.dashed);
    let Some(EdgeEnd::Dot { radius, .. }) = data.end else {
        panic!("data edges end in a dot");
    };
    assert!((radius - 3.0 * c.viewport().scale()).abs() < EPS);
}

#[test]
fn test_parallel_edges_keep_their_own_kinds() {
    let mut corpus = sample_corpus();
    corpus.add_edge(edge("proj.m.C", NodeRef::symbol("proj.m.B"), DependencyKind::Call));
    let mut c = InteractionController::new(
        corpus,
        ViewerConfig::default(),
        LayoutConfig::default(),
        VisibilityFilter::default(),
    );
    let layout = grid_layout(c.diagram());
    let revision = c.revision();
    assert!(c.apply_layout(revision, layout));

    let kinds: Vec<EdgeKind> = c
        .scene()
        .edges
        .iter()
        .filter(|e| e.tail == "proj_m_C" && e.head == "proj_m_B")
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds, vec![EdgeKind::Inherit, EdgeKind::Call]);
}

#[test]
fn test_scene_flags_hidden_items() {
    let mut c = laid_out();
    c.toggle_node(&NodeRef::symbol("proj.m.C"));
    let scene = c.scene();

    assert_eq!(scene.visible_nodes().count(), 5);
    assert_eq!(scene.visible_edges().count(), 4);
    assert!(scene.nodes.iter().any(|n| n.key == "proj_m_C_h" && !n.visible));
}

#[test]
fn test_hit_testing_and_click() {
    let mut c = laid_out();
    let at_f = device_center(&c, "proj_m_f");
    assert_eq!(c.node_at(at_f).map(|n| n.key.as_str()), Some("proj_m_f"));
    assert!(c.node_at(Point::new(-100.0, -100.0)).is_none());

    assert_eq!(c.click_node("proj_m_f"), ToggleOutcome::Hidden);
    assert!(c.node_at(at_f).is_none());
    assert_eq!(c.click_node("proj_m_f"), ToggleOutcome::Restored);
}

#[test]
fn test_hover_highlight() {
    let mut c = laid_out();
    c.pointer_move(device_center(&c, "proj_m_f"));
    assert_eq!(c.hovered(), Some("proj_m_f"));
    let scene = c.scene();
    let f = scene.nodes.iter().find(|n| n.key == "proj_m_f").unwrap();
    assert_eq!(f.fill, HOVER_FILL);
    assert_eq!(f.border_width, 2);

    c.pointer_move(device_center(&c, "FILE__config_json"));
    let scene = c.scene();
    let data = scene.nodes.iter().find(|n| n.key == "FILE__config_json").unwrap();
    assert_ne!(data.fill, HOVER_FILL);
    assert_eq!(data.border_width, 3);
}

#[test]
fn test_class_outline_and_jump() {
    let mut c = laid_out();
    let labels: Vec<String> = c.class_outline().into_iter().map(|t| t.label).collect();
    assert_eq!(labels, vec!["m.B", "m.C"]);

    let scale = c.viewport().scale();
    assert!(c.jump_to_class(&NodeRef::symbol("proj.m.C")));
    assert_eq!(c.viewport().scale(), scale);
    assert!(close(device_center(&c, "proj_m_C"), c.viewport().center()));

    c.toggle_node(&NodeRef::symbol("proj.m.C"));
    assert_eq!(c.class_outline().len(), 1);
    assert!(!c.jump_to_class(&NodeRef::symbol("proj.m.C")));
}

#[test]
fn test_previews_and_edge_tooltip() {
    let c = controller();
    assert_eq!(c.preview("proj_m_f").as_deref(), Some("# proj.m.f"));
    assert!(c.preview("FILE__config_json").unwrap().starts_with("STATIC FILE DEPENDENCY"));
    assert_eq!(c.preview("missing"), None);
    assert_eq!(
        c.edge_tooltip("proj_m_C_g", "proj_m_f").as_deref(),
        Some("Source: m.C.g\nTarget: m.f\nType: CALL")
    );
    assert_eq!(c.edge_tooltip("proj_m_f", "proj_m_C_g"), None);
}
