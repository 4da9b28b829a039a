//! Per-redraw geometry and style for the rendering collaborator
//!
//! Everything here is in device coordinates. Hidden items are still listed,
//! flagged invisible, so a renderer can keep stable handles across toggles.

use std::collections::HashMap;

use grove_core::style::HOVER_FILL;
use grove_core::{
    Diagram, EdgeKind, EdgeStyle, Marker, NodeKind, NodeRef, NodeStyle, edge_style, node_style,
};
use grove_layout::{Bounds, Layout, Point};
use serde::Serialize;

use crate::hidden::HiddenSet;
use crate::viewport::Viewport;

pub const ARROW_LENGTH: f64 = 8.0;
/// Half-angle of an arrowhead, in radians.
pub const ARROW_SPREAD: f64 = 0.5;
pub const DOT_RADIUS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub key: String,
    pub node: NodeRef,
    pub label: String,
    pub kind: NodeKind,
    pub rect: Bounds,
    pub style: NodeStyle,
    /// Fill after hover highlighting.
    pub fill: &'static str,
    pub border_width: u8,
    pub visible: bool,
    pub hovered: bool,
}

/// End marker of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EdgeEnd {
    Arrow { tip: Point, left: Point, right: Point },
    Dot { center: Point, radius: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEdge {
    pub tail: String,
    pub head: String,
    pub kind: EdgeKind,
    pub style: EdgeStyle,
    /// Control points to stroke; the final point is left to the marker.
    pub polyline: Vec<Point>,
    pub end: Option<EdgeEnd>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    /// Rubber band of an in-progress marquee drag.
    pub marquee: Option<Bounds>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &SceneEdge> {
        self.edges.iter().filter(|e| e.visible)
    }

    pub(crate) fn build(
        diagram: &Diagram,
        layout: &Layout,
        viewport: &Viewport,
        hidden: &HiddenSet,
        hover: Option<&str>,
    ) -> Scene {
        let mut scene = Scene::default();

        for placed in &layout.nodes {
            let Some(node) = diagram.node_by_key(&placed.key) else {
                tracing::debug!("Layout node {} is not in the diagram", placed.key);
                continue;
            };
            let style = node_style(node.kind);
            let hovered = hover == Some(placed.key.as_str());
            let is_data = matches!(node.kind, NodeKind::StaticData | NodeKind::DynamicData);
            let (fill, border_width) = match (hovered, is_data) {
                (false, _) => (style.fill, style.border_width),
                (true, true) => (style.fill, 3),
                (true, false) => (HOVER_FILL, 2),
            };
            let rect = placed.rect();
            scene.nodes.push(SceneNode {
                key: placed.key.clone(),
                node: node.node.clone(),
                label: placed.label.clone(),
                kind: node.kind,
                rect: Bounds {
                    min: viewport.to_device(rect.min),
                    max: viewport.to_device(rect.max),
                },
                style,
                fill,
                border_width,
                visible: !hidden.is_hidden(&node.node),
                hovered,
            });
        }

        // Parallel edges come back in the order they were written, so the
        // n-th layout edge of a pair takes the n-th diagram edge's kind.
        let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
        for placed in &layout.edges {
            let (Some(tail), Some(head)) = (
                diagram.node_by_key(&placed.tail),
                diagram.node_by_key(&placed.head),
            ) else {
                continue;
            };
            let nth = seen
                .entry((placed.tail.as_str(), placed.head.as_str()))
                .or_default();
            let kinds = diagram.edge_kinds_between(&placed.tail, &placed.head);
            let kind = kinds
                .get(*nth)
                .or(kinds.last())
                .copied()
                .unwrap_or(EdgeKind::Call);
            *nth += 1;
            let style = edge_style(kind, head.kind);
            let mut polyline: Vec<Point> =
                placed.points.iter().map(|&p| viewport.to_device(p)).collect();
            polyline.pop();
            scene.edges.push(SceneEdge {
                tail: placed.tail.clone(),
                head: placed.head.clone(),
                kind,
                style,
                polyline,
                end: edge_end(&placed.points, style.marker, viewport),
                visible: !hidden.is_hidden(&tail.node) && !hidden.is_hidden(&head.node),
            });
        }

        scene
    }
}

/// Marker geometry along the final segment, built in image space and then
/// mapped to the device so it scales with the graph.
fn edge_end(points: &[Point], marker: Marker, viewport: &Viewport) -> Option<EdgeEnd> {
    let [.., from, tip] = points else {
        return None;
    };
    Some(match marker {
        Marker::Dot => EdgeEnd::Dot {
            center: viewport.to_device(*tip),
            radius: DOT_RADIUS * viewport.scale(),
        },
        Marker::Arrow => {
            let angle = (tip.y - from.y).atan2(tip.x - from.x);
            let wing = |a: f64| {
                Point::new(tip.x - ARROW_LENGTH * a.cos(), tip.y - ARROW_LENGTH * a.sin())
            };
            EdgeEnd::Arrow {
                tip: viewport.to_device(*tip),
                left: viewport.to_device(wing(angle - ARROW_SPREAD)),
                right: viewport.to_device(wing(angle + ARROW_SPREAD)),
            }
        }
    })
}
