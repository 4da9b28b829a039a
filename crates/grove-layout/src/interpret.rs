//! Layout interpreter: engine units to top-down device pixels

use grove_core::Diagram;
use serde::Serialize;

use crate::dot::{LayoutConfig, write_dot};
use crate::engine::LayoutEngine;
use crate::plain::{PlainGraph, parse_plain};

/// Device pixels per engine unit at scale 1.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle, `min` at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Sanitized diagram key.
    pub key: String,
    pub label: String,
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    pub fn rect(&self) -> Bounds {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        Bounds {
            min: Point::new(self.center.x - hw, self.center.y - hh),
            max: Point::new(self.center.x + hw, self.center.y + hh),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub tail: String,
    pub head: String,
    pub points: Vec<Point>,
}

/// Geometry in image space: pixels, origin at the top left.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, key: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Tight box around every node rectangle and edge point.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut rects = self.nodes.iter().map(LayoutNode::rect);
        let mut bounds = rects.next()?;
        for rect in rects {
            bounds.include(rect.min);
            bounds.include(rect.max);
        }
        for point in self.edges.iter().flat_map(|e| e.points.iter()) {
            bounds.include(*point);
        }
        Some(bounds)
    }

    /// Convert reported geometry: scale every coordinate by the unit ratio
    /// and flip `y` against the page height.
    pub fn from_plain(plain: &PlainGraph) -> Self {
        let ratio = POINTS_PER_INCH * plain.scale;
        let page_height = plain.height * ratio;
        let to_device = |x: f64, y: f64| Point::new(x * ratio, page_height - y * ratio);

        Layout {
            width: plain.width * ratio,
            height: page_height,
            nodes: plain
                .nodes
                .iter()
                .map(|n| LayoutNode {
                    key: n.name.clone(),
                    label: n.label.clone(),
                    center: to_device(n.x, n.y),
                    width: n.width * ratio,
                    height: n.height * ratio,
                })
                .collect(),
            edges: plain
                .edges
                .iter()
                .map(|e| LayoutEdge {
                    tail: e.tail.clone(),
                    head: e.head.clone(),
                    points: e.points.iter().map(|&(x, y)| to_device(x, y)).collect(),
                })
                .collect(),
        }
    }
}

/// Interpret plain output. Unusable output yields an empty layout.
pub fn interpret(plain: &str) -> Layout {
    match parse_plain(plain) {
        Ok(graph) => Layout::from_plain(&graph),
        Err(e) => {
            tracing::warn!("Discarding layout output: {}", e);
            Layout::default()
        }
    }
}

/// Lay out `diagram` with `engine`. Any failure yields an empty layout.
pub fn run_layout(engine: &dyn LayoutEngine, diagram: &Diagram, config: &LayoutConfig) -> Layout {
    if diagram.node_count() == 0 {
        return Layout::default();
    }
    let dot = write_dot(diagram, config);
    let layout = match engine.layout(&dot) {
        Ok(plain) => interpret(&plain),
        Err(e) => {
            tracing::warn!("Layout failed: {}", e);
            return Layout::default();
        }
    };
    tracing::info!(
        "Layout: {} nodes, {} edges, {:.0}x{:.0}px",
        layout.nodes.len(),
        layout.edges.len(),
        layout.width,
        layout.height
    );
    layout
}
