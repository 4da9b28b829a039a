//! Render hints resolved from node and edge kinds

use serde::Serialize;

use crate::graph::{EdgeKind, NodeKind};

/// Shape hint handed to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Component,
    Tab,
    Rect,
    Folder,
    Note,
}

impl Shape {
    /// Graphviz shape name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Component => "component",
            Shape::Tab => "tab",
            Shape::Rect => "rect",
            Shape::Folder => "folder",
            Shape::Note => "note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub border: &'static str,
    pub shape: Shape,
    pub border_width: u8,
    pub dashed: bool,
    pub bold_label: bool,
}

/// How an edge ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Marker {
    Arrow,
    Dot,
}

impl Marker {
    /// Graphviz arrowhead name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::Arrow => "vee",
            Marker::Dot => "dot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    pub color: &'static str,
    pub dashed: bool,
    pub width: u8,
    pub marker: Marker,
}

pub const EDGE_GREY: &str = "#999999";
pub const INHERIT_PURPLE: &str = "#aa33aa";

pub fn node_style(kind: NodeKind) -> NodeStyle {
    let (fill, border, shape) = match kind {
        NodeKind::Module => ("#dae8fc", "#6c8ebf", Shape::Component),
        NodeKind::Group => ("#f5f5f5", "#333333", Shape::Tab),
        NodeKind::Class => ("#ffe6cc", "#d79b00", Shape::Rect),
        NodeKind::Method => ("#d5e8d4", "#82b366", Shape::Rect),
        NodeKind::Function => ("#f8cecc", "#b85450", Shape::Rect),
        NodeKind::StaticData => ("#fff2cc", "#d6b656", Shape::Folder),
        NodeKind::DynamicData => ("#cce5ff", "#007bff", Shape::Note),
    };
    let emphasised = matches!(
        kind,
        NodeKind::Module | NodeKind::StaticData | NodeKind::DynamicData
    );
    NodeStyle {
        fill,
        border,
        shape,
        border_width: if emphasised { 2 } else { 1 },
        dashed: kind == NodeKind::Group,
        bold_label: emphasised || kind == NodeKind::Group,
    }
}

/// Edge look depends on what it points at: data edges take the colour of
/// the resource they reach.
pub fn edge_style(kind: EdgeKind, head: NodeKind) -> EdgeStyle {
    match kind {
        EdgeKind::Data => EdgeStyle {
            color: node_style(head).border,
            dashed: true,
            width: 2,
            marker: Marker::Dot,
        },
        EdgeKind::Inherit => EdgeStyle {
            color: INHERIT_PURPLE,
            dashed: true,
            width: 1,
            marker: Marker::Arrow,
        },
        EdgeKind::Call | EdgeKind::Contains => EdgeStyle {
            color: EDGE_GREY,
            dashed: false,
            width: 1,
            marker: Marker::Arrow,
        },
    }
}

/// Fill used while the pointer hovers a symbol node.
pub const HOVER_FILL: &str = "#ffff99";
