//! DOT rendering of an assembled diagram

use std::fmt::Write;

use grove_core::{Diagram, edge_style, node_style};
use serde::{Deserialize, Serialize};

/// `[layout]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Graphviz program to run.
    pub program: String,
    pub rankdir: String,
    pub splines: String,
    /// Merge parallel edges.
    pub concentrate: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            program: "dot".to_string(),
            rankdir: "LR".to_string(),
            splines: "ortho".to_string(),
            concentrate: true,
        }
    }
}

/// Render `diagram` as a DOT digraph. Node names are the sanitized keys, so
/// the layout output can be mapped straight back onto the diagram.
pub fn write_dot(diagram: &Diagram, config: &LayoutConfig) -> String {
    let mut out = String::new();
    out.push_str("digraph grove {\n");
    let _ = writeln!(
        out,
        "  graph [rankdir=\"{}\", splines=\"{}\", concentrate=\"{}\"];",
        escape(&config.rankdir),
        escape(&config.splines),
        config.concentrate
    );

    for node in diagram.nodes() {
        let style = node_style(node.kind);
        let look = if style.dashed { "filled,dashed" } else { "filled" };
        let font = if style.bold_label { "Arial-Bold" } else { "Arial" };
        let _ = writeln!(
            out,
            "  \"{}\" [label=\"{}\", shape=\"{}\", style=\"{}\", \
             fillcolor=\"{}\", color=\"{}\", penwidth={}, fontname=\"{}\"];",
            escape(&node.key),
            escape(&node.label),
            style.shape.as_str(),
            look,
            style.fill,
            style.border,
            style.border_width,
            font
        );
    }

    for edge in diagram.edges() {
        let style = edge_style(edge.kind, edge.head.kind);
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [color=\"{}\", style=\"{}\", penwidth={}, arrowhead=\"{}\"];",
            escape(&edge.tail.key),
            escape(&edge.head.key),
            style.color,
            if style.dashed { "dashed" } else { "solid" },
            style.width,
            style.marker.as_str()
        );
    }

    out.push_str("}\n");
    out
}

fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
