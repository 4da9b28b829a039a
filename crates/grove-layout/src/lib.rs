//! Graphviz bridge: DOT output, plain-format parsing and device geometry

pub mod dot;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod plain;


pub use dot::{LayoutConfig, write_dot};
pub use engine::{GraphvizEngine, LayoutEngine};
pub use error::LayoutError;
pub use interpret::{Bounds, Layout, LayoutEdge, LayoutNode, Point, interpret, run_layout};
pub use plain::{PlainEdge, PlainGraph, PlainNode, parse_plain};
