//! Grove Core: symbol corpus, diagram assembly and render hints

pub mod assembler;
pub mod graph;
pub mod model;
pub mod source;
pub mod style;
pub mod symbols;


#[cfg(test)]
pub mod test_utils;

pub use assembler::{GROUP_LABEL, VisibilityFilter, assemble, node_key, sanitize_id};
pub use graph::{Diagram, DiagramEdge, DiagramNode, EdgeKind, EdgeView, NodeKind};
pub use model::{Corpus, DependencyEdge, DependencyKind, NodeRef, Resolution, Symbol, SymbolKind};
pub use source::{SourceLookup, display_label};
pub use style::{EdgeStyle, Marker, NodeStyle, Shape, edge_style, node_style};
pub use symbols::SymbolTable;
