//! Diagram graph using petgraph::StableDiGraph keyed by NodeRef

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::model::{DependencyKind, NodeRef, SymbolKind};

/// What a diagram node draws as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Module,
    Group,
    Class,
    Function,
    Method,
    StaticData,
    DynamicData,
}

impl From<SymbolKind> for NodeKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Module => NodeKind::Module,
            SymbolKind::Class => NodeKind::Class,
            SymbolKind::Function => NodeKind::Function,
            SymbolKind::Method => NodeKind::Method,
        }
    }
}

/// Relationship drawn between two diagram nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Structural containment (module -> group -> function, class -> method).
    Contains,
    Call,
    Inherit,
    Data,
}

impl From<DependencyKind> for EdgeKind {
    fn from(kind: DependencyKind) -> Self {
        match kind {
            DependencyKind::Call => EdgeKind::Call,
            DependencyKind::Inherit => EdgeKind::Inherit,
            DependencyKind::Data => EdgeKind::Data,
        }
    }
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::Call => "call",
            EdgeKind::Inherit => "inherit",
            EdgeKind::Data => "data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramNode {
    pub node: NodeRef,
    /// Sanitized token used by the layout engine and the renderer.
    pub key: String,
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    pub kind: EdgeKind,
}

/// Borrowed view of one edge with its endpoints resolved.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub tail: &'a DiagramNode,
    pub head: &'a DiagramNode,
    pub kind: EdgeKind,
}

/// The assembled, filterable diagram. A directed graph with stable indices.
pub struct Diagram {
    inner: StableDiGraph<DiagramNode, DiagramEdge>,
    by_ref: HashMap<NodeRef, NodeIndex>,
    by_key: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Diagram {
            inner: StableDiGraph::new(),
            by_ref: HashMap::new(),
            by_key: HashMap::new(),
        }
    }

    /// Add a node. A node already present under the same NodeRef is kept.
    pub fn add_node(&mut self, node: DiagramNode) -> NodeIndex {
        if let Some(&idx) = self.by_ref.get(&node.node) {
            return idx;
        }
        let node_ref = node.node.clone();
        let key = node.key.clone();
        let idx = self.inner.add_node(node);
        self.by_ref.insert(node_ref, idx);
        self.by_key.insert(key, idx);
        idx
    }

    /// Add an edge between two present nodes. Parallel edges of the same
    /// kind collapse into one. Returns false when an endpoint is missing.
    pub fn add_edge(&mut self, tail: &NodeRef, head: &NodeRef, kind: EdgeKind) -> bool {
        let (Some(&a), Some(&b)) = (self.by_ref.get(tail), self.by_ref.get(head)) else {
            return false;
        };
        let exists = self
            .inner
            .edges_connecting(a, b)
            .any(|e| e.weight().kind == kind);
        if !exists {
            self.inner.add_edge(a, b, DiagramEdge { kind });
        }
        true
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        self.by_ref.contains_key(node)
    }

    pub fn node(&self, node: &NodeRef) -> Option<&DiagramNode> {
        self.by_ref
            .get(node)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// Reverse lookup from the sanitized token.
    pub fn node_by_key(&self, key: &str) -> Option<&DiagramNode> {
        self.by_key
            .get(key)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DiagramNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.inner.edge_indices().filter_map(move |idx| {
            let (a, b) = self.inner.edge_endpoints(idx)?;
            Some(EdgeView {
                tail: self.inner.node_weight(a)?,
                head: self.inner.node_weight(b)?,
                kind: self.inner.edge_weight(idx)?.kind,
            })
        })
    }

    /// Edges touching `node` in either direction.
    pub fn incident_edges(&self, node: &NodeRef) -> Vec<EdgeView<'_>> {
        let Some(&idx) = self.by_ref.get(node) else {
            return Vec::new();
        };
        let mut edges = Vec::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for edge in self.inner.edges_directed(idx, direction) {
                let (Some(tail), Some(head)) = (
                    self.inner.node_weight(edge.source()),
                    self.inner.node_weight(edge.target()),
                ) else {
                    continue;
                };
                // Self loops show up in both directions.
                if direction == Direction::Incoming && edge.source() == edge.target() {
                    continue;
                }
                edges.push(EdgeView { tail, head, kind: edge.weight().kind });
            }
        }
        edges
    }

    /// Kind of the first edge from `tail` to `head`, looked up by token.
    pub fn edge_kind_between(&self, tail_key: &str, head_key: &str) -> Option<EdgeKind> {
        self.edge_kinds_between(tail_key, head_key).first().copied()
    }

    /// Kinds of every edge from `tail` to `head`, in insertion order, which
    /// is also the order the DOT writer emits them in.
    pub fn edge_kinds_between(&self, tail_key: &str, head_key: &str) -> Vec<EdgeKind> {
        let (Some(&a), Some(&b)) = (self.by_key.get(tail_key), self.by_key.get(head_key)) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .inner
            .edges_connecting(a, b)
            .map(|e| (e.id(), e.weight().kind))
            .collect();
        edges.sort_by_key(|&(id, _)| id);
        edges.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Number of outgoing edges of `kind` from `node`.
    pub fn out_degree(&self, node: &NodeRef, kind: EdgeKind) -> usize {
        self.by_ref.get(node).map_or(0, |&idx| {
            self.inner
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| e.weight().kind == kind)
                .count()
        })
    }

    /// Remove every node the predicate rejects, together with all edges
    /// naming it as either endpoint.
    pub fn retain_nodes<F>(&mut self, mut keep: F)
    where
        F: FnMut(&DiagramNode) -> bool,
    {
        let doomed: Vec<NodeIndex> = self
            .inner
            .node_indices()
            .filter(|&idx| self.inner.node_weight(idx).is_some_and(|n| !keep(n)))
            .collect();
        for idx in doomed {
            if let Some(node) = self.inner.remove_node(idx) {
                self.by_ref.remove(&node.node);
                self.by_key.remove(&node.key);
            }
        }
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}
