//! Turns a corpus into a filtered, uniquely keyed diagram

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::graph::{Diagram, DiagramNode, EdgeKind, NodeKind};
use crate::model::{Corpus, DependencyEdge, NodeRef, Resolution, SymbolKind};

/// Label shown on the synthetic per-module function bucket.
pub const GROUP_LABEL: &str = "Functions";

/// Which node kinds survive assembly. Modules and classes always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFilter {
    pub functions: bool,
    pub methods: bool,
    pub static_data: bool,
    pub dynamic_data: bool,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        VisibilityFilter {
            functions: true,
            methods: true,
            static_data: true,
            dynamic_data: true,
        }
    }
}

impl VisibilityFilter {
    pub fn allows(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Module | NodeKind::Class | NodeKind::Group => true,
            NodeKind::Function => self.functions,
            NodeKind::Method => self.methods,
            NodeKind::StaticData => self.static_data,
            NodeKind::DynamicData => self.dynamic_data,
        }
    }
}

/// Replace everything outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_id(raw: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));
    re.replace_all(raw, "_").into_owned()
}

/// Layout token for a node. The variant picks a distinct prefix so that a
/// resource and a symbol with the same text never share a token.
pub fn node_key(node: &NodeRef) -> String {
    match node {
        NodeRef::Symbol(id) => sanitize_id(id),
        NodeRef::StaticResource(path) => sanitize_id(&format!("FILE__{path}")),
        NodeRef::DynamicResource(desc) => sanitize_id(&format!("DYNAMIC_DATA__{desc}")),
        NodeRef::Group(owner) => sanitize_id(&format!("{owner}.__FUNCS__")),
    }
}

/// Build the diagram for `corpus` as seen through `filter`.
///
/// Assembly is pure: the corpus is never mutated, so changing the filter
/// simply means assembling again.
pub fn assemble(corpus: &Corpus, filter: &VisibilityFilter) -> Diagram {
    let mut diagram = Diagram::new();

    for module in &corpus.modules {
        let module_ref = NodeRef::symbol(module.as_str());
        diagram.add_node(diagram_node(module_ref.clone(), module.clone(), NodeKind::Module));

        let members = corpus.symbols.symbols_in_module(module);
        let functions: Vec<_> = members
            .iter()
            .filter(|s| s.kind == SymbolKind::Function)
            .collect();
        if !functions.is_empty() {
            let group = NodeRef::Group(module.clone());
            diagram.add_node(diagram_node(group.clone(), GROUP_LABEL.to_string(), NodeKind::Group));
            diagram.add_edge(&module_ref, &group, EdgeKind::Contains);
            for function in functions {
                let func_ref = NodeRef::symbol(function.id.as_str());
                diagram.add_node(diagram_node(
                    func_ref.clone(),
                    function.label.clone(),
                    NodeKind::Function,
                ));
                diagram.add_edge(&group, &func_ref, EdgeKind::Contains);
            }
        }

        for class in members.iter().filter(|s| s.kind == SymbolKind::Class) {
            let class_ref = NodeRef::symbol(class.id.as_str());
            diagram.add_node(diagram_node(class_ref.clone(), class.label.clone(), NodeKind::Class));
            diagram.add_edge(&module_ref, &class_ref, EdgeKind::Contains);
        }

        for method in members.iter().filter(|s| s.kind == SymbolKind::Method) {
            let Some(parent) = method.parent.as_deref() else {
                continue;
            };
            let class_ref = NodeRef::symbol(parent);
            if !diagram.contains(&class_ref) {
                tracing::debug!("Method {} has no class node, skipping", method.id);
                continue;
            }
            let method_ref = NodeRef::symbol(method.id.as_str());
            diagram.add_node(diagram_node(
                method_ref.clone(),
                method.label.clone(),
                NodeKind::Method,
            ));
            diagram.add_edge(&class_ref, &method_ref, EdgeKind::Contains);
        }
    }

    for path in &corpus.static_resources {
        let node = NodeRef::StaticResource(path.clone());
        diagram.add_node(diagram_node(node, path.clone(), NodeKind::StaticData));
    }
    for description in corpus.dynamic_resources.keys() {
        let node = NodeRef::DynamicResource(description.clone());
        diagram.add_node(diagram_node(node, description.clone(), NodeKind::DynamicData));
    }

    let mut dropped = 0usize;
    for edge in &corpus.edges {
        let source = NodeRef::symbol(edge.source.as_str());
        let kind = EdgeKind::from(edge.kind);
        let mut linked = false;
        for target in resolve_targets(corpus, edge) {
            linked |= diagram.add_edge(&source, &target, kind);
        }
        if !linked {
            dropped += 1;
        }
    }
    tracing::debug!("{} dependency edges had no resolvable endpoint", dropped);

    diagram.retain_nodes(|n| filter.allows(n.kind));
    // A bucket with nothing left in it is noise.
    let empty_groups: Vec<NodeRef> = diagram
        .nodes()
        .filter(|n| n.kind == NodeKind::Group)
        .filter(|n| diagram.out_degree(&n.node, EdgeKind::Contains) == 0)
        .map(|n| n.node.clone())
        .collect();
    diagram.retain_nodes(|n| !empty_groups.contains(&n.node));

    tracing::debug!(
        "Assembled diagram: {} nodes, {} edges",
        diagram.node_count(),
        diagram.edge_count()
    );
    diagram
}

/// Candidate targets for one dependency edge.
fn resolve_targets(corpus: &Corpus, edge: &DependencyEdge) -> Vec<NodeRef> {
    let NodeRef::Symbol(id) = &edge.target else {
        return vec![edge.target.clone()];
    };
    let mut targets = Vec::new();
    if corpus.symbols.contains(id) {
        targets.push(edge.target.clone());
    }
    if edge.resolution == Resolution::ByName {
        if let Some((module, name)) = id.rsplit_once('.') {
            for symbol in corpus.symbols.named_in_module(module, name) {
                if symbol.id != *id {
                    targets.push(NodeRef::symbol(symbol.id.as_str()));
                }
            }
        }
    }
    targets
}

fn diagram_node(node: NodeRef, label: String, kind: NodeKind) -> DiagramNode {
    let key = node_key(&node);
    DiagramNode { node, key, label, kind }
}
