//! Core data structures for the symbol corpus

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolTable;

/// Discriminates what kind of declaration a symbol represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    Method,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
        }
    }
}

/// A recovered declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Dot-separated, corpus-wide unique id (`pkg.mod.Class.method`).
    pub id: String,
    pub label: String,
    pub kind: SymbolKind,
    pub module: String,
    /// Enclosing module or class. `None` only for modules.
    pub parent: Option<String>,
    /// Literal source captured at parse time.
    pub source: Option<String>,
}

/// Identifies anything that can become a diagram node.
///
/// Resource kinds and synthetic groups are told apart by variant, never by
/// looking at the contents of an id string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "key")]
pub enum NodeRef {
    Symbol(String),
    StaticResource(String),
    DynamicResource(String),
    /// The "Functions" bucket owned by the named module.
    Group(String),
}

impl NodeRef {
    pub fn symbol(id: impl Into<String>) -> Self {
        NodeRef::Symbol(id.into())
    }

    /// Raw key carried by the variant.
    pub fn key(&self) -> &str {
        match self {
            NodeRef::Symbol(s)
            | NodeRef::StaticResource(s)
            | NodeRef::DynamicResource(s)
            | NodeRef::Group(s) => s,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            NodeRef::Symbol(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, NodeRef::StaticResource(_) | NodeRef::DynamicResource(_))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Symbol(id) => write!(f, "{id}"),
            NodeRef::StaticResource(path) => write!(f, "file:{path}"),
            NodeRef::DynamicResource(desc) => write!(f, "dynamic:{desc}"),
            NodeRef::Group(owner) => write!(f, "{owner}.<functions>"),
        }
    }
}

/// What kind of relationship a dependency edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DependencyKind {
    Call,
    Inherit,
    Data,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Call => "call",
            DependencyKind::Inherit => "inherit",
            DependencyKind::Data => "data",
        }
    }
}

/// How the target of an edge is matched against the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Resolution {
    /// Target id must exist verbatim.
    #[default]
    Exact,
    /// Attribute call: any symbol in the target's module whose final name
    /// component matches also receives the edge. This over-approximates on
    /// purpose; it is a syntactic match, not a resolved binding.
    ByName,
}

/// A directed dependency produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Symbol (or module) id the edge originates from.
    pub source: String,
    pub target: NodeRef,
    pub kind: DependencyKind,
    #[serde(default)]
    pub resolution: Resolution,
    /// 1-based line of the triggering syntax.
    pub line: Option<u32>,
}

/// Every symbol, edge and resource recovered from one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// Module ids in scan order.
    pub modules: Vec<String>,
    pub symbols: SymbolTable,
    pub edges: Vec<DependencyEdge>,
    pub static_resources: BTreeSet<String>,
    /// Dynamic resource description -> representative caller id.
    pub dynamic_resources: BTreeMap<String, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Re-registering an existing module is a no-op.
    pub fn add_module(&mut self, module: &str) {
        if self.symbols.lookup(module).is_some() {
            return;
        }
        self.modules.push(module.to_string());
        self.symbols.insert(Symbol {
            id: module.to_string(),
            label: module.to_string(),
            kind: SymbolKind::Module,
            module: module.to_string(),
            parent: None,
            source: None,
        });
    }

    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol);
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        self.edges.push(edge);
    }

    pub fn add_static_resource(&mut self, path: impl Into<String>) {
        self.static_resources.insert(path.into());
    }

    /// Register a dynamic resource. The first caller seen stays the
    /// representative; later callers only fan in.
    pub fn add_dynamic_resource(
        &mut self,
        description: impl Into<String>,
        caller: impl Into<String>,
    ) {
        self.dynamic_resources
            .entry(description.into())
            .or_insert_with(|| caller.into());
    }

    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        self.symbols.lookup(id)
    }

    /// Captured source for a symbol id, if any.
    pub fn source_of(&self, id: &str) -> Option<&str> {
        self.symbols.lookup(id).and_then(|s| s.source.as_deref())
    }

    /// First dotted component of the first module; stripped from display labels.
    pub fn project_name(&self) -> &str {
        self.modules
            .first()
            .and_then(|m| m.split('.').next())
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
