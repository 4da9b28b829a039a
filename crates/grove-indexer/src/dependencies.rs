//! Dependency extraction: calls, inheritance and data access
//!
//! The walker keeps an explicit stack of symbol scopes. Entering a function,
//! method or class body pushes a scope, leaving it pops, so the "current
//! symbol" is always the innermost enclosing declaration.
//!
//! Matching is syntactic. A call to `x.name(...)` is recorded against
//! `module.name` and resolved by final name component when the diagram is
//! assembled, so unrelated methods that share a name all receive the edge.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use grove_core::{DependencyEdge, DependencyKind, NodeRef, Resolution};
use serde::Serialize;
use tree_sitter::{Node, Tree};

use crate::describe::{describe_argument, literal_string};
use crate::parser::{definition_of, line_of, node_text};

/// Extensions that mark a string as a data file path.
pub const FILE_EXTENSIONS: &[&str] = &[
    ".json", ".txt", ".csv", ".ini", ".cfg", ".log", ".dat", ".yaml", ".yml", ".sqlite", ".db",
    ".png", ".jpg", ".jpeg", ".gif", ".mp3", ".ogg", ".wav", ".pdf", ".docx", ".xlsx", ".bin",
];

/// Method-name fragments that suggest a call touches external data.
pub const LOAD_KEYWORDS: &[&str] = &[
    "load", "dump", "read", "write", "json", "map", "config", "data", "file", "db",
];

/// Everything the dependency pass found in one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileDependencies {
    pub edges: Vec<DependencyEdge>,
    pub static_resources: BTreeSet<String>,
    /// Dynamic resource description -> first caller seen.
    pub dynamic_callers: BTreeMap<String, String>,
}

pub fn mentions_file_extension(text: &str) -> bool {
    let lower = text.to_lowercase();
    FILE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

pub fn is_data_method(method: &str) -> bool {
    let lower = method.to_lowercase();
    LOAD_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Walk a parsed file and collect its dependency edges.
pub fn extract_dependencies(tree: &Tree, source: &str, module: &str) -> FileDependencies {
    let mut walker = DependencyWalker {
        source: source.as_bytes(),
        module,
        scopes: vec![Scope::new(module.to_string(), ScopeKind::Module)],
        output: FileDependencies::default(),
    };
    walker.visit(tree.root_node());
    tracing::debug!(
        "{}: {} edges, {} static, {} dynamic resources",
        module,
        walker.output.edges.len(),
        walker.output.static_resources.len(),
        walker.output.dynamic_callers.len()
    );
    walker.output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Module,
    Class,
    Function,
}

#[derive(Debug)]
struct Scope {
    symbol: String,
    kind: ScopeKind,
    /// Local names bound to string literals.
    bindings: HashMap<String, String>,
}

impl Scope {
    fn new(symbol: String, kind: ScopeKind) -> Self {
        Scope { symbol, kind, bindings: HashMap::new() }
    }
}

struct DependencyWalker<'a> {
    source: &'a [u8],
    module: &'a str,
    scopes: Vec<Scope>,
    output: FileDependencies,
}

impl DependencyWalker<'_> {
    fn scope(&self) -> &Scope {
        // The module scope is pushed first and never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_symbol(&self) -> String {
        self.scope().symbol.clone()
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.module, name)
    }

    fn text(&self, node: Node<'_>) -> &str {
        node_text(node, self.source)
    }

    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "function_definition" => self.visit_function(node),
            "class_definition" => self.visit_class(node),
            "decorated_definition" => {
                let definition = definition_of(node);
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.id() != definition.id() {
                        self.visit(child);
                    }
                }
                self.visit(definition);
            }
            "assignment" => {
                self.record_binding(node);
                self.visit_children(node);
            }
            "call" => {
                self.record_call(node);
                self.visit_children(node);
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_function(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name").map(|n| self.text(n).to_string()) else {
            return;
        };
        let symbol = match self.scope().kind {
            ScopeKind::Class => format!("{}.{}", self.scope().symbol, name),
            ScopeKind::Module | ScopeKind::Function => self.qualify(&name),
        };
        self.scopes.push(Scope::new(symbol, ScopeKind::Function));
        self.visit_children(node);
        self.scopes.pop();
    }

    fn visit_class(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name").map(|n| self.text(n).to_string()) else {
            return;
        };
        let class_id = self.qualify(&name);

        // Bases are evaluated in the enclosing scope.
        if let Some(bases) = node.child_by_field_name("superclasses") {
            let mut cursor = bases.walk();
            for base in bases.named_children(&mut cursor) {
                if base.kind() == "identifier" {
                    let target = self.qualify(self.text(base));
                    self.push_edge(
                        class_id.clone(),
                        NodeRef::Symbol(target),
                        DependencyKind::Inherit,
                        Resolution::Exact,
                        base,
                    );
                }
            }
            self.visit_children(bases);
        }

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        self.scopes.push(Scope::new(class_id, ScopeKind::Class));
        self.visit_children(body);
        self.scopes.pop();
    }

    /// `name = "literal"` binds in the current scope only.
    fn record_binding(&mut self, node: Node<'_>) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        if let Some(value) = literal_string(right, self.source) {
            let name = self.text(left).to_string();
            if let Some(scope) = self.scopes.last_mut() {
                scope.bindings.insert(name, value);
            }
        }
    }

    fn record_call(&mut self, node: Node<'_>) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let first_arg = node.child_by_field_name("arguments").and_then(first_positional);
        let caller = self.current_symbol();

        match function.kind() {
            "identifier" => {
                let name = self.text(function).to_string();
                if name == "open" {
                    self.record_open(&caller, first_arg, node);
                }
                self.push_edge(
                    caller,
                    NodeRef::Symbol(self.qualify(&name)),
                    DependencyKind::Call,
                    Resolution::Exact,
                    node,
                );
            }
            "attribute" => {
                let Some(attr) = function.child_by_field_name("attribute") else {
                    return;
                };
                let method = self.text(attr).to_string();
                if is_data_method(&method) {
                    self.record_dynamic(&caller, &method, first_arg, node);
                }
                self.push_edge(
                    caller,
                    NodeRef::Symbol(self.qualify(&method)),
                    DependencyKind::Call,
                    Resolution::ByName,
                    node,
                );
            }
            _ => {}
        }
    }

    /// `open("data.json")`, or `open(path)` where `path` was bound to a
    /// literal in the same scope.
    fn record_open(&mut self, caller: &str, arg: Option<Node<'_>>, call: Node<'_>) {
        let Some(arg) = arg else {
            return;
        };
        let filename = match arg.kind() {
            "identifier" => self.scope().bindings.get(self.text(arg)).cloned(),
            _ => literal_string(arg, self.source),
        };
        let Some(filename) = filename else {
            return;
        };
        let filename = filename.trim();
        if filename.is_empty() || !mentions_file_extension(filename) {
            return;
        }
        self.output.static_resources.insert(filename.to_string());
        self.push_edge(
            caller.to_string(),
            NodeRef::StaticResource(filename.to_string()),
            DependencyKind::Data,
            Resolution::Exact,
            call,
        );
    }

    fn record_dynamic(
        &mut self,
        caller: &str,
        method: &str,
        arg: Option<Node<'_>>,
        call: Node<'_>,
    ) {
        let mut description = describe_argument(arg, self.source);
        if !mentions_file_extension(&description) {
            let lower = method.to_lowercase();
            if lower.contains("json") {
                description.push_str(" (JSON)");
            } else if lower.contains("config") {
                description.push_str(" (CONFIG)");
            }
        }
        self.output
            .dynamic_callers
            .entry(description.clone())
            .or_insert_with(|| caller.to_string());
        self.push_edge(
            caller.to_string(),
            NodeRef::DynamicResource(description),
            DependencyKind::Data,
            Resolution::Exact,
            call,
        );
    }

    fn push_edge(
        &mut self,
        source: String,
        target: NodeRef,
        kind: DependencyKind,
        resolution: Resolution,
        at: Node<'_>,
    ) {
        self.output.edges.push(DependencyEdge {
            source,
            target,
            kind,
            resolution,
            line: Some(line_of(at)),
        });
    }
}

/// First positional argument; keyword arguments do not count.
fn first_positional(arguments: Node<'_>) -> Option<Node<'_>> {
    if arguments.kind() != "argument_list" {
        // A bare generator argument: `f(x for x in xs)`.
        return Some(arguments);
    }
    let mut cursor = arguments.walk();
    let first = arguments.named_children(&mut cursor).find(|arg| {
        !matches!(
            arg.kind(),
            "keyword_argument" | "dictionary_splat" | "comment"
        )
    });
    first
}
