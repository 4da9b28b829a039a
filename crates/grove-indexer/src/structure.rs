//! Structural extraction: top-level functions, classes and their methods

use std::collections::HashMap;

use grove_core::SymbolKind;
use serde::Serialize;
use tree_sitter::{Node, Tree};

use crate::parser::{definition_of, line_of, node_text};

/// Who declares a structural item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Parent {
    Module,
    Class(String),
}

/// One `(parent, child, kind)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralItem {
    pub parent: Parent,
    pub name: String,
    pub kind: SymbolKind,
    pub line: u32,
}

impl StructuralItem {
    /// Corpus-wide id of the item inside `module`.
    pub fn qualified_id(&self, module: &str) -> String {
        match &self.parent {
            Parent::Module => format!("{module}.{}", self.name),
            Parent::Class(class) => format!("{module}.{class}.{}", self.name),
        }
    }
}

/// Declarations of one file, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileStructure {
    pub items: Vec<StructuralItem>,
    /// Qualified id -> literal source text of the declaration.
    pub sources: HashMap<String, String>,
}

impl FileStructure {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record one declaration; returns its bare name. `outer` carries any
    /// decorators and is what the captured source covers.
    fn push(
        &mut self,
        outer: Node<'_>,
        definition: Node<'_>,
        parent: Parent,
        kind: SymbolKind,
        module: &str,
        source: &[u8],
    ) -> Option<String> {
        let name = node_text(definition.child_by_field_name("name")?, source).to_string();
        if name.is_empty() {
            return None;
        }
        let item = StructuralItem {
            parent,
            name: name.clone(),
            kind,
            line: line_of(definition),
        };
        self.sources
            .insert(item.qualified_id(module), node_text(outer, source).to_string());
        self.items.push(item);
        Some(name)
    }
}

/// Visit only the file's top-level declarations. Class bodies contribute
/// their immediate function members; anything nested deeper is not
/// recovered.
pub fn extract_structure(tree: &Tree, source: &str, module: &str) -> FileStructure {
    let bytes = source.as_bytes();
    let mut structure = FileStructure::default();
    let root = tree.root_node();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        let definition = definition_of(statement);
        match definition.kind() {
            "function_definition" => {
                structure.push(
                    statement,
                    definition,
                    Parent::Module,
                    SymbolKind::Function,
                    module,
                    bytes,
                );
            }
            "class_definition" => {
                let Some(class_name) = structure.push(
                    statement,
                    definition,
                    Parent::Module,
                    SymbolKind::Class,
                    module,
                    bytes,
                ) else {
                    continue;
                };
                let Some(body) = definition.child_by_field_name("body") else {
                    continue;
                };
                let mut body_cursor = body.walk();
                for member in body.named_children(&mut body_cursor) {
                    let member_def = definition_of(member);
                    if member_def.kind() == "function_definition" {
                        structure.push(
                            member,
                            member_def,
                            Parent::Class(class_name.clone()),
                            SymbolKind::Method,
                            module,
                            bytes,
                        );
                    }
                }
            }
            _ => {}
        }
    }

    tracing::debug!("{}: {} declarations", module, structure.items.len());
    structure
}
