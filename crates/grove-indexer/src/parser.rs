//! Tree-sitter parser for Python sources
//!
//! Analysis runs on a single thread, so one parser is created per scan and
//! reused for every file instead of being pooled.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::ExtractError;

/// A configured Python parser.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, tree_sitter::LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&Self::language())?;
        Ok(Self { parser })
    }

    pub fn language() -> Language {
        tree_sitter_python::LANGUAGE.into()
    }

    /// Parse `source`. Any syntax error makes the whole file unusable, the
    /// same way the interpreter would reject it.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ExtractError> {
        let tree = self.parser.parse(source, None).ok_or(ExtractError::Syntax)?;
        if tree.root_node().has_error() {
            return Err(ExtractError::Syntax);
        }
        Ok(tree)
    }
}

/// Text of `node`, or an empty string for spans that are not valid UTF-8.
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based line of the node start.
pub(crate) fn line_of(node: Node<'_>) -> u32 {
    (node.start_position().row as u32) + 1
}

/// Unwrap `@decorator` wrappers to the definition underneath.
pub(crate) fn definition_of(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        if let Some(inner) = node.child_by_field_name("definition") {
            return inner;
        }
    }
    node
}
