//! Language extractor trait definition

use serde::Serialize;

use crate::dependencies::{FileDependencies, extract_dependencies};
use crate::error::ExtractError;
use crate::parser::PythonParser;
use crate::structure::{FileStructure, extract_structure};

/// Structure and dependencies of one source file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    pub structure: FileStructure,
    pub dependencies: FileDependencies,
}

pub trait LanguageExtractor {
    fn extract(&mut self, module: &str, content: &[u8]) -> Result<ExtractionResult, ExtractError>;

    /// Like [`extract`](Self::extract), but a file that cannot be parsed
    /// contributes nothing instead of failing the batch.
    fn extract_or_empty(&mut self, module: &str, content: &[u8]) -> ExtractionResult {
        match self.extract(module, content) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Skipping module {}: {}", module, e);
                ExtractionResult::default()
            }
        }
    }
}

/// Structural and dependency extraction for Python.
pub struct PythonExtractor {
    parser: PythonParser,
}

impl PythonExtractor {
    pub fn new() -> Result<Self, tree_sitter::LanguageError> {
        Ok(Self { parser: PythonParser::new()? })
    }
}

impl LanguageExtractor for PythonExtractor {
    fn extract(&mut self, module: &str, content: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let source = std::str::from_utf8(content)?;
        let tree = self.parser.parse(source)?;
        Ok(ExtractionResult {
            structure: extract_structure(&tree, source, module),
            dependencies: extract_dependencies(&tree, source, module),
        })
    }
}
