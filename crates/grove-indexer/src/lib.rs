//! Python source parsing, structure and dependency extraction

pub mod dependencies;
pub mod describe;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod scan;
pub mod structure;


pub use dependencies::{FILE_EXTENSIONS, FileDependencies, LOAD_KEYWORDS, extract_dependencies};
pub use error::{ExtractError, ScanError};
pub use extractor::{ExtractionResult, LanguageExtractor, PythonExtractor};
pub use parser::PythonParser;
pub use scan::{AnalysisConfig, FileAnalysis, analyze_file, module_name, scan_path};
pub use structure::{FileStructure, Parent, StructuralItem, extract_structure};
