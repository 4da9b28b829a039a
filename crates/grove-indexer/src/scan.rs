//! Multi-file scan: walk a path and merge every file into one corpus

use std::path::{Component, Path, PathBuf};

use grove_core::{Corpus, Symbol};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::extractor::{ExtractionResult, LanguageExtractor, PythonExtractor};
use crate::structure::Parent;

/// `[analysis]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Source extension, without the dot.
    pub extension: String,
    /// Honour .gitignore and friends while walking a directory.
    pub respect_ignore_files: bool,
    pub include_hidden: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            extension: "py".to_string(),
            respect_ignore_files: false,
            include_hidden: true,
        }
    }
}

/// One analysed file.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub module: String,
    pub path: PathBuf,
    pub result: ExtractionResult,
}

/// Analyse a single file or every matching file under a directory.
///
/// Files that cannot be read or parsed contribute nothing; only a missing
/// root fails the scan.
pub fn scan_path(root: &Path, config: &AnalysisConfig) -> Result<Corpus, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    let root = root.canonicalize().map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let mut extractor = PythonExtractor::new()?;
    let mut corpus = Corpus::new();

    for file in source_files(&root, config) {
        let Some(module) = module_name(&root, &file) else {
            tracing::warn!("Cannot derive a module name for {}", file.display());
            continue;
        };
        let content = match std::fs::read(&file) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", file.display(), e);
                continue;
            }
        };
        let analysis = analyze_file(&mut extractor, module, file, &content);
        merge(&mut corpus, analysis);
    }

    tracing::info!(
        "Scanned {}: {} modules, {} symbols, {} edges",
        root.display(),
        corpus.modules.len(),
        corpus.symbols.len(),
        corpus.edges.len()
    );
    Ok(corpus)
}

/// Run one extractor over one file's content.
pub fn analyze_file<E: LanguageExtractor>(
    extractor: &mut E,
    module: String,
    path: PathBuf,
    content: &[u8],
) -> FileAnalysis {
    tracing::debug!("Analysing {} as {}", path.display(), module);
    let result = extractor.extract_or_empty(&module, content);
    FileAnalysis { module, path, result }
}

/// Matching files in a stable, name-sorted order.
fn source_files(root: &Path, config: &AnalysisConfig) -> Vec<PathBuf> {
    let is_source = |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == config.extension)
    };

    if root.is_file() {
        if is_source(root) {
            return vec![root.to_path_buf()];
        }
        tracing::warn!(
            "{} is not a .{} file, nothing to analyse",
            root.display(),
            config.extension
        );
        return Vec::new();
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(config.respect_ignore_files)
        .hidden(!config.include_hidden)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_some_and(|ft| ft.is_file()) && is_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files
}

/// Dotted module name for `file`.
///
/// A single-file root is named after its stem. Inside a directory the name
/// is the path relative to the directory's parent, so the directory itself
/// becomes the leading component: `proj/pkg/util.py` -> `proj.pkg.util`.
pub fn module_name(root: &Path, file: &Path) -> Option<String> {
    if root == file {
        return file.file_stem()?.to_str().map(str::to_string);
    }
    let base = root.parent().unwrap_or(root);
    let relative = file.strip_prefix(base).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("."))
}

/// Fold one file's results into the corpus under its module name.
fn merge(corpus: &mut Corpus, analysis: FileAnalysis) {
    let FileAnalysis { module, result, .. } = analysis;
    let ExtractionResult { structure, dependencies } = result;
    corpus.add_module(&module);

    for item in &structure.items {
        let id = item.qualified_id(&module);
        let parent = match &item.parent {
            Parent::Module => module.clone(),
            Parent::Class(class) => format!("{module}.{class}"),
        };
        corpus.add_symbol(Symbol {
            source: structure.sources.get(&id).cloned(),
            id,
            label: item.name.clone(),
            kind: item.kind,
            module: module.clone(),
            parent: Some(parent),
        });
    }
    for edge in dependencies.edges {
        corpus.add_edge(edge);
    }
    for path in dependencies.static_resources {
        corpus.add_static_resource(path);
    }
    for (description, caller) in dependencies.dynamic_callers {
        corpus.add_dynamic_resource(description, caller);
    }
}
