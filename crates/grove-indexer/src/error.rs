//! Indexer error types

use std::path::PathBuf;

use thiserror::Error;

/// Why a single file produced no analysis. Always absorbed by the scan.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("source is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("source has syntax errors")]
    Syntax,
    #[error("failed to configure parser: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

/// Failures that stop a scan before any file is read.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("cannot resolve {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to configure parser: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}
