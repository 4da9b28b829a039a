//! Layout error types

use thiserror::Error;

/// Anything that keeps the engine from producing usable geometry.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to start layout program `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("layout program I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout program exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("layout output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("layout output is empty")]
    Empty,
    #[error("malformed layout output at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl LayoutError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LayoutError::Malformed { line, reason: reason.into() }
    }
}
