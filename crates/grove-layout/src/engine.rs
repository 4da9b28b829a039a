//! The external layout collaborator

use std::io::Write;
use std::process::{Command, Stdio};

use crate::dot::LayoutConfig;
use crate::error::LayoutError;

/// Turns a DOT document into Graphviz "plain" output.
pub trait LayoutEngine {
    fn layout(&self, dot: &str) -> Result<String, LayoutError>;
}

/// Runs a Graphviz program as a child process, DOT on stdin, plain on stdout.
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    program: String,
}

impl GraphvizEngine {
    pub fn new(program: impl Into<String>) -> Self {
        GraphvizEngine { program: program.into() }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.program.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl LayoutEngine for GraphvizEngine {
    fn layout(&self, dot: &str) -> Result<String, LayoutError> {
        tracing::debug!("Running {} -Tplain on {} bytes of DOT", self.program, dot.len());
        let mut child = Command::new(&self.program)
            .arg("-Tplain")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LayoutError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Dropping stdin closes the pipe so the program sees end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(LayoutError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}
