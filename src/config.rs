//! `grove.toml` loading and command-line overrides

use std::path::{Path, PathBuf};

use clap::Args;
use grove_core::VisibilityFilter;
use grove_indexer::AnalysisConfig;
use grove_layout::LayoutConfig;
use grove_viewer::ViewerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "grove.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroveConfig {
    pub analysis: AnalysisConfig,
    pub layout: LayoutConfig,
    pub viewer: ViewerConfig,
    pub filter: VisibilityFilter,
}

impl GroveConfig {
    /// Load `explicit` if given, else `./grove.toml` when it exists, else
    /// defaults. An explicit path that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&text, &path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.viewer.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if overrides.hide_functions {
            self.filter.functions = false;
        }
        if overrides.hide_methods {
            self.filter.methods = false;
        }
        if overrides.hide_static {
            self.filter.static_data = false;
        }
        if overrides.hide_dynamic {
            self.filter.dynamic_data = false;
        }
        if let Some(program) = &overrides.dot {
            self.layout.program = program.clone();
        }
    }
}

/// Flags that take precedence over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Leave top-level functions out of the diagram
    #[arg(long, global = true)]
    pub hide_functions: bool,

    /// Leave methods out of the diagram
    #[arg(long, global = true)]
    pub hide_methods: bool,

    /// Leave static data files out of the diagram
    #[arg(long, global = true)]
    pub hide_static: bool,

    /// Leave dynamic data resources out of the diagram
    #[arg(long, global = true)]
    pub hide_dynamic: bool,

    /// Graphviz program used for layout
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub dot: Option<String>,
}
