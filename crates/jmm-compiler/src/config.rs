//! Compiler configuration (jmm.toml)
//!
//! Every section and key is optional; missing values take their defaults.
//!
//! ```toml
//! [compiler]
//! emit_ir = false
//! root_class = "java/lang/Object"
//!
//! [checker]
//! lenient_imports = true
//! trust_superclass = true
//! ```

use crate::codegen::ROOT_CLASS;
use jmm_checker::CheckerPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Semantic checker policy flags
    #[serde(default)]
    pub checker: CheckerPolicy,
}

/// `[compiler]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerSection {
    /// Also produce the IR listing
    #[serde(default)]
    pub emit_ir: bool,

    /// Superclass of classes that declare none, as a JVM internal name
    #[serde(default = "default_root_class")]
    pub root_class: String,
}

fn default_root_class() -> String {
    ROOT_CLASS.to_string()
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            emit_ir: false,
            root_class: default_root_class(),
        }
    }
}

impl CompilerConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse from TOML text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = &self.compiler.root_class;
        if root.is_empty() {
            return Err(ConfigError::Invalid("root_class cannot be empty".to_string()));
        }
        if root.contains('.') {
            return Err(ConfigError::Invalid(format!(
                "root_class must use '/' separators, found '{}'",
                root
            )));
        }
        Ok(())
    }
}
