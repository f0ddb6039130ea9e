//! Build configuration
//!
//! Defaults match the conventions of the markup: `.template` files hold
//! templates, `.html` files are pages. A TOML file can override them:
//!
//! ```toml
//! [injector]
//! max_depth = 16
//! template_extension = ".tpl"
//! page_extension = ".htm"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for template loading and injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Maximum number of injection passes over one page
    pub max_depth: usize,

    /// File name suffix of template sources (case-insensitive)
    pub template_extension: String,

    /// File name suffix of pages to process (case-insensitive)
    pub page_extension: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    injector: Option<TomlInjector>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlInjector {
    max_depth: Option<usize>,
    template_extension: Option<String>,
    page_extension: Option<String>,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            template_extension: ".template".to_string(),
            page_extension: ".html".to_string(),
        }
    }
}

impl InjectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(injector) = parsed.injector {
            if let Some(max_depth) = injector.max_depth {
                config.max_depth = max_depth;
            }
            if let Some(ext) = injector.template_extension {
                config.template_extension = ext;
            }
            if let Some(ext) = injector.page_extension {
                config.page_extension = ext;
            }
        }

        Ok(config)
    }

    /// Set the maximum number of injection passes
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_template_extension(mut self, ext: impl Into<String>) -> Self {
        self.template_extension = ext.into();
        self
    }

    pub fn with_page_extension(mut self, ext: impl Into<String>) -> Self {
        self.page_extension = ext.into();
        self
    }

    pub fn is_template_file(&self, file_name: &str) -> bool {
        ends_with_ignore_ascii_case(file_name, &self.template_extension)
    }

    pub fn is_page_file(&self, file_name: &str) -> bool {
        ends_with_ignore_ascii_case(file_name, &self.page_extension)
    }
}

fn ends_with_ignore_ascii_case(name: &str, suffix: &str) -> bool {
    let (name, suffix) = (name.as_bytes(), suffix.as_bytes());
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
