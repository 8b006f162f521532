// ABOUTME: Optional folio.toml configuration with [contents] and [sidebar] tables.
// ABOUTME: Command-line flags are layered on top of what the file sets.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_outline::ContentsOverrides;
use folio_sidebar::SidebarConfig;
use serde::Deserialize;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContentsConfig {
    pub content_selector: Option<String>,
    pub heading_scope: Option<String>,
    #[serde(flatten)]
    pub overrides: ContentsOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub contents: ContentsConfig,
    pub sidebar: SidebarConfig,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path` if given (it must exist), else `folio.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config =
            Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
