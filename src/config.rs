//! Configuration file support for scope-graph.
//!
//! Provides YAML-based configuration through `scope-graph.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::application::dto::OutputFormat;
use crate::dependency_graph::domain::Scope;
use crate::shared::error::ScopeGraphError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "scope-graph.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub scope: Option<String>,
    pub format: Option<String>,
    pub days: Option<u32>,
    pub max_concurrency: Option<usize>,
    pub cache_ttl_hours: Option<i64>,
    pub cache_dir: Option<PathBuf>,
    pub registry_url: Option<String>,
    pub downloads_url: Option<String>,
    pub selected_packages: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn invalid(message: String, hint: &str) -> anyhow::Error {
    ScopeGraphError::InvalidConfig {
        message,
        hint: hint.to_string(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref scope) = config.scope {
        Scope::new(scope).map_err(|e| {
            invalid(
                format!("scope '{}': {}", scope, e),
                "Use an npm scope such as \"@wxn0brp\".",
            )
        })?;
    }

    if let Some(ref format) = config.format {
        OutputFormat::from_str(format).map_err(|e| {
            invalid(e, "Supported formats are 'json', 'markdown' and 'dot'.")
        })?;
    }

    if config.days == Some(0) {
        return Err(invalid(
            "days must be greater than 0".to_string(),
            "The default window is 60 days.",
        ));
    }

    if config.max_concurrency == Some(0) {
        return Err(invalid(
            "max_concurrency must be greater than 0".to_string(),
            "The default is 10 concurrent requests.",
        ));
    }

    if let Some(ttl) = config.cache_ttl_hours {
        if ttl <= 0 {
            return Err(invalid(
                format!("cache_ttl_hours must be greater than 0, got {}", ttl),
                "Use --no-cache to bypass the cache instead.",
            ));
        }
    }

    for (field, url) in [
        ("registry_url", &config.registry_url),
        ("downloads_url", &config.downloads_url),
    ] {
        if let Some(url) = url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(invalid(
                    format!("{} must be an http(s) URL, got '{}'", field, url),
                    "For example \"https://registry.npmjs.org\".",
                ));
            }
        }
    }

    if let Some(ref selected) = config.selected_packages {
        for (i, name) in selected.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(invalid(
                    format!("selected_packages[{}] must not be empty", i),
                    "List short package names such as \"db\".",
                ));
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
