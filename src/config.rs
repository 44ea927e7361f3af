/// Configuration module for the documentation server.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_docs_path_segments() -> Vec<String> {
    vec!["versioned_docs".to_string(), "version-v6.0.0".to_string()]
}

fn default_search_top_k() -> usize {
    5
}

fn default_true() -> bool {
    true
}

// ── Config struct ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Documentation directory, resolved relative to the working directory.
    /// Tried before any other candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_base_path: Option<String>,

    /// Absolute documentation directory, tried when the base path is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_fallback_path: Option<String>,

    /// Path segments appended to ancestor directories when probing for the
    /// versioned documentation tree.
    #[serde(default = "default_docs_path_segments")]
    pub docs_path_segments: Vec<String>,

    /// Default result count for the search tool.
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// When true, a missing documentation root aborts startup. When false,
    /// the server starts with an empty index.
    #[serde(default = "default_true")]
    pub require_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_base_path: None,
            docs_fallback_path: None,
            docs_path_segments: default_docs_path_segments(),
            search_top_k: default_search_top_k(),
            require_docs: true,
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and optionally
    /// generates a template file.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            // Generate template only for the default path
            if path == "config.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.search_top_k > 0, "search_top_k must be positive");
        anyhow::ensure!(
            !self.docs_path_segments.is_empty(),
            "docs_path_segments must not be empty"
        );
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
