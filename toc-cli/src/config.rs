//! TOC configuration loading from `.tocrc.toml`.
//!
//! Configuration is optional. Missing sections and keys fall back to
//! defaults, and command-line flags override anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [output]
//! format = "json"
//! color = false
//! compact = true
//!
//! [summary]
//! threads = 4
//! ```

use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = ".tocrc.toml";

/// Root configuration structure loaded from `.tocrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct TocConfig {
    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Summarization settings.
    #[serde(default)]
    pub summary: SummarySettings,
}

/// Output formatting preferences.
///
/// Distinct from the runtime `OutputConfig` in the output module, which
/// handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,

    /// Single-line JSON.
    #[serde(default)]
    pub compact: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummarySettings {
    /// Rayon threads for multi-file summaries. Unset uses one per CPU.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl TocConfig {
    /// Load configuration from `.tocrc.toml` in the given directory.
    ///
    /// Read and parse errors are logged as warnings and yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    pub fn compact(&self) -> bool {
        self.output.compact
    }

    pub fn threads(&self) -> Option<usize> {
        self.summary.threads
    }
}
