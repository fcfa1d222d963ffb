//! Command implementations for the TOC CLI
//!
//! Each command module provides a `run` function that executes the command logic.

use std::path::Path;

use anyhow::Context;
use toc_core::input::FileDiff;

pub mod records;
pub mod summarize;

/// Read and parse one diff document.
pub async fn load_diff(path: &Path) -> anyhow::Result<FileDiff> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read diff file {}", path.display()))?;
    let diff = FileDiff::from_json(path, &json)?;
    tracing::debug!(path = %path.display(), key = %diff.key(), "loaded diff");
    Ok(diff)
}
