//! Diff input documents.
//!
//! A [`FileDiff`] carries one diffed file pair: both paths, both sources and
//! the structural diff between them. Sources are needed to name terms, since
//! terms only carry byte spans.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TocError};
use crate::summary::path_key;
use crate::types::Diff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    #[serde(default)]
    pub before_path: String,
    #[serde(default)]
    pub after_path: String,
    #[serde(default)]
    pub before_source: String,
    #[serde(default)]
    pub after_source: String,
    pub diff: Diff,
}

impl FileDiff {
    pub fn new(before_path: impl Into<String>, after_path: impl Into<String>, diff: Diff) -> Self {
        Self {
            before_path: before_path.into(),
            after_path: after_path.into(),
            before_source: String::new(),
            after_source: String::new(),
            diff,
        }
    }

    pub fn with_sources(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before_source = before.into();
        self.after_source = after.into();
        self
    }

    /// Key this file's summaries are grouped under.
    pub fn key(&self) -> String {
        path_key(&self.before_path, &self.after_path)
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| TocError::InvalidDiff {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a JSON diff document.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| TocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }
}
