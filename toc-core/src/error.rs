//! Error types for toc-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for toc-core operations.
pub type Result<T> = std::result::Result<T, TocError>;

/// Errors raised while loading diff input.
///
/// Summarization itself never fails; only reading input does.
#[derive(Error, Debug)]
pub enum TocError {
    /// Input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a valid file diff document.
    #[error("Invalid diff document {}: {source}", path.display())]
    InvalidDiff {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TocError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            TocError::Io { path, .. } | TocError::InvalidDiff { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = TocError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert_eq!(err.to_string(), "Failed to read missing.json: not found");
        assert_eq!(err.path(), std::path::Path::new("missing.json"));
    }
}
