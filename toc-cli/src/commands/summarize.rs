//! Summarize command - table of contents for one or more diffs
//!
//! Loads each diff document, summarizes them in parallel and prints the
//! merged table of contents.

use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use serde::Serialize;
use toc_core::differ::ChangeType;
use toc_core::summary::{category_label, TocSummary};

use crate::commands::load_diff;
use crate::output::{Output, OutputConfig, TableDisplay};

/// Summary of every input, serialized as the bare document.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SummarizeResult {
    pub summary: TocSummary,
    #[serde(skip)]
    pub files: usize,
    #[serde(skip)]
    pub duration_ms: u64,
}

impl TableDisplay for SummarizeResult {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} files ({}ms)\n\n",
            "TOC:".cyan().bold(),
            self.files,
            self.duration_ms
        ));

        if self.summary.is_empty() {
            output.push_str(&format!("{}\n", "No declarations changed.".dimmed()));
            return output;
        }

        let keys = self
            .summary
            .changes
            .keys()
            .chain(self.summary.errors.keys())
            .collect::<std::collections::BTreeSet<_>>();

        for key in keys {
            output.push_str(&format!("{}\n", key.bold()));

            for change in self.summary.changes.get(key).into_iter().flatten() {
                let label = format!("[{}]", category_label(&change.category));
                let line = match change.change_type {
                    ChangeType::Added => format!("  + {}", change.name.green()),
                    ChangeType::Removed => format!("  - {}", change.name.red()),
                    ChangeType::Modified => format!("  ~ {}", change.name.yellow()),
                };
                output.push_str(&format!(
                    "{} {} {}\n",
                    line,
                    label,
                    change.span.line_range().dimmed()
                ));
            }

            for error in self.summary.errors.get(key).into_iter().flatten() {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "!".red().bold(),
                    error.span.line_range().dimmed(),
                    error.message.lines().next().unwrap_or("").red()
                ));
            }

            output.push('\n');
        }

        output.push_str(&self.summary.counts().text());
        output
    }
}

/// Run the summarize command.
pub async fn run(
    paths: &[PathBuf],
    threads: Option<usize>,
    config: OutputConfig,
) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut diffs = Vec::with_capacity(paths.len());
    for path in paths {
        diffs.push(load_diff(path).await?);
    }

    let summary =
        tokio::task::spawn_blocking(move || toc_core::summarize_all(&diffs, threads)).await?;

    let result = SummarizeResult {
        summary,
        files: paths.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    Output::with_config(result, config).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toc_core::summary::{ContentSummary, ErrorSummary};
    use toc_core::types::{Category, SourcePos, SourceSpan};

    fn span(start: u32, end: u32) -> SourceSpan {
        SourceSpan::new(0..1, SourcePos::new(start, 1), SourcePos::new(end, 1))
    }

    fn result() -> SummarizeResult {
        let mut summary = TocSummary::new();
        summary.changes.insert(
            "a.go".to_string(),
            vec![ContentSummary {
                change_type: ChangeType::Added,
                category: Category::SingletonMethod,
                name: "Server.start".to_string(),
                span: span(1, 3),
            }],
        );
        summary.errors.insert(
            "b.go".to_string(),
            vec![ErrorSummary {
                message: "func ((\nmore".to_string(),
                span: span(4, 5),
            }],
        );
        SummarizeResult {
            summary,
            files: 2,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_json_is_bare_document() {
        let json = serde_json::to_value(result()).unwrap();

        assert_eq!(json["changes"]["a.go"][0]["category"], "Method");
        assert_eq!(json["errors"]["b.go"][0]["span"], "L4-L5");
        assert!(json.get("files").is_none());
    }

    #[test]
    fn test_table_lists_every_key() {
        colored::control::set_override(false);
        let table = TableDisplay::to_table(&result());

        assert!(table.contains("a.go\n  + Server.start [Method] L1-L3"));
        assert!(table.contains("b.go\n  ! L4-L5 func (("));
        assert!(table.ends_with("1 added, 1 parse errors"));
    }

    #[test]
    fn test_table_empty() {
        colored::control::set_override(false);
        let table = TableDisplay::to_table(&SummarizeResult {
            summary: TocSummary::new(),
            files: 1,
            duration_ms: 0,
        });

        assert!(table.contains("No declarations changed."));
    }
}
