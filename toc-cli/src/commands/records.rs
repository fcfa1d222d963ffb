//! Records command - inspect the change records behind a summary
//!
//! Shows every edit found in one diff together with the declaration it was
//! attributed to. Useful when a summary entry is missing or unexpected.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use toc_core::differ::{ChangeRecord, ChangeType};

use crate::commands::load_diff;
use crate::output::{Output, OutputConfig, TableDisplay};

#[derive(Debug, Serialize)]
pub struct RecordsResult {
    pub key: String,
    /// Records are shown before deduplication.
    pub raw: bool,
    pub records: Vec<ChangeRecord>,
}

impl TableDisplay for RecordsResult {
    fn to_table(&self) -> String {
        let mut output = String::new();

        let stage = if self.raw { "raw" } else { "deduplicated" };
        output.push_str(&format!(
            "{} {} ({} {} records)\n\n",
            "RECORDS:".cyan().bold(),
            self.key.bold(),
            self.records.len(),
            stage
        ));

        for record in &self.records {
            let info = record.info();
            let marker = match record.change_type() {
                ChangeType::Added => "+".green(),
                ChangeType::Removed => "-".red(),
                ChangeType::Modified => "~".yellow(),
            };
            let category = match &info.category {
                Some(category) => category.to_string(),
                None => "ParseError".to_string(),
            };

            output.push_str(&format!(
                "  {} {} [{}] {}\n",
                marker,
                info.name.lines().next().unwrap_or(""),
                category,
                info.span.line_range().dimmed()
            ));

            match &record.context {
                Some(context) => output.push_str(&format!(
                    "      in {} {} ({})\n",
                    context.category(),
                    context.name().cyan(),
                    context.change_type()
                )),
                None => output.push_str(&format!("      {}\n", "no context".dimmed())),
            }
        }

        output
    }
}

/// Run the records command.
pub async fn run(path: &Path, raw: bool, config: OutputConfig) -> anyhow::Result<()> {
    let diff = load_diff(path).await?;

    let records = if raw {
        toc_core::raw_change_records(&diff)
    } else {
        toc_core::change_records(&diff)
    };

    let result = RecordsResult {
        key: diff.key(),
        raw,
        records,
    };

    Output::with_config(result, config).render()
}
