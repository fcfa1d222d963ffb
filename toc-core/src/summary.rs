//! Table-of-contents output documents.
//!
//! Surviving change records become [`OutputSummary`] values, grouped under a
//! key built from the before/after paths into a [`TocSummary`]:
//!
//! ```json
//! {
//!   "changes": {
//!     "a.go": [{"changeType": "added", "category": "Function", "term": "add", "span": "L1-L3"}]
//!   },
//!   "errors": { "a.go": [{"error": "func ((", "span": "L5-L5"}] }
//! }
//! ```
//!
//! Empty buckets are left out of the document entirely.

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::differ::changes::{ChangeRecord, ChangeType};
use crate::types::{Category, SourceSpan};

/// Categories reported under another category's label.
static CATEGORY_LABELS: Lazy<HashMap<Category, &'static str>> =
    Lazy::new(|| HashMap::from([(Category::SingletonMethod, "Method")]));

/// Label a category is reported under.
pub fn category_label(category: &Category) -> &str {
    CATEGORY_LABELS
        .get(category)
        .copied()
        .unwrap_or_else(|| category.as_str())
}

/// Key grouping the summaries of one file pair.
pub fn path_key(before: &str, after: &str) -> String {
    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_string(),
        (_, true) => before.to_string(),
        _ if before == after => after.to_string(),
        _ => format!("{} -> {}", before, after),
    }
}

fn serialize_label<S: Serializer>(category: &Category, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(category_label(category))
}

fn serialize_line_range<S: Serializer>(
    span: &SourceSpan,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&span.line_range())
}

/// A reported change to a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub change_type: ChangeType,
    #[serde(serialize_with = "serialize_label")]
    pub category: Category,
    #[serde(rename = "term")]
    pub name: String,
    #[serde(serialize_with = "serialize_line_range")]
    pub span: SourceSpan,
}

/// A region the parser could not make sense of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(serialize_with = "serialize_line_range")]
    pub span: SourceSpan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputSummary {
    Content(ContentSummary),
    Error(ErrorSummary),
}

impl OutputSummary {
    /// Summary for a record: errors for unparseable regions, the context for
    /// everything else, nothing for context-less edits.
    pub fn from_record(record: &ChangeRecord) -> Option<Self> {
        let info = record.info();
        if info.is_error() {
            return Some(OutputSummary::Error(ErrorSummary {
                message: info.name.clone(),
                span: info.span,
            }));
        }

        record.context.as_ref().map(|context| {
            OutputSummary::Content(ContentSummary {
                change_type: context.change_type(),
                category: context.category().clone(),
                name: context.name().to_string(),
                span: *context.span(),
            })
        })
    }
}

/// Summaries grouped by path key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TocSummary {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub changes: BTreeMap<String, Vec<ContentSummary>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<ErrorSummary>>,
}

impl TocSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit and group `records` under `key`.
    pub fn from_records(key: &str, records: &[ChangeRecord]) -> Self {
        let mut summary = Self::new();
        for output in records.iter().filter_map(OutputSummary::from_record) {
            summary.push(key, output);
        }
        summary
    }

    pub fn push(&mut self, key: &str, output: OutputSummary) {
        match output {
            OutputSummary::Content(content) => self
                .changes
                .entry(key.to_string())
                .or_default()
                .push(content),
            OutputSummary::Error(error) => {
                self.errors.entry(key.to_string()).or_default().push(error)
            }
        }
    }

    /// Append another summary, key by key.
    pub fn merge(&mut self, other: TocSummary) {
        for (key, changes) in other.changes {
            self.changes.entry(key).or_default().extend(changes);
        }
        for (key, errors) in other.errors {
            self.errors.entry(key).or_default().extend(errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.errors.is_empty()
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::new();
        for change in self.changes.values().flatten() {
            counts.record(change.change_type);
        }
        counts.errors = self.errors.values().map(Vec::len).sum::<usize>() as u32;
        counts
    }
}

/// Tally of reported changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    pub added: u32,
    pub removed: u32,
    pub modified: u32,
    pub errors: u32,
}

impl ChangeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change_type: ChangeType) {
        match change_type {
            ChangeType::Added => self.added += 1,
            ChangeType::Removed => self.removed += 1,
            ChangeType::Modified => self.modified += 1,
        }
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("{} removed", self.removed));
        }
        if self.modified > 0 {
            parts.push(format!("{} modified", self.modified));
        }
        if self.errors > 0 {
            parts.push(format!("{} parse errors", self.errors));
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}
