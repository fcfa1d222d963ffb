//! Change records produced by walking a diff.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Category, Patch, SourceSpan};

/// Type of change detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
        }
    }

    /// Change type implied by the kind of patch.
    pub fn of<T>(patch: &Patch<T>) -> Self {
        match patch {
            Patch::Insert { .. } => ChangeType::Added,
            Patch::Delete { .. } => ChangeType::Removed,
            Patch::Replace { .. } => ChangeType::Modified,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one side of a patch looks like in a report.
///
/// A missing category marks a region the parser could not make sense of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffInfo {
    pub category: Option<Category>,
    pub name: String,
    pub span: SourceSpan,
}

impl DiffInfo {
    pub fn new(category: Option<Category>, name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            category,
            name: name.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category.is_none()
    }
}

/// The declaration a change is reported under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarizableInfo {
    /// A declaration that was itself edited; always emitted.
    Summarizable {
        category: Category,
        name: String,
        span: SourceSpan,
        change_type: ChangeType,
    },
    /// An unchanged declaration enclosing an edit; naming context only.
    InSummarizable {
        category: Category,
        name: String,
        span: SourceSpan,
    },
}

impl SummarizableInfo {
    pub fn category(&self) -> &Category {
        match self {
            SummarizableInfo::Summarizable { category, .. }
            | SummarizableInfo::InSummarizable { category, .. } => category,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SummarizableInfo::Summarizable { name, .. }
            | SummarizableInfo::InSummarizable { name, .. } => name,
        }
    }

    pub fn span(&self) -> &SourceSpan {
        match self {
            SummarizableInfo::Summarizable { span, .. }
            | SummarizableInfo::InSummarizable { span, .. } => span,
        }
    }

    /// Change type to report; enclosing contexts are reported as modified.
    pub fn change_type(&self) -> ChangeType {
        match self {
            SummarizableInfo::Summarizable { change_type, .. } => *change_type,
            SummarizableInfo::InSummarizable { .. } => ChangeType::Modified,
        }
    }

    /// Same category and a case-insensitively equal name.
    pub fn is_similar(&self, other: &SummarizableInfo) -> bool {
        self.category() == other.category()
            && self.name().to_lowercase() == other.name().to_lowercase()
    }
}

/// One structural edit paired with the nearest enclosing declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub patch: Patch<DiffInfo>,
    pub context: Option<SummarizableInfo>,
}

impl ChangeRecord {
    pub fn new(patch: Patch<DiffInfo>, context: Option<SummarizableInfo>) -> Self {
        Self { patch, context }
    }

    /// The side of the patch used for reporting.
    pub fn info(&self) -> &DiffInfo {
        self.patch.display()
    }

    pub fn change_type(&self) -> ChangeType {
        ChangeType::of(&self.patch)
    }

    /// Attach `context` unless a nearer one is already set.
    pub fn fill_context(&mut self, context: &SummarizableInfo) {
        if self.context.is_none() {
            self.context = Some(context.clone());
        }
    }
}
