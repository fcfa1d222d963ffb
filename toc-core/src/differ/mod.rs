//! Change extraction for structural diffs.
//!
//! This module turns a [`Diff`](crate::types::Diff) into the ordered list of
//! change records a table of contents is built from.
//!
//! # Pipeline
//!
//! - **Walking**: [`DiffWalker`] visits the diff post-order, naming each edit
//!   after the nearest enclosing function or method
//! - **Deduplication**: [`dedup`] collapses repeated and case-insensitively
//!   similar entries, keeping the first one seen
//!
//! # Example
//!
//! ```
//! use toc_core::differ::{dedup, DiffWalker};
//! use toc_core::types::{Category, Diff, SourceSpan, Syntax, Term};
//!
//! let after = "func add() {}";
//! let name = Term::leaf(
//!     Category::Other("Identifier".into()),
//!     SourceSpan::from_bytes(after, 5..8),
//! );
//! let add = Term::new(
//!     Category::Function,
//!     SourceSpan::from_bytes(after, 0..after.len()),
//!     Syntax::Function { identifier: Box::new(name), params: vec![], body: vec![] },
//! );
//!
//! let records = dedup(DiffWalker::new("", after).walk(&Diff::insert(add)));
//! assert_eq!(records[0].context.as_ref().map(|c| c.name()), Some("add"));
//! ```

pub mod changes;
pub mod dedup;
pub mod walker;

pub use changes::{ChangeRecord, ChangeType, DiffInfo, SummarizableInfo};
pub use dedup::dedup;
pub use walker::DiffWalker;
