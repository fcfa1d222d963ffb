//! Data models for annotated syntax trees and structural diffs.
//!
//! These types describe what the external parser and tree-diff produce:
//! fully resolved [`Term`]s, single-position [`Patch`]es, and the [`Diff`]
//! tree that mixes unchanged nodes with leaf edits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Grammatical role of a syntax node.
///
/// The set is owned by the grammars; anything this crate has no special rule
/// for lands in [`Category::Other`] and is handled by default arms.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Function,
    Method,
    SingletonMethod,
    AnonymousFunction,
    ParseError,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Function => "Function",
            Category::Method => "Method",
            Category::SingletonMethod => "SingletonMethod",
            Category::AnonymousFunction => "AnonymousFunction",
            Category::ParseError => "ParseError",
            Category::Other(name) => name,
        }
    }

    /// Whether an unchanged node of this category names the edits nested in it.
    pub fn establishes_context(&self) -> bool {
        matches!(self, Category::Function | Category::Method)
    }

    /// Whether a directly edited node of this category is its own TOC entry.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Category::Function
                | Category::Method
                | Category::SingletonMethod
                | Category::AnonymousFunction
        )
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name {
            "Function" => Category::Function,
            "Method" => Category::Method,
            "SingletonMethod" => Category::SingletonMethod,
            "AnonymousFunction" => Category::AnonymousFunction,
            "ParseError" => Category::ParseError,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-based line/column position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Location of a node: byte range into its source plus line/column bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl SourceSpan {
    pub fn new(bytes: Range<usize>, start: SourcePos, end: SourcePos) -> Self {
        Self {
            start_byte: bytes.start,
            end_byte: bytes.end,
            start,
            end,
        }
    }

    /// Build a span for `bytes`, computing line/column bounds from `source`.
    pub fn from_bytes(source: &str, bytes: Range<usize>) -> Self {
        let start = position_to_line_col(source, bytes.start);
        let end = position_to_line_col(source, bytes.end);
        Self::new(bytes, start, end)
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    /// Compact line range label, e.g. `L1-L3`.
    pub fn line_range(&self) -> String {
        format!("L{}-L{}", self.start.line, self.end.line)
    }
}

/// Convert a byte offset to a 1-based line/column position.
pub fn position_to_line_col(source: &str, position: usize) -> SourcePos {
    let mut line = 1u32;
    let mut column = 1u32;

    for (i, c) in source.char_indices() {
        if i >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    SourcePos::new(line, column)
}

/// Node shapes, generic over the child type.
///
/// The same shape is used for resolved terms (`Syntax<Term>`) and for
/// unchanged nodes of a diff (`Syntax<Diff>`). Fields are declared in source
/// order, which is the order [`Syntax::children`] and [`Syntax::map`] visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub enum Syntax<T> {
    /// Identifiers, literals and other childless tokens.
    Leaf,
    Function {
        identifier: Box<T>,
        #[serde(default)]
        params: Vec<T>,
        #[serde(default)]
        body: Vec<T>,
    },
    Method {
        #[serde(default)]
        receiver: Option<Box<T>>,
        identifier: Box<T>,
        #[serde(default)]
        params: Vec<T>,
        #[serde(default)]
        body: Vec<T>,
    },
    ParameterDecl {
        identifier: Box<T>,
        #[serde(default)]
        ty: Option<Box<T>>,
    },
    /// Bracketed lists such as parameter or receiver lists.
    Indexed {
        #[serde(default)]
        items: Vec<T>,
    },
    /// Every other node kind.
    Branch {
        #[serde(default)]
        children: Vec<T>,
    },
}

impl<T> Syntax<T> {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&T> {
        match self {
            Syntax::Leaf => Vec::new(),
            Syntax::Function {
                identifier,
                params,
                body,
            } => std::iter::once(identifier.as_ref())
                .chain(params)
                .chain(body)
                .collect(),
            Syntax::Method {
                receiver,
                identifier,
                params,
                body,
            } => receiver
                .as_deref()
                .into_iter()
                .chain(std::iter::once(identifier.as_ref()))
                .chain(params)
                .chain(body)
                .collect(),
            Syntax::ParameterDecl { identifier, ty } => std::iter::once(identifier.as_ref())
                .chain(ty.as_deref())
                .collect(),
            Syntax::Indexed { items } => items.iter().collect(),
            Syntax::Branch { children } => children.iter().collect(),
        }
    }

    /// Apply `f` to every child in source order, keeping the shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Syntax<U> {
        fn map_all<T, U>(items: Vec<T>, f: &mut impl FnMut(T) -> U) -> Vec<U> {
            items.into_iter().map(f).collect()
        }

        match self {
            Syntax::Leaf => Syntax::Leaf,
            Syntax::Function {
                identifier,
                params,
                body,
            } => {
                let identifier = Box::new(f(*identifier));
                let params = map_all(params, &mut f);
                let body = map_all(body, &mut f);
                Syntax::Function {
                    identifier,
                    params,
                    body,
                }
            }
            Syntax::Method {
                receiver,
                identifier,
                params,
                body,
            } => {
                let receiver = receiver.map(|r| Box::new(f(*r)));
                let identifier = Box::new(f(*identifier));
                let params = map_all(params, &mut f);
                let body = map_all(body, &mut f);
                Syntax::Method {
                    receiver,
                    identifier,
                    params,
                    body,
                }
            }
            Syntax::ParameterDecl { identifier, ty } => {
                let identifier = Box::new(f(*identifier));
                let ty = ty.map(|t| Box::new(f(*t)));
                Syntax::ParameterDecl { identifier, ty }
            }
            Syntax::Indexed { items } => Syntax::Indexed {
                items: map_all(items, &mut f),
            },
            Syntax::Branch { children } => Syntax::Branch {
                children: map_all(children, &mut f),
            },
        }
    }

    /// Borrowing view of the same shape.
    pub fn as_ref(&self) -> Syntax<&T> {
        match self {
            Syntax::Leaf => Syntax::Leaf,
            Syntax::Function {
                identifier,
                params,
                body,
            } => Syntax::Function {
                identifier: Box::new(identifier.as_ref()),
                params: params.iter().collect(),
                body: body.iter().collect(),
            },
            Syntax::Method {
                receiver,
                identifier,
                params,
                body,
            } => Syntax::Method {
                receiver: receiver.as_deref().map(Box::new),
                identifier: Box::new(identifier.as_ref()),
                params: params.iter().collect(),
                body: body.iter().collect(),
            },
            Syntax::ParameterDecl { identifier, ty } => Syntax::ParameterDecl {
                identifier: Box::new(identifier.as_ref()),
                ty: ty.as_deref().map(Box::new),
            },
            Syntax::Indexed { items } => Syntax::Indexed {
                items: items.iter().collect(),
            },
            Syntax::Branch { children } => Syntax::Branch {
                children: children.iter().collect(),
            },
        }
    }
}

impl<T> Syntax<Option<T>> {
    /// `Some` only when every child is `Some`.
    pub fn transpose(self) -> Option<Syntax<T>> {
        fn all<T>(items: Vec<Option<T>>) -> Option<Vec<T>> {
            items.into_iter().collect()
        }

        Some(match self {
            Syntax::Leaf => Syntax::Leaf,
            Syntax::Function {
                identifier,
                params,
                body,
            } => Syntax::Function {
                identifier: Box::new((*identifier)?),
                params: all(params)?,
                body: all(body)?,
            },
            Syntax::Method {
                receiver,
                identifier,
                params,
                body,
            } => Syntax::Method {
                receiver: match receiver {
                    Some(r) => Some(Box::new((*r)?)),
                    None => None,
                },
                identifier: Box::new((*identifier)?),
                params: all(params)?,
                body: all(body)?,
            },
            Syntax::ParameterDecl { identifier, ty } => Syntax::ParameterDecl {
                identifier: Box::new((*identifier)?),
                ty: match ty {
                    Some(t) => Some(Box::new((*t)?)),
                    None => None,
                },
            },
            Syntax::Indexed { items } => Syntax::Indexed { items: all(items)? },
            Syntax::Branch { children } => Syntax::Branch {
                children: all(children)?,
            },
        })
    }
}

/// A fully resolved syntax node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub category: Category,
    pub span: SourceSpan,
    pub syntax: Syntax<Term>,
}

impl Term {
    pub fn new(category: Category, span: SourceSpan, syntax: Syntax<Term>) -> Self {
        Self {
            category,
            span,
            syntax,
        }
    }

    pub fn leaf(category: Category, span: SourceSpan) -> Self {
        Self::new(category, span, Syntax::Leaf)
    }
}

/// One edit at a single tree position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Patch<T> {
    Insert { after: T },
    Delete { before: T },
    Replace { before: T, after: T },
}

impl<T> Patch<T> {
    pub fn before(&self) -> Option<&T> {
        match self {
            Patch::Insert { .. } => None,
            Patch::Delete { before } | Patch::Replace { before, .. } => Some(before),
        }
    }

    pub fn after(&self) -> Option<&T> {
        match self {
            Patch::Delete { .. } => None,
            Patch::Insert { after } | Patch::Replace { after, .. } => Some(after),
        }
    }

    /// The side shown in reports: after for inserts and replacements,
    /// before for deletions.
    pub fn display(&self) -> &T {
        match self {
            Patch::Insert { after } | Patch::Replace { after, .. } => after,
            Patch::Delete { before } => before,
        }
    }

    /// Map each side with its own function.
    pub fn map_sides<U>(
        &self,
        mut before: impl FnMut(&T) -> U,
        mut after: impl FnMut(&T) -> U,
    ) -> Patch<U> {
        match self {
            Patch::Insert { after: a } => Patch::Insert { after: after(a) },
            Patch::Delete { before: b } => Patch::Delete { before: before(b) },
            Patch::Replace {
                before: b,
                after: a,
            } => Patch::Replace {
                before: before(b),
                after: after(a),
            },
        }
    }
}

/// A structural diff: unchanged nodes wrapping child diffs, with patches at
/// the leaves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diff {
    Node {
        category: Category,
        span: SourceSpan,
        syntax: Syntax<Diff>,
    },
    Leaf(Patch<Term>),
}

impl Diff {
    pub fn node(category: Category, span: SourceSpan, syntax: Syntax<Diff>) -> Self {
        Diff::Node {
            category,
            span,
            syntax,
        }
    }

    pub fn insert(after: Term) -> Self {
        Diff::Leaf(Patch::Insert { after })
    }

    pub fn delete(before: Term) -> Self {
        Diff::Leaf(Patch::Delete { before })
    }

    pub fn replace(before: Term, after: Term) -> Self {
        Diff::Leaf(Patch::Replace { before, after })
    }

    /// Lift an unchanged term into a diff with no edits.
    pub fn unchanged(term: Term) -> Self {
        Diff::Node {
            category: term.category,
            span: term.span,
            syntax: term.syntax.map(Diff::unchanged),
        }
    }

    /// Child diffs of an unchanged node; empty for leaf patches.
    pub fn children(&self) -> Vec<&Diff> {
        match self {
            Diff::Node { syntax, .. } => syntax.children(),
            Diff::Leaf(_) => Vec::new(),
        }
    }
}
