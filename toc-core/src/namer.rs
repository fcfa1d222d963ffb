//! Display names for resolved syntax nodes.
//!
//! Functions and methods are named by their declared identifier, methods with
//! a receiver are qualified by it, and everything else falls back to the
//! source text the node spans.

use crate::types::{Syntax, Term};

/// Names terms against the source text they were parsed from.
#[derive(Clone, Copy, Debug)]
pub struct TermNamer<'a> {
    source: &'a str,
}

impl<'a> TermNamer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Display name for a fully resolved term.
    pub fn name(&self, term: &Term) -> String {
        match &term.syntax {
            Syntax::Function { identifier, .. } => self.name(identifier),
            Syntax::Method {
                receiver: None,
                identifier,
                ..
            } => self.name(identifier),
            Syntax::Method {
                receiver: Some(receiver),
                identifier,
                ..
            } => {
                let method = self.name(identifier);
                match typed_receiver(receiver) {
                    Some(ty) => format!("({}) {}", self.name(ty), method),
                    None => format!("{}.{}", self.text(receiver), method),
                }
            }
            _ => self.text(term).to_string(),
        }
    }

    /// Source text spanned by a term, or `""` when the span does not fit the
    /// source.
    pub fn text(&self, term: &Term) -> &'a str {
        self.source.get(term.span.byte_range()).unwrap_or("")
    }
}

/// The type of a receiver that is a single, explicitly typed parameter.
fn typed_receiver(receiver: &Term) -> Option<&Term> {
    let param = match &receiver.syntax {
        Syntax::Indexed { items } if items.len() == 1 => &items[0],
        Syntax::ParameterDecl { .. } => receiver,
        _ => return None,
    };

    match &param.syntax {
        Syntax::ParameterDecl { ty: Some(ty), .. } => Some(ty.as_ref()),
        _ => None,
    }
}
