//! Diff traversal producing change records.
//!
//! The walk is post-order: a node only decides whether it names the edits
//! below it once every child has been walked and resolved to its after-side.

use tracing::trace;

use crate::differ::changes::{ChangeRecord, ChangeType, DiffInfo, SummarizableInfo};
use crate::namer::TermNamer;
use crate::types::{Category, Diff, Patch, Term};

/// Walks a [`Diff`] against the before and after source texts.
#[derive(Clone, Copy, Debug)]
pub struct DiffWalker<'a> {
    before: TermNamer<'a>,
    after: TermNamer<'a>,
}

/// Result of walking one subtree.
struct Walked {
    /// The subtree resolved to its after-side, if every leaf has one.
    resolved: Option<Term>,
    records: Vec<ChangeRecord>,
}

impl<'a> DiffWalker<'a> {
    pub fn new(before_source: &'a str, after_source: &'a str) -> Self {
        Self {
            before: TermNamer::new(before_source),
            after: TermNamer::new(after_source),
        }
    }

    /// Change records for every edit in `diff`, in document order.
    pub fn walk(&self, diff: &Diff) -> Vec<ChangeRecord> {
        self.walk_subtree(diff).records
    }

    fn walk_subtree(&self, diff: &Diff) -> Walked {
        match diff {
            Diff::Leaf(patch) => Walked {
                resolved: patch.after().cloned(),
                records: vec![self.leaf_record(patch)],
            },
            Diff::Node {
                category,
                span,
                syntax,
            } => {
                let mut records = Vec::new();
                let resolved = syntax
                    .as_ref()
                    .map(|child| {
                        let walked = self.walk_subtree(child);
                        records.extend(walked.records);
                        walked.resolved
                    })
                    .transpose()
                    .map(|syntax| Term::new(category.clone(), *span, syntax));

                if category.establishes_context() {
                    match &resolved {
                        Some(term) => {
                            let context = SummarizableInfo::InSummarizable {
                                category: category.clone(),
                                name: self.after.name(term),
                                span: *span,
                            };
                            for record in &mut records {
                                record.fill_context(&context);
                            }
                        }
                        None => trace!(
                            %category,
                            line = span.start.line,
                            "declaration has children without an after-side, skipping context"
                        ),
                    }
                }

                Walked { resolved, records }
            }
        }
    }

    fn leaf_record(&self, patch: &Patch<Term>) -> ChangeRecord {
        let infos = patch.map_sides(
            |term| diff_info(&self.before, term),
            |term| diff_info(&self.after, term),
        );

        let shown = infos.display();
        let context = match &shown.category {
            Some(category) if category.is_declaration() => Some(SummarizableInfo::Summarizable {
                category: category.clone(),
                name: shown.name.clone(),
                span: shown.span,
                change_type: ChangeType::of(patch),
            }),
            _ => None,
        };

        ChangeRecord::new(infos, context)
    }
}

fn diff_info(namer: &TermNamer<'_>, term: &Term) -> DiffInfo {
    let category = match &term.category {
        Category::ParseError => None,
        category => Some(category.clone()),
    };
    DiffInfo::new(category, namer.name(term), term.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceSpan, Syntax};

    fn other(name: &str) -> Category {
        Category::Other(name.to_string())
    }

    fn span_of(source: &str, needle: &str) -> SourceSpan {
        let start = source.find(needle).expect("needle should occur in source");
        SourceSpan::from_bytes(source, start..start + needle.len())
    }

    fn leaf(source: &str, category: &str, needle: &str) -> Term {
        Term::leaf(other(category), span_of(source, needle))
    }

    fn function_term(source: &str, whole: &str, name: &str, body: Vec<Term>) -> Term {
        Term::new(
            Category::Function,
            span_of(source, whole),
            Syntax::Function {
                identifier: Box::new(leaf(source, "Identifier", name)),
                params: vec![],
                body,
            },
        )
    }

    fn function_node(source: &str, whole: &str, name: &str, body: Vec<Diff>) -> Diff {
        Diff::node(
            Category::Function,
            span_of(source, whole),
            Syntax::Function {
                identifier: Box::new(Diff::unchanged(leaf(source, "Identifier", name))),
                params: vec![],
                body,
            },
        )
    }

    fn program(source: &str, children: Vec<Diff>) -> Diff {
        Diff::node(
            other("Program"),
            SourceSpan::from_bytes(source, 0..source.len()),
            Syntax::Branch { children },
        )
    }

    fn context_name(record: &ChangeRecord) -> Option<&str> {
        record.context.as_ref().map(|c| c.name())
    }

    #[test]
    fn test_inserted_function_is_summarizable() {
        let before = "";
        let after = "func add() {\n  return 1\n}\n";
        let add = function_term(after, "func add() {\n  return 1\n}", "add", vec![]);
        let diff = program(after, vec![Diff::insert(add)]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        match &records[0].context {
            Some(SummarizableInfo::Summarizable {
                category,
                name,
                span,
                change_type,
            }) => {
                assert_eq!(*category, Category::Function);
                assert_eq!(name, "add");
                assert_eq!(span.line_range(), "L1-L3");
                assert_eq!(*change_type, ChangeType::Added);
            }
            unexpected => panic!("expected summarizable context, got {:?}", unexpected),
        }
    }

    #[test]
    fn test_nested_edit_takes_enclosing_function_context() {
        let before = "func add() {\n  return 1\n}\n";
        let after = "func add() {\n  return 2\n}\n";
        let whole = "func add() {\n  return 1\n}";
        let body = Diff::node(
            other("Return"),
            span_of(before, "return 1"),
            Syntax::Branch {
                children: vec![Diff::replace(
                    leaf(before, "Integer", "1"),
                    leaf(after, "Integer", "2"),
                )],
            },
        );
        let diff = program(after, vec![function_node(before, whole, "add", vec![body])]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(
            record.context,
            Some(SummarizableInfo::InSummarizable {
                category: Category::Function,
                name: "add".to_string(),
                span: span_of(before, whole),
            })
        );
        assert_eq!(record.info().name, "2");
        assert_eq!(record.patch.before().map(|i| i.name.as_str()), Some("1"));
    }

    #[test]
    fn test_deleted_child_suppresses_context() {
        let before = "func run() {\n  setup()\n  go()\n}\n";
        let after = "func run() {\n  go()\n}\n";
        let diff = program(
            after,
            vec![function_node(
                after,
                "func run() {\n  go()\n}",
                "run",
                vec![
                    Diff::delete(leaf(before, "Call", "setup()")),
                    Diff::unchanged(leaf(after, "Call", "go()")),
                ],
            )],
        );

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, None);
        assert_eq!(records[0].info().name, "setup()");
        assert_eq!(records[0].change_type(), ChangeType::Removed);
    }

    #[test]
    fn test_inserted_sibling_keeps_context() {
        let before = "func run() {\n  go()\n}\n";
        let after = "func run() {\n  setup()\n  go()\n}\n";
        let diff = program(
            after,
            vec![function_node(
                after,
                "func run() {\n  setup()\n  go()\n}",
                "run",
                vec![
                    Diff::insert(leaf(after, "Call", "setup()")),
                    Diff::unchanged(leaf(after, "Call", "go()")),
                ],
            )],
        );

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(context_name(&records[0]), Some("run"));
    }

    #[test]
    fn test_nearest_context_wins() {
        let source = "func outer() {\n  func inner() {\n    x()\n  }\n}\n";
        let edited = "func outer() {\n  func inner() {\n    y()\n  }\n}\n";
        let inner = function_node(
            source,
            "func inner() {\n    x()\n  }",
            "inner",
            vec![Diff::replace(
                leaf(source, "Call", "x()"),
                leaf(edited, "Call", "y()"),
            )],
        );
        let outer = function_node(source, "func outer() {", "outer", vec![inner]);
        let diff = program(source, vec![outer]);

        let records = DiffWalker::new(source, edited).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(context_name(&records[0]), Some("inner"));
    }

    #[test]
    fn test_edited_declaration_keeps_own_context() {
        let before = "func outer() {\n}\n";
        let after = "func outer() {\n  func helper() {}\n}\n";
        let helper = function_term(after, "func helper() {}", "helper", vec![]);
        let diff = program(
            after,
            vec![function_node(
                after,
                "func outer() {\n  func helper() {}\n}",
                "outer",
                vec![Diff::insert(helper)],
            )],
        );

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert!(matches!(
            &records[0].context,
            Some(SummarizableInfo::Summarizable { name, change_type: ChangeType::Added, .. })
                if name == "helper"
        ));
    }

    #[test]
    fn test_deleted_function_named_from_before_source() {
        let before = "func gone() {}\n";
        let after = "\n";
        let gone = function_term(before, "func gone() {}", "gone", vec![]);
        let diff = program(after, vec![Diff::delete(gone)]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(context_name(&records[0]), Some("gone"));
        assert_eq!(
            records[0].context.as_ref().map(|c| c.change_type()),
            Some(ChangeType::Removed)
        );
    }

    #[test]
    fn test_parse_error_leaf_has_no_category() {
        let before = "";
        let after = "func (( {\n";
        let error = Term::leaf(Category::ParseError, span_of(after, "func (( {"));
        let diff = program(after, vec![Diff::insert(error)]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert!(records[0].info().is_error());
        assert_eq!(records[0].info().name, "func (( {");
        assert_eq!(records[0].context, None);
    }

    #[test]
    fn test_method_context_uses_receiver_type() {
        let before = "func (s Server) Start() {\n  a()\n}\n";
        let after = "func (s Server) Start() {\n  b()\n}\n";
        let param = Term::new(
            other("ParameterDecl"),
            span_of(before, "s Server"),
            Syntax::ParameterDecl {
                identifier: Box::new(leaf(before, "Identifier", "s")),
                ty: Some(Box::new(leaf(before, "Identifier", "Server"))),
            },
        );
        let receiver = Term::new(
            other("Params"),
            span_of(before, "(s Server)"),
            Syntax::Indexed { items: vec![param] },
        );
        let method = Diff::node(
            Category::Method,
            span_of(before, "func (s Server) Start() {\n  a()\n}"),
            Syntax::Method {
                receiver: Some(Box::new(Diff::unchanged(receiver))),
                identifier: Box::new(Diff::unchanged(leaf(before, "Identifier", "Start"))),
                params: vec![],
                body: vec![Diff::replace(
                    leaf(before, "Call", "a()"),
                    leaf(after, "Call", "b()"),
                )],
            },
        );
        let diff = program(after, vec![method]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(context_name(&records[0]), Some("(Server) Start"));
    }

    #[test]
    fn test_anonymous_function_does_not_establish_context() {
        let before = "f := func() { a() }\n";
        let after = "f := func() { b() }\n";
        let lambda = Diff::node(
            Category::AnonymousFunction,
            span_of(before, "func() { a() }"),
            Syntax::Branch {
                children: vec![Diff::replace(
                    leaf(before, "Call", "a()"),
                    leaf(after, "Call", "b()"),
                )],
            },
        );
        let diff = program(after, vec![lambda]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].context, None);
    }

    #[test]
    fn test_directly_edited_anonymous_function_is_summarizable() {
        let before = "";
        let after = "go func() {}()\n";
        let lambda = Term::new(
            Category::AnonymousFunction,
            span_of(after, "func() {}"),
            Syntax::Branch { children: vec![] },
        );
        let diff = program(after, vec![Diff::insert(lambda)]);

        let records = DiffWalker::new(before, after).walk(&diff);

        assert!(matches!(
            records[0].context.as_ref().map(|c| c.category()),
            Some(Category::AnonymousFunction)
        ));
    }

    #[test]
    fn test_records_in_document_order() {
        let before = "";
        let after = "func alpha() {}\nfunc beta() {}\nfunc gamma() {}\n";
        let diff = program(
            after,
            ["alpha", "beta", "gamma"]
                .iter()
                .map(|name| {
                    let whole = format!("func {}() {{}}", name);
                    Diff::insert(function_term(after, &whole, name, vec![]))
                })
                .collect(),
        );

        let records = DiffWalker::new(before, after).walk(&diff);
        let names: Vec<_> = records.iter().filter_map(context_name).collect();

        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }
}
