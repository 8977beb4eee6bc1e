//! Command assembly.
//!
//! Walks each structural declaration's tokens from the root, reusing nodes
//! already on the path and creating the rest. A node whose name matches but
//! whose kind differs stops the declaration with a merge conflict.

use tracing::{debug, trace};

use crate::error::{Diagnostic, ErrorKind};
use crate::foundation::{Annotation, Declaration, Element, Identity};
use crate::lexer::{self, Token};
use crate::tree::{ArgumentMeta, Meta, NodeId};
use crate::Environment;

use super::lex_errors;

/// Assembles one `Command`, `Literal` or `Argument` declaration.
pub(crate) fn assemble(environment: &mut Environment, declaration: &Declaration) {
    let site = &declaration.element;

    match &declaration.annotation {
        Annotation::Command { path } => {
            match environment.lexer_mut().lex(path) {
                Ok(tokens) => walk(environment, site, path, &tokens, None),
                Err(errors) => lex_errors(environment, site, path, errors),
            }
        }

        Annotation::Literal { namespace, aliases } => {
            let text = match lexer::join(namespace) {
                Ok(text) => text,
                Err(errors) => return lex_errors(environment, site, &namespace.join(" "), errors),
            };
            let tokens = match environment.lexer_mut().lex_aliased(&text, aliases) {
                Ok(tokens) => tokens,
                Err(errors) => return lex_errors(environment, site, &text, errors),
            };

            if let Some(last) = tokens.last().filter(|t| t.identity.is_argument()) {
                let diagnostic = Diagnostic::error(
                    ErrorKind::Lex,
                    site.clone(),
                    format!("\"{}\" is declared as a literal", last.identity),
                )
                .with_snippet(text.as_str(), last.span.clone());
                environment.report(diagnostic);
                return;
            }

            walk(environment, site, &text, &tokens, None);
        }

        Annotation::Argument {
            namespace,
            type_name,
            suggestions,
        } => {
            let text = match lexer::join(namespace) {
                Ok(text) => text,
                Err(errors) => return lex_errors(environment, site, &namespace.join(" "), errors),
            };
            let mut tokens = match environment.lexer_mut().lex(&text) {
                Ok(tokens) => tokens.to_vec(),
                Err(errors) => return lex_errors(environment, site, &text, errors),
            };

            // The final segment names the argument, bracketed or not
            if let Some(last) = tokens.last_mut() {
                last.identity = Identity::argument(last.identity.name.clone());
            }

            let meta = ArgumentMeta::typed(type_name.as_str(), suggestions.clone());
            walk(environment, site, &text, &tokens, Some(meta));
        }

        Annotation::Bind { .. } => {}
    }
}

/// Merges `tokens` into the tree. `meta` applies to the final token.
fn walk(
    environment: &mut Environment,
    site: &Element,
    text: &str,
    tokens: &[Token],
    meta: Option<ArgumentMeta>,
) {
    let mut parent = NodeId::ROOT;

    for (i, token) in tokens.iter().enumerate() {
        let last = i + 1 == tokens.len();
        let incoming = match (&meta, last) {
            (Some(meta), true) => Meta::Argument(meta.clone()),
            _ => Meta::of(token.identity.kind),
        };

        let tree = environment.tree();
        let node = match tree.find(parent, &token.identity.name) {
            Some(existing) => {
                let existing = tree.primary(existing);
                let found = tree.node(existing).identity();
                if found.kind != token.identity.kind {
                    let message = format!(
                        "{} \"{}\" conflicts with existing {} \"{}\"",
                        token.identity.kind,
                        token.identity,
                        found.kind,
                        tree.path(existing),
                    );
                    let diagnostic = Diagnostic::error(ErrorKind::MergeConflict, site.clone(), message)
                        .with_snippet(text, token.span.clone());
                    environment.report(diagnostic);
                    return;
                }

                if let Meta::Argument(incoming) = &incoming {
                    if let Err(conflict) = environment.tree_mut().merge_argument(existing, incoming) {
                        let diagnostic = Diagnostic::error(
                            ErrorKind::MergeConflict,
                            site.clone(),
                            format!("\"{}\": {}", environment.tree().path(existing), conflict),
                        )
                        .with_snippet(text, token.span.clone());
                        environment.report(diagnostic);
                        return;
                    }
                }

                trace!(node = ?existing, identity = %token.identity, "reused");
                existing
            }
            None => environment.tree_mut().insert(
                parent,
                token.identity.clone(),
                incoming,
                Some(site.clone()),
            ),
        };

        for alias in &token.aliases {
            match environment.tree_mut().alias(node, alias) {
                Ok(created) => {
                    trace!(node = ?node, alias = %alias, created, "alias");
                }
                Err(conflict) => {
                    let diagnostic =
                        Diagnostic::error(ErrorKind::MergeConflict, site.clone(), conflict.to_string())
                            .with_snippet(text, token.span.clone());
                    environment.report(diagnostic);
                }
            }
        }

        environment.enter_scope(site, node);
        parent = node;
    }

    debug!(site = %site, path = %environment.tree().path(parent), "command declared");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(environment: &mut Environment, annotation: Annotation) {
        let declaration = Declaration::new(Element::ty("Cases"), annotation);
        assemble(environment, &declaration);
    }

    fn children(environment: &Environment, id: NodeId) -> Vec<String> {
        let tree = environment.tree();
        tree.node(id)
            .children()
            .map(|c| tree.node(c).identity().to_string())
            .collect()
    }

    #[test]
    fn test_paths_merge() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::command("a b c"));
        declare(&mut environment, Annotation::command("a b"));

        let tree = environment.tree();
        let a = tree.find(NodeId::ROOT, "a").unwrap();
        let b = tree.find(a, "b").unwrap();

        assert_eq!(children(&environment, NodeId::ROOT), vec!["a"]);
        assert_eq!(children(&environment, b), vec!["c"]);
        assert_eq!(tree.commands().count(), 3);
        assert!(environment.diagnostics().is_empty());
    }

    #[test]
    fn test_kind_mismatch_conflicts() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::command("a <b>"));
        declare(&mut environment, Annotation::command("a b c"));

        let diagnostics = environment.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ErrorKind::MergeConflict);
        assert_eq!(
            diagnostics[0].message,
            "literal \"b\" conflicts with existing argument \"a <b>\""
        );
        assert_eq!(diagnostics[0].snippet.as_ref().unwrap().span, 2..3);

        // Nothing past the conflict is created
        assert_eq!(environment.tree().commands().count(), 2);
    }

    #[test]
    fn test_literal_aliases_mirror_children() {
        let mut environment = Environment::new();
        declare(
            &mut environment,
            Annotation::literal(["a", "b", "c"], ["c1a", "c1b"]),
        );
        declare(&mut environment, Annotation::command("a b c d"));

        let tree = environment.tree();
        let a = tree.find(NodeId::ROOT, "a").unwrap();
        let b = tree.find(a, "b").unwrap();
        let c = tree.find(b, "c").unwrap();
        let d = tree.find(c, "d").unwrap();

        assert_eq!(children(&environment, b), vec!["c", "c1a", "c1b"]);
        for alias in ["c1a", "c1b"] {
            let entry = tree.find(b, alias).unwrap();
            assert_eq!(tree.node(entry).children().collect::<Vec<_>>(), vec![d]);
        }
    }

    #[test]
    fn test_path_through_alias_reuses_primary() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::literal(["a"], ["x"]));
        declare(&mut environment, Annotation::command("x b"));

        let tree = environment.tree();
        let a = tree.find(NodeId::ROOT, "a").unwrap();
        assert_eq!(children(&environment, a), vec!["b"]);
        assert_eq!(tree.commands().count(), 2);
    }

    #[test]
    fn test_argument_meta_first_wins() {
        let mut environment = Environment::new();
        declare(
            &mut environment,
            Annotation::argument(["a", "b"], "integer()", None),
        );
        declare(&mut environment, Annotation::command("a <b> c"));
        declare(
            &mut environment,
            Annotation::argument(["a", "b"], "word()", None),
        );

        let tree = environment.tree();
        let a = tree.find(NodeId::ROOT, "a").unwrap();
        let b = tree.child(a, &Identity::argument("b")).unwrap();
        assert_eq!(
            tree.node(b).meta(),
            &Meta::Argument(ArgumentMeta::typed("integer()", None))
        );

        let diagnostics = environment.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ErrorKind::MergeConflict);
    }

    #[test]
    fn test_alias_collision_reported() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::command("b"));
        declare(&mut environment, Annotation::literal(["a"], ["b"]));

        let diagnostics = environment.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "alias \"b\" collides with existing literal \"b\""
        );
    }

    #[test]
    fn test_lex_errors_are_collected() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::command("a <b"));
        declare(&mut environment, Annotation::command("c  d>"));
        declare(&mut environment, Annotation::command("e"));

        let diagnostics = environment.diagnostics();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.kind == ErrorKind::Lex));
        assert_eq!(children(&environment, NodeId::ROOT), vec!["e"]);
    }

    #[test]
    fn test_argument_written_as_literal_declaration() {
        let mut environment = Environment::new();
        declare(
            &mut environment,
            Annotation::literal(["a", "<b>"], Vec::<&str>::new()),
        );

        assert_eq!(
            environment.diagnostics()[0].message,
            "\"<b>\" is declared as a literal"
        );
        assert!(environment.tree().is_empty());
    }

    #[test]
    fn test_segment_with_whitespace_is_rejected() {
        let mut environment = Environment::new();
        declare(
            &mut environment,
            Annotation::literal(["a b", "c"], Vec::<&str>::new()),
        );
        declare(
            &mut environment,
            Annotation::argument(["a", "b <c>"], "integer()", None),
        );

        let diagnostics = environment.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.kind == ErrorKind::Lex));
        assert_eq!(diagnostics[0].message, "segment \"a b\" should be a single word");
        assert_eq!(diagnostics[0].snippet.as_ref().unwrap().span, 0..3);
        assert_eq!(diagnostics[1].snippet.as_ref().unwrap().span, 2..7);
        assert!(environment.tree().is_empty());
    }

    #[test]
    fn test_top_level_nodes_enter_scope() {
        let mut environment = Environment::new();
        declare(&mut environment, Annotation::command("a b"));
        declare(&mut environment, Annotation::command("c"));

        let scope = environment.scope("Cases").unwrap();
        assert_eq!(scope.commands.len(), 2);
        assert_eq!(scope.nodes.len(), 3);
    }
}
