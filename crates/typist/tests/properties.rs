//! End-to-end behavior of one compilation round.
//!
//! Each test feeds declarations the way a host would and checks the tree,
//! the diagnostics or the generated source.

#![allow(clippy::unwrap_used)]

use typist::config::Config;
use typist::foundation::{Annotation, Declaration, Element, Identity};
use typist::lexer::{LexError, Lexer};
use typist::tree::NodeId;
use typist::{assemble, compile, ErrorKind};

fn ty(annotation: Annotation) -> Declaration {
    Declaration::new(Element::ty("Cases"), annotation)
}

fn method(name: &str, path: &str) -> Declaration {
    Declaration::new(Element::method("Cases", name).public(), Annotation::bind(path))
}

#[test]
fn test_lexing_is_memoized() {
    let mut lexer = Lexer::new();
    let first = lexer.lex("a <b> c").unwrap();
    let second = lexer.lex("a <b> c").unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|t| t.identity.clone()).collect::<Vec<_>>(),
        vec![
            Identity::literal("a"),
            Identity::argument("b"),
            Identity::literal("c"),
        ]
    );
}

#[test]
fn test_unmatched_bracket_fails() {
    let mut lexer = Lexer::new();
    let errors = lexer.lex("a <b").unwrap_err();
    assert!(matches!(errors[0], LexError::UnmatchedOpen { .. }));
}

#[test]
fn test_paths_merge_into_one() {
    let environment = assemble(
        &[ty(Annotation::command("a b c")), ty(Annotation::command("a b"))],
        &Config::default(),
    );
    let tree = environment.tree();

    let roots: Vec<_> = tree.node(NodeId::ROOT).children().collect();
    assert_eq!(roots.len(), 1);

    let a = roots[0];
    let b = tree.find(a, "b").unwrap();
    let children: Vec<_> = tree.node(b).children().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(tree.node(children[0]).identity(), &Identity::literal("c"));
    assert_eq!(tree.path(b), "a b");
}

#[test]
fn test_aliases_follow_later_children() {
    let environment = assemble(
        &[
            ty(Annotation::literal(["a", "b", "c"], ["c1a", "c1b"])),
            ty(Annotation::command("a b c d")),
        ],
        &Config::default(),
    );
    let tree = environment.tree();

    let a = tree.find(NodeId::ROOT, "a").unwrap();
    let b = tree.find(a, "b").unwrap();
    let c = tree.find(b, "c").unwrap();
    let d = tree.find(c, "d").unwrap();

    let siblings: Vec<_> = tree
        .node(b)
        .children()
        .map(|id| tree.node(id).identity().name.clone())
        .collect();
    assert_eq!(siblings, vec!["c", "c1a", "c1b"]);

    for alias in ["c1a", "c1b"] {
        let entry = tree.find(b, alias).unwrap();
        assert_eq!(tree.node(entry).children().collect::<Vec<_>>(), vec![d]);
    }
}

#[test]
fn test_duplicate_execution_reports_every_site() {
    let declarations = [
        ty(Annotation::command("a <b>")),
        ty(Annotation::argument(["a", "b"], "integer()", None)),
        method("invalid_1", "a <b>"),
        method("invalid_2", "a <b>"),
    ];

    let diagnostics = compile(&declarations, &Config::default()).unwrap_err();
    let duplicates: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.kind == ErrorKind::DuplicateBinding)
        .collect();

    assert_eq!(duplicates.len(), 2);
    assert_eq!(duplicates[0].site.name, "invalid_1");
    assert_eq!(duplicates[1].site.name, "invalid_2");
    for duplicate in duplicates {
        assert_eq!(
            duplicate.message,
            "An Execution<CommandSender> is already bound to \"a <b>\""
        );
    }
}

#[test]
fn test_single_execution_is_clean() {
    let declarations = [
        ty(Annotation::argument(["a", "b"], "integer()", None)),
        method("valid", "a <b>"),
    ];

    let output = compile(&declarations, &Config::default()).unwrap();
    assert!(output.warnings.is_empty());
}

#[test]
fn test_non_public_binding_reported_once() {
    let site = Element::field("Cases", "check", "Requirement<CommandSender>");
    let declarations = [
        ty(Annotation::command("a")),
        method("run", "a"),
        Declaration::new(site.clone(), Annotation::bind("a")),
    ];

    let diagnostics = compile(&declarations, &Config::default()).unwrap_err();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::Modifier);
    assert_eq!(diagnostics[0].site, site);
    assert_eq!(diagnostics[0].message, "field should be public final");
}

#[test]
fn test_mutable_method_is_not_final() {
    let declarations = [
        ty(Annotation::command("a")),
        Declaration::new(
            Element::method("Cases", "run").public().mutable(),
            Annotation::bind("a"),
        ),
    ];

    let diagnostics = compile(&declarations, &Config::default()).unwrap_err();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "method should be public final");
}
