use crate::binding::Role;
use crate::error::{Diagnostic, ErrorKind};
use crate::tree::Meta;
use crate::Environment;

use super::Lint;

/// Checks that every argument has a type its factory can build it with, and
/// that literals carry no argument-only bindings.
///
/// A declared type is visible to every scope, a bound one only to the scope
/// of the binding element.
pub struct ArgumentTypeLint;

impl Lint for ArgumentTypeLint {
    fn name(&self) -> &'static str {
        "argument-type"
    }

    fn lint(&self, environment: &Environment) -> Vec<Diagnostic> {
        let tree = environment.tree();
        let mut diagnostics = Vec::new();

        for (name, scope) in environment.scopes() {
            for &node in &scope.nodes {
                let Meta::Argument(meta) = tree.node(node).meta() else {
                    continue;
                };
                let bound = environment
                    .bindings_of(node)
                    .find(|binding| binding.role == Role::Type && binding.site.scope() == name);

                match (&meta.type_name, bound) {
                    (None, None) => diagnostics.push(Diagnostic::error(
                        ErrorKind::MissingType,
                        scope.site.clone(),
                        format!("\"{}\" has no argument type", tree.path(node)),
                    )),
                    (Some(declared), Some(binding)) => diagnostics.push(
                        Diagnostic::warning(
                            ErrorKind::InvalidBinding,
                            binding.site.clone(),
                            format!("\"{}\" already declares type \"{}\"", tree.path(node), declared),
                        )
                        .with_note("the bound type is used".to_string()),
                    ),
                    _ => {}
                }
            }
        }

        for binding in environment.bindings() {
            let misplaced = matches!(binding.role, Role::Type | Role::Suggestions)
                && tree.node(binding.node).identity().is_literal();
            if misplaced {
                diagnostics.push(Diagnostic::error(
                    ErrorKind::InvalidBinding,
                    binding.site.clone(),
                    format!(
                        "{} cannot be bound to literal \"{}\"",
                        binding.role.described(),
                        tree.path(binding.node)
                    ),
                ));
            }
        }

        diagnostics
    }
}
