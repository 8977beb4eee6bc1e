use crate::binding::{Binding, Role};
use crate::error::{Diagnostic, ErrorKind};
use crate::Environment;

use super::Lint;

/// Reports every site of a role bound more than once to the same node.
pub struct DuplicateBinding;

impl Lint for DuplicateBinding {
    fn name(&self) -> &'static str {
        "duplicate-binding"
    }

    fn lint(&self, environment: &Environment) -> Vec<Diagnostic> {
        let tree = environment.tree();
        let mut diagnostics = Vec::new();

        for (id, _) in tree.commands() {
            for role in Role::ALL {
                let bound: Vec<&Binding> = environment
                    .bindings_of(id)
                    .filter(|binding| binding.role == role)
                    .collect();
                if bound.len() < 2 {
                    continue;
                }

                let message = format!("{} is already bound to \"{}\"", role.described(), tree.path(id));
                for binding in &bound {
                    let mut diagnostic =
                        Diagnostic::error(ErrorKind::DuplicateBinding, binding.site.clone(), message.clone());
                    for other in bound.iter().filter(|other| other.site != binding.site) {
                        diagnostic = diagnostic.with_label(other.site.clone(), "also bound here".to_string());
                    }
                    diagnostics.push(diagnostic);
                }
            }
        }

        diagnostics
    }
}
