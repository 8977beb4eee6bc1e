use crate::binding::Role;
use crate::error::{Diagnostic, ErrorKind};
use crate::Environment;

use super::Lint;

/// Warns about leaf commands that nothing executes.
pub struct UnexecutedLint;

impl Lint for UnexecutedLint {
    fn name(&self) -> &'static str {
        "unexecuted"
    }

    fn lint(&self, environment: &Environment) -> Vec<Diagnostic> {
        let tree = environment.tree();

        tree.commands()
            .filter(|(id, node)| {
                !node.has_children() && environment.binding_for(*id, Role::Execution).is_none()
            })
            .filter_map(|(id, node)| {
                let site = node.origin()?;
                Some(Diagnostic::warning(
                    ErrorKind::Unexecuted,
                    site.clone(),
                    format!("\"{}\" is a leaf but has no execution bound", tree.path(id)),
                ))
            })
            .collect()
    }
}
