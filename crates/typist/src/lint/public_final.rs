use indexmap::IndexSet;

use crate::error::{Diagnostic, ErrorKind};
use crate::foundation::Element;
use crate::Environment;

use super::Lint;

/// Bound elements must be public and constant. Each offending element is
/// reported once, however many nodes it is bound to.
pub struct PublicFinalBinding;

impl Lint for PublicFinalBinding {
    fn name(&self) -> &'static str {
        "public-final-binding"
    }

    fn lint(&self, environment: &Environment) -> Vec<Diagnostic> {
        let mut reported: IndexSet<&Element> = IndexSet::new();

        environment
            .bindings()
            .iter()
            .map(|binding| &binding.site)
            .filter(|site| !(site.is_public() && site.is_constant()))
            .filter(|site| reported.insert(*site))
            .map(|site| {
                let message = if site.is_field() {
                    "field should be public final"
                } else {
                    "method should be public final"
                };
                Diagnostic::error(ErrorKind::Modifier, site.clone(), message.to_string())
            })
            .collect()
    }
}
