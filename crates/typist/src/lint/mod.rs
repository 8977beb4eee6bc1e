//! Validation passes over an assembled environment.
//!
//! Each lint reads the finished [`Environment`] and returns its diagnostics.
//! Lints never mutate the environment, and every lint runs even after
//! another one has reported errors.
//!
//! # Pipeline Position
//!
//! ```text
//! Lex → Parse → Lint → Generate
//!                ^^^^
//! ```
//!
//! # Lints
//!
//! 1. **DuplicateBinding** - at most one binding per role on each node
//! 2. **PublicFinalBinding** - bound elements are public and constant
//! 3. **ArgumentTypeLint** - arguments can be parsed, literals take no parser
//! 4. **UnexecutedLint** - leaf commands execute something

mod argument_type;
mod duplicate_binding;
mod public_final;
mod unexecuted;

pub use argument_type::ArgumentTypeLint;
pub use duplicate_binding::DuplicateBinding;
pub use public_final::PublicFinalBinding;
pub use unexecuted::UnexecutedLint;

use tracing::debug;

use crate::error::Diagnostic;
use crate::Environment;

/// A pure validation pass.
pub trait Lint {
    fn name(&self) -> &'static str;

    fn lint(&self, environment: &Environment) -> Vec<Diagnostic>;
}

/// Every lint, in reporting order.
pub fn defaults() -> Vec<Box<dyn Lint>> {
    vec![
        Box::new(DuplicateBinding),
        Box::new(PublicFinalBinding),
        Box::new(ArgumentTypeLint),
        Box::new(UnexecutedLint),
    ]
}

/// Runs `lints` in order and concatenates their diagnostics.
pub fn lint(environment: &Environment, lints: &[Box<dyn Lint>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for lint in lints {
        let mut found = lint.lint(environment);
        debug!(lint = lint.name(), diagnostics = found.len(), "lint ran");
        diagnostics.append(&mut found);
    }
    diagnostics
}
