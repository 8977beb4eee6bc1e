//! One compilation round.

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::{self, Diagnostic, ErrorKind};
use crate::foundation::Declaration;
use crate::generation::Generator;
use crate::lint;
use crate::parser::Parser;
use crate::Environment;

/// Result of a round that produced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Generated source
    pub source: String,
    /// Warnings raised during the round
    pub warnings: Vec<Diagnostic>,
}

/// Parses `declarations` into a fresh environment.
pub fn assemble(declarations: &[Declaration], config: &Config) -> Environment {
    let mut environment = Environment::new();
    Parser::new(config).parse(&mut environment, declarations);
    environment
}

/// Runs a full round: parse, lint, then generate if nothing is in error.
///
/// # Errors
///
/// Returns every diagnostic of the round, warnings included, when any of
/// them is an error. No source is produced in that case.
#[instrument(skip_all, fields(declarations = declarations.len()))]
pub fn compile(declarations: &[Declaration], config: &Config) -> Result<Output, Vec<Diagnostic>> {
    let environment = assemble(declarations, config);

    let mut diagnostics = environment.diagnostics().to_vec();
    diagnostics.extend(lint::lint(&environment, &lint::defaults()));

    if error::has_errors(&diagnostics) {
        info!(
            diagnostics = diagnostics.len(),
            "errors reported, generation suppressed"
        );
        return Err(diagnostics);
    }

    match Generator::new(&config.generation).generate(&environment) {
        Ok(source) => Ok(Output {
            source,
            warnings: diagnostics,
        }),
        Err(e) => {
            warn!(error = %e, "generation failed");
            diagnostics.push(Diagnostic::error(ErrorKind::Internal, e.site.clone(), e.defect.to_string()));
            Err(diagnostics)
        }
    }
}
