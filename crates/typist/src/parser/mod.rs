//! Assembles declarations into an [`Environment`].
//!
//! Parsing happens in two passes over the declarations, each in document
//! order:
//!
//! 1. **Commands** - `Command`, `Literal` and `Argument` declarations build the tree
//! 2. **Bindings** - `Bind` declarations attach elements to nodes that now exist
//!
//! Problems are reported into the environment and never stop either pass.

pub mod captor;

mod bindings;
mod commands;

pub use captor::{Captor, Uncapturable};

use tracing::debug;

use crate::config::Config;
use crate::error::{Diagnostic, ErrorKind};
use crate::foundation::{Declaration, Element};
use crate::lexer::LexError;
use crate::Environment;

pub struct Parser<'c> {
    captor: Captor<'c>,
}

impl<'c> Parser<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            captor: Captor::new(&config.types),
        }
    }

    pub fn parse(&self, environment: &mut Environment, declarations: &[Declaration]) {
        let (structural, binds): (Vec<_>, Vec<_>) = declarations
            .iter()
            .partition(|declaration| declaration.annotation.is_structural());

        for declaration in &structural {
            commands::assemble(environment, declaration);
        }
        debug!(
            declarations = structural.len(),
            nodes = environment.tree().len(),
            "commands assembled"
        );

        for declaration in &binds {
            bindings::assemble(environment, &self.captor, declaration);
        }
        debug!(
            declarations = binds.len(),
            bindings = environment.bindings().len(),
            "bindings assembled"
        );
    }
}

/// Reports every lex error of `namespace` against `site`.
fn lex_errors(environment: &mut Environment, site: &Element, namespace: &str, errors: Vec<LexError>) {
    for error in errors {
        let mut diagnostic = Diagnostic::error(ErrorKind::Lex, site.clone(), error.to_string());
        if let Some(span) = error.span() {
            diagnostic = diagnostic.with_snippet(namespace, span);
        }
        environment.report(diagnostic);
    }
}
