//! Code generation.
//!
//! Emits Rust source rebuilding the validated tree against the runtime's
//! builder API. Each declaring type gets one factory returning its top-level
//! commands by name:
//!
//! ```text
//! pub fn cases_commands(source: Arc<Cases>) -> HashMap<String, CommandNode<Sender>> {
//!     let mut commands = HashMap::new();
//!
//!     let command0 = Literal::builder("c")
//!         .executes(...)
//!         .build();
//!
//!     let mut command1 = Literal::builder("a")
//!         .build();
//!     command1.add_child(command0);
//!     commands.insert(command1.name().to_string(), command1);
//!
//!     commands
//! }
//! ```
//!
//! Factories are named after the type's last path segment. Types sharing
//! that segment are named after their module path, so `crate::admin::Teleport`
//! gets `admin_teleport_commands`.
//!
//! Children are always fully built and bound to a variable before the
//! statement building their parent, and attached in declaration order.
//! Alias entries are not emitted: the runtime mirrors a node's children
//! under each of its aliases.
//!
//! Generation only runs on an environment without errors. Anything it still
//! finds wrong is a compiler bug, reported as a [`GenerationError`] that
//! discards the output.

mod factory;
mod instantiation;
pub mod source;

pub use source::Source;

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::info;

use crate::binding::Role;
use crate::config::GenerationConfig;
use crate::foundation::Element;
use crate::tree::NodeId;
use crate::Environment;

use factory::Factory;

/// First line of every generated file.
pub const HEADER: &str = "// @generated by typist. Do not edit.";

/// An inconsistency found while generating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{site}: {defect}")]
pub struct GenerationError {
    pub site: Element,
    pub defect: Defect,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Defect {
    #[error("argument \"{0}\" has no type")]
    MissingType(String),

    #[error("{role} binding on literal \"{path}\"")]
    MisplacedBinding { role: Role, path: String },

    #[error("dangling node handle {0:?}")]
    Dangling(NodeId),

    #[error("factory \"{0}\" would be emitted more than once")]
    FactoryClash(String),
}

pub struct Generator<'c> {
    config: &'c GenerationConfig,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c GenerationConfig) -> Self {
        Self { config }
    }

    /// Emits one factory per scope, in the order scopes were entered.
    pub fn generate(&self, environment: &Environment) -> Result<String, GenerationError> {
        let mut body = Source::new();
        let mut literals = false;
        let mut arguments = false;
        let mut factories = 0;

        for ((name, scope), function) in environment.scopes().zip(self.function_names(environment)?) {
            let mut factory = Factory::new(environment, name, scope, function);
            factory.emit(&mut body, self.config)?;
            body.blank();

            literals |= factory.instantiation.literals;
            arguments |= factory.instantiation.arguments;
            factories += 1;
        }

        let mut source = Source::new();
        source.line(HEADER);

        if factories > 0 {
            let mut imports = Vec::new();
            if arguments {
                imports.push("Argument");
            }
            imports.push("CommandNode");
            if literals {
                imports.push("Literal");
            }

            source
                .blank()
                .line("use std::collections::HashMap;")
                .line("use std::sync::Arc;")
                .blank()
                .line(format!("use {}::{{{}}};", self.config.runtime, imports.join(", ")))
                .blank()
                .append(&body);
        }

        info!(factories, "generated");
        Ok(source.finish())
    }

    /// Factory names in scope order. Types sharing a last path segment are
    /// named after their whole path instead.
    fn function_names(&self, environment: &Environment) -> Result<Vec<String>, GenerationError> {
        let suffix = &self.config.suffix;
        let mut short: HashMap<String, usize> = HashMap::new();
        for (name, _) in environment.scopes() {
            *short.entry(factory::function_name(name, suffix)).or_default() += 1;
        }

        let mut emitted = HashSet::new();
        let mut functions = Vec::new();
        for (name, scope) in environment.scopes() {
            let function = factory::function_name(name, suffix);
            let function = if short[&function] > 1 {
                factory::qualified_function_name(name, suffix)
            } else {
                function
            };

            if !emitted.insert(function.clone()) {
                return Err(GenerationError {
                    site: scope.site.clone(),
                    defect: Defect::FactoryClash(function),
                });
            }
            functions.push(function);
        }

        Ok(functions)
    }
}
