//! Emits one factory function per declaring type.

use tracing::trace;

use crate::config::GenerationConfig;
use crate::environment::Scope;
use crate::tree::NodeId;
use crate::Environment;

use super::instantiation::Instantiation;
use super::source::Source;
use super::{Defect, GenerationError};

pub(super) struct Factory<'e> {
    environment: &'e Environment,
    name: &'e str,
    scope: &'e Scope,
    function: String,
    pub(super) instantiation: Instantiation<'e>,
}

impl<'e> Factory<'e> {
    pub(super) fn new(environment: &'e Environment, name: &'e str, scope: &'e Scope, function: String) -> Self {
        Self {
            environment,
            name,
            scope,
            function,
            instantiation: Instantiation::new(environment, name),
        }
    }

    /// Emits the whole function returning the scope's top-level commands by name.
    pub(super) fn emit(&mut self, source: &mut Source, config: &GenerationConfig) -> Result<(), GenerationError> {
        let binds = self
            .environment
            .bindings()
            .iter()
            .any(|binding| binding.site.scope() == self.name && self.scope.contains(binding.node));
        let parameter = if binds { "source" } else { "_source" };

        source
            .line(format!(
                "pub fn {}({}: Arc<{}>) -> HashMap<String, CommandNode<{}>> {{",
                self.function,
                parameter,
                self.name,
                config.sender,
            ))
            .indent()
            .line("let mut commands = HashMap::new();")
            .blank();

        let scope = self.scope;
        for &command in &scope.commands {
            let name = self.command(source, command)?;
            source
                .line(format!("commands.insert({name}.name().to_string(), {name});"))
                .blank();
        }

        source.line("commands").unindent().line("}");
        Ok(())
    }

    /// Emits `id` after all of its children and returns its variable name.
    fn command(&mut self, source: &mut Source, id: NodeId) -> Result<String, GenerationError> {
        let environment = self.environment;
        let tree = environment.tree();
        let Some(node) = tree.get(id) else {
            return Err(GenerationError {
                site: self.scope.site.clone(),
                defect: Defect::Dangling(id),
            });
        };

        let mut children = Vec::new();
        for child in node.children() {
            // Alias entries are rebuilt by the runtime from the primary's aliases
            let skip = tree.get(child).map_or(true, |c| c.is_alias());
            if skip || !self.scope.contains(child) {
                continue;
            }
            children.push(self.command(source, child)?);
            source.blank();
        }

        let name = self.instantiation.emit(source, id, node, !children.is_empty())?;
        for child in &children {
            source.line(format!("{name}.add_child({child});"));
        }
        trace!(scope = self.name, node = %tree.path(id), variable = %name, "instantiated");

        Ok(name)
    }
}

/// `crate::commands::TeleportCommand` with suffix `_commands` becomes
/// `teleport_command_commands`.
pub(super) fn function_name(path: &str, suffix: &str) -> String {
    let name = path.rsplit("::").next().unwrap_or(path);
    format!("{}{}", snake_case(name), suffix)
}

/// Like [`function_name`], but built from every segment of `path` after a
/// leading `crate`, `self` or `super`: `crate::admin::Teleport` becomes
/// `admin_teleport_commands`.
pub(super) fn qualified_function_name(path: &str, suffix: &str) -> String {
    let segments: Vec<String> = path
        .split("::")
        .skip_while(|segment| matches!(*segment, "crate" | "self" | "super"))
        .map(snake_case)
        .collect();
    format!("{}{}", segments.join("_"), suffix)
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let previous = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match previous {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !snake.ends_with('_') {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }

    snake
}
