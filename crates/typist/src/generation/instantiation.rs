//! Emits the statement building a single command node.

use crate::binding::{Binding, Role};
use crate::foundation::{Element, ElementKind};
use crate::tree::{Meta, Node, NodeId};
use crate::Environment;

use super::source::Source;
use super::{Defect, GenerationError};

/// Builds nodes as `commandN` variables, numbered in emission order.
pub(super) struct Instantiation<'e> {
    environment: &'e Environment,
    /// Name of the scope whose bindings are emitted
    scope: &'e str,
    counter: usize,
    /// Whether any literal or argument builder was emitted
    pub(super) literals: bool,
    pub(super) arguments: bool,
}

impl<'e> Instantiation<'e> {
    pub(super) fn new(environment: &'e Environment, scope: &'e str) -> Self {
        Self {
            environment,
            scope,
            counter: 0,
            literals: false,
            arguments: false,
        }
    }

    /// Emits `let commandN = ...;` for `id` and returns the variable name.
    ///
    /// `mutable` declares the variable `mut` so children can be added to it.
    pub(super) fn emit(
        &mut self,
        source: &mut Source,
        id: NodeId,
        node: &Node,
        mutable: bool,
    ) -> Result<String, GenerationError> {
        let environment = self.environment;
        let path = environment.tree().path(id);
        let name = format!("command{}", self.counter);
        self.counter += 1;
        let binding = if mutable { format!("mut {name}") } else { name.clone() };

        let mut chain = Vec::new();
        match node.meta() {
            Meta::Literal | Meta::Root => {
                self.literals = true;
                source.line(format!(
                    "let {} = Literal::builder({:?})",
                    binding,
                    node.identity().name
                ));
                for alias in node.aliases() {
                    chain.push(format!(".alias({alias:?})"));
                }
                if let Some(misplaced) = self
                    .bound(id)
                    .find(|b| matches!(b.role, Role::Type | Role::Suggestions))
                {
                    return Err(GenerationError {
                        site: misplaced.site.clone(),
                        defect: Defect::MisplacedBinding {
                            role: misplaced.role,
                            path,
                        },
                    });
                }
            }
            Meta::Argument(meta) => {
                self.arguments = true;
                let ty = match (self.role(id, Role::Type), &meta.type_name) {
                    (Some(bound), _) => reference(&bound.site),
                    (None, Some(declared)) => declared.clone(),
                    (None, None) => {
                        let site = node.origin().cloned().unwrap_or_else(|| Element::ty(self.scope));
                        return Err(GenerationError {
                            site,
                            defect: Defect::MissingType(path),
                        });
                    }
                };
                source.line(format!(
                    "let {} = Argument::builder({:?}, {})",
                    binding,
                    node.identity().name,
                    ty
                ));

                match (self.role(id, Role::Suggestions), &meta.suggestions) {
                    (Some(bound), _) => chain.push(format!(".suggests({})", reference(&bound.site))),
                    (None, Some(declared)) => chain.push(format!(".suggests({declared})")),
                    (None, None) => {}
                }
            }
        }

        if let Some(execution) = self.role(id, Role::Execution) {
            chain.push(format!(".executes({})", reference(&execution.site)));
        }
        if let Some(requirement) = self.role(id, Role::Requirement) {
            chain.push(format!(".requires({})", reference(&requirement.site)));
        }
        chain.push(".build();".to_string());

        source.indent();
        for call in chain {
            source.line(call);
        }
        source.unindent();

        Ok(name)
    }

    /// Bindings of `id` made by this scope's elements.
    fn bound(&self, id: NodeId) -> impl Iterator<Item = &'e Binding> + '_ {
        let scope = self.scope;
        self.environment
            .bindings_of(id)
            .filter(move |binding| binding.site.scope() == scope)
    }

    fn role(&self, id: NodeId, role: Role) -> Option<&'e Binding> {
        self.bound(id).find(|binding| binding.role == role)
    }
}

/// Expression reading a bound element off the factory's `source`.
fn reference(site: &Element) -> String {
    match site.kind {
        ElementKind::Method => format!(
            "{{ let source = Arc::clone(&source); move |context| source.{}(context) }}",
            site.name
        ),
        _ => format!("source.{}.clone()", site.name),
    }
}
