//! The mutable model of one compilation round.
//!
//! An [`Environment`] owns the command tree, every binding, the scope of
//! each declaring type, the diagnostics raised while parsing and the lexer
//! memo cache. It lives for exactly one round and is never reused.

use indexmap::{IndexMap, IndexSet};

use crate::binding::{Binding, BindingId, Role};
use crate::error::{self, Diagnostic};
use crate::foundation::Element;
use crate::lexer::Lexer;
use crate::tree::{NodeId, Tree};

/// The part of the tree one declaring type introduced.
///
/// Each type's factory rebuilds only its own scope; the runtime merges
/// factories whose top-level commands collide.
#[derive(Debug, Clone)]
pub struct Scope {
    /// The declaring type
    pub site: Element,
    /// Top-level nodes in the order the type first reached them
    pub commands: IndexSet<NodeId>,
    /// Every node the type's declarations walked through
    pub nodes: IndexSet<NodeId>,
}

impl Scope {
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

#[derive(Debug, Default)]
pub struct Environment {
    tree: Tree,
    bindings: Vec<Binding>,
    scopes: IndexMap<String, Scope>,
    diagnostics: Vec<Diagnostic>,
    lexer: Lexer,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub(crate) fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    /// Every binding in the order it was recorded.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    /// Bindings of `node` in the order they were recorded.
    pub fn bindings_of(&self, node: NodeId) -> impl Iterator<Item = &Binding> {
        self.tree
            .node(self.tree.primary(node))
            .bindings()
            .iter()
            .map(move |&id| self.binding(id))
    }

    /// The first binding of `role` on `node`.
    pub fn binding_for(&self, node: NodeId, role: Role) -> Option<&Binding> {
        self.bindings_of(node).find(|binding| binding.role == role)
    }

    /// Records a binding. The node must already exist.
    pub fn bind(&mut self, node: NodeId, role: Role, site: Element) -> BindingId {
        let node = self.tree.primary(node);
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding { node, role, site });
        self.tree.bind(node, id);
        id
    }

    /// Declaring types in the order they first reached a node.
    pub fn scopes(&self) -> impl Iterator<Item = (&str, &Scope)> {
        self.scopes.iter().map(|(name, scope)| (name.as_str(), scope))
    }

    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Records that `site`'s type reached `node`.
    pub(crate) fn enter_scope(&mut self, site: &Element, node: NodeId) {
        let node = self.tree.primary(node);
        let top_level = self.tree.node(node).parent() == Some(NodeId::ROOT);
        let name = site.scope();
        let scope = self
            .scopes
            .entry(name.to_owned())
            .or_insert_with(|| Scope {
                site: match site.owner.as_deref() {
                    Some(owner) => Element::ty(owner),
                    None => site.clone(),
                },
                commands: IndexSet::new(),
                nodes: IndexSet::new(),
            });
        scope.nodes.insert(node);
        if top_level {
            scope.commands.insert(node);
        }
    }

    /// Diagnostics raised while assembling this environment.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        error::has_errors(&self.diagnostics)
    }
}
