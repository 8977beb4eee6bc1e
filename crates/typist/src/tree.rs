//! Arena command tree.
//!
//! Nodes live in a single arena and refer to each other through [`NodeId`]
//! handles. Every logical path names exactly one node, and each node has a
//! single parent.
//!
//! # Aliases
//!
//! An alias of a literal is an extra *entry node* under the same parent.
//! Entry nodes own no children of their own: their child map mirrors the
//! primary's, holding the same handles. The tree keeps a primary → entries
//! map and consults it on every [`Tree::attach`], so a child attached to the
//! primary shows up under every alias and a child attached through an alias
//! lands on the primary. Mirroring is append-only.
//!
//! ```text
//! a ─ b ─┬─ c    ─ d
//!        ├─ c1a  ─ d   (same handle as c's child)
//!        └─ c1b  ─ d
//! ```

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::trace;

use crate::binding::BindingId;
use crate::foundation::{Element, Identity, Kind};

/// Handle of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The synthetic root every tree starts with.
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Argument-specific metadata, fixed by the first declaration that sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMeta {
    /// Expression building the argument's type, as declared
    pub type_name: Option<String>,
    /// Expression building the argument's suggestions, as declared
    pub suggestions: Option<String>,
}

impl ArgumentMeta {
    pub fn typed(type_name: impl Into<String>, suggestions: Option<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            suggestions,
        }
    }

    /// Fills in unset fields from `incoming`; differing values conflict.
    fn merge(&mut self, incoming: &ArgumentMeta) -> Result<(), Conflict> {
        fill("type", &mut self.type_name, &incoming.type_name)?;
        fill("suggestions", &mut self.suggestions, &incoming.suggestions)
    }
}

fn fill(
    field: &'static str,
    existing: &mut Option<String>,
    incoming: &Option<String>,
) -> Result<(), Conflict> {
    match (existing.as_ref(), incoming) {
        (Some(current), Some(new)) if current != new => Err(Conflict::Meta {
            field,
            existing: current.clone(),
            incoming: new.clone(),
        }),
        (None, Some(new)) => {
            *existing = Some(new.clone());
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Meta {
    Root,
    Literal,
    Argument(ArgumentMeta),
}

impl Meta {
    /// Default payload for a freshly lexed identity of `kind`.
    pub fn of(kind: Kind) -> Self {
        match kind {
            Kind::Literal => Meta::Literal,
            Kind::Argument => Meta::Argument(ArgumentMeta::default()),
        }
    }
}

/// Incompatible redeclaration of a tree position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("{field} is already \"{existing}\" and cannot be redeclared as \"{incoming}\"")]
    Meta {
        field: &'static str,
        existing: String,
        incoming: String,
    },

    #[error("alias \"{alias}\" collides with existing {} \"{existing}\"", .existing.kind)]
    Alias { alias: String, existing: Identity },
}

/// A command tree node.
#[derive(Debug, Clone)]
pub struct Node {
    identity: Identity,
    meta: Meta,
    parent: Option<NodeId>,
    children: IndexMap<Identity, NodeId>,
    bindings: Vec<BindingId>,
    aliases: IndexSet<String>,
    primary: Option<NodeId>,
    origin: Option<Element>,
}

impl Node {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in declaration order, alias entries included.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn bindings(&self) -> &[BindingId] {
        &self.bindings
    }

    /// Alias names declared for this node.
    pub fn aliases(&self) -> &IndexSet<String> {
        &self.aliases
    }

    /// The primary this node is an alias entry for.
    pub fn alias_of(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn is_alias(&self) -> bool {
        self.primary.is_some()
    }

    /// Element whose declaration created this node.
    pub fn origin(&self) -> Option<&Element> {
        self.origin.as_ref()
    }
}

/// The command tree of one environment.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    mirrors: HashMap<NodeId, IndexSet<NodeId>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let root = Node {
            identity: Identity::literal(""),
            meta: Meta::Root,
            parent: None,
            children: IndexMap::new(),
            bindings: Vec::new(),
            aliases: IndexSet::new(),
            primary: None,
            origin: None,
        };

        Self {
            nodes: vec![root],
            mirrors: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes, root and alias entries included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Primary command nodes: neither the root nor alias entries.
    pub fn commands(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.iter()
            .filter(|(id, node)| *id != NodeId::ROOT && !node.is_alias())
    }

    /// The child of `parent` with exactly this identity, alias entries included.
    pub fn child(&self, parent: NodeId, identity: &Identity) -> Option<NodeId> {
        self.node(self.primary(parent))
            .children
            .get(identity)
            .copied()
    }

    /// The child of `parent` named `name`, whatever its kind.
    pub fn find(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.child(parent, &Identity::literal(name))
            .or_else(|| self.child(parent, &Identity::argument(name)))
    }

    /// Resolves an alias entry to its primary; other nodes resolve to themselves.
    pub fn primary(&self, id: NodeId) -> NodeId {
        self.node(id).primary.unwrap_or(id)
    }

    /// Alias entries mirroring `id`.
    pub fn mirrors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.mirrors.get(&id).into_iter().flatten().copied()
    }

    /// Creates a node and attaches it under `parent`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        identity: Identity,
        meta: Meta,
        origin: Option<Element>,
    ) -> NodeId {
        let parent = self.primary(parent);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            identity,
            meta,
            parent: Some(parent),
            children: IndexMap::new(),
            bindings: Vec::new(),
            aliases: IndexSet::new(),
            primary: None,
            origin,
        });
        self.attach(parent, id);
        id
    }

    /// Attaches `child` under `parent` and every node mirroring it.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        let parent = self.primary(parent);
        let identity = self.node(child).identity.clone();

        let mut targets = vec![parent];
        targets.extend(self.mirrors(parent));
        for target in targets {
            trace!(parent = ?target, child = %identity, "attach");
            self.nodes[target.index()]
                .children
                .insert(identity.clone(), child);
        }
    }

    /// Declares `alias` for the literal `id`.
    ///
    /// Returns `Ok(true)` when a new alias entry was created and `Ok(false)`
    /// when the alias already existed.
    pub fn alias(&mut self, id: NodeId, alias: &str) -> Result<bool, Conflict> {
        let id = self.primary(id);
        if self.node(id).aliases.contains(alias) {
            return Ok(false);
        }
        let Some(parent) = self.node(id).parent else {
            return Ok(false);
        };

        if let Some(existing) = self.find(parent, alias) {
            return Err(Conflict::Alias {
                alias: alias.to_owned(),
                existing: self.node(existing).identity.clone(),
            });
        }

        let entry = NodeId(self.nodes.len() as u32);
        let children = self.node(id).children.clone();
        let origin = self.node(id).origin.clone();
        self.nodes.push(Node {
            identity: Identity::literal(alias),
            meta: Meta::Literal,
            parent: Some(parent),
            children,
            bindings: Vec::new(),
            aliases: IndexSet::new(),
            primary: Some(id),
            origin,
        });

        self.mirrors.entry(id).or_default().insert(entry);
        self.nodes[id.index()].aliases.insert(alias.to_owned());
        self.attach(parent, entry);
        Ok(true)
    }

    /// Merges argument metadata into an existing argument node.
    pub fn merge_argument(&mut self, id: NodeId, incoming: &ArgumentMeta) -> Result<(), Conflict> {
        let id = self.primary(id);
        match &mut self.nodes[id.index()].meta {
            Meta::Argument(meta) => meta.merge(incoming),
            _ => Ok(()),
        }
    }

    pub(crate) fn bind(&mut self, id: NodeId, binding: BindingId) {
        let id = self.primary(id);
        self.nodes[id.index()].bindings.push(binding);
    }

    /// Space-separated identities from the root down to `id`, e.g. `a <b> c`.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while current != NodeId::ROOT {
            let node = self.node(current);
            segments.push(node.identity.to_string());
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        segments.reverse();
        segments.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(tree: &mut Tree, parent: NodeId, name: &str) -> NodeId {
        tree.insert(parent, Identity::literal(name), Meta::Literal, None)
    }

    fn names(tree: &Tree, id: NodeId) -> Vec<String> {
        tree.node(id)
            .children()
            .map(|c| tree.node(c).identity().to_string())
            .collect()
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.node(tree.root()).meta(), &Meta::Root);
        assert_eq!(tree.commands().count(), 0);
    }

    #[test]
    fn test_insert_and_path() {
        let mut tree = Tree::new();
        let a = literal(&mut tree, NodeId::ROOT, "a");
        let b = tree.insert(a, Identity::argument("b"), Meta::of(Kind::Argument), None);
        let c = literal(&mut tree, b, "c");

        assert_eq!(tree.path(c), "a <b> c");
        assert_eq!(tree.child(a, &Identity::argument("b")), Some(b));
        assert_eq!(tree.child(a, &Identity::literal("b")), None);
        assert_eq!(tree.find(a, "b"), Some(b));
    }

    #[test]
    fn test_alias_mirrors_existing_and_later_children() {
        let mut tree = Tree::new();
        let a = literal(&mut tree, NodeId::ROOT, "a");
        let b = literal(&mut tree, a, "b");
        let c = literal(&mut tree, b, "c");
        let early = literal(&mut tree, c, "early");

        assert_eq!(tree.alias(c, "c1a"), Ok(true));
        assert_eq!(tree.alias(c, "c1b"), Ok(true));
        assert_eq!(names(&tree, b), vec!["c", "c1a", "c1b"]);

        let late = literal(&mut tree, c, "late");

        for alias in ["c1a", "c1b"] {
            let entry = tree.child(b, &Identity::literal(alias)).unwrap();
            assert_eq!(tree.primary(entry), c);
            assert_eq!(
                tree.node(entry).children().collect::<Vec<_>>(),
                vec![early, late]
            );
        }
    }

    #[test]
    fn test_attach_through_alias_reaches_primary() {
        let mut tree = Tree::new();
        let a = literal(&mut tree, NodeId::ROOT, "a");
        tree.alias(a, "a1").unwrap();
        let entry = tree.child(NodeId::ROOT, &Identity::literal("a1")).unwrap();

        let b = literal(&mut tree, entry, "b");

        assert_eq!(tree.node(b).parent(), Some(a));
        assert_eq!(tree.child(a, &Identity::literal("b")), Some(b));
        assert_eq!(tree.child(entry, &Identity::literal("b")), Some(b));
        assert_eq!(tree.path(b), "a b");
    }

    #[test]
    fn test_nested_aliases_mirror_through_parents() {
        let mut tree = Tree::new();
        let c = literal(&mut tree, NodeId::ROOT, "c");
        tree.alias(c, "c1").unwrap();
        let d = literal(&mut tree, c, "d");
        tree.alias(d, "d1").unwrap();

        let c1 = tree.child(NodeId::ROOT, &Identity::literal("c1")).unwrap();
        assert_eq!(names(&tree, c1), vec!["d", "d1"]);
    }

    #[test]
    fn test_repeated_alias_is_idempotent() {
        let mut tree = Tree::new();
        let a = literal(&mut tree, NodeId::ROOT, "a");

        assert_eq!(tree.alias(a, "x"), Ok(true));
        assert_eq!(tree.alias(a, "x"), Ok(false));
        assert_eq!(names(&tree, NodeId::ROOT), vec!["a", "x"]);
    }

    #[test]
    fn test_alias_collision() {
        let mut tree = Tree::new();
        let a = literal(&mut tree, NodeId::ROOT, "a");
        literal(&mut tree, NodeId::ROOT, "b");

        assert_eq!(
            tree.alias(a, "b"),
            Err(Conflict::Alias {
                alias: "b".to_string(),
                existing: Identity::literal("b"),
            })
        );
    }

    #[test]
    fn test_merge_argument_fills_but_never_overwrites() {
        let mut tree = Tree::new();
        let b = tree.insert(
            NodeId::ROOT,
            Identity::argument("b"),
            Meta::of(Kind::Argument),
            None,
        );

        tree.merge_argument(b, &ArgumentMeta::typed("integer()", None))
            .unwrap();
        tree.merge_argument(b, &ArgumentMeta::default()).unwrap();
        tree.merge_argument(b, &ArgumentMeta::typed("integer()", Some("players()".into())))
            .unwrap();

        assert_eq!(
            tree.node(b).meta(),
            &Meta::Argument(ArgumentMeta::typed("integer()", Some("players()".into())))
        );
        assert!(matches!(
            tree.merge_argument(b, &ArgumentMeta::typed("word()", None)),
            Err(Conflict::Meta { field: "type", .. })
        ));
    }
}
