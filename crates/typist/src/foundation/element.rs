//! Program elements supplied by the host.
//!
//! The host discovers declarations on its own program elements (types, fields
//! and methods) and hands each one over together with the element it was
//! found on. The compiler only needs enough of the element to infer binding
//! roles, check modifiers, report diagnostics and reference it from
//! generated code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What sort of program element a declaration was found on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A type (struct) declaring commands
    Type,
    /// A field holding a value, with its declared type as written in source
    Field { ty: String },
    /// A callable method
    Method,
}

/// Element visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`, `pub(super)` and friends
    Restricted,
    #[default]
    Private,
}

/// Whether an element can change after construction.
///
/// Fields are mutable when declared behind interior mutability or `static mut`;
/// methods are mutable when they take `&mut self`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    #[default]
    Immutable,
    Mutable,
}

/// A host program element that carries declarations.
///
/// # Examples
///
/// ```
/// # use typist::foundation::Element;
/// let ty = Element::ty("crate::commands::Teleport");
/// let field = Element::field("crate::commands::Teleport", "player", "ArgumentType<Player>").public();
///
/// assert_eq!(ty.scope(), "crate::commands::Teleport");
/// assert_eq!(field.scope(), "crate::commands::Teleport");
/// assert_eq!(field.to_string(), "crate::commands::Teleport::player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Path of the enclosing type; `None` for types themselves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub mutability: Mutability,
}

impl Element {
    /// A type element. Types are public since the generated factory names them.
    pub fn ty(path: impl Into<String>) -> Self {
        Self {
            owner: None,
            name: path.into(),
            kind: ElementKind::Type,
            visibility: Visibility::Public,
            mutability: Mutability::Immutable,
        }
    }

    pub fn field(owner: impl Into<String>, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            name: name.into(),
            kind: ElementKind::Field { ty: ty.into() },
            visibility: Visibility::Private,
            mutability: Mutability::Immutable,
        }
    }

    pub fn method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            name: name.into(),
            kind: ElementKind::Method,
            visibility: Visibility::Private,
            mutability: Mutability::Immutable,
        }
    }

    pub fn public(mut self) -> Self {
        self.visibility = Visibility::Public;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn mutable(mut self) -> Self {
        self.mutability = Mutability::Mutable;
        self
    }

    /// The type whose scope this element belongs to.
    ///
    /// Members belong to their owner, types to themselves.
    pub fn scope(&self) -> &str {
        self.owner.as_deref().unwrap_or(&self.name)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// True when the element cannot change once its owner is built.
    pub fn is_constant(&self) -> bool {
        self.mutability == Mutability::Immutable
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind, ElementKind::Field { .. })
    }

    pub fn is_method(&self) -> bool {
        self.kind == ElementKind::Method
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}::{}", owner, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_scope_is_owner() {
        let method = Element::method("Cases", "execute");
        assert_eq!(method.scope(), "Cases");
        assert_eq!(method.to_string(), "Cases::execute");
    }

    #[test]
    fn test_defaults_are_private_and_immutable() {
        let field = Element::field("Cases", "ty", "ArgumentType<i32>");
        assert!(!field.is_public());
        assert!(field.is_constant());

        let field = field.public().mutable();
        assert!(field.is_public());
        assert!(!field.is_constant());
    }

    #[test]
    fn test_deserialize_defaults() {
        let element: Element = serde_json::from_str(
            r#"{ "owner": "Cases", "name": "run", "kind": "method" }"#,
        )
        .unwrap();

        assert_eq!(element, Element::method("Cases", "run"));
    }

    #[test]
    fn test_deserialize_field() {
        let element: Element = serde_json::from_str(
            r#"{
                "owner": "Cases",
                "name": "count",
                "kind": { "field": { "ty": "ArgumentType<i32>" } },
                "visibility": "public",
                "mutability": "mutable"
            }"#,
        )
        .unwrap();

        assert_eq!(
            element,
            Element::field("Cases", "count", "ArgumentType<i32>")
                .public()
                .mutable()
        );
    }
}
