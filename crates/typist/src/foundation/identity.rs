//! Identities name a single position in the command tree.
//!
//! An identity is a `(kind, name)` pair. Two identities are equal only when
//! both the kind and the name match, so a literal `b` and an argument `<b>`
//! are distinct even though they share a name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a command tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// A fixed word, e.g. `teleport`
    Literal,
    /// A typed value supplied by the user, e.g. `<player>`
    Argument,
}

/// A `(kind, name)` pair identifying one command tree position.
///
/// # Examples
///
/// ```
/// # use typist::foundation::{Identity, Kind};
/// let argument = Identity::argument("player");
/// assert_eq!(argument.kind, Kind::Argument);
/// assert_eq!(argument.to_string(), "<player>");
/// assert_eq!(Identity::literal("tp").to_string(), "tp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    pub kind: Kind,
    pub name: String,
}

impl Identity {
    pub fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(Kind::Literal, name)
    }

    pub fn argument(name: impl Into<String>) -> Self {
        Self::new(Kind::Argument, name)
    }

    pub fn is_literal(&self) -> bool {
        self.kind == Kind::Literal
    }

    pub fn is_argument(&self) -> bool {
        self.kind == Kind::Argument
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Literal => write!(f, "literal"),
            Kind::Argument => write!(f, "argument"),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Literal => write!(f, "{}", self.name),
            Kind::Argument => write!(f, "<{}>", self.name),
        }
    }
}
