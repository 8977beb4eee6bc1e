//! Declarations handed to the compiler by the host.

use serde::{Deserialize, Serialize};

use super::Element;

/// A single declaration payload.
///
/// `Command` and `Bind` carry a namespace string in the lexer grammar
/// (`"a <b> c"`). `Literal` and `Argument` carry the namespace as separate
/// segments whose final segment names the declared literal or argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Declares a command path.
    Command { path: String },
    /// Binds the annotated element to an existing command path.
    Bind { path: String },
    /// Declares a literal together with its aliases.
    Literal {
        namespace: Vec<String>,
        #[serde(default)]
        aliases: Vec<String>,
    },
    /// Declares an argument together with its backing type.
    Argument {
        namespace: Vec<String>,
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestions: Option<String>,
    },
}

impl Annotation {
    pub fn command(path: impl Into<String>) -> Self {
        Self::Command { path: path.into() }
    }

    pub fn bind(path: impl Into<String>) -> Self {
        Self::Bind { path: path.into() }
    }

    pub fn literal<S: Into<String>>(
        namespace: impl IntoIterator<Item = S>,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::Literal {
            namespace: namespace.into_iter().map(Into::into).collect(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn argument<S: Into<String>>(
        namespace: impl IntoIterator<Item = S>,
        type_name: impl Into<String>,
        suggestions: Option<String>,
    ) -> Self {
        Self::Argument {
            namespace: namespace.into_iter().map(Into::into).collect(),
            type_name: type_name.into(),
            suggestions,
        }
    }

    /// True for annotations consumed by command assembly.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Bind { .. })
    }
}

/// An annotation together with the element it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub element: Element,
    pub annotation: Annotation,
}

impl Declaration {
    pub fn new(element: Element, annotation: Annotation) -> Self {
        Self {
            element,
            annotation,
        }
    }
}
