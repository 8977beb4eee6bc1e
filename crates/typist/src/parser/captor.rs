//! Infers the role a bound element plays from its shape.

use thiserror::Error;

use crate::binding::Role;
use crate::config::TypeNames;
use crate::foundation::{Element, ElementKind};

/// Why an element cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Uncapturable {
    #[error("\"{0}\" is a type and cannot be bound to a command")]
    Type(String),

    #[error("fields of type \"{0}\" have no binding role")]
    Field(String),
}

/// Maps bound elements to binding roles.
///
/// Methods always execute. Fields are classified by the head name of their
/// declared type, so `Arc<dyn Execution<CommandSender>>` and
/// `crate::Requirement<S>` resolve like `Execution` and `Requirement`.
#[derive(Debug, Clone, Copy)]
pub struct Captor<'c> {
    names: &'c TypeNames,
}

impl<'c> Captor<'c> {
    pub fn new(names: &'c TypeNames) -> Self {
        Self { names }
    }

    pub fn capture(&self, element: &Element) -> Result<Role, Uncapturable> {
        match &element.kind {
            ElementKind::Method => Ok(Role::Execution),
            ElementKind::Field { ty } => self
                .names
                .role_of(head(ty))
                .ok_or_else(|| Uncapturable::Field(ty.clone())),
            ElementKind::Type => Err(Uncapturable::Type(element.name.clone())),
        }
    }
}

const WRAPPERS: &[&str] = &["Arc", "Rc", "Box"];

/// The bare name of a type expression, looking through references, trait
/// object keywords and smart pointers.
fn head(ty: &str) -> &str {
    let mut ty = ty.trim();
    loop {
        let stripped = ty
            .strip_prefix('&')
            .or_else(|| ty.strip_prefix("mut "))
            .or_else(|| ty.strip_prefix("dyn "))
            .or_else(|| ty.strip_prefix("impl "));
        match stripped {
            Some(rest) => ty = rest.trim_start(),
            None => break,
        }
    }

    let (path, generics) = match ty.find('<') {
        Some(open) => (&ty[..open], Some(&ty[open + 1..])),
        None => (ty, None),
    };
    let name = path.rsplit("::").next().unwrap_or(path).trim();

    match generics {
        Some(inner) if WRAPPERS.contains(&name) => {
            let inner = inner.strip_suffix('>').unwrap_or(inner);
            head(inner)
        }
        _ => name,
    }
}
