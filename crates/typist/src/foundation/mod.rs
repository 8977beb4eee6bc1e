//! Compiler foundation types
//!
//! Shared by every phase: identities naming tree positions, the host's
//! program elements, and the declarations the host feeds in.

pub mod declaration;
pub mod element;
pub mod identity;

pub use declaration::{Annotation, Declaration};
pub use element::{Element, ElementKind, Mutability, Visibility};
pub use identity::{Identity, Kind};
