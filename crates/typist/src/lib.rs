// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! # Typist
//!
//! Compile-time command tree compiler.
//!
//! Program elements carry namespace declarations such as `"tp <player> here"`.
//! Typist merges every declaration of a round into one command tree, binds
//! elements to the nodes they execute, guard or parse, checks the result
//! and emits Rust source that rebuilds the tree against the runtime's
//! builder API.
//!
//! ## Architecture
//!
//! ```text
//! foundation   - Identity, Element, Declaration
//!     ↓
//! lexer        - namespace tokens, memoized per environment
//!     ↓
//! parser       - command assembly, then binding assembly
//!     ↓
//! environment  - tree + bindings + scopes + diagnostics of one round
//!     ↓
//! lint         - pure validation passes
//!     ↓
//! generation   - one factory per declaring type
//! ```
//!
//! ## Usage
//!
//! ```
//! use typist::config::Config;
//! use typist::foundation::{Annotation, Declaration, Element};
//!
//! let declarations = vec![
//!     Declaration::new(Element::ty("Teleport"), Annotation::command("tp <player>")),
//!     Declaration::new(
//!         Element::field("Teleport", "player", "ArgumentType<Player>").public(),
//!         Annotation::bind("tp <player>"),
//!     ),
//!     Declaration::new(
//!         Element::method("Teleport", "run").public(),
//!         Annotation::bind("tp <player>"),
//!     ),
//! ];
//!
//! let output = typist::compile(&declarations, &Config::default()).unwrap();
//! assert!(output.source.contains("pub fn teleport_commands"));
//! ```

pub mod binding;
pub mod compile;
pub mod config;
pub mod environment;
pub mod error;
pub mod foundation;
pub mod generation;
pub mod lexer;
pub mod lint;
pub mod parser;
pub mod tree;

pub use binding::{Binding, Role};
pub use compile::{assemble, compile, Output};
pub use config::Config;
pub use environment::{Environment, Scope};
pub use error::{Diagnostic, DiagnosticFormatter, ErrorKind, Severity};
pub use generation::{GenerationError, Generator};
