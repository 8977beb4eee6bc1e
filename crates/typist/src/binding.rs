//! Bindings associate command nodes with the program elements that fulfil
//! a runtime role for them.

use std::fmt;

use crate::foundation::Element;
use crate::tree::NodeId;

/// Runtime role a bound element plays for its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Runs when the command is dispatched
    Execution,
    /// Decides whether a sender may use the command
    Requirement,
    /// Supplies completions for an argument
    Suggestions,
    /// Parses an argument's value
    Type,
}

impl Role {
    /// All roles in emission order.
    pub const ALL: [Role; 4] = [
        Role::Type,
        Role::Execution,
        Role::Requirement,
        Role::Suggestions,
    ];

    /// Runtime type a binding of this role provides, with its article.
    pub fn described(self) -> &'static str {
        match self {
            Role::Execution => "An Execution<CommandSender>",
            Role::Requirement => "A Requirement<CommandSender>",
            Role::Suggestions => "A SuggestionProvider<CommandSender>",
            Role::Type => "An ArgumentType<?>",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Execution => write!(f, "execution"),
            Role::Requirement => write!(f, "requirement"),
            Role::Suggestions => write!(f, "suggestions"),
            Role::Type => write!(f, "type"),
        }
    }
}

/// Handle of a binding inside its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u32);

impl BindingId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node bound to an element in a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub node: NodeId,
    pub role: Role,
    pub site: Element,
}
