//! Compiler configuration.
//!
//! Every field has a default, so a host only spells out what it changes:
//!
//! ```
//! # use typist::config::Config;
//! let config: Config = serde_json::from_str(r#"{ "generation": { "suffix": "_tree" } }"#).unwrap();
//! assert_eq!(config.generation.suffix, "_tree");
//! assert_eq!(config.generation.runtime, "typist_runtime");
//! ```

use serde::{Deserialize, Serialize};

use crate::binding::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub types: TypeNames,
}

/// Settings for the emitted factories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Path of the runtime crate the generated code builds nodes with
    pub runtime: String,
    /// Sender type the generated command nodes are parameterized by
    pub sender: String,
    /// Appended to the snake-cased type name to form each factory's name
    pub suffix: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            runtime: "typist_runtime".to_string(),
            sender: "typist_runtime::CommandSender".to_string(),
            suffix: "_commands".to_string(),
        }
    }
}

/// Head names of the field types a binding role is inferred from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeNames {
    pub argument_type: String,
    pub execution: String,
    pub requirement: String,
    pub suggestions: String,
}

impl Default for TypeNames {
    fn default() -> Self {
        Self {
            argument_type: "ArgumentType".to_string(),
            execution: "Execution".to_string(),
            requirement: "Requirement".to_string(),
            suggestions: "SuggestionProvider".to_string(),
        }
    }
}

impl TypeNames {
    /// The role a field whose type head is `head` is bound in.
    pub fn role_of(&self, head: &str) -> Option<Role> {
        [
            (&self.argument_type, Role::Type),
            (&self.execution, Role::Execution),
            (&self.requirement, Role::Requirement),
            (&self.suggestions, Role::Suggestions),
        ]
        .into_iter()
        .find(|(name, _)| name.as_str() == head)
        .map(|(_, role)| role)
    }
}
