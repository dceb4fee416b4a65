//! Model-wide relational configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier length ceiling used when the provider does not set one.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 32_767;

/// Upper bound on the number of entity types that may share one table.
///
/// Shared-table traversal stops after this many hops instead of tracking
/// visited nodes, so a malformed model with a relationship cycle still
/// terminates.
pub const MAX_ENTITY_TYPES_SHARING_TABLE: usize = 128;

/// Relational settings that apply to the whole model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Longest identifier the database accepts, in characters.
    pub max_identifier_length: usize,
    /// Schema used for tables that do not configure one.
    pub default_schema: Option<String>,
    /// Iteration bound for shared-table traversal.
    pub max_entity_types_sharing_table: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            default_schema: None,
            max_entity_types_sharing_table: MAX_ENTITY_TYPES_SHARING_TABLE,
        }
    }
}

impl ModelConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum identifier length.
    #[must_use]
    pub fn max_identifier_length(mut self, length: usize) -> Self {
        self.max_identifier_length = length;
        self
    }

    /// Set the default schema.
    #[must_use]
    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Set the shared-table traversal bound.
    #[must_use]
    pub fn max_entity_types_sharing_table(mut self, bound: usize) -> Self {
        self.max_entity_types_sharing_table = bound;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no identifier could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.max_identifier_length == 0 {
            return Err(Error::InvalidConfig(
                "max_identifier_length must be at least 1".to_string(),
            ));
        }
        if self.max_entity_types_sharing_table == 0 {
            return Err(Error::InvalidConfig(
                "max_entity_types_sharing_table must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
