//! Physical database objects an entity type can be mapped to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of database object an entity type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreObjectType {
    /// A base table.
    Table,
    /// A view.
    View,
    /// A table-valued function.
    Function,
    /// An ad-hoc SQL query.
    SqlQuery,
}

impl StoreObjectType {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreObjectType::Table => "table",
            StoreObjectType::View => "view",
            StoreObjectType::Function => "function",
            StoreObjectType::SqlQuery => "sql query",
        }
    }
}

/// Identifies a table, view, function or SQL query by name and schema.
///
/// Two identifiers are equal only when name, schema and kind all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreObjectIdentifier {
    /// Object name.
    pub name: String,
    /// Schema, if any.
    pub schema: Option<String>,
    /// Object kind.
    pub kind: StoreObjectType,
}

impl StoreObjectIdentifier {
    /// Identify a table.
    pub fn table(name: impl Into<String>, schema: Option<String>) -> Self {
        Self {
            name: name.into(),
            schema,
            kind: StoreObjectType::Table,
        }
    }

    /// Identify a view.
    pub fn view(name: impl Into<String>, schema: Option<String>) -> Self {
        Self {
            name: name.into(),
            schema,
            kind: StoreObjectType::View,
        }
    }

    /// Identify a database function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            kind: StoreObjectType::Function,
        }
    }

    /// Identify an ad-hoc SQL query.
    pub fn sql_query(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            kind: StoreObjectType::SqlQuery,
        }
    }

    /// Whether this identifies a table.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.kind == StoreObjectType::Table
    }

    /// Schema-qualified display name (`schema.name` or `name`).
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for StoreObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.display_name())
    }
}
