//! Metadata objects of a finalized model.
//!
//! Objects live in arenas owned by [`Model`](crate::Model) and refer to one
//! another through copyable ids. They are only handed out by shared
//! reference, so a finalized model cannot be changed through them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;
use crate::store_object::StoreObjectIdentifier;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub(crate) const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position of the object in its arena.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }

            pub(crate) const LABEL: &'static str = $label;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

arena_id!(
    /// Identifies an entity type.
    EntityTypeId,
    "entity type"
);
arena_id!(
    /// Identifies a property.
    PropertyId,
    "property"
);
arena_id!(
    /// Identifies a primary or alternate key.
    KeyId,
    "key"
);
arena_id!(
    /// Identifies an index.
    IndexId,
    "index"
);
arena_id!(
    /// Identifies a foreign key.
    ForeignKeyId,
    "foreign key"
);

/// An entity type and the relational metadata configured on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    pub id: EntityTypeId,
    /// Entity type name; the default table name.
    pub name: String,
    pub base_type: Option<EntityTypeId>,
    pub is_abstract: bool,
    /// Properties declared on this type (not inherited ones).
    pub properties: Vec<PropertyId>,
    /// Primary key; only ever set on hierarchy roots.
    pub primary_key: Option<KeyId>,
    /// Keys declared on this type, primary key included.
    pub keys: Vec<KeyId>,
    pub indexes: Vec<IndexId>,
    pub foreign_keys: Vec<ForeignKeyId>,
    /// All types below this one, breadth first. Rebuilt on finalization.
    #[serde(skip)]
    pub derived_types: Vec<EntityTypeId>,
    pub annotations: Annotations,
}

impl EntityType {
    pub(crate) fn new(id: EntityTypeId, name: String) -> Self {
        Self {
            id,
            name,
            base_type: None,
            is_abstract: false,
            properties: Vec::new(),
            primary_key: None,
            keys: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            derived_types: Vec::new(),
            annotations: Annotations::new(),
        }
    }
}

/// Column name used for a property in one particular store object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOverride {
    pub store_object: StoreObjectIdentifier,
    pub column_name: String,
}

/// A scalar property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub declaring_type: EntityTypeId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ColumnOverride>,
    pub annotations: Annotations,
}

impl Property {
    /// Column name outside any particular store object.
    #[must_use]
    pub fn column_base_name(&self) -> &str {
        self.annotations.column_name().unwrap_or(&self.name)
    }

    /// Column name configured for one store object, if any.
    #[must_use]
    pub fn column_override(&self, store_object: &StoreObjectIdentifier) -> Option<&str> {
        self.overrides
            .iter()
            .find(|o| &o.store_object == store_object)
            .map(|o| o.column_name.as_str())
    }
}

/// A primary or alternate key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    pub id: KeyId,
    pub declaring_type: EntityTypeId,
    pub properties: Vec<PropertyId>,
    pub annotations: Annotations,
}

/// An index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub id: IndexId,
    pub declaring_type: EntityTypeId,
    pub properties: Vec<PropertyId>,
    /// Model-level index name, used as the database name unless overridden.
    pub name: Option<String>,
    pub is_unique: bool,
    pub annotations: Annotations,
}

impl Index {
    /// Filter predicate for a partial index.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.annotations.filter()
    }
}

/// A foreign key from a dependent entity type to a principal key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    pub id: ForeignKeyId,
    pub declaring_type: EntityTypeId,
    pub properties: Vec<PropertyId>,
    pub principal_type: EntityTypeId,
    pub principal_key: KeyId,
    pub annotations: Annotations,
}
