//! Error types for building and loading metadata models.
//!
//! Identifier resolution itself never fails (absence is reported as `None`);
//! these errors only surface while a [`Model`](crate::Model) is being
//! constructed or restored from a snapshot.

use std::error::Error as StdError;
use std::fmt;

/// Result type alias for model construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, finalizing or loading a model.
#[derive(Debug)]
pub enum Error {
    /// An entity type name was not found in the model.
    UnknownEntityType(String),
    /// An entity type with this name already exists.
    DuplicateEntityType(String),
    /// A property name is not declared on the entity type or its base types.
    UnknownProperty { entity: String, property: String },
    /// A property with this name already exists in the hierarchy.
    DuplicateProperty { entity: String, property: String },
    /// A key, index or foreign key was given no properties.
    EmptyPropertyList { kind: &'static str, entity: String },
    /// The entity type already has a primary key.
    PrimaryKeyRedefined(String),
    /// A primary key was declared on a derived entity type.
    PrimaryKeyOnDerivedType(String),
    /// The principal entity type has no primary key to reference.
    MissingPrincipalKey { dependent: String, principal: String },
    /// Foreign key and principal key property counts differ.
    ForeignKeyArity {
        entity: String,
        expected: usize,
        actual: usize,
    },
    /// Setting this base type would create an inheritance cycle.
    InheritanceCycle(String),
    /// A snapshot references an id that does not exist.
    DanglingReference { kind: &'static str, index: usize },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownEntityType(name) => write!(f, "unknown entity type: {}", name),
            Error::DuplicateEntityType(name) => {
                write!(f, "entity type already defined: {}", name)
            }
            Error::UnknownProperty { entity, property } => {
                write!(f, "unknown property {}.{}", entity, property)
            }
            Error::DuplicateProperty { entity, property } => {
                write!(f, "property already defined: {}.{}", entity, property)
            }
            Error::EmptyPropertyList { kind, entity } => {
                write!(f, "{} on {} must have at least one property", kind, entity)
            }
            Error::PrimaryKeyRedefined(entity) => {
                write!(f, "primary key already defined on {}", entity)
            }
            Error::PrimaryKeyOnDerivedType(entity) => write!(
                f,
                "primary key must be declared on the hierarchy root, not on {}",
                entity
            ),
            Error::MissingPrincipalKey {
                dependent,
                principal,
            } => write!(
                f,
                "foreign key from {} targets {} which has no primary key",
                dependent, principal
            ),
            Error::ForeignKeyArity {
                entity,
                expected,
                actual,
            } => write!(
                f,
                "foreign key on {} has {} properties but the principal key has {}",
                entity, actual, expected
            ),
            Error::InheritanceCycle(entity) => {
                write!(f, "inheritance cycle detected at {}", entity)
            }
            Error::DanglingReference { kind, index } => {
                write!(f, "snapshot references missing {} #{}", kind, index)
            }
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
