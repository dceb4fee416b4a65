//! Core metadata types for relmodel.
//!
//! `relmodel-core` is the **foundation layer**: it holds the immutable
//! relational metadata graph that identifier resolution reads.
//!
//! # Role In The Architecture
//!
//! - **Metadata graph**: `Model` owns entity types, properties, keys, indexes
//!   and foreign keys in arenas addressed by copyable ids.
//! - **Access contract**: `RelationalModel` is the read-only interface the
//!   resolver works against; `Model` is the stock implementation.
//! - **Annotations**: a typed annotation map replaces string-keyed
//!   dictionaries for table names, schemas, column names and constraint names.
//! - **Identifiers**: `truncate`/`uniquify` keep generated names within the
//!   configured maximum identifier length.
//!
//! # Who Uses This Crate
//!
//! - `relmodel-schema` derives constraint and index names from the graph and
//!   plans constraint DDL.
//! - `relmodel` re-exports everything behind a facade and prelude.

pub mod access;
pub mod annotations;
pub mod builder;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod mapping;
pub mod metadata;
pub mod model;
pub mod store_object;

pub use access::RelationalModel;
pub use annotations::{Annotation, AnnotationName, Annotations};
pub use builder::ModelBuilder;
pub use config::{DEFAULT_MAX_IDENTIFIER_LENGTH, MAX_ENTITY_TYPES_SHARING_TABLE, ModelConfig};
pub use error::{Error, Result};
pub use identifiers::{quote_ident, truncate, uniquify};
pub use mapping::MappingStrategy;
pub use metadata::{
    ColumnOverride, EntityType, EntityTypeId, ForeignKey, ForeignKeyId, Index, IndexId, Key,
    KeyId, Property, PropertyId,
};
pub use model::Model;
pub use store_object::{StoreObjectIdentifier, StoreObjectType};
