//! Relational identifier resolution for ORM metadata models.
//!
//! `relmodel` is the **facade crate**: it re-exports the metadata graph from
//! `relmodel-core` and the naming and DDL planning layer from
//! `relmodel-schema`, so applications depend on one crate.
//!
//! # Quick Start
//!
//! ```
//! use relmodel::prelude::*;
//!
//! let mut b = ModelBuilder::new();
//! let order = b.entity("Order")?;
//! b.property(order, "Id")?;
//! b.primary_key(order, &["Id"])?;
//! b.to_table(order, "Orders");
//!
//! let line = b.entity("OrderLine")?;
//! b.properties(line, &["Id", "OrderId"])?;
//! b.primary_key(line, &["Id"])?;
//! let fk = b.foreign_key(line, &["OrderId"], order)?;
//! b.to_table(line, "OrderLines");
//! let model = b.finalize()?;
//!
//! let names = IdentifierResolver::new(&model);
//! assert_eq!(
//!     names.constraint_name(fk).as_deref(),
//!     Some("FK_OrderLines_Orders_OrderId")
//! );
//!
//! for plan in plan_model(&model) {
//!     for stmt in plan.to_sql() {
//!         println!("{stmt};");
//!     }
//! }
//! # Ok::<(), relmodel::Error>(())
//! ```
//!
//! # Crates
//!
//! - `relmodel-core`: entity types, keys, indexes, foreign keys, annotations,
//!   `ModelBuilder`, JSON snapshots, identifier truncation.
//! - `relmodel-schema`: `IdentifierResolver` and the constraint DDL planner.

pub use relmodel_core::{
    Annotation, AnnotationName, Annotations, ColumnOverride, DEFAULT_MAX_IDENTIFIER_LENGTH,
    EntityType, EntityTypeId, Error, ForeignKey, ForeignKeyId, Index, IndexId, Key, KeyId,
    MAX_ENTITY_TYPES_SHARING_TABLE, MappingStrategy, Model, ModelBuilder, ModelConfig, Property,
    PropertyId, RelationalModel, Result, StoreObjectIdentifier, StoreObjectType, quote_ident,
    truncate, uniquify,
};
pub use relmodel_schema::{
    ConstraintPlan, ConstraintRef, ForeignKeyPlan, IdentifierResolver, IndexPlan, TablePlan,
    plan_model, plan_table,
};

pub use relmodel_core::identifiers;
pub use relmodel_schema::{ddl, naming};

/// Everything needed to build a model and resolve its names.
pub mod prelude {
    pub use crate::{
        ConstraintRef, Error, IdentifierResolver, MappingStrategy, Model, ModelBuilder,
        ModelConfig, RelationalModel, Result, StoreObjectIdentifier, TablePlan, plan_model,
        plan_table,
    };
}
