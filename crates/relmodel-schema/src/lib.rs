//! Constraint naming and constraint DDL planning for relmodel.
//!
//! `relmodel-schema` reads a finalized model through
//! [`relmodel_core::RelationalModel`] and answers two questions:
//!
//! - **What is this object called in the database?** [`IdentifierResolver`]
//!   derives primary key, alternate key, index and foreign key names, honours
//!   explicit names, and collapses objects shared between entity types that
//!   split one table.
//! - **What must be created?** [`plan_table`]/[`plan_model`] collect the
//!   named objects of each table and render them as SQL.

pub mod ddl;
pub mod naming;

pub use ddl::{ConstraintPlan, ForeignKeyPlan, IndexPlan, TablePlan, plan_model, plan_table};
pub use naming::{ConstraintRef, IdentifierResolver};
