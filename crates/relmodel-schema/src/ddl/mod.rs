//! Constraint and index DDL planning.
//!
//! A [`TablePlan`] lists the named constraints and indexes of one table,
//! with objects shared between entity types (table splitting) emitted once
//! under their root's name. [`TablePlan::to_sql`] renders the plan as
//! `ALTER TABLE ... ADD CONSTRAINT` and `CREATE INDEX` statements.

use std::collections::HashSet;

use relmodel_core::identifiers::{quote_ident, uniquify};
use relmodel_core::{
    EntityTypeId, ForeignKeyId, IndexId, KeyId, RelationalModel, StoreObjectIdentifier,
};
use serde::{Deserialize, Serialize};

use crate::naming::IdentifierResolver;

/// A primary key or unique constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintPlan {
    pub name: String,
    pub columns: Vec<String>,
    pub key: KeyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyPlan {
    pub name: String,
    pub columns: Vec<String>,
    pub principal_table: StoreObjectIdentifier,
    pub principal_columns: Vec<String>,
    pub foreign_key: ForeignKeyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPlan {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    /// Partial index predicate, rendered verbatim.
    pub filter: Option<String>,
    pub index: IndexId,
}

/// Named constraints and indexes of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlan {
    pub table: StoreObjectIdentifier,
    pub primary_key: Option<ConstraintPlan>,
    pub unique_constraints: Vec<ConstraintPlan>,
    pub foreign_keys: Vec<ForeignKeyPlan>,
    pub indexes: Vec<IndexPlan>,
}

impl TablePlan {
    fn new(table: StoreObjectIdentifier) -> Self {
        Self {
            table,
            primary_key: None,
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Whether the plan produces no statements.
    pub fn is_empty(&self) -> bool {
        self.primary_key.is_none()
            && self.unique_constraints.is_empty()
            && self.foreign_keys.is_empty()
            && self.indexes.is_empty()
    }

    /// Every constraint and index name in the plan, in emission order.
    pub fn names(&self) -> Vec<&str> {
        self.primary_key
            .iter()
            .chain(&self.unique_constraints)
            .map(|c| c.name.as_str())
            .chain(self.foreign_keys.iter().map(|f| f.name.as_str()))
            .chain(self.indexes.iter().map(|i| i.name.as_str()))
            .collect()
    }

    /// Render the plan: primary key, unique constraints, foreign keys, then indexes.
    pub fn to_sql(&self) -> Vec<String> {
        let table = qualified_name(&self.table);
        let mut statements = Vec::new();

        if let Some(pk) = &self.primary_key {
            statements.push(format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                table,
                quote_ident(&pk.name),
                quote_list(&pk.columns)
            ));
        }

        for uk in &self.unique_constraints {
            statements.push(format!(
                "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
                table,
                quote_ident(&uk.name),
                quote_list(&uk.columns)
            ));
        }

        for fk in &self.foreign_keys {
            statements.push(format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                table,
                quote_ident(&fk.name),
                quote_list(&fk.columns),
                qualified_name(&fk.principal_table),
                quote_list(&fk.principal_columns)
            ));
        }

        for idx in &self.indexes {
            let mut stmt = format!(
                "CREATE {}INDEX {} ON {} ({})",
                if idx.unique { "UNIQUE " } else { "" },
                quote_ident(&idx.name),
                table,
                quote_list(&idx.columns)
            );
            if let Some(filter) = &idx.filter {
                stmt.push_str(" WHERE ");
                stmt.push_str(filter);
            }
            statements.push(stmt);
        }

        for stmt in &statements {
            tracing::trace!(sql = %stmt, "Generated constraint DDL statement");
        }

        statements
    }
}

/// Plan the constraints and indexes of `table`.
///
/// Covers every entity type mapped to `table`, including inherited
/// constraints. Constraints whose shared root lives on another entity type
/// are skipped, as are row-internal foreign keys. Distinct indexes that
/// still resolve to the same name are uniquified.
pub fn plan_table<M: RelationalModel + ?Sized>(
    model: &M,
    table: &StoreObjectIdentifier,
) -> TablePlan {
    tracing::debug!(table = %table, "Planning constraint DDL");

    let resolver = IdentifierResolver::new(model);
    let mapped: Vec<EntityTypeId> = model
        .entity_type_ids()
        .into_iter()
        .filter(|&et| model.maps_to(et, table))
        .collect();
    let mut plan = TablePlan::new(table.clone());

    let mut seen_keys = HashSet::new();
    for &et in &mapped {
        for key in model.keys_of(et) {
            if !seen_keys.insert(key) {
                continue;
            }
            let Some(name) = resolver.key_name_at(key, table) else {
                continue;
            };
            if resolver.find_shared_root_key(key, table).is_some() {
                continue;
            }
            let Some(columns) = model.column_names(&model.key(key).properties, table) else {
                continue;
            };
            let constraint = ConstraintPlan { name, columns, key };
            if !model.is_primary_key(key) {
                plan.unique_constraints.push(constraint);
            } else if plan.primary_key.is_none() {
                plan.primary_key = Some(constraint);
            } else {
                tracing::warn!(
                    table = %table,
                    key = %constraint.name,
                    "Primary key is not shared with the table's primary key; emitting it as a unique constraint"
                );
                plan.unique_constraints.push(constraint);
            }
        }
    }

    let mut seen_foreign_keys = HashSet::new();
    for &et in &mapped {
        let row_internal = model.row_internal_foreign_keys(et, table);
        for foreign_key in model.foreign_keys_of(et) {
            if !seen_foreign_keys.insert(foreign_key) || row_internal.contains(&foreign_key) {
                continue;
            }
            let fk = model.foreign_key(foreign_key);
            let Some(principal_table) = model.table(fk.principal_type) else {
                continue;
            };
            let Some(name) = resolver.constraint_name_at(foreign_key, table, &principal_table)
            else {
                continue;
            };
            if resolver
                .find_shared_root_foreign_key(foreign_key, table)
                .is_some()
            {
                continue;
            }
            let (Some(columns), Some(principal_columns)) = (
                model.column_names(&fk.properties, table),
                model.column_names(&model.key(fk.principal_key).properties, &principal_table),
            ) else {
                continue;
            };
            plan.foreign_keys.push(ForeignKeyPlan {
                name,
                columns,
                principal_table,
                principal_columns,
                foreign_key,
            });
        }
    }

    let mut seen_indexes = HashSet::new();
    let mut index_names: HashSet<String> = HashSet::new();
    for &et in &mapped {
        for index in model.indexes_of(et) {
            if !seen_indexes.insert(index) {
                continue;
            }
            let Some(mut name) = resolver.index_name_at(index, table) else {
                continue;
            };
            if resolver.find_shared_root_index(index, table).is_some() {
                continue;
            }
            let ix = model.index(index);
            let Some(columns) = model.column_names(&ix.properties, table) else {
                continue;
            };
            if index_names.contains(&name) {
                let unique = uniquify(&name, model.max_identifier_length(), |candidate| {
                    index_names.contains(candidate)
                });
                tracing::warn!(
                    table = %table,
                    index = %name,
                    renamed = %unique,
                    "Index name collides with another index on the same table"
                );
                name = unique;
            }
            index_names.insert(name.clone());
            plan.indexes.push(IndexPlan {
                name,
                columns,
                unique: ix.is_unique,
                filter: ix.filter().map(str::to_string),
                index,
            });
        }
    }

    tracing::debug!(
        table = %table,
        constraints = plan.names().len(),
        "Planned constraint DDL"
    );
    plan
}

/// Plan every table in the model, in first-mapped order.
pub fn plan_model<M: RelationalModel + ?Sized>(model: &M) -> Vec<TablePlan> {
    let tables = model.tables();
    tracing::debug!(tables = tables.len(), "Planning constraint DDL for model");
    tables.iter().map(|t| plan_table(model, t)).collect()
}

fn qualified_name(table: &StoreObjectIdentifier) -> String {
    match &table.schema {
        Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(&table.name)),
        None => quote_ident(&table.name),
    }
}

fn quote_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}
