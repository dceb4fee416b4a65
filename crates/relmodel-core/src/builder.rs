//! Incremental construction of a [`Model`].
//!
//! Stands in for the ORM's model-building pipeline: entity types, properties,
//! keys, indexes and foreign keys are added one at a time, relational
//! annotations are attached, and [`ModelBuilder::finalize`] freezes the graph.
//!
//! # Example
//!
//! ```
//! use relmodel_core::{ModelBuilder, RelationalModel};
//!
//! let mut b = ModelBuilder::new();
//! let order = b.entity("Order")?;
//! b.property(order, "Id")?;
//! b.primary_key(order, &["Id"])?;
//! b.to_table(order, "Orders");
//!
//! let model = b.finalize()?;
//! assert_eq!(model.table_name(order).as_deref(), Some("Orders"));
//! # Ok::<(), relmodel_core::Error>(())
//! ```

use crate::access::RelationalModel;
use crate::annotations::{Annotation, Annotations};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::mapping::MappingStrategy;
use crate::metadata::{
    ColumnOverride, EntityType, EntityTypeId, ForeignKey, ForeignKeyId, Index, IndexId, Key,
    KeyId, Property, PropertyId,
};
use crate::model::Model;
use crate::store_object::StoreObjectIdentifier;

/// Builds a [`Model`] one metadata object at a time.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given configuration.
    #[must_use]
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            model: Model {
                config,
                ..Model::default()
            },
        }
    }

    /// Set the maximum identifier length.
    pub fn max_identifier_length(&mut self, length: usize) -> &mut Self {
        self.model.config.max_identifier_length = length;
        self
    }

    /// Set the default schema.
    pub fn default_schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.model.config.default_schema = Some(schema.into());
        self
    }

    /// Set the shared-table traversal bound.
    pub fn max_entity_types_sharing_table(&mut self, bound: usize) -> &mut Self {
        self.model.config.max_entity_types_sharing_table = bound;
        self
    }

    /// Add an entity type.
    pub fn entity(&mut self, name: impl Into<String>) -> Result<EntityTypeId> {
        let name = name.into();
        if self.model.find_entity_type(&name).is_some() {
            return Err(Error::DuplicateEntityType(name));
        }
        let id = EntityTypeId::new(self.model.entity_types.len());
        self.model.entity_types.push(EntityType::new(id, name));
        Ok(id)
    }

    /// Look up an entity type added earlier.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<EntityTypeId> {
        self.model.find_entity_type(name)
    }

    /// Make `derived` inherit from `base`.
    pub fn base_type(&mut self, derived: EntityTypeId, base: EntityTypeId) -> Result<&mut Self> {
        let mut current = Some(base);
        while let Some(t) = current {
            if t == derived {
                return Err(Error::InheritanceCycle(self.entity_name(derived)));
            }
            current = self.model.entity_types[t.index()].base_type;
        }
        if self.model.entity_types[derived.index()].primary_key.is_some() {
            return Err(Error::PrimaryKeyOnDerivedType(self.entity_name(derived)));
        }
        self.model.entity_types[derived.index()].base_type = Some(base);
        Ok(self)
    }

    /// Mark an entity type abstract.
    pub fn set_abstract(&mut self, entity_type: EntityTypeId, value: bool) -> &mut Self {
        self.model.entity_types[entity_type.index()].is_abstract = value;
        self
    }

    /// Configure the mapping strategy of a hierarchy (set on the root).
    pub fn mapping_strategy(
        &mut self,
        entity_type: EntityTypeId,
        strategy: MappingStrategy,
    ) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::MappingStrategy(strategy))
    }

    /// Map an entity type to a table.
    pub fn to_table(&mut self, entity_type: EntityTypeId, name: impl Into<String>) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::TableName(Some(name.into())))
    }

    /// Map an entity type to a table in a schema.
    pub fn to_table_in_schema(
        &mut self,
        entity_type: EntityTypeId,
        name: impl Into<String>,
        schema: impl Into<String>,
    ) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::TableName(Some(name.into())));
        self.annotate_entity(entity_type, Annotation::Schema(Some(schema.into())))
    }

    /// Explicitly leave an entity type without a table.
    pub fn exclude_from_table(&mut self, entity_type: EntityTypeId) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::TableName(None))
    }

    /// Map an entity type to a view.
    pub fn to_view(
        &mut self,
        entity_type: EntityTypeId,
        name: impl Into<String>,
        schema: Option<String>,
    ) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::ViewName(Some(name.into())));
        if schema.is_some() {
            self.annotate_entity(entity_type, Annotation::ViewSchema(schema));
        }
        self
    }

    /// Map an entity type to a table-valued function.
    pub fn to_function(&mut self, entity_type: EntityTypeId, name: impl Into<String>) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::FunctionName(name.into()))
    }

    /// Map an entity type to an ad-hoc SQL query.
    pub fn to_sql_query(&mut self, entity_type: EntityTypeId, sql: impl Into<String>) -> &mut Self {
        self.annotate_entity(entity_type, Annotation::SqlQuery(sql.into()))
    }

    /// Attach any annotation to an entity type.
    pub fn annotate_entity(&mut self, entity_type: EntityTypeId, annotation: Annotation) -> &mut Self {
        self.model.entity_types[entity_type.index()]
            .annotations
            .set(annotation);
        self
    }

    /// Add a property to an entity type.
    pub fn property(
        &mut self,
        entity_type: EntityTypeId,
        name: impl Into<String>,
    ) -> Result<PropertyId> {
        let name = name.into();
        if self.model.find_property(entity_type, &name).is_some() {
            return Err(Error::DuplicateProperty {
                entity: self.entity_name(entity_type),
                property: name,
            });
        }
        let id = PropertyId::new(self.model.properties.len());
        self.model.properties.push(Property {
            id,
            name,
            declaring_type: entity_type,
            overrides: Vec::new(),
            annotations: Annotations::new(),
        });
        self.model.entity_types[entity_type.index()]
            .properties
            .push(id);
        Ok(id)
    }

    /// Add several properties at once.
    pub fn properties(
        &mut self,
        entity_type: EntityTypeId,
        names: &[&str],
    ) -> Result<Vec<PropertyId>> {
        names
            .iter()
            .map(|name| self.property(entity_type, *name))
            .collect()
    }

    /// Set a property's column name.
    pub fn column_name(&mut self, property: PropertyId, name: impl Into<String>) -> &mut Self {
        self.model.properties[property.index()]
            .annotations
            .set(Annotation::ColumnName(name.into()));
        self
    }

    /// Set a property's column name for one store object only.
    pub fn column_name_in(
        &mut self,
        property: PropertyId,
        store_object: StoreObjectIdentifier,
        name: impl Into<String>,
    ) -> &mut Self {
        let overrides = &mut self.model.properties[property.index()].overrides;
        overrides.retain(|o| o.store_object != store_object);
        overrides.push(ColumnOverride {
            store_object,
            column_name: name.into(),
        });
        self
    }

    /// Define the primary key of a hierarchy root.
    pub fn primary_key(&mut self, entity_type: EntityTypeId, properties: &[&str]) -> Result<KeyId> {
        let entity = &self.model.entity_types[entity_type.index()];
        if entity.base_type.is_some() {
            return Err(Error::PrimaryKeyOnDerivedType(entity.name.clone()));
        }
        if entity.primary_key.is_some() {
            return Err(Error::PrimaryKeyRedefined(entity.name.clone()));
        }
        let id = self.add_key(entity_type, properties)?;
        self.model.entity_types[entity_type.index()].primary_key = Some(id);
        Ok(id)
    }

    /// Define an alternate key.
    pub fn alternate_key(
        &mut self,
        entity_type: EntityTypeId,
        properties: &[&str],
    ) -> Result<KeyId> {
        self.add_key(entity_type, properties)
    }

    /// Set an explicit constraint name on a key.
    pub fn key_name(&mut self, key: KeyId, name: impl Into<String>) -> &mut Self {
        self.model.keys[key.index()]
            .annotations
            .set(Annotation::Name(name.into()));
        self
    }

    /// Define a non-unique index.
    pub fn index(&mut self, entity_type: EntityTypeId, properties: &[&str]) -> Result<IndexId> {
        self.add_index(entity_type, properties, None, false)
    }

    /// Define a unique index.
    pub fn unique_index(
        &mut self,
        entity_type: EntityTypeId,
        properties: &[&str],
    ) -> Result<IndexId> {
        self.add_index(entity_type, properties, None, true)
    }

    /// Define an index with a model-level name.
    pub fn named_index(
        &mut self,
        entity_type: EntityTypeId,
        properties: &[&str],
        name: impl Into<String>,
    ) -> Result<IndexId> {
        self.add_index(entity_type, properties, Some(name.into()), false)
    }

    /// Set an explicit database name on an index.
    pub fn index_database_name(&mut self, index: IndexId, name: impl Into<String>) -> &mut Self {
        self.model.indexes[index.index()]
            .annotations
            .set(Annotation::Name(name.into()));
        self
    }

    /// Set a filter predicate on an index.
    pub fn index_filter(&mut self, index: IndexId, filter: impl Into<String>) -> &mut Self {
        self.model.indexes[index.index()]
            .annotations
            .set(Annotation::Filter(filter.into()));
        self
    }

    /// Define a foreign key referencing the principal's primary key.
    pub fn foreign_key(
        &mut self,
        dependent: EntityTypeId,
        properties: &[&str],
        principal: EntityTypeId,
    ) -> Result<ForeignKeyId> {
        let principal_root = self.model.root_type(principal);
        let Some(principal_key) = self.model.entity_types[principal_root.index()].primary_key
        else {
            return Err(Error::MissingPrincipalKey {
                dependent: self.entity_name(dependent),
                principal: self.entity_name(principal),
            });
        };
        self.foreign_key_to(dependent, properties, principal, principal_key)
    }

    /// Define a foreign key referencing a specific principal key.
    pub fn foreign_key_to(
        &mut self,
        dependent: EntityTypeId,
        properties: &[&str],
        principal: EntityTypeId,
        principal_key: KeyId,
    ) -> Result<ForeignKeyId> {
        let resolved = self.resolve_properties(dependent, properties, "foreign key")?;
        let expected = self.model.keys[principal_key.index()].properties.len();
        if expected != resolved.len() {
            return Err(Error::ForeignKeyArity {
                entity: self.entity_name(dependent),
                expected,
                actual: resolved.len(),
            });
        }
        let id = ForeignKeyId::new(self.model.foreign_keys.len());
        self.model.foreign_keys.push(ForeignKey {
            id,
            declaring_type: dependent,
            properties: resolved,
            principal_type: principal,
            principal_key,
            annotations: Annotations::new(),
        });
        self.model.entity_types[dependent.index()]
            .foreign_keys
            .push(id);
        Ok(id)
    }

    /// Set an explicit constraint name on a foreign key.
    pub fn constraint_name(
        &mut self,
        foreign_key: ForeignKeyId,
        name: impl Into<String>,
    ) -> &mut Self {
        self.model.foreign_keys[foreign_key.index()]
            .annotations
            .set(Annotation::Name(name.into()));
        self
    }

    /// Validate and freeze the model.
    pub fn finalize(self) -> Result<Model> {
        self.model.finalize()
    }

    fn add_key(&mut self, entity_type: EntityTypeId, properties: &[&str]) -> Result<KeyId> {
        let resolved = self.resolve_properties(entity_type, properties, "key")?;
        let id = KeyId::new(self.model.keys.len());
        self.model.keys.push(Key {
            id,
            declaring_type: entity_type,
            properties: resolved,
            annotations: Annotations::new(),
        });
        self.model.entity_types[entity_type.index()].keys.push(id);
        Ok(id)
    }

    fn add_index(
        &mut self,
        entity_type: EntityTypeId,
        properties: &[&str],
        name: Option<String>,
        is_unique: bool,
    ) -> Result<IndexId> {
        let resolved = self.resolve_properties(entity_type, properties, "index")?;
        let id = IndexId::new(self.model.indexes.len());
        self.model.indexes.push(Index {
            id,
            declaring_type: entity_type,
            properties: resolved,
            name,
            is_unique,
            annotations: Annotations::new(),
        });
        self.model.entity_types[entity_type.index()]
            .indexes
            .push(id);
        Ok(id)
    }

    fn resolve_properties(
        &self,
        entity_type: EntityTypeId,
        names: &[&str],
        kind: &'static str,
    ) -> Result<Vec<PropertyId>> {
        if names.is_empty() {
            return Err(Error::EmptyPropertyList {
                kind,
                entity: self.entity_name(entity_type),
            });
        }
        names
            .iter()
            .map(|name| {
                self.model
                    .find_property(entity_type, name)
                    .ok_or_else(|| Error::UnknownProperty {
                        entity: self.entity_name(entity_type),
                        property: (*name).to_string(),
                    })
            })
            .collect()
    }

    fn entity_name(&self, entity_type: EntityTypeId) -> String {
        self.model.entity_types[entity_type.index()].name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut b = ModelBuilder::new();
        b.entity("Order").unwrap();
        assert!(matches!(
            b.entity("Order"),
            Err(Error::DuplicateEntityType(name)) if name == "Order"
        ));
    }

    #[test]
    fn test_duplicate_property_in_hierarchy_rejected() {
        let mut b = ModelBuilder::new();
        let base = b.entity("Animal").unwrap();
        b.property(base, "Name").unwrap();
        let cat = b.entity("Cat").unwrap();
        b.base_type(cat, base).unwrap();
        assert!(matches!(
            b.property(cat, "Name"),
            Err(Error::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_unknown_property_in_key() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        let err = b.primary_key(order, &["Id"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown property Order.Id");
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        assert!(matches!(
            b.alternate_key(order, &[]),
            Err(Error::EmptyPropertyList { kind: "key", .. })
        ));
    }

    #[test]
    fn test_primary_key_redefined() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.properties(order, &["Id", "Code"]).unwrap();
        b.primary_key(order, &["Id"]).unwrap();
        assert!(matches!(
            b.primary_key(order, &["Code"]),
            Err(Error::PrimaryKeyRedefined(_))
        ));
    }

    #[test]
    fn test_primary_key_on_derived_rejected() {
        let mut b = ModelBuilder::new();
        let animal = b.entity("Animal").unwrap();
        let cat = b.entity("Cat").unwrap();
        b.base_type(cat, animal).unwrap();
        b.property(cat, "CatId").unwrap();
        assert!(matches!(
            b.primary_key(cat, &["CatId"]),
            Err(Error::PrimaryKeyOnDerivedType(_))
        ));
    }

    #[test]
    fn test_inheritance_cycle_rejected() {
        let mut b = ModelBuilder::new();
        let a = b.entity("A").unwrap();
        let c = b.entity("B").unwrap();
        b.base_type(c, a).unwrap();
        assert!(matches!(b.base_type(a, c), Err(Error::InheritanceCycle(_))));
        assert!(matches!(b.base_type(a, a), Err(Error::InheritanceCycle(_))));
    }

    #[test]
    fn test_foreign_key_requires_principal_key() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        let line = b.entity("OrderLine").unwrap();
        b.property(line, "OrderId").unwrap();
        assert!(matches!(
            b.foreign_key(line, &["OrderId"], order),
            Err(Error::MissingPrincipalKey { .. })
        ));
    }

    #[test]
    fn test_foreign_key_arity_checked() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.properties(order, &["Id", "Region"]).unwrap();
        b.primary_key(order, &["Id", "Region"]).unwrap();
        let line = b.entity("OrderLine").unwrap();
        b.property(line, "OrderId").unwrap();
        assert!(matches!(
            b.foreign_key(line, &["OrderId"], order),
            Err(Error::ForeignKeyArity {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_foreign_key_to_derived_principal_uses_root_key() {
        let mut b = ModelBuilder::new();
        let animal = b.entity("Animal").unwrap();
        b.property(animal, "Id").unwrap();
        let pk = b.primary_key(animal, &["Id"]).unwrap();
        let cat = b.entity("Cat").unwrap();
        b.base_type(cat, animal).unwrap();
        let toy = b.entity("Toy").unwrap();
        b.property(toy, "CatId").unwrap();
        let fk = b.foreign_key(toy, &["CatId"], cat).unwrap();
        let model = b.finalize().unwrap();
        assert_eq!(model.foreign_key(fk).principal_key, pk);
        assert_eq!(model.foreign_key(fk).principal_type, cat);
    }

    #[test]
    fn test_annotations_recorded() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.properties(order, &["Id", "Date"]).unwrap();
        let pk = b.primary_key(order, &["Id"]).unwrap();
        b.key_name(pk, "PK_Custom");
        let ix = b.named_index(order, &["Date"], "ByDate").unwrap();
        b.index_filter(ix, "\"Date\" IS NOT NULL");
        let model = b.finalize().unwrap();

        assert_eq!(model.key(pk).annotations.name(), Some("PK_Custom"));
        assert_eq!(model.index(ix).name.as_deref(), Some("ByDate"));
        assert_eq!(model.index(ix).filter(), Some("\"Date\" IS NOT NULL"));
    }

    #[test]
    fn test_finalize_rejects_invalid_config() {
        let mut b = ModelBuilder::new();
        b.max_identifier_length(0);
        assert!(matches!(b.finalize(), Err(Error::InvalidConfig(_))));
    }
}
