//! Read-only access to a finalized metadata graph.
//!
//! [`RelationalModel`] is the single seam between identifier resolution and
//! whatever owns the model. Implementors supply arena lookups plus three
//! relational questions: which store object an entity type maps to, which
//! column a property maps to there, and which foreign keys link rows of the
//! same table. Everything else is derived by the provided methods.

use crate::config::ModelConfig;
use crate::mapping::MappingStrategy;
use crate::metadata::{
    EntityType, EntityTypeId, ForeignKey, ForeignKeyId, Index, IndexId, Key, KeyId, Property,
    PropertyId,
};
use crate::store_object::{StoreObjectIdentifier, StoreObjectType};

/// Read-only view over a finalized relational model.
pub trait RelationalModel {
    /// Model-wide settings.
    fn config(&self) -> &ModelConfig;

    fn entity_type(&self, id: EntityTypeId) -> &EntityType;
    fn property(&self, id: PropertyId) -> &Property;
    fn key(&self, id: KeyId) -> &Key;
    fn index(&self, id: IndexId) -> &Index;
    fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey;

    /// All entity types in declaration order.
    fn entity_type_ids(&self) -> Vec<EntityTypeId>;

    /// The store object of the given kind an entity type maps to, if any.
    fn store_object(
        &self,
        entity_type: EntityTypeId,
        kind: StoreObjectType,
    ) -> Option<StoreObjectIdentifier>;

    /// Column a property maps to in `store_object`, or `None` if unmapped there.
    fn column_name(
        &self,
        property: PropertyId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String>;

    /// Foreign keys that tie this entity type's rows to another type's rows
    /// in the same `store_object` (one-to-one on the primary key).
    fn row_internal_foreign_keys(
        &self,
        entity_type: EntityTypeId,
        store_object: &StoreObjectIdentifier,
    ) -> Vec<ForeignKeyId>;

    fn max_identifier_length(&self) -> usize {
        self.config().max_identifier_length
    }

    fn max_entity_types_sharing_table(&self) -> usize {
        self.config().max_entity_types_sharing_table
    }

    /// Table the entity type maps to.
    fn table(&self, entity_type: EntityTypeId) -> Option<StoreObjectIdentifier> {
        self.store_object(entity_type, StoreObjectType::Table)
    }

    /// Every distinct table any entity type maps to, in declaration order.
    fn tables(&self) -> Vec<StoreObjectIdentifier> {
        let mut tables: Vec<StoreObjectIdentifier> = Vec::new();
        for entity_type in self.entity_type_ids() {
            if let Some(table) = self.table(entity_type) {
                if !tables.contains(&table) {
                    tables.push(table);
                }
            }
        }
        tables
    }

    /// Table name the entity type maps to.
    fn table_name(&self, entity_type: EntityTypeId) -> Option<String> {
        self.table(entity_type).map(|t| t.name)
    }

    /// Whether the entity type maps to exactly this store object.
    fn maps_to(&self, entity_type: EntityTypeId, store_object: &StoreObjectIdentifier) -> bool {
        self.store_object(entity_type, store_object.kind).as_ref() == Some(store_object)
    }

    /// Whether this entity type, or one of its derived types, maps to `store_object`.
    fn hierarchy_maps_to(
        &self,
        entity_type: EntityTypeId,
        store_object: &StoreObjectIdentifier,
    ) -> bool {
        self.maps_to(entity_type, store_object)
            || self
                .derived_types(entity_type)
                .iter()
                .any(|&d| self.maps_to(d, store_object))
    }

    /// Top of the entity type's inheritance hierarchy.
    fn root_type(&self, entity_type: EntityTypeId) -> EntityTypeId {
        let mut current = entity_type;
        while let Some(base) = self.entity_type(current).base_type {
            current = base;
        }
        current
    }

    /// Base types from the root down to (and including) `entity_type`.
    fn type_chain(&self, entity_type: EntityTypeId) -> Vec<EntityTypeId> {
        let mut chain = vec![entity_type];
        let mut current = entity_type;
        while let Some(base) = self.entity_type(current).base_type {
            chain.push(base);
            current = base;
        }
        chain.reverse();
        chain
    }

    /// All types below `entity_type`, not including itself.
    fn derived_types(&self, entity_type: EntityTypeId) -> &[EntityTypeId] {
        &self.entity_type(entity_type).derived_types
    }

    /// Whether `base` is `derived` or one of its ancestors.
    fn is_assignable_from(&self, base: EntityTypeId, derived: EntityTypeId) -> bool {
        self.type_chain(derived).contains(&base)
    }

    /// Mapping strategy configured on the hierarchy root.
    fn mapping_strategy(&self, entity_type: EntityTypeId) -> MappingStrategy {
        self.entity_type(self.root_type(entity_type))
            .annotations
            .mapping_strategy()
            .unwrap_or_default()
    }

    /// Primary key, which always lives on the hierarchy root.
    fn primary_key(&self, entity_type: EntityTypeId) -> Option<KeyId> {
        self.entity_type(self.root_type(entity_type)).primary_key
    }

    fn is_primary_key(&self, key: KeyId) -> bool {
        self.primary_key(self.key(key).declaring_type) == Some(key)
    }

    /// Declared and inherited keys, base types first.
    fn keys_of(&self, entity_type: EntityTypeId) -> Vec<KeyId> {
        self.type_chain(entity_type)
            .into_iter()
            .flat_map(|t| self.entity_type(t).keys.iter().copied())
            .collect()
    }

    /// Declared and inherited indexes, base types first.
    fn indexes_of(&self, entity_type: EntityTypeId) -> Vec<IndexId> {
        self.type_chain(entity_type)
            .into_iter()
            .flat_map(|t| self.entity_type(t).indexes.iter().copied())
            .collect()
    }

    /// Declared and inherited foreign keys, base types first.
    fn foreign_keys_of(&self, entity_type: EntityTypeId) -> Vec<ForeignKeyId> {
        self.type_chain(entity_type)
            .into_iter()
            .flat_map(|t| self.entity_type(t).foreign_keys.iter().copied())
            .collect()
    }

    /// Column names for `properties` in `store_object`; `None` if any is unmapped.
    fn column_names(
        &self,
        properties: &[PropertyId],
        store_object: &StoreObjectIdentifier,
    ) -> Option<Vec<String>> {
        properties
            .iter()
            .map(|&p| self.column_name(p, store_object))
            .collect()
    }

    /// Column base names for `properties`, independent of any store object.
    fn column_base_names(&self, properties: &[PropertyId]) -> Vec<String> {
        properties
            .iter()
            .map(|&p| self.property(p).column_base_name().to_string())
            .collect()
    }
}
