//! The finalized metadata graph.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::access::RelationalModel;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::identifiers::truncate;
use crate::metadata::{
    EntityType, EntityTypeId, ForeignKey, ForeignKeyId, Index, IndexId, Key, KeyId, Property,
    PropertyId,
};
use crate::store_object::{StoreObjectIdentifier, StoreObjectType};

/// Suffix of the store object name used for entity types mapped to SQL queries.
pub const SQL_QUERY_NAME_SUFFIX: &str = "MappingSqlQuery";

/// An immutable relational metadata graph.
///
/// Built with [`ModelBuilder`](crate::ModelBuilder) or restored from a JSON
/// snapshot with [`Model::from_json`]. Safe to share across threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub(crate) config: ModelConfig,
    pub(crate) entity_types: Vec<EntityType>,
    pub(crate) properties: Vec<Property>,
    pub(crate) keys: Vec<Key>,
    pub(crate) indexes: Vec<Index>,
    pub(crate) foreign_keys: Vec<ForeignKey>,
}

impl Model {
    /// Restore a model from a JSON snapshot, re-running finalization.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.finalize()
    }

    /// Serialize the model as a JSON snapshot.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find an entity type by name.
    #[must_use]
    pub fn find_entity_type(&self, name: &str) -> Option<EntityTypeId> {
        self.entity_types
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
    }

    /// Find a property by name on an entity type or its base types.
    #[must_use]
    pub fn find_property(&self, entity_type: EntityTypeId, name: &str) -> Option<PropertyId> {
        self.type_chain(entity_type).into_iter().rev().find_map(|t| {
            self.entity_types[t.index()]
                .properties
                .iter()
                .copied()
                .find(|&p| self.properties[p.index()].name == name)
        })
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entity_types
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Validate references and rebuild derived data.
    pub(crate) fn finalize(mut self) -> Result<Self> {
        self.config.validate()?;
        self.check_references()?;
        self.check_inheritance()?;
        self.rebuild_derived_types();

        tracing::debug!(
            entity_types = self.entity_types.len(),
            keys = self.keys.len(),
            indexes = self.indexes.len(),
            foreign_keys = self.foreign_keys.len(),
            "Finalized relational model"
        );

        Ok(self)
    }

    fn check_references(&self) -> Result<()> {
        let entity_count = self.entity_types.len();
        let check_entity = |id: EntityTypeId| check(id.index(), entity_count, EntityTypeId::LABEL);
        let check_property =
            |id: PropertyId| check(id.index(), self.properties.len(), PropertyId::LABEL);
        let check_key = |id: KeyId| check(id.index(), self.keys.len(), KeyId::LABEL);

        for (position, e) in self.entity_types.iter().enumerate() {
            check_position(e.id.index(), position, EntityTypeId::LABEL)?;
            if let Some(base) = e.base_type {
                check_entity(base)?;
            }
            if let Some(pk) = e.primary_key {
                check_key(pk)?;
            }
            e.properties.iter().try_for_each(|&p| check_property(p))?;
            e.keys.iter().try_for_each(|&k| check_key(k))?;
            e.indexes
                .iter()
                .try_for_each(|&i| check(i.index(), self.indexes.len(), IndexId::LABEL))?;
            e.foreign_keys.iter().try_for_each(|&f| {
                check(f.index(), self.foreign_keys.len(), ForeignKeyId::LABEL)
            })?;
        }
        for (position, p) in self.properties.iter().enumerate() {
            check_position(p.id.index(), position, PropertyId::LABEL)?;
            check_entity(p.declaring_type)?;
        }
        for (position, k) in self.keys.iter().enumerate() {
            check_position(k.id.index(), position, KeyId::LABEL)?;
            check_entity(k.declaring_type)?;
            k.properties.iter().try_for_each(|&p| check_property(p))?;
        }
        for (position, i) in self.indexes.iter().enumerate() {
            check_position(i.id.index(), position, IndexId::LABEL)?;
            check_entity(i.declaring_type)?;
            i.properties.iter().try_for_each(|&p| check_property(p))?;
        }
        for (position, f) in self.foreign_keys.iter().enumerate() {
            check_position(f.id.index(), position, ForeignKeyId::LABEL)?;
            check_entity(f.declaring_type)?;
            check_entity(f.principal_type)?;
            check_key(f.principal_key)?;
            f.properties.iter().try_for_each(|&p| check_property(p))?;
        }
        Ok(())
    }

    fn check_inheritance(&self) -> Result<()> {
        for e in &self.entity_types {
            let mut current = e.base_type;
            let mut hops = 0;
            while let Some(base) = current {
                hops += 1;
                if base == e.id || hops > self.entity_types.len() {
                    return Err(Error::InheritanceCycle(e.name.clone()));
                }
                current = self.entity_types[base.index()].base_type;
            }
        }
        Ok(())
    }

    fn rebuild_derived_types(&mut self) {
        let mut children: Vec<Vec<EntityTypeId>> = vec![Vec::new(); self.entity_types.len()];
        for e in &self.entity_types {
            if let Some(base) = e.base_type {
                children[base.index()].push(e.id);
            }
        }
        for position in 0..self.entity_types.len() {
            let mut derived = Vec::new();
            let mut queue: VecDeque<EntityTypeId> =
                children[position].iter().copied().collect();
            while let Some(next) = queue.pop_front() {
                derived.push(next);
                queue.extend(children[next.index()].iter().copied());
            }
            self.entity_types[position].derived_types = derived;
        }
    }

    fn resolve_table_name(&self, entity_type: EntityTypeId) -> Option<String> {
        let e = self.entity_type(entity_type);
        if let Some(explicit) = e.annotations.table_name() {
            return explicit.map(str::to_string);
        }
        let strategy = self.mapping_strategy(entity_type);
        if e.base_type.is_some() && strategy.shares_root_table() {
            return self.resolve_table_name(self.root_type(entity_type));
        }
        if e.is_abstract && strategy.skips_abstract_types() {
            return None;
        }
        // A type mapped elsewhere only gets a table when one is configured.
        if e.annotations.view_name().is_some()
            || e.annotations.function_name().is_some()
            || e.annotations.sql_query().is_some()
        {
            return None;
        }
        Some(truncate(&e.name, self.config.max_identifier_length))
    }

    fn resolve_schema(&self, entity_type: EntityTypeId) -> Option<String> {
        let e = self.entity_type(entity_type);
        if let Some(explicit) = e.annotations.schema() {
            return explicit.map(str::to_string);
        }
        if e.base_type.is_some() && self.mapping_strategy(entity_type).shares_root_table() {
            return self.resolve_schema(self.root_type(entity_type));
        }
        self.config.default_schema.clone()
    }

    fn resolve_view(&self, entity_type: EntityTypeId) -> Option<StoreObjectIdentifier> {
        let e = self.entity_type(entity_type);
        match e.annotations.view_name() {
            Some(Some(name)) => {
                let schema = match e.annotations.view_schema() {
                    Some(explicit) => explicit.map(str::to_string),
                    None => self.config.default_schema.clone(),
                };
                Some(StoreObjectIdentifier::view(name, schema))
            }
            Some(None) => None,
            None if e.base_type.is_some()
                && self.mapping_strategy(entity_type).shares_root_table() =>
            {
                self.resolve_view(self.root_type(entity_type))
            }
            None => None,
        }
    }

    fn hierarchy_annotation<'a, F>(&'a self, entity_type: EntityTypeId, read: F) -> Option<&'a str>
    where
        F: Fn(&'a EntityType) -> Option<&'a str>,
    {
        let e = self.entity_type(entity_type);
        read(e).or_else(|| {
            if e.base_type.is_some() && self.mapping_strategy(entity_type).shares_root_table() {
                read(self.entity_type(self.root_type(entity_type)))
            } else {
                None
            }
        })
    }
}

fn check(index: usize, len: usize, kind: &'static str) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::DanglingReference { kind, index })
    }
}

fn check_position(id: usize, position: usize, kind: &'static str) -> Result<()> {
    if id == position {
        Ok(())
    } else {
        Err(Error::DanglingReference { kind, index: id })
    }
}

impl RelationalModel for Model {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn entity_type(&self, id: EntityTypeId) -> &EntityType {
        &self.entity_types[id.index()]
    }

    fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.index()]
    }

    fn key(&self, id: KeyId) -> &Key {
        &self.keys[id.index()]
    }

    fn index(&self, id: IndexId) -> &Index {
        &self.indexes[id.index()]
    }

    fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[id.index()]
    }

    fn entity_type_ids(&self) -> Vec<EntityTypeId> {
        self.entity_types.iter().map(|e| e.id).collect()
    }

    fn store_object(
        &self,
        entity_type: EntityTypeId,
        kind: StoreObjectType,
    ) -> Option<StoreObjectIdentifier> {
        match kind {
            StoreObjectType::Table => self
                .resolve_table_name(entity_type)
                .map(|name| StoreObjectIdentifier::table(name, self.resolve_schema(entity_type))),
            StoreObjectType::View => self.resolve_view(entity_type),
            StoreObjectType::Function => self
                .hierarchy_annotation(entity_type, |e| e.annotations.function_name())
                .map(StoreObjectIdentifier::function),
            StoreObjectType::SqlQuery => self
                .hierarchy_annotation(entity_type, |e| e.annotations.sql_query())
                .map(|_| {
                    let root = self.entity_type(self.root_type(entity_type));
                    StoreObjectIdentifier::sql_query(format!(
                        "{}.{}",
                        root.name, SQL_QUERY_NAME_SUFFIX
                    ))
                }),
        }
    }

    fn column_name(
        &self,
        property: PropertyId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        let p = self.property(property);
        if let Some(name) = p.column_override(store_object) {
            return Some(name.to_string());
        }

        let declaring = p.declaring_type;
        let splits_columns = self.mapping_strategy(declaring).splits_columns();
        let in_primary_key = self
            .primary_key(declaring)
            .is_some_and(|k| self.key(k).properties.contains(&property));

        // Under TPT a derived table only repeats the primary key columns.
        let mapped = std::iter::once(declaring)
            .chain(self.derived_types(declaring).iter().copied())
            .any(|candidate| {
                (candidate == declaring || !splits_columns || in_primary_key)
                    && self.maps_to(candidate, store_object)
            });

        mapped.then(|| p.column_base_name().to_string())
    }

    fn row_internal_foreign_keys(
        &self,
        entity_type: EntityTypeId,
        store_object: &StoreObjectIdentifier,
    ) -> Vec<ForeignKeyId> {
        let Some(primary_key) = self.primary_key(entity_type) else {
            return Vec::new();
        };
        let pk_properties = &self.key(primary_key).properties;

        self.foreign_keys_of(entity_type)
            .into_iter()
            .filter(|&id| {
                let fk = self.foreign_key(id);
                self.is_primary_key(fk.principal_key)
                    && !self.is_assignable_from(fk.principal_type, fk.declaring_type)
                    && &fk.properties == pk_properties
                    && self.maps_to(fk.declaring_type, store_object)
                    && self.maps_to(fk.principal_type, store_object)
            })
            .collect()
    }
}
