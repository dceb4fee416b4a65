//! Database names for keys, indexes and foreign keys.
//!
//! Every constraint gets a deterministic default name derived from the model
//! shape (`PK_`, `AK_`, `IX_`, `FK_` prefixes), which an explicit `Name`
//! annotation overrides. When several entity types share one table row
//! through row-internal foreign keys, their matching constraints collapse
//! onto one physical object; [`IdentifierResolver::find_shared_root`] returns
//! the canonical one.
//!
//! All operations are pure reads of an immutable model and return `None`
//! when no name can be derived (for example when a type has no table).
//!
//! # Example
//!
//! ```
//! use relmodel_core::ModelBuilder;
//! use relmodel_schema::naming::IdentifierResolver;
//!
//! let mut b = ModelBuilder::new();
//! let order = b.entity("Order")?;
//! b.property(order, "Id")?;
//! let pk = b.primary_key(order, &["Id"])?;
//! b.to_table(order, "Orders");
//! let model = b.finalize()?;
//!
//! let resolver = IdentifierResolver::new(&model);
//! assert_eq!(resolver.key_default_name(pk).as_deref(), Some("PK_Orders"));
//! # Ok::<(), relmodel_core::Error>(())
//! ```

mod foreign_key;
mod index;
mod key;

#[cfg(test)]
pub(crate) mod test_support;

use relmodel_core::identifiers::truncate;
use relmodel_core::{
    EntityTypeId, ForeignKeyId, IndexId, KeyId, RelationalModel, StoreObjectIdentifier,
};
use serde::{Deserialize, Serialize};

/// A key, index or foreign key, for callers that treat them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintRef {
    Key(KeyId),
    Index(IndexId),
    ForeignKey(ForeignKeyId),
}

impl From<KeyId> for ConstraintRef {
    fn from(id: KeyId) -> Self {
        ConstraintRef::Key(id)
    }
}

impl From<IndexId> for ConstraintRef {
    fn from(id: IndexId) -> Self {
        ConstraintRef::Index(id)
    }
}

impl From<ForeignKeyId> for ConstraintRef {
    fn from(id: ForeignKeyId) -> Self {
        ConstraintRef::ForeignKey(id)
    }
}

/// Derives database identifiers from a read-only model.
///
/// Cheap to construct and `Copy`; holds nothing but the model reference, so
/// any number of threads may resolve names against one model at once.
pub struct IdentifierResolver<'m, M: ?Sized> {
    model: &'m M,
}

impl<M: ?Sized> Clone for IdentifierResolver<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for IdentifierResolver<'_, M> {}

impl<M: ?Sized> std::fmt::Debug for IdentifierResolver<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierResolver").finish_non_exhaustive()
    }
}

impl<'m, M: RelationalModel + ?Sized> IdentifierResolver<'m, M> {
    /// Create a resolver over `model`.
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// The model names are resolved against.
    pub fn model(&self) -> &'m M {
        self.model
    }

    /// Shorten a generated name to the model's maximum identifier length.
    pub fn truncate(&self, name: &str) -> String {
        truncate(name, self.model.max_identifier_length())
    }

    /// Entity type that declares the constraint.
    pub fn declaring_type(&self, constraint: ConstraintRef) -> EntityTypeId {
        match constraint {
            ConstraintRef::Key(id) => self.model.key(id).declaring_type,
            ConstraintRef::Index(id) => self.model.index(id).declaring_type,
            ConstraintRef::ForeignKey(id) => self.model.foreign_key(id).declaring_type,
        }
    }

    /// Default name derived from the declaring type's table.
    pub fn default_name(&self, constraint: ConstraintRef) -> Option<String> {
        match constraint {
            ConstraintRef::Key(id) => self.key_default_name(id),
            ConstraintRef::Index(id) => self.index_default_name(id),
            ConstraintRef::ForeignKey(id) => self.foreign_key_default_name(id),
        }
    }

    /// Explicit name if configured, otherwise the default name.
    pub fn name(&self, constraint: ConstraintRef) -> Option<String> {
        match constraint {
            ConstraintRef::Key(id) => self.key_name(id),
            ConstraintRef::Index(id) => self.index_name(id),
            ConstraintRef::ForeignKey(id) => self.constraint_name(id),
        }
    }

    /// Name of the constraint in `store_object`.
    ///
    /// Foreign keys are resolved against their principal type's table.
    pub fn name_at(
        &self,
        constraint: ConstraintRef,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        match constraint {
            ConstraintRef::Key(id) => self.key_name_at(id, store_object),
            ConstraintRef::Index(id) => self.index_name_at(id, store_object),
            ConstraintRef::ForeignKey(id) => {
                let principal = self.model.foreign_key(id).principal_type;
                let principal_table = self.model.table(principal)?;
                self.constraint_name_at(id, store_object, &principal_table)
            }
        }
    }

    /// The constraint this one shares a physical object with in
    /// `store_object`, or `None` when it is its own root.
    pub fn find_shared_root(
        &self,
        constraint: ConstraintRef,
        store_object: &StoreObjectIdentifier,
    ) -> Option<ConstraintRef> {
        match constraint {
            ConstraintRef::Key(id) => self
                .find_shared_root_key(id, store_object)
                .map(ConstraintRef::Key),
            ConstraintRef::Index(id) => self
                .find_shared_root_index(id, store_object)
                .map(ConstraintRef::Index),
            ConstraintRef::ForeignKey(id) => self
                .find_shared_root_foreign_key(id, store_object)
                .map(ConstraintRef::ForeignKey),
        }
    }

    /// Follow row-internal foreign keys from `start`'s declaring type to the
    /// principal types' constraints of the same kind, adopting the first one
    /// `is_linked` accepts, until no link is found.
    ///
    /// The walk is capped at `max_entity_types_sharing_table` hops instead of
    /// tracking visited nodes. A cycle is a model error reported elsewhere;
    /// here it only ends the walk at whatever constraint was reached.
    fn walk_shared<T, F>(&self, start: T, store_object: &StoreObjectIdentifier, mut is_linked: F) -> T
    where
        T: SharedObject,
        F: FnMut(T) -> bool,
    {
        let bound = self.model.max_entity_types_sharing_table();
        let mut root = start;
        for _ in 0..bound {
            let declaring = root.declaring_type(self.model);
            let linked = self
                .model
                .row_internal_foreign_keys(declaring, store_object)
                .into_iter()
                .flat_map(|fk| T::candidates(self.model, self.model.foreign_key(fk).principal_type))
                .find(|&other| is_linked(other));
            match linked {
                Some(other) => root = other,
                None => return root,
            }
        }
        tracing::debug!(
            store_object = %store_object,
            bound,
            "Shared-object traversal reached its iteration bound"
        );
        root
    }
}

/// Constraint kinds that can be shared between entity types in one table.
trait SharedObject: Copy + PartialEq {
    fn declaring_type<M: RelationalModel + ?Sized>(self, model: &M) -> EntityTypeId;

    /// Same-kind constraints of `entity_type` in declaration order.
    fn candidates<M: RelationalModel + ?Sized>(model: &M, entity_type: EntityTypeId) -> Vec<Self>;
}

impl SharedObject for KeyId {
    fn declaring_type<M: RelationalModel + ?Sized>(self, model: &M) -> EntityTypeId {
        model.key(self).declaring_type
    }

    fn candidates<M: RelationalModel + ?Sized>(model: &M, entity_type: EntityTypeId) -> Vec<Self> {
        model.keys_of(entity_type)
    }
}

impl SharedObject for IndexId {
    fn declaring_type<M: RelationalModel + ?Sized>(self, model: &M) -> EntityTypeId {
        model.index(self).declaring_type
    }

    fn candidates<M: RelationalModel + ?Sized>(model: &M, entity_type: EntityTypeId) -> Vec<Self> {
        model.indexes_of(entity_type)
    }
}

impl SharedObject for ForeignKeyId {
    fn declaring_type<M: RelationalModel + ?Sized>(self, model: &M) -> EntityTypeId {
        model.foreign_key(self).declaring_type
    }

    fn candidates<M: RelationalModel + ?Sized>(model: &M, entity_type: EntityTypeId) -> Vec<Self> {
        model.foreign_keys_of(entity_type)
    }
}
