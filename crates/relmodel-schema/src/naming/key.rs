use relmodel_core::{KeyId, RelationalModel, StoreObjectIdentifier};

use super::IdentifierResolver;

impl<M: RelationalModel + ?Sized> IdentifierResolver<'_, M> {
    /// Key constraint name: the explicit name if one is set, otherwise the default.
    pub fn key_name(&self, key: KeyId) -> Option<String> {
        let k = self.model.key(key);
        k.annotations
            .name()
            .map(str::to_string)
            .or_else(|| self.key_default_name(key))
    }

    /// `PK_<table>` for primary keys, `AK_<table>_<columns>` otherwise.
    pub fn key_default_name(&self, key: KeyId) -> Option<String> {
        let k = self.model.key(key);
        let table = self.model.table(k.declaring_type)?;
        let name = if self.model.is_primary_key(key) {
            format!("PK_{}", table.name)
        } else {
            let columns = self
                .model
                .column_names(&k.properties, &table)
                .unwrap_or_else(|| self.model.column_base_names(&k.properties));
            format!("AK_{}_{}", table.name, columns.join("_"))
        };
        Some(self.truncate(&name))
    }

    /// Key constraint name in `store_object`.
    ///
    /// `None` unless the store object is a table that the declaring type or
    /// one of its derived types maps to.
    pub fn key_name_at(&self, key: KeyId, store_object: &StoreObjectIdentifier) -> Option<String> {
        if !store_object.is_table() {
            return None;
        }
        let k = self.model.key(key);
        if !self.model.hierarchy_maps_to(k.declaring_type, store_object) {
            return None;
        }
        k.annotations
            .name()
            .map(str::to_string)
            .or_else(|| self.key_default_name_at(key, store_object))
    }

    /// Default key constraint name in `store_object`.
    ///
    /// A primary key shared through table splitting takes the name of the
    /// principal's primary key at the end of the row-internal chain.
    pub fn key_default_name_at(
        &self,
        key: KeyId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        if !store_object.is_table() {
            return None;
        }
        let k = self.model.key(key);
        let name = if self.model.is_primary_key(key) {
            let root = self.primary_key_root(key, store_object);
            if root != key {
                return self.root_key_name(root, store_object);
            }
            format!("PK_{}", store_object.name)
        } else {
            let columns = self.model.column_names(&k.properties, store_object)?;
            format!("AK_{}_{}", store_object.name, columns.join("_"))
        };
        Some(self.truncate(&name))
    }

    /// The key that owns the physical constraint `key` shares in
    /// `store_object`, or `None` when `key` is its own root.
    pub fn find_shared_root_key(
        &self,
        key: KeyId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<KeyId> {
        let name = self.key_name_at(key, store_object)?;
        let root = self.walk_shared(key, store_object, |other| {
            self.key_name_at(other, store_object).as_deref() == Some(name.as_str())
        });
        (root != key).then_some(root)
    }

    /// Follow the first row-internal foreign key of each hop to the
    /// principal's primary key.
    fn primary_key_root(&self, key: KeyId, store_object: &StoreObjectIdentifier) -> KeyId {
        let bound = self.model.max_entity_types_sharing_table();
        let mut root = key;
        for _ in 0..bound {
            let declaring = self.model.key(root).declaring_type;
            let Some(&link) = self
                .model
                .row_internal_foreign_keys(declaring, store_object)
                .first()
            else {
                return root;
            };
            match self.model.primary_key(self.model.foreign_key(link).principal_type) {
                Some(principal_key) => root = principal_key,
                None => return root,
            }
        }
        tracing::debug!(
            store_object = %store_object,
            bound,
            "Primary key traversal reached its iteration bound"
        );
        root
    }

    // Named directly rather than through `key_name_at`, which would walk again.
    fn root_key_name(&self, root: KeyId, store_object: &StoreObjectIdentifier) -> Option<String> {
        let k = self.model.key(root);
        if !self.model.hierarchy_maps_to(k.declaring_type, store_object) {
            return None;
        }
        Some(k.annotations.name().map_or_else(
            || self.truncate(&format!("PK_{}", store_object.name)),
            str::to_string,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use relmodel_core::{MappingStrategy, ModelBuilder, StoreObjectIdentifier};

    #[test]
    fn test_primary_key_default_name() {
        let f = orders();
        let r = IdentifierResolver::new(&f.model);
        assert_eq!(r.key_default_name(f.order_pk).as_deref(), Some("PK_Orders"));
        assert_eq!(r.key_default_name(f.line_pk).as_deref(), Some("PK_OrderLines"));
    }

    #[test]
    fn test_alternate_key_default_name_joins_columns() {
        let f = orders();
        let r = IdentifierResolver::new(&f.model);
        assert_eq!(
            r.key_default_name(f.line_ak).as_deref(),
            Some("AK_OrderLines_OrderId_LineNo")
        );
        assert_eq!(
            r.key_default_name_at(f.line_ak, &table("OrderLines")).as_deref(),
            Some("AK_OrderLines_OrderId_LineNo")
        );
    }

    #[test]
    fn test_alternate_key_uses_configured_column_names() {
        let mut b = ModelBuilder::new();
        let line = b.entity("OrderLine").unwrap();
        let ids = b.properties(line, &["Id", "OrderId", "LineNo"]).unwrap();
        b.primary_key(line, &["Id"]).unwrap();
        let ak = b.alternate_key(line, &["OrderId", "LineNo"]).unwrap();
        b.column_name(ids[1], "order_id");
        b.to_table(line, "order_lines");
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(
            r.key_default_name(ak).as_deref(),
            Some("AK_order_lines_order_id_LineNo")
        );
    }

    #[test]
    fn test_explicit_key_name_wins() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.property(order, "Id").unwrap();
        let pk = b.primary_key(order, &["Id"]).unwrap();
        b.key_name(pk, "orders_pkey");
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.key_name(pk).as_deref(), Some("orders_pkey"));
        assert_eq!(r.key_default_name(pk).as_deref(), Some("PK_Order"));
        assert_eq!(
            r.key_name_at(pk, &table("Order")).as_deref(),
            Some("orders_pkey")
        );
    }

    #[test]
    fn test_no_table_means_no_key_name() {
        let mut b = ModelBuilder::new();
        let summary = b.entity("OrderSummary").unwrap();
        b.property(summary, "Id").unwrap();
        let pk = b.primary_key(summary, &["Id"]).unwrap();
        b.to_view(summary, "order_summaries", None);
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.key_default_name(pk), None);
        assert_eq!(r.key_name(pk), None);
        let view = StoreObjectIdentifier::view("order_summaries", None);
        assert_eq!(r.key_name_at(pk, &view), None);
        assert_eq!(r.find_shared_root_key(pk, &view), None);
    }

    #[test]
    fn test_key_name_at_unmapped_table_is_none() {
        let f = orders();
        let r = IdentifierResolver::new(&f.model);
        assert_eq!(r.key_name_at(f.order_pk, &table("OrderLines")), None);
        assert_eq!(r.key_default_name_at(f.line_ak, &table("Orders")), None);
    }

    #[test]
    fn test_split_table_primary_key_reuses_principal_name() {
        let f = split_orders();
        let r = IdentifierResolver::new(&f.model);
        let orders = table("Orders");
        assert_eq!(r.key_name_at(f.detail_pk, &orders).as_deref(), Some("PK_Orders"));
        assert_eq!(r.find_shared_root_key(f.detail_pk, &orders), Some(f.order_pk));
        assert_eq!(r.find_shared_root_key(f.order_pk, &orders), None);
    }

    #[test]
    fn test_split_table_primary_key_follows_explicit_root_name() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.property(order, "Id").unwrap();
        let order_pk = b.primary_key(order, &["Id"]).unwrap();
        b.key_name(order_pk, "orders_pkey");
        b.to_table(order, "Orders");
        let detail = b.entity("OrderDetail").unwrap();
        b.property(detail, "Id").unwrap();
        let detail_pk = b.primary_key(detail, &["Id"]).unwrap();
        b.foreign_key(detail, &["Id"], order).unwrap();
        b.to_table(detail, "Orders");
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        let orders = table("Orders");
        assert_eq!(
            r.key_name_at(detail_pk, &orders).as_deref(),
            Some("orders_pkey")
        );
        assert_eq!(r.find_shared_root_key(detail_pk, &orders), Some(order_pk));
    }

    #[test]
    fn test_tph_derived_type_shares_root_primary_key() {
        let mut b = ModelBuilder::new();
        let animal = b.entity("Animal").unwrap();
        b.property(animal, "Id").unwrap();
        let pk = b.primary_key(animal, &["Id"]).unwrap();
        let dog = b.entity("Dog").unwrap();
        b.base_type(dog, animal).unwrap();
        b.property(dog, "Breed").unwrap();
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.key_name_at(pk, &table("Animal")).as_deref(), Some("PK_Animal"));
        assert_eq!(r.find_shared_root_key(pk, &table("Animal")), None);
    }

    #[test]
    fn test_tpt_primary_key_named_per_table() {
        let mut b = ModelBuilder::new();
        let animal = b.entity("Animal").unwrap();
        b.property(animal, "Id").unwrap();
        let pk = b.primary_key(animal, &["Id"]).unwrap();
        b.mapping_strategy(animal, MappingStrategy::Tpt);
        b.to_table(animal, "Animals");
        let dog = b.entity("Dog").unwrap();
        b.base_type(dog, animal).unwrap();
        b.to_table(dog, "Dogs");
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.key_name_at(pk, &table("Animals")).as_deref(), Some("PK_Animals"));
        assert_eq!(r.key_name_at(pk, &table("Dogs")).as_deref(), Some("PK_Dogs"));
    }

    #[test]
    fn test_cyclic_row_internal_keys_terminate() {
        let f = cycle(5);
        let r = IdentifierResolver::new(&f.model);
        let shared = table("Shared");
        assert_eq!(r.key_name_at(f.a_pk, &shared).as_deref(), Some("PK_Shared"));
        // Five hops from the left key end on the right key.
        assert_eq!(r.find_shared_root_key(f.a_pk, &shared), Some(f.b_pk));
        assert_eq!(
            r.find_shared_root_key(f.a_pk, &shared),
            r.find_shared_root_key(f.a_pk, &shared)
        );
    }

    #[test]
    fn test_long_key_name_is_truncated() {
        let long = "T".repeat(40);
        let mut b = ModelBuilder::new();
        b.max_identifier_length(30);
        let e = b.entity("Wide").unwrap();
        b.property(e, "Id").unwrap();
        let pk = b.primary_key(e, &["Id"]).unwrap();
        b.to_table(e, long.clone());
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        let name = r.key_name_at(pk, &table(&long)).unwrap();
        assert_eq!(name.chars().count(), 30);
        assert!(name.starts_with("PK_TTT"));
    }
}
