use relmodel_core::{
    EntityTypeId, ForeignKeyId, MappingStrategy, RelationalModel, StoreObjectIdentifier,
};

use super::IdentifierResolver;

impl<M: RelationalModel + ?Sized> IdentifierResolver<'_, M> {
    /// Foreign key constraint name: explicit name, otherwise the default.
    pub fn constraint_name(&self, foreign_key: ForeignKeyId) -> Option<String> {
        self.model
            .foreign_key(foreign_key)
            .annotations
            .name()
            .map(str::to_string)
            .or_else(|| self.foreign_key_default_name(foreign_key))
    }

    /// `FK_<table>_<principal table>_<columns>`.
    ///
    /// `None` when either side has no table, or when the principal is a TPC
    /// hierarchy with derived types in tables of their own.
    pub fn foreign_key_default_name(&self, foreign_key: ForeignKeyId) -> Option<String> {
        let fk = self.model.foreign_key(foreign_key);
        let table = self.model.table_name(fk.declaring_type)?;
        let principal_table = self.model.table_name(fk.principal_type)?;
        if self.principal_is_ambiguous(fk.principal_type) {
            return None;
        }
        let columns = self
            .model
            .table(fk.declaring_type)
            .and_then(|t| self.model.column_names(&fk.properties, &t))
            .unwrap_or_else(|| self.model.column_base_names(&fk.properties));
        Some(self.truncate(&format!(
            "FK_{}_{}_{}",
            table,
            principal_table,
            columns.join("_")
        )))
    }

    /// Foreign key constraint name between two tables.
    pub fn constraint_name_at(
        &self,
        foreign_key: ForeignKeyId,
        store_object: &StoreObjectIdentifier,
        principal_store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        if !store_object.is_table() || !principal_store_object.is_table() {
            return None;
        }
        self.model
            .foreign_key(foreign_key)
            .annotations
            .name()
            .map(str::to_string)
            .or_else(|| {
                self.foreign_key_default_name_at(foreign_key, store_object, principal_store_object)
            })
    }

    /// Default foreign key constraint name between two tables.
    ///
    /// A foreign key on a row-internal principal that points at the same
    /// principal table over the same columns is the same constraint, and its
    /// name is reused.
    pub fn foreign_key_default_name_at(
        &self,
        foreign_key: ForeignKeyId,
        store_object: &StoreObjectIdentifier,
        principal_store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        if !store_object.is_table() || !principal_store_object.is_table() {
            return None;
        }
        let fk = self.model.foreign_key(foreign_key);
        let columns = self.model.column_names(&fk.properties, store_object)?;
        let principal_columns = self.model.column_names(
            &self.model.key(fk.principal_key).properties,
            principal_store_object,
        )?;

        let root = self.walk_shared(foreign_key, store_object, |other| {
            let other_fk = self.model.foreign_key(other);
            self.model.table(other_fk.principal_type).as_ref() == Some(principal_store_object)
                && self
                    .model
                    .column_names(&other_fk.properties, store_object)
                    .as_ref()
                    == Some(&columns)
                && self
                    .model
                    .column_names(
                        &self.model.key(other_fk.principal_key).properties,
                        principal_store_object,
                    )
                    .as_ref()
                    == Some(&principal_columns)
        });
        let owner = self.model.foreign_key(root);
        if root != foreign_key {
            if let Some(name) = owner.annotations.name() {
                return Some(name.to_string());
            }
        }
        if self.principal_is_ambiguous(owner.principal_type) {
            return None;
        }
        Some(self.truncate(&format!(
            "FK_{}_{}_{}",
            store_object.name,
            principal_store_object.name,
            columns.join("_")
        )))
    }

    /// The foreign key that owns the constraint `foreign_key` shares in
    /// `store_object`, or `None` when it is its own root or its principal has
    /// no table.
    pub fn find_shared_root_foreign_key(
        &self,
        foreign_key: ForeignKeyId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<ForeignKeyId> {
        if !store_object.is_table() {
            return None;
        }
        let principal = self.model.foreign_key(foreign_key).principal_type;
        let principal_table = self.model.table(principal)?;
        let name = self.constraint_name_at(foreign_key, store_object, &principal_table)?;
        let root = self.walk_shared(foreign_key, store_object, |other| {
            self.constraint_name_at(other, store_object, &principal_table)
                .as_deref()
                == Some(name.as_str())
        });
        (root != foreign_key).then_some(root)
    }

    /// A TPC principal with derived types in their own tables has no single
    /// table to reference.
    fn principal_is_ambiguous(&self, principal: EntityTypeId) -> bool {
        self.model.mapping_strategy(principal) == MappingStrategy::Tpc
            && self
                .model
                .derived_types(principal)
                .iter()
                .any(|&d| self.model.table(d).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use relmodel_core::ModelBuilder;

    #[test]
    fn test_foreign_key_default_name() {
        let f = orders();
        let r = IdentifierResolver::new(&f.model);
        assert_eq!(
            r.foreign_key_default_name(f.line_order_fk).as_deref(),
            Some("FK_OrderLines_Orders_OrderId")
        );
        assert_eq!(
            r.constraint_name(f.line_order_fk).as_deref(),
            Some("FK_OrderLines_Orders_OrderId")
        );
    }

    #[test]
    fn test_foreign_key_name_at_tables() {
        let f = orders();
        let r = IdentifierResolver::new(&f.model);
        assert_eq!(
            r.constraint_name_at(f.line_order_fk, &table("OrderLines"), &table("Orders"))
                .as_deref(),
            Some("FK_OrderLines_Orders_OrderId")
        );
        assert_eq!(
            r.constraint_name_at(f.line_order_fk, &table("Orders"), &table("Orders")),
            None
        );
        let view = StoreObjectIdentifier::view("OrderLines", None);
        assert_eq!(
            r.constraint_name_at(f.line_order_fk, &view, &table("Orders")),
            None
        );
    }

    #[test]
    fn test_explicit_constraint_name() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.property(order, "Id").unwrap();
        b.primary_key(order, &["Id"]).unwrap();
        let line = b.entity("OrderLine").unwrap();
        b.properties(line, &["Id", "OrderId"]).unwrap();
        b.primary_key(line, &["Id"]).unwrap();
        let fk = b.foreign_key(line, &["OrderId"], order).unwrap();
        b.constraint_name(fk, "order_lines_order_fkey");
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.constraint_name(fk).as_deref(), Some("order_lines_order_fkey"));
        assert_eq!(
            r.foreign_key_default_name(fk).as_deref(),
            Some("FK_OrderLine_Order_OrderId")
        );
    }

    #[test]
    fn test_principal_without_table_has_no_name() {
        let mut b = ModelBuilder::new();
        let order = b.entity("Order").unwrap();
        b.property(order, "Id").unwrap();
        b.primary_key(order, &["Id"]).unwrap();
        b.exclude_from_table(order);
        let line = b.entity("OrderLine").unwrap();
        b.properties(line, &["Id", "OrderId"]).unwrap();
        b.primary_key(line, &["Id"]).unwrap();
        let fk = b.foreign_key(line, &["OrderId"], order).unwrap();
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.foreign_key_default_name(fk), None);
        assert_eq!(r.find_shared_root_foreign_key(fk, &table("OrderLine")), None);
    }

    #[test]
    fn test_tpc_principal_with_mapped_derived_type_has_no_name() {
        let mut b = ModelBuilder::new();
        let payment = b.entity("Payment").unwrap();
        b.property(payment, "Id").unwrap();
        b.primary_key(payment, &["Id"]).unwrap();
        b.mapping_strategy(payment, MappingStrategy::Tpc);
        b.to_table(payment, "Payments");
        let card = b.entity("CardPayment").unwrap();
        b.base_type(card, payment).unwrap();
        b.to_table(card, "CardPayments");
        let refund = b.entity("Refund").unwrap();
        b.properties(refund, &["Id", "PaymentId"]).unwrap();
        b.primary_key(refund, &["Id"]).unwrap();
        let fk = b.foreign_key(refund, &["PaymentId"], payment).unwrap();
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(r.foreign_key_default_name(fk), None);
        assert_eq!(
            r.constraint_name_at(fk, &table("Refund"), &table("Payments")),
            None
        );
    }

    #[test]
    fn test_tpc_principal_without_mapped_derived_types_is_named() {
        let mut b = ModelBuilder::new();
        let payment = b.entity("Payment").unwrap();
        b.property(payment, "Id").unwrap();
        b.primary_key(payment, &["Id"]).unwrap();
        b.mapping_strategy(payment, MappingStrategy::Tpc);
        b.to_table(payment, "Payments");
        let refund = b.entity("Refund").unwrap();
        b.properties(refund, &["Id", "PaymentId"]).unwrap();
        b.primary_key(refund, &["Id"]).unwrap();
        let fk = b.foreign_key(refund, &["PaymentId"], payment).unwrap();
        let model = b.finalize().unwrap();

        let r = IdentifierResolver::new(&model);
        assert_eq!(
            r.foreign_key_default_name(fk).as_deref(),
            Some("FK_Refund_Payments_PaymentId")
        );
    }

    #[test]
    fn test_split_table_foreign_key_shares_principal_constraint() {
        let f = split_orders();
        let r = IdentifierResolver::new(&f.model);
        let orders = table("Orders");
        assert_eq!(
            r.constraint_name_at(f.detail_customer_fk, &orders, &table("Customers"))
                .as_deref(),
            Some("FK_Orders_Customers_CustomerId")
        );
        assert_eq!(
            r.find_shared_root_foreign_key(f.detail_customer_fk, &orders),
            Some(f.order_customer_fk)
        );
        assert_eq!(
            r.find_shared_root_foreign_key(f.order_customer_fk, &orders),
            None
        );
    }

    #[test]
    fn test_row_internal_foreign_key_is_its_own_root() {
        let f = split_orders();
        let r = IdentifierResolver::new(&f.model);
        let orders = table("Orders");
        assert_eq!(
            r.constraint_name_at(f.detail_order_fk, &orders, &orders).as_deref(),
            Some("FK_Orders_Orders_Id")
        );
        assert_eq!(r.find_shared_root_foreign_key(f.detail_order_fk, &orders), None);
    }
}
