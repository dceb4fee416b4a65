//! Model fixtures shared by the naming and DDL tests.

use relmodel_core::{
    EntityTypeId, ForeignKeyId, IndexId, KeyId, Model, ModelBuilder, StoreObjectIdentifier,
};

pub(crate) fn table(name: &str) -> StoreObjectIdentifier {
    StoreObjectIdentifier::table(name, None)
}

/// `Order` -> `Orders`, `OrderLine` -> `OrderLines` with an alternate key,
/// an index and a foreign key back to `Order`.
pub(crate) struct Orders {
    pub model: Model,
    pub order_line: EntityTypeId,
    pub order_pk: KeyId,
    pub line_pk: KeyId,
    pub line_ak: KeyId,
    pub line_order_ix: IndexId,
    pub line_order_fk: ForeignKeyId,
}

pub(crate) fn orders() -> Orders {
    let mut b = ModelBuilder::new();
    let order = b.entity("Order").unwrap();
    b.properties(order, &["Id", "PlacedAt"]).unwrap();
    let order_pk = b.primary_key(order, &["Id"]).unwrap();
    b.to_table(order, "Orders");

    let order_line = b.entity("OrderLine").unwrap();
    b.properties(order_line, &["Id", "OrderId", "LineNo", "Sku"])
        .unwrap();
    let line_pk = b.primary_key(order_line, &["Id"]).unwrap();
    let line_ak = b.alternate_key(order_line, &["OrderId", "LineNo"]).unwrap();
    let line_order_ix = b.index(order_line, &["OrderId"]).unwrap();
    let line_order_fk = b.foreign_key(order_line, &["OrderId"], order).unwrap();
    b.to_table(order_line, "OrderLines");

    Orders {
        model: b.finalize().unwrap(),
        order_line,
        order_pk,
        line_pk,
        line_ak,
        line_order_ix,
        line_order_fk,
    }
}

/// Table splitting: `Order` and `OrderDetail` share the `Orders` row through
/// a one-to-one foreign key on `OrderDetail.Id`. Both declare an index on
/// `ShippingAddress` and a foreign key to `Customer`.
pub(crate) struct SplitOrders {
    pub model: Model,
    pub order_pk: KeyId,
    pub detail_pk: KeyId,
    pub order_ix: IndexId,
    pub detail_ix: IndexId,
    pub order_customer_fk: ForeignKeyId,
    pub detail_customer_fk: ForeignKeyId,
    pub detail_order_fk: ForeignKeyId,
}

pub(crate) fn split_orders() -> SplitOrders {
    let mut b = ModelBuilder::new();
    let customer = b.entity("Customer").unwrap();
    b.property(customer, "Id").unwrap();
    b.primary_key(customer, &["Id"]).unwrap();
    b.to_table(customer, "Customers");

    let order = b.entity("Order").unwrap();
    b.properties(order, &["Id", "CustomerId", "ShippingAddress"])
        .unwrap();
    let order_pk = b.primary_key(order, &["Id"]).unwrap();
    let order_ix = b.index(order, &["ShippingAddress"]).unwrap();
    let order_customer_fk = b.foreign_key(order, &["CustomerId"], customer).unwrap();
    b.to_table(order, "Orders");

    let detail = b.entity("OrderDetail").unwrap();
    b.properties(detail, &["Id", "CustomerId", "ShippingAddress"])
        .unwrap();
    let detail_pk = b.primary_key(detail, &["Id"]).unwrap();
    let detail_ix = b.index(detail, &["ShippingAddress"]).unwrap();
    let detail_customer_fk = b.foreign_key(detail, &["CustomerId"], customer).unwrap();
    let detail_order_fk = b.foreign_key(detail, &["Id"], order).unwrap();
    b.to_table(detail, "Orders");

    SplitOrders {
        model: b.finalize().unwrap(),
        order_pk,
        detail_pk,
        order_ix,
        detail_ix,
        order_customer_fk,
        detail_customer_fk,
        detail_order_fk,
    }
}

/// Two types in `Shared` whose primary keys reference each other, which
/// makes the row-internal graph cyclic.
pub(crate) struct Cycle {
    pub model: Model,
    pub a_pk: KeyId,
    pub b_pk: KeyId,
}

pub(crate) fn cycle(bound: usize) -> Cycle {
    let mut b = ModelBuilder::new();
    b.max_entity_types_sharing_table(bound);
    let left = b.entity("Left").unwrap();
    b.property(left, "Id").unwrap();
    let a_pk = b.primary_key(left, &["Id"]).unwrap();
    b.to_table(left, "Shared");

    let right = b.entity("Right").unwrap();
    b.property(right, "Id").unwrap();
    let b_pk = b.primary_key(right, &["Id"]).unwrap();
    b.to_table(right, "Shared");

    b.foreign_key(left, &["Id"], right).unwrap();
    b.foreign_key(right, &["Id"], left).unwrap();

    Cycle {
        model: b.finalize().unwrap(),
        a_pk,
        b_pk,
    }
}
