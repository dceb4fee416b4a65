use relmodel_core::{IndexId, RelationalModel, StoreObjectIdentifier};

use super::IdentifierResolver;

impl<M: RelationalModel + ?Sized> IdentifierResolver<'_, M> {
    /// Index name: database name annotation, then model-level name, then default.
    pub fn index_name(&self, index: IndexId) -> Option<String> {
        let ix = self.model.index(index);
        ix.annotations
            .name()
            .or(ix.name.as_deref())
            .map(str::to_string)
            .or_else(|| self.index_default_name(index))
    }

    /// `IX_<table>_<column base names>`.
    pub fn index_default_name(&self, index: IndexId) -> Option<String> {
        let ix = self.model.index(index);
        let table = self.model.table_name(ix.declaring_type)?;
        let columns = self.model.column_base_names(&ix.properties);
        Some(self.truncate(&format!("IX_{}_{}", table, columns.join("_"))))
    }

    /// Index name in `store_object`.
    ///
    /// Explicit names only apply where a default exists, so an index whose
    /// columns are not all mapped to `store_object` has no name there.
    pub fn index_name_at(
        &self,
        index: IndexId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        let default = self.index_default_name_at(index, store_object)?;
        let ix = self.model.index(index);
        Some(
            ix.annotations
                .name()
                .or(ix.name.as_deref())
                .map_or(default, str::to_string),
        )
    }

    /// Default index name in `store_object`.
    ///
    /// An index on a row-internal principal over the same columns is the
    /// same physical index, and its name is reused.
    pub fn index_default_name_at(
        &self,
        index: IndexId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<String> {
        if !store_object.is_table() {
            return None;
        }
        let ix = self.model.index(index);
        let columns = self.model.column_names(&ix.properties, store_object)?;
        let root = self.walk_shared(index, store_object, |other| {
            self.model
                .column_names(&self.model.index(other).properties, store_object)
                .as_ref()
                == Some(&columns)
        });
        if root != index {
            return Some(self.root_index_name(root, store_object, &columns));
        }
        Some(self.truncate(&format!("IX_{}_{}", store_object.name, columns.join("_"))))
    }

    /// The index that owns the physical index `index` shares in
    /// `store_object`, or `None` when `index` is its own root.
    pub fn find_shared_root_index(
        &self,
        index: IndexId,
        store_object: &StoreObjectIdentifier,
    ) -> Option<IndexId> {
        let name = self.index_name_at(index, store_object)?;
        let root = self.walk_shared(index, store_object, |other| {
            self.index_name_at(other, store_object).as_deref() == Some(name.as_str())
        });
        (root != index).then_some(root)
    }

    fn root_index_name(
        &self,
        root: IndexId,
        store_object: &StoreObjectIdentifier,
        columns: &[String],
    ) -> String {
        let ix = self.model.index(root);
        ix.annotations.name().or(ix.name.as_deref()).map_or_else(
            || self.truncate(&format!("IX_{}_{}", store_object.name, columns.join("_"))),
            str::to_string,
        )
    }
}
