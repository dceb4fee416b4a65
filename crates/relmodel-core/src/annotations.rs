//! Typed relational annotations.
//!
//! Every metadata object carries an [`Annotations`] map. Keys are the closed
//! [`AnnotationName`] set and values are [`Annotation`] variants, so a table
//! name can never be confused with a filter predicate at runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mapping::MappingStrategy;

/// The relational annotation key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationName {
    TableName,
    Schema,
    ViewName,
    ViewSchema,
    FunctionName,
    SqlQuery,
    MappingStrategy,
    ColumnName,
    Name,
    Filter,
    Comment,
}

/// A relational annotation value.
///
/// `TableName(None)` and friends record an explicit "not mapped" choice,
/// which differs from the annotation being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    TableName(Option<String>),
    Schema(Option<String>),
    ViewName(Option<String>),
    ViewSchema(Option<String>),
    FunctionName(String),
    SqlQuery(String),
    MappingStrategy(MappingStrategy),
    ColumnName(String),
    /// Explicit constraint or index name.
    Name(String),
    /// Index filter predicate.
    Filter(String),
    Comment(String),
}

impl Annotation {
    /// The key this value is stored under.
    #[must_use]
    pub const fn name(&self) -> AnnotationName {
        match self {
            Annotation::TableName(_) => AnnotationName::TableName,
            Annotation::Schema(_) => AnnotationName::Schema,
            Annotation::ViewName(_) => AnnotationName::ViewName,
            Annotation::ViewSchema(_) => AnnotationName::ViewSchema,
            Annotation::FunctionName(_) => AnnotationName::FunctionName,
            Annotation::SqlQuery(_) => AnnotationName::SqlQuery,
            Annotation::MappingStrategy(_) => AnnotationName::MappingStrategy,
            Annotation::ColumnName(_) => AnnotationName::ColumnName,
            Annotation::Name(_) => AnnotationName::Name,
            Annotation::Filter(_) => AnnotationName::Filter,
            Annotation::Comment(_) => AnnotationName::Comment,
        }
    }
}

/// Annotation map attached to a metadata object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Annotation>", into = "Vec<Annotation>")]
pub struct Annotations {
    values: BTreeMap<AnnotationName, Annotation>,
}

impl From<Vec<Annotation>> for Annotations {
    fn from(list: Vec<Annotation>) -> Self {
        let mut annotations = Self::new();
        for annotation in list {
            annotations.set(annotation);
        }
        annotations
    }
}

impl From<Annotations> for Vec<Annotation> {
    fn from(annotations: Annotations) -> Self {
        annotations.values.into_values().collect()
    }
}

impl Annotations {
    /// Create an empty annotation map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an annotation, replacing any previous value under the same key.
    pub fn set(&mut self, annotation: Annotation) -> Option<Annotation> {
        self.values.insert(annotation.name(), annotation)
    }

    /// Remove an annotation.
    pub fn remove(&mut self, name: AnnotationName) -> Option<Annotation> {
        self.values.remove(&name)
    }

    /// Look up an annotation.
    #[must_use]
    pub fn get(&self, name: AnnotationName) -> Option<&Annotation> {
        self.values.get(&name)
    }

    /// Whether an annotation is present.
    #[must_use]
    pub fn contains(&self, name: AnnotationName) -> bool {
        self.values.contains_key(&name)
    }

    /// Number of stored annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no annotation is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate annotations in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.values.values()
    }

    /// Explicit table name: `None` when unset, `Some(None)` when explicitly unmapped.
    #[must_use]
    pub fn table_name(&self) -> Option<Option<&str>> {
        match self.get(AnnotationName::TableName) {
            Some(Annotation::TableName(name)) => Some(name.as_deref()),
            _ => None,
        }
    }

    /// Explicit schema: `None` when unset.
    #[must_use]
    pub fn schema(&self) -> Option<Option<&str>> {
        match self.get(AnnotationName::Schema) {
            Some(Annotation::Schema(schema)) => Some(schema.as_deref()),
            _ => None,
        }
    }

    /// Explicit view name: `None` when unset.
    #[must_use]
    pub fn view_name(&self) -> Option<Option<&str>> {
        match self.get(AnnotationName::ViewName) {
            Some(Annotation::ViewName(name)) => Some(name.as_deref()),
            _ => None,
        }
    }

    /// Explicit view schema: `None` when unset.
    #[must_use]
    pub fn view_schema(&self) -> Option<Option<&str>> {
        match self.get(AnnotationName::ViewSchema) {
            Some(Annotation::ViewSchema(schema)) => Some(schema.as_deref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match self.get(AnnotationName::FunctionName) {
            Some(Annotation::FunctionName(name)) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn sql_query(&self) -> Option<&str> {
        match self.get(AnnotationName::SqlQuery) {
            Some(Annotation::SqlQuery(sql)) => Some(sql),
            _ => None,
        }
    }

    #[must_use]
    pub fn mapping_strategy(&self) -> Option<MappingStrategy> {
        match self.get(AnnotationName::MappingStrategy) {
            Some(Annotation::MappingStrategy(strategy)) => Some(*strategy),
            _ => None,
        }
    }

    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        match self.get(AnnotationName::ColumnName) {
            Some(Annotation::ColumnName(name)) => Some(name),
            _ => None,
        }
    }

    /// Explicit constraint/index name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.get(AnnotationName::Name) {
            Some(Annotation::Name(name)) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        match self.get(AnnotationName::Filter) {
            Some(Annotation::Filter(filter)) => Some(filter),
            _ => None,
        }
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self.get(AnnotationName::Comment) {
            Some(Annotation::Comment(comment)) => Some(comment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_same_key() {
        let mut a = Annotations::new();
        assert!(a.set(Annotation::Name("PK_A".to_string())).is_none());
        let old = a.set(Annotation::Name("PK_B".to_string()));
        assert_eq!(old, Some(Annotation::Name("PK_A".to_string())));
        assert_eq!(a.name(), Some("PK_B"));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_explicit_unmapped_table() {
        let mut a = Annotations::new();
        assert_eq!(a.table_name(), None);
        a.set(Annotation::TableName(None));
        assert_eq!(a.table_name(), Some(None));
        a.set(Annotation::TableName(Some("Orders".to_string())));
        assert_eq!(a.table_name(), Some(Some("Orders")));
    }

    #[test]
    fn test_typed_accessors_ignore_other_keys() {
        let mut a = Annotations::new();
        a.set(Annotation::Filter("[Deleted] = 0".to_string()));
        a.set(Annotation::MappingStrategy(MappingStrategy::Tpc));
        assert_eq!(a.filter(), Some("[Deleted] = 0"));
        assert_eq!(a.mapping_strategy(), Some(MappingStrategy::Tpc));
        assert_eq!(a.name(), None);
        assert_eq!(a.column_name(), None);
    }

    #[test]
    fn test_remove() {
        let mut a = Annotations::new();
        a.set(Annotation::Comment("orders".to_string()));
        assert!(a.contains(AnnotationName::Comment));
        a.remove(AnnotationName::Comment);
        assert!(a.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_keeps_explicit_none() {
        let mut a = Annotations::new();
        a.set(Annotation::TableName(None));
        a.set(Annotation::ColumnName("order_id".to_string()));
        let json = serde_json::to_string(&a).unwrap();
        let back: Annotations = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert_eq!(back.table_name(), Some(None));
    }
}
