//! Inheritance-to-table mapping strategies.

use serde::{Deserialize, Serialize};

/// How an entity type hierarchy is mapped to tables.
///
/// The strategy is configured on the hierarchy root and applies to every
/// type below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MappingStrategy {
    /// Table-per-hierarchy: every type in the hierarchy shares the root's
    /// table, rows are told apart by a discriminator column.
    ///
    /// This is the strategy used when none is configured.
    #[default]
    Tph,
    /// Table-per-type: each type has its own table holding the columns it
    /// declares plus the primary key, joined to its parent's table.
    Tpt,
    /// Table-per-concrete-type: each concrete type has an independent table
    /// with every inherited column. Abstract types are not mapped.
    Tpc,
}

impl MappingStrategy {
    /// Whether derived types share the root's table.
    #[must_use]
    pub const fn shares_root_table(&self) -> bool {
        matches!(self, Self::Tph)
    }

    /// Whether a derived type's table only holds the columns it declares.
    #[must_use]
    pub const fn splits_columns(&self) -> bool {
        matches!(self, Self::Tpt)
    }

    /// Whether abstract types are left unmapped.
    #[must_use]
    pub const fn skips_abstract_types(&self) -> bool {
        matches!(self, Self::Tpc)
    }

    /// Short name as used in model annotations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tph => "TPH",
            Self::Tpt => "TPT",
            Self::Tpc => "TPC",
        }
    }

    /// Parse a strategy name (case-insensitive).
    ///
    /// Returns `None` if the string is not a recognized strategy.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TPH" | "TABLE_PER_HIERARCHY" | "SINGLE" => Some(Self::Tph),
            "TPT" | "TABLE_PER_TYPE" | "JOINED" => Some(Self::Tpt),
            "TPC" | "TABLE_PER_CONCRETE_TYPE" | "CONCRETE" => Some(Self::Tpc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_strategy_default() {
        assert_eq!(MappingStrategy::default(), MappingStrategy::Tph);
    }

    #[test]
    fn test_mapping_strategy_predicates() {
        assert!(MappingStrategy::Tph.shares_root_table());
        assert!(!MappingStrategy::Tpt.shares_root_table());
        assert!(MappingStrategy::Tpt.splits_columns());
        assert!(MappingStrategy::Tpc.skips_abstract_types());
        assert!(!MappingStrategy::Tph.skips_abstract_types());
    }

    #[test]
    fn test_mapping_strategy_from_str() {
        assert_eq!(MappingStrategy::from_str("tpc"), Some(MappingStrategy::Tpc));
        assert_eq!(MappingStrategy::from_str("joined"), Some(MappingStrategy::Tpt));
        assert_eq!(MappingStrategy::from_str("Single"), Some(MappingStrategy::Tph));
        assert_eq!(MappingStrategy::from_str("nested"), None);
    }
}
