//! Logical-to-physical column name mapping.

use crate::condition::Condition;
use std::collections::HashMap;

/// Column name table: entity property name → database column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    map: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mapping for `property`.
    pub fn insert(&mut self, property: impl Into<String>, column: impl Into<String>) {
        self.map.insert(property.into(), column.into());
    }

    /// Add a mapping unless `property` is already mapped.
    pub fn insert_default(&mut self, property: &str, column: &str) {
        self.map
            .entry(property.to_string())
            .or_insert_with(|| column.to_string());
    }

    /// Physical name for `property`, or `property` itself when unmapped.
    pub fn resolve<'a>(&'a self, property: &'a str) -> &'a str {
        self.map.get(property).map_or(property, String::as_str)
    }

    /// Take every pair from `other`, replacing existing entries.
    pub fn merge(&mut self, other: ColumnMapping) {
        self.map.extend(other.map);
    }

    /// `(property, column)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Rewrite each condition's column to its physical name.
    ///
    /// Resolution always starts from the condition's logical property, so
    /// applying the same mapping again is a no-op.
    pub fn apply(&self, conditions: &mut [Condition]) {
        for condition in conditions {
            let column = self.resolve(condition.property()).to_string();
            condition.set_column(column);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Joiner, Op};

    fn cond(property: &str, sort: u32) -> Condition {
        Condition::new(property, Op::IsNull, None, Joiner::And, sort).unwrap()
    }

    #[test]
    fn maps_known_and_keeps_unknown() {
        let mapping: ColumnMapping = [("Title", "book_title")].into_iter().collect();
        let mut conds = vec![cond("Title", 0), cond("Price", 1)];
        mapping.apply(&mut conds);
        assert_eq!(conds[0].column(), "book_title");
        assert_eq!(conds[1].column(), "Price");
        assert_eq!(conds[0].property(), "Title");
    }

    #[test]
    fn apply_is_idempotent_even_for_chained_names() {
        let mapping: ColumnMapping = [("a", "b"), ("b", "c")].into_iter().collect();
        let mut once = vec![cond("a", 0), cond("b", 1)];
        mapping.apply(&mut once);
        let mut twice = once.clone();
        mapping.apply(&mut twice);

        let cols = |v: &[Condition]| v.iter().map(|c| c.column().to_string()).collect::<Vec<_>>();
        assert_eq!(cols(&once), ["b", "c"]);
        assert_eq!(cols(&once), cols(&twice));
    }

    #[test]
    fn insert_default_does_not_override() {
        let mut mapping = ColumnMapping::new();
        mapping.insert("Title", "explicit");
        mapping.insert_default("Title", "derived");
        mapping.insert_default("Price", "unit_price");
        assert_eq!(mapping.resolve("Title"), "explicit");
        assert_eq!(mapping.resolve("Price"), "unit_price");
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn merge_overrides() {
        let mut mapping: ColumnMapping = [("Title", "derived"), ("Price", "p")].into_iter().collect();
        mapping.merge([("Title", "explicit")].into_iter().collect());
        assert_eq!(mapping.resolve("Title"), "explicit");
        assert_eq!(mapping.resolve("Price"), "p");
    }
}
