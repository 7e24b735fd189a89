//! Package dependency maps collected from NuGet manifests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Package id → version, with case-insensitive ids.
///
/// Inserting an id that is already present (in any casing) replaces both the
/// version and the stored casing: the last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct DependencyMap {
    entries: BTreeMap<String, (String, String)>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a package version, returning the previous version.
    pub fn insert(&mut self, id: impl Into<String>, version: impl Into<String>) -> Option<String> {
        let id = id.into();
        self.entries
            .insert(id.to_lowercase(), (id, version.into()))
            .map(|(_, previous)| previous)
    }

    /// Merge `other` into `self`; entries of `other` win on conflict.
    pub fn merge(&mut self, other: DependencyMap) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .get(&id.to_lowercase())
            .map(|(_, version)| version.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(&id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(id, version)` pairs ordered by case-folded id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(id, version)| (id.as_str(), version.as_str()))
    }
}

impl From<BTreeMap<String, String>> for DependencyMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<DependencyMap> for BTreeMap<String, String> {
    fn from(map: DependencyMap) -> Self {
        map.entries.into_values().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DependencyMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = DependencyMap::new();
        for (id, version) in iter {
            map.insert(id, version);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_manifest_overwrites_earlier() {
        let mut merged: DependencyMap = [("A", "1.0")].into_iter().collect();
        merged.merge([("A", "2.0"), ("B", "1.0")].into_iter().collect());

        let pairs: Vec<_> = merged.iter().collect();
        assert_eq!(pairs, vec![("A", "2.0"), ("B", "1.0")]);
    }

    #[test]
    fn ids_are_case_insensitive() {
        let mut map = DependencyMap::new();
        assert_eq!(map.insert("Newtonsoft.Json", "12.0.1"), None);
        assert_eq!(
            map.insert("newtonsoft.json", "12.0.3"),
            Some("12.0.1".to_string())
        );

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("NEWTONSOFT.JSON"), Some("12.0.3"));
        assert_eq!(map.iter().next(), Some(("newtonsoft.json", "12.0.3")));
    }

    #[test]
    fn serializes_as_plain_object() {
        let map: DependencyMap = [("Moq", "4.16.0")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Moq":"4.16.0"}"#);

        let back: DependencyMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
