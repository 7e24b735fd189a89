//! In-memory registry-shaped store.

use async_trait::async_trait;
use buildrig_application::ports::key_value_store::{KeyValueStore, StoreError};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, Clone)]
struct Entry {
    /// Key path as first written
    name: String,
    values: HashMap<String, String>,
}

/// Key-value store held in memory.
///
/// Key paths use `\` separators and, like the registry, compare
/// case-insensitively. Used on hosts without a registry and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    keys: BTreeMap<String, Entry>,
}

fn fold(key: &str) -> String {
    key.trim_matches('\\').to_lowercase()
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `value_name` under `key`, creating the key and its parents.
    pub fn with_value(mut self, key: &str, value_name: &str, data: impl Into<String>) -> Self {
        self.insert(key, value_name, data);
        self
    }

    pub fn insert(&mut self, key: &str, value_name: &str, data: impl Into<String>) {
        let key = key.trim_matches('\\');
        let mut path = String::new();
        for segment in key.split('\\') {
            if !path.is_empty() {
                path.push('\\');
            }
            path.push_str(segment);
            self.keys.entry(fold(&path)).or_insert_with(|| Entry {
                name: path.clone(),
                values: HashMap::new(),
            });
        }
        if let Some(entry) = self.keys.get_mut(&fold(key)) {
            entry
                .values
                .insert(value_name.to_lowercase(), data.into());
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn lookup(&self, key: &str, value_name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .keys
            .get(&fold(key))
            .and_then(|entry| entry.values.get(&value_name.to_lowercase()))
            .cloned())
    }

    async fn list_children(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let prefix = format!("{}\\", fold(key));
        Ok(self
            .keys
            .iter()
            .filter_map(|(folded, entry)| {
                let rest = folded.strip_prefix(&prefix)?;
                (!rest.contains('\\')).then(|| {
                    entry
                        .name
                        .rsplit('\\')
                        .next()
                        .unwrap_or(&entry.name)
                        .to_string()
                })
            })
            .collect())
    }
}
