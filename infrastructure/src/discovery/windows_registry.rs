//! `HKEY_LOCAL_MACHINE` access through `winreg`.

use async_trait::async_trait;
use buildrig_application::ports::key_value_store::{KeyValueStore, StoreError};
use std::io;
use winreg::RegKey;
use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ};

/// Reads the local machine hive. Missing keys and values are `Ok(None)`.
#[derive(Debug, Default, Clone)]
pub struct WindowsRegistryStore;

impl WindowsRegistryStore {
    pub fn new() -> Self {
        Self
    }

    fn open(key: &str) -> Result<Option<RegKey>, StoreError> {
        match RegKey::predef(HKEY_LOCAL_MACHINE).open_subkey_with_flags(key, KEY_READ) {
            Ok(k) => Ok(Some(k)),
            Err(e) => absent(e, key).map(|()| None),
        }
    }
}

fn absent(error: io::Error, key: &str) -> Result<(), StoreError> {
    match error.kind() {
        io::ErrorKind::NotFound => Ok(()),
        io::ErrorKind::PermissionDenied => Err(StoreError::AccessDenied(key.to_string())),
        _ => Err(StoreError::Io(error)),
    }
}

#[async_trait]
impl KeyValueStore for WindowsRegistryStore {
    async fn lookup(&self, key: &str, value_name: &str) -> Result<Option<String>, StoreError> {
        let Some(reg) = Self::open(key)? else {
            return Ok(None);
        };
        match reg.get_value::<String, _>(value_name) {
            Ok(v) => Ok(Some(v)),
            Err(e) => absent(e, key).map(|()| None),
        }
    }

    async fn list_children(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let Some(reg) = Self::open(key)? else {
            return Ok(Vec::new());
        };
        Ok(reg.enum_keys().filter_map(Result::ok).collect())
    }
}
