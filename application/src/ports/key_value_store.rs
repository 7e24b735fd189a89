//! Key-value store port
//!
//! A hierarchical store of named values, shaped like the Windows registry:
//! keys contain named string values and child keys.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reading the store. A missing key or value is not an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Access denied to key '{0}'")]
    AccessDenied(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Other(String),
}

/// Read-only access to a registry-like store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read `value_name` under `key`. `Ok(None)` when either is absent.
    async fn lookup(&self, key: &str, value_name: &str) -> Result<Option<String>, StoreError>;

    /// Names of the direct child keys of `key`, empty when `key` is absent.
    async fn list_children(&self, key: &str) -> Result<Vec<String>, StoreError>;
}
