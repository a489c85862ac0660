//! # Storage Traits
//!
//! The domain layer persists everything through a plain string key-value
//! port. Each record is a JSON document stored under a fixed key, so any
//! backend that can get and set strings (a directory of files, an in-memory
//! map, a mobile platform's async storage) can be plugged in.

use anyhow::Result;
use async_trait::async_trait;

/// Trait defining the interface for key-value storage operations
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
