/// Test utilities for storage-backed tests
///
/// `TestEnvironment` gives each test its own temporary data directory that is
/// removed when the environment is dropped, even if the test panics.
/// `FailingStore` stands in for a broken device store.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use super::json_file::JsonFileStore;
use super::traits::KeyValueStore;

/// Temporary data directory with a JSON file store on top
pub struct TestEnvironment {
    store: JsonFileStore,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = JsonFileStore::new(temp_dir.path())?;
        Ok(Self {
            store,
            _temp_dir: temp_dir,
        })
    }

    /// A handle to the store, shareable with services
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(self.store.clone())
    }

    pub fn base_directory(&self) -> &Path {
        self.store.base_directory()
    }
}

/// Store whose operations fail
#[derive(Debug, Clone, Copy)]
pub struct FailingStore {
    fail_reads: bool,
}

impl FailingStore {
    /// Every read and write fails
    pub fn new() -> Self {
        Self { fail_reads: true }
    }

    /// Reads find nothing, writes fail
    pub fn writes_only() -> Self {
        Self { fail_reads: false }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(anyhow!("simulated read failure for '{}'", key));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("simulated write failure for '{}'", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_is_isolated() -> Result<()> {
        let first = TestEnvironment::new()?;
        let second = TestEnvironment::new()?;
        assert_ne!(first.base_directory(), second.base_directory());

        first.store().set("key", "value").await?;
        assert_eq!(first.store().get("key").await?.as_deref(), Some("value"));
        assert_eq!(second.store().get("key").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_removed_on_drop() -> Result<()> {
        let env = TestEnvironment::new()?;
        let path = env.base_directory().to_path_buf();
        assert!(path.exists());

        drop(env);
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_store_modes() {
        let broken = FailingStore::new();
        assert!(broken.get("k").await.is_err());
        assert!(broken.set("k", "v").await.is_err());

        let read_only = FailingStore::writes_only();
        assert_eq!(read_only.get("k").await.unwrap(), None);
        assert!(read_only.set("k", "v").await.is_err());
    }
}
