use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::KeyValueStore;

/// In-process key-value store
///
/// Nothing survives the process. Used by tests and as a scratch store when
/// no data directory is available.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("a").await?, None);

        store.set("a", "1").await?;
        store.set("a", "2").await?;
        assert_eq!(store.get("a").await?, Some("2".to_string()));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_clones_share_state() -> Result<()> {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("shared", "yes").await?;
        assert_eq!(other.get("shared").await?, Some("yes".to_string()));
        Ok(())
    }
}
