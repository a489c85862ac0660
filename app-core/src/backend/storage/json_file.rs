//! # JSON File Store
//!
//! File-based key-value storage: every key maps to one JSON file at the root
//! of the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── que_comemos_hoy_foods.json    ← food catalog record
//! └── que_comemos_hoy_spins.json    ← daily spin quota record
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write never leaves a truncated record behind.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;

/// Directory-backed key-value store
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    base_directory: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File path for a key. Characters that are not safe in file names
    /// (`@`, `/`, spaces, ...) collapse to underscores.
    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        let stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = stem.trim_matches('_');

        if stem.is_empty() {
            return Err(anyhow!("Storage key '{}' has no usable characters", key));
        }

        Ok(self.base_directory.join(format!("{}.json", stem)))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Read {} bytes from {:?}", content.len(), path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key)?;

        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
            info!("Created data directory: {:?}", self.base_directory);
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_key_to_file_name() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = JsonFileStore::new(temp_dir.path())?;

        let path = store.path_for_key("@que_comemos_hoy/foods")?;
        assert_eq!(path, temp_dir.path().join("que_comemos_hoy_foods.json"));

        assert!(store.path_for_key("@@//").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_none() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = JsonFileStore::new(temp_dir.path())?;

        assert_eq!(store.get("@que_comemos_hoy/spins").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_round_trip_and_overwrite() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = JsonFileStore::new(temp_dir.path())?;

        store.set("@app/value", r#"{"a":1}"#).await?;
        store.set("@app/value", r#"{"a":2}"#).await?;

        assert_eq!(store.get("@app/value").await?, Some(r#"{"a":2}"#.to_string()));
        // No temp file is left behind after the rename
        assert!(!temp_dir.path().join("app_value.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_creates_nested_data_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("Documents").join("Food Roulette");
        let store = JsonFileStore::new(&nested)?;

        assert!(nested.exists());
        store.set("k", "v").await?;
        assert!(nested.join("k.json").exists());
        Ok(())
    }
}
