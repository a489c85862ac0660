use anyhow::{Context, Result};
use log::debug;
use shared::FoodItem;
use std::sync::Arc;

use crate::backend::storage::traits::KeyValueStore;

/// Storage key of the food catalog record
pub const FOODS_KEY: &str = "@que_comemos_hoy/foods";

/// Typed access to the food catalog record (a JSON array of foods)
#[derive(Clone)]
pub struct FoodRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FoodRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the stored catalog. `None` means the app has never saved one.
    pub async fn load(&self) -> Result<Option<Vec<FoodItem>>> {
        let Some(json) = self.store.get(FOODS_KEY).await? else {
            return Ok(None);
        };

        let foods: Vec<FoodItem> =
            serde_json::from_str(&json).context("Stored food catalog is not valid JSON")?;
        debug!("Loaded {} stored foods", foods.len());
        Ok(Some(foods))
    }

    /// Overwrite the stored catalog, preserving list order
    pub async fn save(&self, foods: &[FoodItem]) -> Result<()> {
        let json = serde_json::to_string(foods)?;
        self.store.set(FOODS_KEY, &json).await?;
        debug!("Saved {} foods", foods.len());
        Ok(())
    }
}
