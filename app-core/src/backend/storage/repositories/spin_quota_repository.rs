use anyhow::{Context, Result};
use shared::SpinQuota;
use std::sync::Arc;

use crate::backend::storage::traits::KeyValueStore;

/// Storage key of the daily spin quota record
pub const SPINS_KEY: &str = "@que_comemos_hoy/spins";

/// Typed access to the `{lastSpinDate, spinsToday}` record
#[derive(Clone)]
pub struct SpinQuotaRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SpinQuotaRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<SpinQuota>> {
        match self.store.get(SPINS_KEY).await? {
            Some(json) => {
                let quota = serde_json::from_str(&json)
                    .context("Stored spin quota is not valid JSON")?;
                Ok(Some(quota))
            }
            None => Ok(None),
        }
    }

    pub async fn save(&self, quota: &SpinQuota) -> Result<()> {
        let json = serde_json::to_string(quota)?;
        self.store.set(SPINS_KEY, &json).await
    }
}
