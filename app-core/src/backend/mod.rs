//! # Backend Module
//!
//! All non-UI logic for the food roulette.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (screens, wheel rendering, ad gate)
//!     ↓
//! Domain Layer (catalog, quota, spin coordination)
//!     ↓
//! Storage Layer (key-value store, JSON records)
//! ```
//!
//! The UI owns the frame clock and calls into [`AppState`]; nothing in here
//! draws or schedules anything.

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::backend::domain::{FoodService, LocalDateProvider, QuotaService, RouletteService};
use crate::backend::storage::{JsonFileStore, KeyValueStore};
use crate::config::AppConfig;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub food_service: FoodService,
    pub quota_service: QuotaService,
    pub roulette_service: RouletteService,
}

impl AppState {
    /// Wire the services on top of an existing store and load the catalog
    /// and today's quota
    pub async fn with_store(store: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        info!("Setting up domain model");
        let food_service = FoodService::new(store.clone(), config);
        let quota_service = QuotaService::new(store, Arc::new(LocalDateProvider), config);

        let foods = food_service.load().await;
        let quota = quota_service.load().await;
        info!(
            "Loaded {} foods ({} on the wheel), {} spins used on {}",
            foods.len(),
            foods.iter().filter(|f| f.is_active).count(),
            quota.spins_today,
            quota.last_spin_date
        );

        let roulette_service = RouletteService::new(food_service.clone(), quota_service.clone(), config);

        Self {
            food_service,
            quota_service,
            roulette_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let data_directory = config.resolve_data_directory()?;
    info!("Setting up storage in {}", data_directory.display());
    let store = JsonFileStore::new(&data_directory)?;

    Ok(AppState::with_store(Arc::new(store), config).await)
}
