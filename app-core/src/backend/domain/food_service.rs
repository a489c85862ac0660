//! Food catalog service.
//!
//! Owns the in-memory catalog the wheel is built from and keeps the stored
//! record in sync with it. Storage problems never reach the caller: loads
//! fall back to the compiled-in defaults and failed saves are logged and
//! dropped, so an edit can be lost if the store is failing.

use chrono::Utc;
use log::{error, info, warn};
use shared::{AddFoodRequest, AddFoodResponse, FoodItem};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::domain::catalog::{custom_food_color, default_foods, merge_with_defaults, seed_catalog};
use crate::backend::domain::models::FoodValidationError;
use crate::backend::storage::{FoodRepository, KeyValueStore};
use crate::config::AppConfig;

/// Service for managing the food catalog
#[derive(Clone)]
pub struct FoodService {
    repository: FoodRepository,
    defaults: Arc<Vec<FoodItem>>,
    foods: Arc<Mutex<Vec<FoodItem>>>,
    max_name_length: usize,
    initial_active_foods: usize,
}

impl FoodService {
    /// Create a FoodService over the compiled-in default catalog
    pub fn new(store: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        Self::with_defaults(store, default_foods(), config)
    }

    /// Create a FoodService over a specific default catalog
    pub fn with_defaults(
        store: Arc<dyn KeyValueStore>,
        defaults: Vec<FoodItem>,
        config: &AppConfig,
    ) -> Self {
        Self {
            repository: FoodRepository::new(store),
            defaults: Arc::new(defaults),
            foods: Arc::new(Mutex::new(Vec::new())),
            max_name_length: config.max_food_name_length,
            initial_active_foods: config.initial_active_foods,
        }
    }

    fn catalog(&self) -> MutexGuard<'_, Vec<FoodItem>> {
        self.foods.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load the catalog from storage.
    ///
    /// First run seeds a shuffled default catalog; later runs merge the
    /// stored list with the current defaults. Either way the result is
    /// written back before it is returned.
    pub async fn load(&self) -> Vec<FoodItem> {
        let foods = match self.repository.load().await {
            Ok(Some(stored)) => {
                info!("Merging {} stored foods with the default catalog", stored.len());
                let merged = merge_with_defaults(stored, &self.defaults);
                self.persist(&merged).await;
                merged
            }
            Ok(None) => {
                let seeded = {
                    let mut rng = rand::thread_rng();
                    seed_catalog(&self.defaults, self.initial_active_foods, &mut rng)
                };
                info!(
                    "No stored catalog, seeded {} foods with {} active",
                    seeded.len(),
                    seeded.iter().filter(|f| f.is_active).count()
                );
                self.persist(&seeded).await;
                seeded
            }
            Err(e) => {
                error!("Error loading foods: {:#}", e);
                // Not written back: the stored record may still be readable later.
                // The defaults come back as defined, so nothing is on the wheel.
                self.defaults.to_vec()
            }
        };

        *self.catalog() = foods.clone();
        foods
    }

    /// Replace the whole catalog and persist it as given
    pub async fn save(&self, foods: Vec<FoodItem>) {
        *self.catalog() = foods.clone();
        self.persist(&foods).await;
    }

    async fn persist(&self, foods: &[FoodItem]) {
        if let Err(e) = self.repository.save(foods).await {
            error!("Error saving foods: {:#}", e);
        }
    }

    /// Current catalog, in wheel order
    pub fn foods(&self) -> Vec<FoodItem> {
        self.catalog().clone()
    }

    /// Foods currently on the wheel, in slice order
    pub fn active_foods(&self) -> Vec<FoodItem> {
        self.catalog().iter().filter(|f| f.is_active).cloned().collect()
    }

    pub fn get_food(&self, food_id: &str) -> Option<FoodItem> {
        self.catalog().iter().find(|f| f.id == food_id).cloned()
    }

    /// Add a user food to the end of the catalog
    pub async fn add_food(&self, request: AddFoodRequest) -> Result<AddFoodResponse, FoodValidationError> {
        let name = request.name.trim().to_string();

        let (food, updated) = {
            let foods = self.catalog();
            self.validate_new_name(&name, &foods)?;

            let custom_count = foods.iter().filter(|f| !f.is_default).count();
            let food = FoodItem {
                id: Self::unique_custom_id(&foods),
                name: name.clone(),
                color: custom_food_color(custom_count).to_string(),
                is_default: false,
                is_active: true,
                recipe: None,
            };

            let mut updated = foods.clone();
            updated.push(food.clone());
            (food, updated)
        };

        self.save(updated).await;
        info!("Added food '{}' with ID: {}", food.name, food.id);

        Ok(AddFoodResponse {
            success_message: format!("\"{}\" added to the wheel", food.name),
            food,
        })
    }

    /// Flip whether a food is on the wheel
    pub async fn toggle_active(&self, food_id: &str) -> Result<FoodItem, FoodValidationError> {
        let (toggled, updated) = {
            let mut updated = self.catalog().clone();
            let food = updated
                .iter_mut()
                .find(|f| f.id == food_id)
                .ok_or_else(|| FoodValidationError::NotFound(food_id.to_string()))?;
            food.is_active = !food.is_active;
            (food.clone(), updated)
        };

        self.save(updated).await;
        info!("Food '{}' is now {}", toggled.name, if toggled.is_active { "active" } else { "inactive" });
        Ok(toggled)
    }

    /// Delete a user food. Default foods can only be deactivated.
    pub async fn delete_food(&self, food_id: &str) -> Result<FoodItem, FoodValidationError> {
        let (removed, updated) = {
            let foods = self.catalog();
            let food = foods
                .iter()
                .find(|f| f.id == food_id)
                .cloned()
                .ok_or_else(|| FoodValidationError::NotFound(food_id.to_string()))?;

            if food.is_default {
                warn!("Refusing to delete default food '{}'", food.id);
                return Err(FoodValidationError::CannotDeleteDefault);
            }

            let updated: Vec<FoodItem> = foods.iter().filter(|f| f.id != food_id).cloned().collect();
            (food, updated)
        };

        self.save(updated).await;
        info!("Deleted food '{}' with ID: {}", removed.name, removed.id);
        Ok(removed)
    }

    fn validate_new_name(&self, name: &str, foods: &[FoodItem]) -> Result<(), FoodValidationError> {
        if name.is_empty() {
            return Err(FoodValidationError::EmptyName);
        }

        if name.chars().count() > self.max_name_length {
            return Err(FoodValidationError::NameTooLong {
                max: self.max_name_length,
            });
        }

        let lowered = name.to_lowercase();
        if foods.iter().any(|f| f.name.to_lowercase() == lowered) {
            return Err(FoodValidationError::DuplicateName(name.to_string()));
        }

        Ok(())
    }

    /// `custom-<now millis>`, moved past the newest existing custom id so ids
    /// stay unique and increasing even with a clock that went backwards
    fn unique_custom_id(foods: &[FoodItem]) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let newest = foods
            .iter()
            .filter_map(|f| FoodItem::parse_custom_id(&f.id).ok())
            .max();

        let millis = match newest {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        };
        FoodItem::generate_custom_id(millis)
    }
}
