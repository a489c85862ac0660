use serde::{Deserialize, Serialize};
use std::fmt;

/// A food that can appear as a slice on the wheel.
///
/// Ids of default foods are stable slugs (`"pizza"`), user foods use
/// `"custom-<epoch_millis>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    /// Display name (max 20 characters for user foods). Stored default
    /// foods may omit it; the current default definition fills it in.
    #[serde(default)]
    pub name: String,
    /// Slice color as a `#RRGGBB` hex string
    #[serde(default)]
    pub color: String,
    /// System-provided food (true) or user-added food (false)
    #[serde(default)]
    pub is_default: bool,
    /// Whether the food participates in the wheel. Records written by older
    /// versions may omit this field, in which case the food is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
}

fn default_active() -> bool {
    true
}

impl FoodItem {
    /// Icon for this food, resolved against the compiled-in asset table
    pub fn icon(&self) -> FoodIcon {
        FoodIcon::for_food_id(&self.id)
    }

    /// Generate an ID for a user-created food
    pub fn generate_custom_id(epoch_millis: u64) -> String {
        format!("custom-{}", epoch_millis)
    }

    /// Parse a custom food ID to extract its timestamp
    pub fn parse_custom_id(id: &str) -> Result<u64, FoodIdError> {
        let millis = id
            .strip_prefix("custom-")
            .ok_or(FoodIdError::InvalidFormat)?;

        millis.parse::<u64>().map_err(|_| FoodIdError::InvalidTimestamp)
    }
}

/// Recipe attached to a default food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    /// Estimated time, e.g. "30 minutos"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Number of people served, e.g. "4 personas"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    /// Dish category, e.g. "Plato principal"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Recipe {
    pub fn new(ingredients: &[&str], steps: &[&str]) -> Self {
        Self {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            time: None,
            difficulty: None,
            servings: None,
            category: None,
        }
    }
}

/// Recipe difficulty. Older records carry the Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "Fácil")]
    Easy,
    #[serde(alias = "Media")]
    Medium,
    #[serde(alias = "Difícil")]
    Hard,
}

/// Icon reference for a food. Never serialized; resolved by food id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodIcon {
    Burger,
    Pizza,
    Empanadas,
    Pasta,
    Guiso,
    Tarta,
    Polenta,
    Sushi,
    Taco,
    Milanesa,
    /// Generic icon used for every user-added food
    Custom,
}

impl FoodIcon {
    pub fn for_food_id(id: &str) -> Self {
        match id {
            "hamburguesas" => FoodIcon::Burger,
            "pizza" => FoodIcon::Pizza,
            "empanadas" => FoodIcon::Empanadas,
            "pasta" => FoodIcon::Pasta,
            "guiso" => FoodIcon::Guiso,
            "tarta" => FoodIcon::Tarta,
            "polenta" => FoodIcon::Polenta,
            "sushi" => FoodIcon::Sushi,
            "tacos" => FoodIcon::Taco,
            "milanesa" => FoodIcon::Milanesa,
            _ => FoodIcon::Custom,
        }
    }

    /// Asset file name under `assets/food_icons/`
    pub fn asset_name(&self) -> &'static str {
        match self {
            FoodIcon::Burger => "burger.png",
            FoodIcon::Pizza => "pizza.png",
            FoodIcon::Empanadas => "empanadas.png",
            FoodIcon::Pasta => "pasta.png",
            FoodIcon::Guiso => "guiso.png",
            FoodIcon::Tarta => "tarta.png",
            FoodIcon::Polenta => "polenta.png",
            FoodIcon::Sushi => "sushi.png",
            FoodIcon::Taco => "taco.png",
            FoodIcon::Milanesa => "milanesa.png",
            FoodIcon::Custom => "food.png",
        }
    }
}

/// Daily free-spin counter as persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinQuota {
    /// Local calendar day of the last counted spin (`YYYY-MM-DD`), empty if never spun
    pub last_spin_date: String,
    pub spins_today: u32,
}

impl SpinQuota {
    pub fn for_day(today: &str) -> Self {
        Self {
            last_spin_date: today.to_string(),
            spins_today: 0,
        }
    }

    /// A quota recorded on any other day than `today` no longer applies
    pub fn is_stale(&self, today: &str) -> bool {
        self.last_spin_date != today
    }
}

/// Snapshot of the free-spin allowance for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub spins_today: u32,
    pub max_free_spins: u32,
    pub remaining: u32,
}

/// Request to add a user food to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFoodRequest {
    pub name: String,
}

/// Response after adding a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFoodResponse {
    pub food: FoodItem,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoodIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for FoodIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodIdError::InvalidFormat => write!(f, "Invalid custom food ID format"),
            FoodIdError::InvalidTimestamp => write!(f, "Invalid timestamp in custom food ID"),
        }
    }
}

impl std::error::Error for FoodIdError {}
