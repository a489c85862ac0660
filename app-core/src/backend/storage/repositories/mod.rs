pub mod food_repository;
pub mod spin_quota_repository;

pub use food_repository::{FoodRepository, FOODS_KEY};
pub use spin_quota_repository::{SpinQuotaRepository, SPINS_KEY};
