//! # Storage Module
//!
//! Handles all data persistence for the food roulette.
//!
//! Two independent JSON records live in a key-value store: the food catalog
//! and the daily spin quota. The domain layer only sees the
//! [`KeyValueStore`] port, so the backing store can be a directory of JSON
//! files on desktop, a platform key-value API on mobile, or an in-memory map
//! in tests.
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: typed repositories wrap the raw string port
//! - **Dependency Inversion**: services receive the store, never construct it
//! - **Testability**: memory and failing stores for unit tests

pub mod json_file;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use repositories::{FoodRepository, SpinQuotaRepository, FOODS_KEY, SPINS_KEY};
pub use traits::KeyValueStore;
