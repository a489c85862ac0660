//! # Domain Module
//!
//! Business logic for the food roulette, independent of any UI framework or
//! storage mechanism.
//!
//! ## Module Organization
//!
//! - **catalog**: Default foods, first-run seeding and catalog migration
//! - **food_service**: Catalog loading, persistence and user edits
//! - **quota_service**: Daily free-spin counter with day rollover
//! - **spin_wheel**: Wheel geometry, target selection and the spin animator
//! - **easing**: Timing curves used by the animator
//! - **roulette_service**: Spin requests gated by the daily quota
//!
//! ## Business Rules
//!
//! - Default foods can be deactivated but never deleted
//! - User food names are trimmed, non-empty, at most 20 characters and
//!   unique ignoring case
//! - Every stored catalog is merged with the current default catalog on load
//! - Two free spins per local calendar day; more spins go through the
//!   unlock flow and are not counted
//! - A spin always lands inside the winner's slice, clear of its edges

pub mod catalog;
pub mod easing;
pub mod food_service;
pub mod models;
pub mod quota_service;
pub mod roulette_service;
pub mod spin_wheel;

pub use food_service::FoodService;
pub use models::FoodValidationError;
pub use quota_service::{DateProvider, FixedDateProvider, LocalDateProvider, QuotaService};
pub use roulette_service::{RouletteService, SpinRequestOutcome};
pub use spin_wheel::{FrameUpdate, SpinAnimator, SpinError, SpinOutcome, SpinPlan, TickEvent, WheelGeometry};
