//! Food roulette engine: a spinning wheel that picks what to eat from a
//! user-curated catalog, with a daily free-spin allowance.

pub mod backend;
pub mod config;
pub mod logging;

pub use backend::{initialize_backend, AppState};
pub use config::{AppConfig, SpinTuning};
