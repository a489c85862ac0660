//! # Configuration
//!
//! Runtime settings for the roulette: where data lives, quota and catalog
//! limits, and the spin animation tuning. Every field has a default, so a
//! missing or partial YAML file is fine.
//!
//! ```yaml
//! data_directory: "/home/me/Documents/Food Roulette"
//! max_free_spins: 2
//! max_food_name_length: 20
//! initial_active_foods: 5
//! spin:
//!   full_turns: 4
//!   base_duration_ms: 5000.0
//! ```

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FOOD_ROULETTE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the JSON records. `None` uses the platform default.
    pub data_directory: Option<PathBuf>,
    /// Free spins per calendar day before the unlock flow kicks in
    pub max_free_spins: u32,
    /// Maximum length (in characters) of a user food name
    pub max_food_name_length: usize,
    /// Foods put on the wheel on first run
    pub initial_active_foods: usize,
    pub spin: SpinTuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            max_free_spins: 2,
            max_food_name_length: 20,
            initial_active_foods: 5,
            spin: SpinTuning::default(),
        }
    }
}

/// Spin animation constants. Angles are in degrees, durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    /// Whole turns before settling on the winner
    pub full_turns: u32,
    pub base_duration_ms: f64,
    /// Relative duration jitter: 0.04 means ±4%
    pub duration_jitter: f64,
    /// Fraction of the slice width kept clear on each edge of the landing spot
    pub safety_margin: f64,
    /// Pointer bounce peak before the final phase
    pub base_bounce: f64,
    /// Pointer bounce peak at the very end of the spin
    pub final_bounce: f64,
    /// Rotation progress after which the bounce starts growing
    pub final_phase_start: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            full_turns: 4,
            base_duration_ms: 5000.0,
            duration_jitter: 0.04,
            safety_margin: 0.18,
            base_bounce: 12.0,
            final_bounce: 18.0,
            final_phase_start: 0.75,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults if the
    /// file does not exist. The data directory environment override is
    /// applied and out-of-range values are clamped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let yaml_content = fs::read_to_string(path)?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        } else {
            info!("No config file at {}, using defaults", path.display());
            AppConfig::default()
        };

        Ok(config.with_env_overrides().validated())
    }

    /// Apply `FOOD_ROULETTE_DATA_DIR` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                info!("Data directory overridden by {}: {}", DATA_DIR_ENV, dir);
                self.data_directory = Some(PathBuf::from(dir));
            }
        }
        self
    }

    /// Resolve the data directory: configured value, or ~/Documents/Food Roulette
    pub fn resolve_data_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_directory {
            return Ok(dir.clone());
        }

        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        Ok(PathBuf::from(home_dir).join("Documents").join("Food Roulette"))
    }

    /// Write the configuration as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml_content = serde_yaml::to_string(self)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Clamp values that would break the roulette to their defaults
    pub fn validated(mut self) -> Self {
        let defaults = SpinTuning::default();

        if self.max_food_name_length == 0 {
            warn!("max_food_name_length must be positive, using 20");
            self.max_food_name_length = 20;
        }
        if !(0.0..0.5).contains(&self.spin.safety_margin) {
            warn!(
                "safety_margin {} outside [0, 0.5), using {}",
                self.spin.safety_margin, defaults.safety_margin
            );
            self.spin.safety_margin = defaults.safety_margin;
        }
        if !(0.0..1.0).contains(&self.spin.duration_jitter) {
            warn!("duration_jitter {} outside [0, 1), using default", self.spin.duration_jitter);
            self.spin.duration_jitter = defaults.duration_jitter;
        }
        if self.spin.base_duration_ms <= 0.0 {
            warn!("base_duration_ms must be positive, using default");
            self.spin.base_duration_ms = defaults.base_duration_ms;
        }
        if !(0.0..1.0).contains(&self.spin.final_phase_start) {
            self.spin.final_phase_start = defaults.final_phase_start;
        }
        self
    }
}
