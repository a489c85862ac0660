//! Spin coordinator.
//!
//! Ties the catalog, the daily quota and the wheel animator together the way
//! the home screen uses them: a spin request either starts the wheel or is
//! turned away, and the caller drives the animation from its frame clock.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::QuotaStatus;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::domain::food_service::FoodService;
use crate::backend::domain::quota_service::QuotaService;
use crate::backend::domain::spin_wheel::{pick_winner, FrameUpdate, SpinAnimator, SpinError, SpinOutcome, SpinPlan};
use crate::config::AppConfig;

/// What happened to a spin request
#[derive(Debug, Clone, PartialEq)]
pub enum SpinRequestOutcome {
    Started(SpinPlan),
    /// Free spins for today are used up; the unlock flow has to run first
    UnlockRequired(QuotaStatus),
    /// A spin is already in flight; the request was dropped
    AlreadySpinning,
    NoActiveFoods,
}

#[derive(Clone)]
pub struct RouletteService {
    food_service: FoodService,
    quota_service: QuotaService,
    animator: Arc<Mutex<SpinAnimator>>,
    rng: Arc<Mutex<StdRng>>,
}

impl RouletteService {
    pub fn new(food_service: FoodService, quota_service: QuotaService, config: &AppConfig) -> Self {
        Self::with_rng(food_service, quota_service, config, StdRng::from_entropy())
    }

    /// Build with a given random source, e.g. a seeded one in tests
    pub fn with_rng(food_service: FoodService, quota_service: QuotaService, config: &AppConfig, rng: StdRng) -> Self {
        Self {
            food_service,
            quota_service,
            animator: Arc::new(Mutex::new(SpinAnimator::new(config.spin.clone()))),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn animator(&self) -> MutexGuard<'_, SpinAnimator> {
        self.animator.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_spinning(&self) -> bool {
        self.animator().is_spinning()
    }

    /// Handle a tap on the spin button.
    ///
    /// A free spin is counted when the wheel starts. When the day's free
    /// spins are gone nothing is counted and the caller is sent to the
    /// unlock flow.
    pub async fn request_spin(&self, now_ms: f64) -> Result<SpinRequestOutcome, SpinError> {
        if self.is_spinning() {
            debug!("Spin request while spinning, ignoring");
            return Ok(SpinRequestOutcome::AlreadySpinning);
        }
        if self.food_service.active_foods().is_empty() {
            return Ok(SpinRequestOutcome::NoActiveFoods);
        }
        if !self.quota_service.can_spin_free() {
            let status = self.quota_service.status();
            info!(
                "No free spins left ({}/{}), unlock required",
                status.spins_today, status.max_free_spins
            );
            return Ok(SpinRequestOutcome::UnlockRequired(status));
        }

        let outcome = self.start_spin(now_ms)?;
        if let SpinRequestOutcome::Started(_) = &outcome {
            self.quota_service.record_spin().await;
        }
        Ok(outcome)
    }

    /// Start a spin after the unlock flow succeeded. The free spin counter
    /// is left alone and there is no cap on unlocked spins.
    pub fn spin_after_unlock(&self, now_ms: f64) -> Result<SpinRequestOutcome, SpinError> {
        info!("Spin unlocked");
        self.start_spin(now_ms)
    }

    fn start_spin(&self, now_ms: f64) -> Result<SpinRequestOutcome, SpinError> {
        let foods = self.food_service.active_foods();
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(winner_index) = pick_winner(foods.len(), &mut *rng) else {
            return Ok(SpinRequestOutcome::NoActiveFoods);
        };

        match self.animator().start(&foods, winner_index, now_ms, &mut *rng)? {
            Some(plan) => Ok(SpinRequestOutcome::Started(plan)),
            None => Ok(SpinRequestOutcome::AlreadySpinning),
        }
    }

    /// Advance the wheel to `now_ms`
    pub fn advance(&self, now_ms: f64) -> FrameUpdate {
        self.animator().advance(now_ms)
    }

    pub fn cancel(&self) -> bool {
        self.animator().cancel()
    }

    pub fn last_outcome(&self) -> Option<SpinOutcome> {
        self.animator().last_outcome().cloned()
    }

    pub fn baseline_rotation(&self) -> f64 {
        self.animator().baseline_rotation()
    }
}
