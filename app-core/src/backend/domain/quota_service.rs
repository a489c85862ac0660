//! Daily free-spin quota.
//!
//! A user gets `max_free_spins` free spins per local calendar day. The
//! counter is stored with the date it belongs to; a counter from any other
//! day is stale and starts over at zero.

use chrono::{Local, NaiveDate};
use log::{error, info};
use shared::{QuotaStatus, SpinQuota};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::storage::{KeyValueStore, SpinQuotaRepository};
use crate::config::AppConfig;

/// Source of "today" for quota bookkeeping
pub trait DateProvider: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Today's date in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDateProvider;

impl DateProvider for LocalDateProvider {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable date, for tests and previews
#[derive(Debug, Clone)]
pub struct FixedDateProvider {
    date: Arc<Mutex<NaiveDate>>,
}

impl FixedDateProvider {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Arc::new(Mutex::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = date;
    }
}

impl DateProvider for FixedDateProvider {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Format a date the way it is stored: zero-padded `YYYY-MM-DD`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Service tracking free spins per day
#[derive(Clone)]
pub struct QuotaService {
    repository: SpinQuotaRepository,
    dates: Arc<dyn DateProvider>,
    quota: Arc<Mutex<SpinQuota>>,
    max_free_spins: u32,
}

impl QuotaService {
    pub fn new(store: Arc<dyn KeyValueStore>, dates: Arc<dyn DateProvider>, config: &AppConfig) -> Self {
        Self {
            repository: SpinQuotaRepository::new(store),
            dates,
            quota: Arc::new(Mutex::new(SpinQuota::default())),
            max_free_spins: config.max_free_spins,
        }
    }

    fn current(&self) -> MutexGuard<'_, SpinQuota> {
        self.quota.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Today's date as stored in the quota record
    pub fn today(&self) -> String {
        format_day(self.dates.today())
    }

    /// Raw stored quota, or the zero quota when nothing is stored or the
    /// store cannot be read
    pub async fn load_stored(&self) -> SpinQuota {
        match self.repository.load().await {
            Ok(Some(quota)) => quota,
            Ok(None) => SpinQuota::default(),
            Err(e) => {
                error!("Error loading spin data: {:#}", e);
                SpinQuota::default()
            }
        }
    }

    /// Load the quota for today, resetting and persisting it first if it
    /// belongs to another day
    pub async fn load(&self) -> SpinQuota {
        let today = self.today();
        let mut quota = self.load_stored().await;

        if quota.is_stale(&today) {
            info!(
                "Resetting daily spins (last spin date '{}', today {})",
                quota.last_spin_date, today
            );
            quota = SpinQuota::for_day(&today);
            self.persist(&quota).await;
        }

        *self.current() = quota.clone();
        quota
    }

    async fn persist(&self, quota: &SpinQuota) {
        if let Err(e) = self.repository.save(quota).await {
            error!("Error saving spin data: {:#}", e);
        }
    }

    pub fn quota(&self) -> SpinQuota {
        self.current().clone()
    }

    pub fn max_free_spins(&self) -> u32 {
        self.max_free_spins
    }

    /// Free spins left today. A counter from another day counts as zero used.
    pub fn remaining(&self) -> u32 {
        let quota = self.current();
        if quota.is_stale(&self.today()) {
            return self.max_free_spins;
        }
        self.max_free_spins.saturating_sub(quota.spins_today)
    }

    pub fn can_spin_free(&self) -> bool {
        self.remaining() > 0
    }

    pub fn status(&self) -> QuotaStatus {
        let spins_today = {
            let quota = self.current();
            if quota.is_stale(&self.today()) { 0 } else { quota.spins_today }
        };
        QuotaStatus {
            spins_today,
            max_free_spins: self.max_free_spins,
            remaining: self.max_free_spins.saturating_sub(spins_today),
        }
    }

    /// Count one free spin against today and persist it.
    ///
    /// Only free spins are recorded; spins unlocked through the ad gate
    /// never reach this.
    pub async fn record_spin(&self) -> SpinQuota {
        let today = self.today();
        let updated = {
            let mut quota = self.current();
            let used = if quota.is_stale(&today) { 0 } else { quota.spins_today };
            *quota = SpinQuota {
                last_spin_date: today,
                spins_today: used + 1,
            };
            quota.clone()
        };

        self.persist(&updated).await;
        info!("Recorded free spin {}/{}", updated.spins_today, self.max_free_spins);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::FailingStore;
    use crate::backend::storage::{MemoryStore, SPINS_KEY};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn create_test_service(today: NaiveDate) -> (QuotaService, Arc<MemoryStore>, FixedDateProvider) {
        let store = Arc::new(MemoryStore::new());
        let dates = FixedDateProvider::new(today);
        let service = QuotaService::new(store.clone(), Arc::new(dates.clone()), &AppConfig::default());
        (service, store, dates)
    }

    #[test]
    fn test_format_day_is_zero_padded() {
        assert_eq!(format_day(day(2025, 3, 7)), "2025-03-07");
        assert_eq!(format_day(day(2024, 12, 31)), "2024-12-31");
    }

    #[tokio::test]
    async fn test_empty_store_loads_zero_quota() {
        let (service, store, _dates) = create_test_service(day(2025, 1, 9));

        assert_eq!(service.load_stored().await, SpinQuota::default());

        let quota = service.load().await;
        assert_eq!(quota, SpinQuota::for_day("2025-01-09"));
        // The reset is persisted
        assert!(store.get(SPINS_KEY).await.unwrap().is_some());
        assert_eq!(service.remaining(), 2);
    }

    #[tokio::test]
    async fn test_stale_quota_resets() {
        let (service, store, _dates) = create_test_service(day(2025, 1, 10));
        store
            .set(SPINS_KEY, r#"{"lastSpinDate":"2025-01-09","spinsToday":2}"#)
            .await
            .unwrap();

        let quota = service.load().await;

        assert_eq!(quota, SpinQuota::for_day("2025-01-10"));
        assert_eq!(service.load_stored().await, SpinQuota::for_day("2025-01-10"));
        assert!(service.can_spin_free());
    }

    #[tokio::test]
    async fn test_same_day_quota_is_kept() {
        let (service, store, _dates) = create_test_service(day(2025, 1, 9));
        store
            .set(SPINS_KEY, r#"{"lastSpinDate":"2025-01-09","spinsToday":1}"#)
            .await
            .unwrap();

        let quota = service.load().await;
        assert_eq!(quota.spins_today, 1);
        assert_eq!(service.remaining(), 1);
    }

    #[tokio::test]
    async fn test_record_spin_until_exhausted() {
        let (service, _store, _dates) = create_test_service(day(2025, 1, 9));
        service.load().await;

        assert_eq!(service.record_spin().await.spins_today, 1);
        assert!(service.can_spin_free());
        assert_eq!(service.record_spin().await.spins_today, 2);
        assert!(!service.can_spin_free());
        assert_eq!(
            service.status(),
            QuotaStatus {
                spins_today: 2,
                max_free_spins: 2,
                remaining: 0
            }
        );

        assert_eq!(
            service.load_stored().await,
            SpinQuota {
                last_spin_date: "2025-01-09".to_string(),
                spins_today: 2
            }
        );
    }

    #[tokio::test]
    async fn test_day_rollover_without_reload() {
        let (service, _store, dates) = create_test_service(day(2025, 1, 9));
        service.load().await;
        service.record_spin().await;
        service.record_spin().await;
        assert!(!service.can_spin_free());

        dates.set(day(2025, 1, 10));
        assert!(service.can_spin_free());

        let quota = service.record_spin().await;
        assert_eq!(quota, SpinQuota { last_spin_date: "2025-01-10".to_string(), spins_today: 1 });
    }

    #[tokio::test]
    async fn test_storage_failures_degrade_to_zero_quota() {
        let service = QuotaService::new(
            Arc::new(FailingStore::new()),
            Arc::new(FixedDateProvider::new(day(2025, 1, 9))),
            &AppConfig::default(),
        );

        assert_eq!(service.load_stored().await, SpinQuota::default());
        assert_eq!(service.load().await, SpinQuota::for_day("2025-01-09"));
        // Save failure is swallowed; the in-memory counter still moves
        assert_eq!(service.record_spin().await.spins_today, 1);
        assert_eq!(service.remaining(), 1);
    }
}
