//! Payout schedule settings store (process-wide singleton)

use crate::domain::schedule::PayoutScheduleSettings;
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use std::sync::Arc;
use tokio::sync::RwLock;

const SETTINGS_KEY: &str = "payout_schedule_settings";

/// Store for the single payout schedule settings row.
#[derive(Clone)]
pub struct ScheduleStore {
    state: Arc<RwLock<PayoutScheduleSettings>>,
    mirror: RedisMirror,
}

impl ScheduleStore {
    pub fn new(initial: PayoutScheduleSettings, redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            mirror: RedisMirror::new(redis),
        }
    }

    pub async fn get(&self) -> PayoutScheduleSettings {
        self.state.read().await.clone()
    }

    /// Replace the settings wholesale (admin mutation).
    pub async fn put(&self, settings: PayoutScheduleSettings) -> AppResult<()> {
        {
            let mut state = self.state.write().await;
            *state = settings.clone();
        }

        self.mirror.put(SETTINGS_KEY.to_string(), &settings).await;
        Ok(())
    }

    /// Record a completed scheduler run.
    ///
    /// Compare-and-swap on `next_run_at`: a concurrent tick that already
    /// recorded the same period loses the race and gets
    /// `ConcurrencyConflict`, which the scheduler treats as "period
    /// already handled".
    pub async fn complete_run(
        &self,
        observed_next_run: Option<DateTime<Utc>>,
        last_run_at: DateTime<Utc>,
        next_run_at: DateTime<Utc>,
    ) -> AppResult<PayoutScheduleSettings> {
        let updated = {
            let mut state = self.state.write().await;
            if state.next_run_at != observed_next_run {
                return Err(AppError::ConcurrencyConflict(
                    "schedule advanced by a concurrent run".to_string(),
                ));
            }

            state.last_run_at = Some(last_run_at);
            state.next_run_at = Some(next_run_at);
            state.clone()
        };

        self.mirror.put(SETTINGS_KEY.to_string(), &updated).await;
        Ok(updated)
    }
}
