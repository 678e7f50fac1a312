//! Payout schedule settings
//!
//! Process-wide configuration for the automatic payout sweep. Loaded
//! once per scheduler run and passed explicitly, never read as ambient
//! global state.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Singleton configuration for the scheduled payout sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutScheduleSettings {
    pub enabled: bool,
    /// Day of week the sweep runs, UTC
    pub run_weekday: Weekday,
    /// Hour of day the sweep runs, UTC
    pub run_hour: u32,
    /// Balances below this are not worth a payout request
    pub minimum_payout_amount: Decimal,
    /// Requests at or below this are approved without manual review
    pub auto_approve_threshold: Option<Decimal>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
}

impl PayoutScheduleSettings {
    /// Whether a tick arriving at `now` should actually run.
    ///
    /// A tick before `next_run_at` is a no-op; this is what makes an
    /// accidental double-trigger within one period idempotent.
    pub fn due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_run_at.map_or(true, |next| now >= next)
    }

    /// Next occurrence of the configured weekday and hour strictly after
    /// `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_ahead =
            (self.run_weekday.num_days_from_monday() + 7 - now.weekday().num_days_from_monday()) % 7;

        let candidate_date = now.date_naive() + Duration::days(i64::from(days_ahead));
        let candidate = Utc.from_utc_datetime(
            &candidate_date
                .and_hms_opt(self.run_hour.min(23), 0, 0)
                .unwrap_or_else(|| candidate_date.and_hms_opt(0, 0, 0).expect("midnight exists")),
        );

        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}
