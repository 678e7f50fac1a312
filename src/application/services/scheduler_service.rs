//! Payout scheduler: the periodic sweep that turns eligible balances
//! into payout requests
//!
//! The cadence is driven externally (cron-like invocation); this service
//! only decides whether a tick is due and what it creates.

use std::sync::Arc;

use crate::application::services::payout_service::CreatePayoutRequest;
use crate::application::services::PayoutService;
use crate::infrastructure::adapters::MonitoringAdapter;
use crate::infrastructure::stores::{BankAccountStore, PaymentStore, ScheduleStore};
use crate::shared::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerRunReport {
    /// False when the tick was not due (disabled, or within the current
    /// period)
    pub ran: bool,
    pub salons_scanned: usize,
    pub requests_created: usize,
    pub auto_approved: usize,
    pub skipped_below_minimum: usize,
    pub skipped_no_destination: usize,
    pub failures: usize,
}

/// Service driving the scheduled payout sweep
pub struct SchedulerService {
    payments: PaymentStore,
    bank_accounts: BankAccountStore,
    schedule: ScheduleStore,
    payout_service: Arc<PayoutService>,
    monitoring: Arc<MonitoringAdapter>,
}

impl SchedulerService {
    pub fn new(
        payments: PaymentStore,
        bank_accounts: BankAccountStore,
        schedule: ScheduleStore,
        payout_service: Arc<PayoutService>,
        monitoring: Arc<MonitoringAdapter>,
    ) -> Self {
        Self {
            payments,
            bank_accounts,
            schedule,
            payout_service,
            monitoring,
        }
    }

    /// Run one tick at `now`.
    ///
    /// Idempotent per period: a tick before `next_run_at` is a no-op, so
    /// an accidental double-trigger cannot double-create requests. The
    /// schedule timestamps advance after every non-skipped run whether or
    /// not any payout was created.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> AppResult<SchedulerRunReport> {
        let settings = self.schedule.get().await;
        if !settings.due(now) {
            info!(
                enabled = settings.enabled,
                next_run_at = ?settings.next_run_at,
                "Scheduler tick not due, skipping"
            );
            return Ok(SchedulerRunReport::default());
        }

        let mut report = SchedulerRunReport {
            ran: true,
            ..SchedulerRunReport::default()
        };

        let salons = self.payments.earning_salons().await;
        report.salons_scanned = salons.len();

        for salon_id in salons {
            match self.sweep_salon(salon_id, &settings, now).await {
                Ok(SweepOutcome::Created { auto_approved }) => {
                    report.requests_created += 1;
                    if auto_approved {
                        report.auto_approved += 1;
                    }
                }
                Ok(SweepOutcome::BelowMinimum) => report.skipped_below_minimum += 1,
                Ok(SweepOutcome::NoDestination) => report.skipped_no_destination += 1,
                Err(e) => {
                    warn!(salon_id = %salon_id, error = %e, "Scheduled payout failed");
                    report.failures += 1;
                }
            }
        }

        let next_run_at = settings.next_run_after(now);
        match self
            .schedule
            .complete_run(settings.next_run_at, now, next_run_at)
            .await
        {
            Ok(_) => {}
            // A concurrent tick recorded this period first; its report
            // stands and this one's creations were blocked by the
            // per-salon guards
            Err(AppError::ConcurrencyConflict(_)) => {
                warn!("Schedule already advanced by a concurrent tick");
            }
            Err(other) => return Err(other),
        }

        self.monitoring.record_scheduler_run();
        info!(
            requests_created = report.requests_created,
            auto_approved = report.auto_approved,
            next_run_at = %next_run_at,
            "Scheduler tick complete"
        );
        Ok(report)
    }

    async fn sweep_salon(
        &self,
        salon_id: Uuid,
        settings: &crate::domain::schedule::PayoutScheduleSettings,
        now: DateTime<Utc>,
    ) -> AppResult<SweepOutcome> {
        let available = self.payout_service.available_balance(salon_id).await;
        if available < settings.minimum_payout_amount {
            return Ok(SweepOutcome::BelowMinimum);
        }

        let Some(primary) = self.bank_accounts.primary_for(salon_id).await else {
            warn!(salon_id = %salon_id, "Eligible salon has no primary payout destination");
            return Ok(SweepOutcome::NoDestination);
        };

        let request = CreatePayoutRequest {
            salon_id,
            amount: available,
            method: primary.default_method(),
            destination: primary.payout_destination(),
            period_start: settings.last_run_at,
            period_end: Some(now),
            note: Some("scheduled payout".to_string()),
        };

        let payout = match self.payout_service.create_request(request).await {
            Ok(payout) => payout,
            // Lost the balance race to a manual request in flight; the
            // salon will be picked up next period
            Err(AppError::InsufficientBalance { .. }) => return Ok(SweepOutcome::BelowMinimum),
            Err(other) => return Err(other),
        };

        let auto_approved = match settings.auto_approve_threshold {
            Some(threshold) if payout.amount <= threshold => {
                self.payout_service.approve(payout.id).await?;
                true
            }
            _ => false,
        };

        Ok(SweepOutcome::Created { auto_approved })
    }
}

enum SweepOutcome {
    Created { auto_approved: bool },
    BelowMinimum,
    NoDestination,
}
