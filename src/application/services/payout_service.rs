//! Payout service: balance calculation, request validation, and the
//! payout lifecycle state machine

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::payout::{PayoutDestination, PayoutMethod, PayoutStatus, SalonPayout};
use crate::infrastructure::adapters::{MonitoringAdapter, NotificationDispatcher, PayoutEvent};
use crate::infrastructure::stores::{PaymentStore, PayoutStore, PenaltyStore};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use crate::shared::validation::ValidationUtils;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a payout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayoutRequest {
    pub salon_id: Uuid,
    /// Gross amount to discharge from the salon's balance
    pub amount: Decimal,
    pub method: PayoutMethod,
    pub destination: PayoutDestination,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Service owning the payout side of the ledger
pub struct PayoutService {
    config: Arc<AppConfig>,
    payments: PaymentStore,
    payouts: PayoutStore,
    penalties: PenaltyStore,
    notifier: Arc<dyn NotificationDispatcher>,
    monitoring: Arc<MonitoringAdapter>,
}

impl PayoutService {
    pub fn new(
        config: Arc<AppConfig>,
        payments: PaymentStore,
        payouts: PayoutStore,
        penalties: PenaltyStore,
        notifier: Arc<dyn NotificationDispatcher>,
        monitoring: Arc<MonitoringAdapter>,
    ) -> Self {
        Self {
            config,
            payments,
            payouts,
            penalties,
            notifier,
            monitoring,
        }
    }

    /// What the platform owes a salon right now.
    ///
    /// Pure read-side computation, re-run on demand and never cached:
    /// lifetime earnings, minus completed payouts, minus open requests,
    /// minus cash penalties the salon collected but has not remitted.
    pub async fn available_balance(&self, salon_id: Uuid) -> Decimal {
        let total_earned = self.payments.total_earned(salon_id).await;
        let totals = self.payouts.totals_for(salon_id).await;
        let unremitted = self.penalties.unremitted_cash_total(salon_id).await;

        (total_earned - totals.completed - totals.outstanding - unremitted).max(Decimal::ZERO)
    }

    /// Create a payout request.
    ///
    /// The balance check and the insert run under the salon's request
    /// guard, so two concurrent requests cannot both validate against
    /// the same reading and jointly overdraw the salon.
    pub async fn create_request(&self, request: CreatePayoutRequest) -> AppResult<SalonPayout> {
        ValidationUtils::validate_amount(request.amount, "payout amount")?;
        if let Some(note) = &request.note {
            ValidationUtils::validate_note(note)?;
        }

        if request.amount < self.config.payout.minimum_amount {
            return Err(AppError::Validation(format!(
                "payout amount {} is below the minimum {}",
                request.amount, self.config.payout.minimum_amount
            )));
        }

        let guard = self.payouts.request_guard(request.salon_id).await;
        let _held = guard.lock().await;

        let available = self.available_balance(request.salon_id).await;
        if request.amount > available {
            LoggingUtils::log_balance_conflict(request.salon_id, request.amount, available);
            return Err(AppError::InsufficientBalance {
                requested: request.amount,
                available,
            });
        }

        // Gross stays the ledger-affecting quantity; the instant-rail
        // convenience fee only reduces what is disbursed
        let fee_charged = if request.method.charges_fee() {
            (request.amount * self.config.payout.instant_fee_percent)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        let payout = SalonPayout {
            id: Uuid::new_v4(),
            salon_id: request.salon_id,
            amount: request.amount,
            fee_charged,
            net_disbursed: request.amount - fee_charged,
            status: PayoutStatus::Pending,
            method: request.method,
            destination: request.destination,
            period_start: request.period_start,
            period_end: request.period_end,
            created_at: Utc::now(),
            processed_at: None,
            note: request.note,
        };

        let payout = self.payouts.insert(payout).await?;

        self.monitoring.record_payout_request();
        self.dispatch_event(&payout);
        Ok(payout)
    }

    /// Admin or scheduler approval: hand the request to the payout rail.
    pub async fn approve(&self, payout_id: Uuid) -> AppResult<SalonPayout> {
        self.transition(
            payout_id,
            PayoutStatus::Pending,
            PayoutStatus::Processing,
            None,
        )
        .await
    }

    /// Admin rejection of a request still awaiting review.
    pub async fn reject(&self, payout_id: Uuid, note: Option<String>) -> AppResult<SalonPayout> {
        self.transition(payout_id, PayoutStatus::Pending, PayoutStatus::Failed, note)
            .await
    }

    /// The rail confirmed the transfer (or an admin marked it done).
    pub async fn complete(&self, payout_id: Uuid) -> AppResult<SalonPayout> {
        self.transition(
            payout_id,
            PayoutStatus::Processing,
            PayoutStatus::Completed,
            None,
        )
        .await
    }

    /// The rail reported a failed transfer; the underlying earnings
    /// become available again for a future request.
    pub async fn fail(&self, payout_id: Uuid, note: Option<String>) -> AppResult<SalonPayout> {
        self.transition(
            payout_id,
            PayoutStatus::Processing,
            PayoutStatus::Failed,
            note,
        )
        .await
    }

    async fn transition(
        &self,
        payout_id: Uuid,
        expected_from: PayoutStatus,
        to: PayoutStatus,
        note: Option<String>,
    ) -> AppResult<SalonPayout> {
        let payout = self
            .payouts
            .transition(payout_id, Some(expected_from), to, note)
            .await?;

        self.monitoring.record_payout_transition();
        LoggingUtils::log_payout_transition(
            payout.id,
            payout.salon_id,
            expected_from.as_str(),
            to.as_str(),
        );
        self.dispatch_event(&payout);
        Ok(payout)
    }

    /// Fire-and-forget: delivery failure never rolls back the
    /// transition that produced the event.
    fn dispatch_event(&self, payout: &SalonPayout) {
        let notifier = self.notifier.clone();
        let event = PayoutEvent {
            payout_id: payout.id,
            salon_id: payout.salon_id,
            status: payout.status,
            amount: payout.amount,
            net_disbursed: payout.net_disbursed,
            occurred_at: Utc::now(),
        };
        tokio::spawn(async move {
            notifier.notify(event).await;
        });
    }

    pub async fn get(&self, payout_id: Uuid) -> AppResult<SalonPayout> {
        self.payouts
            .get(payout_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("payout {}", payout_id)))
    }

    pub async fn list_for_salon(&self, salon_id: Uuid) -> Vec<SalonPayout> {
        self.payouts.list_for_salon(salon_id).await
    }

    /// Requests awaiting manual review, oldest first.
    pub async fn pending_requests(&self) -> Vec<SalonPayout> {
        self.payouts.pending().await
    }
}
