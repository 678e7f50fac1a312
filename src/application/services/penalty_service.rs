//! Penalty service: cancellation debts and their remittance

use crate::domain::penalty::{CancellationPenalty, PenaltyChannel};
use crate::infrastructure::stores::PenaltyStore;
use crate::shared::error::AppResult;
use crate::shared::validation::ValidationUtils;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

/// Service for cancellation penalty bookkeeping
pub struct PenaltyService {
    penalties: PenaltyStore,
}

impl PenaltyService {
    pub fn new(penalties: PenaltyStore) -> Self {
        Self { penalties }
    }

    /// Record a new unpaid penalty at cancellation time. Accumulation is
    /// uncapped.
    pub async fn accrue(
        &self,
        customer_id: Uuid,
        originating_salon_id: Uuid,
        amount: Decimal,
    ) -> AppResult<CancellationPenalty> {
        ValidationUtils::validate_amount(amount, "penalty amount")?;

        let penalty = self
            .penalties
            .insert(CancellationPenalty::new(
                customer_id,
                originating_salon_id,
                amount,
            ))
            .await?;

        info!(
            penalty_id = %penalty.id,
            customer_id = %customer_id,
            salon_id = %originating_salon_id,
            amount = %amount,
            "Cancellation penalty accrued"
        );
        Ok(penalty)
    }

    /// Bulk-flip penalties to paid. Idempotent: already-paid ids are
    /// silently skipped, so a retried checkout whose penalty-clearing
    /// half already committed is a no-op, not an error.
    pub async fn settle(
        &self,
        penalty_ids: &[Uuid],
        collecting_salon_id: Option<Uuid>,
        channel: PenaltyChannel,
    ) -> AppResult<Vec<CancellationPenalty>> {
        let flipped = self
            .penalties
            .settle(penalty_ids, collecting_salon_id, channel)
            .await?;

        if !flipped.is_empty() {
            info!(
                count = flipped.len(),
                channel = %channel.as_str(),
                "Penalties settled"
            );
        }
        Ok(flipped)
    }

    /// Admin/scheduled operation: the platform has recovered this
    /// cash-collected penalty by netting it against the collecting
    /// salon's payout.
    pub async fn mark_remitted(&self, penalty_id: Uuid) -> AppResult<CancellationPenalty> {
        let penalty = self.penalties.mark_remitted(penalty_id).await?;
        info!(penalty_id = %penalty_id, "Penalty remitted to platform");
        Ok(penalty)
    }

    /// Unpaid penalties owed by a customer.
    pub async fn outstanding_for(&self, customer_id: Uuid) -> Vec<CancellationPenalty> {
        self.penalties.outstanding_for(customer_id).await
    }

    pub async fn get(&self, penalty_id: Uuid) -> AppResult<CancellationPenalty> {
        self.penalties.get(penalty_id).await.ok_or_else(|| {
            crate::shared::error::AppError::NotFound(format!("penalty {}", penalty_id))
        })
    }
}
