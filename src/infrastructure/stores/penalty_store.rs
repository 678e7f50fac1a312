//! Cancellation penalty store

use crate::domain::penalty::{CancellationPenalty, PenaltyChannel};
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use chrono::Utc;
use redis::aio::ConnectionManager;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store for cancellation penalties.
#[derive(Clone)]
pub struct PenaltyStore {
    state: Arc<RwLock<HashMap<Uuid, CancellationPenalty>>>,
    mirror: RedisMirror,
}

impl PenaltyStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            mirror: RedisMirror::new(redis),
        }
    }

    fn key(penalty_id: Uuid) -> String {
        format!("penalties:{}", penalty_id)
    }

    pub async fn insert(&self, penalty: CancellationPenalty) -> AppResult<CancellationPenalty> {
        {
            let mut state = self.state.write().await;
            if state.contains_key(&penalty.id) {
                return Err(AppError::ConcurrencyConflict(format!(
                    "penalty {} already exists",
                    penalty.id
                )));
            }
            state.insert(penalty.id, penalty.clone());
        }

        self.mirror.put(Self::key(penalty.id), &penalty).await;
        Ok(penalty)
    }

    pub async fn get(&self, penalty_id: Uuid) -> Option<CancellationPenalty> {
        self.state.read().await.get(&penalty_id).cloned()
    }

    /// Unpaid penalties owed by a customer, oldest first.
    pub async fn outstanding_for(&self, customer_id: Uuid) -> Vec<CancellationPenalty> {
        let mut penalties: Vec<CancellationPenalty> = self
            .state
            .read()
            .await
            .values()
            .filter(|p| p.customer_id == customer_id && !p.is_paid)
            .cloned()
            .collect();
        penalties.sort_by_key(|p| p.created_at);
        penalties
    }

    /// Bulk-flip penalties to paid with the given channel.
    ///
    /// Idempotent: already-paid ids are silently skipped (a retried
    /// checkout may re-settle penalties its first attempt already
    /// cleared). Returns the penalties that actually flipped.
    pub async fn settle(
        &self,
        penalty_ids: &[Uuid],
        collecting_salon_id: Option<Uuid>,
        channel: PenaltyChannel,
    ) -> AppResult<Vec<CancellationPenalty>> {
        let flipped = {
            let mut state = self.state.write().await;
            let mut flipped = Vec::new();

            for id in penalty_ids {
                let penalty = state
                    .get_mut(id)
                    .ok_or_else(|| AppError::NotFound(format!("penalty {}", id)))?;

                if penalty.is_paid {
                    continue;
                }

                penalty.is_paid = true;
                penalty.paid_via = Some(channel);
                penalty.collecting_salon_id = match channel {
                    PenaltyChannel::Cash => collecting_salon_id,
                    PenaltyChannel::Platform => None,
                };
                penalty.paid_at = Some(Utc::now());
                flipped.push(penalty.clone());
            }

            flipped
        };

        for penalty in &flipped {
            self.mirror.put(Self::key(penalty.id), penalty).await;
        }
        Ok(flipped)
    }

    /// Flip `remitted_to_platform`. Idempotent; only valid for penalties
    /// collected as cash.
    pub async fn mark_remitted(&self, penalty_id: Uuid) -> AppResult<CancellationPenalty> {
        let updated = {
            let mut state = self.state.write().await;
            let penalty = state
                .get_mut(&penalty_id)
                .ok_or_else(|| AppError::NotFound(format!("penalty {}", penalty_id)))?;

            if penalty.paid_via != Some(PenaltyChannel::Cash) {
                return Err(AppError::Validation(format!(
                    "penalty {} was not collected as cash",
                    penalty_id
                )));
            }

            penalty.remitted_to_platform = true;
            penalty.clone()
        };

        self.mirror.put(Self::key(penalty_id), &updated).await;
        Ok(updated)
    }

    /// Cash penalties a salon collected on the platform's behalf and has
    /// not yet remitted; these reduce what the platform owes that salon.
    pub async fn unremitted_cash_total(&self, salon_id: Uuid) -> Decimal {
        self.state
            .read()
            .await
            .values()
            .filter(|p| p.reduces_payout_of(salon_id))
            .map(|p| p.amount)
            .sum()
    }
}
