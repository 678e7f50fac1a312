//! Payment store: immutable capture history

use crate::domain::payment::{Payment, PaymentStatus};
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use redis::aio::ConnectionManager;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct PaymentState {
    payments: HashMap<Uuid, Payment>,
    /// Capture is idempotent by booking; this index backs the no-op check
    by_booking: HashMap<Uuid, Uuid>,
}

/// Store for captured payments.
///
/// Rows are immutable history: the only supported mutation is the
/// `Captured -> Settled` status transition, and rows are never deleted.
#[derive(Clone)]
pub struct PaymentStore {
    state: Arc<RwLock<PaymentState>>,
    mirror: RedisMirror,
}

impl PaymentStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(PaymentState::default())),
            mirror: RedisMirror::new(redis),
        }
    }

    fn key(payment_id: Uuid) -> String {
        format!("payments:{}", payment_id)
    }

    /// Insert a captured payment. Rejects a second capture for the same
    /// booking; callers treat that as the idempotent no-op signal.
    pub async fn insert(&self, payment: Payment) -> AppResult<Payment> {
        if !payment.is_balanced() {
            return Err(AppError::Internal(format!(
                "unbalanced payment rejected: gross {} != fee {} + salon {}",
                payment.gross_amount, payment.platform_fee, payment.salon_amount
            )));
        }

        {
            let mut state = self.state.write().await;
            if state.by_booking.contains_key(&payment.booking_id) {
                return Err(AppError::ConcurrencyConflict(format!(
                    "booking {} already captured",
                    payment.booking_id
                )));
            }
            state.by_booking.insert(payment.booking_id, payment.id);
            state.payments.insert(payment.id, payment.clone());
        }

        self.mirror.put(Self::key(payment.id), &payment).await;
        Ok(payment)
    }

    pub async fn get(&self, payment_id: Uuid) -> Option<Payment> {
        self.state.read().await.payments.get(&payment_id).cloned()
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Option<Payment> {
        let state = self.state.read().await;
        state
            .by_booking
            .get(&booking_id)
            .and_then(|id| state.payments.get(id))
            .cloned()
    }

    /// Conditional status transition; the only legal move is
    /// `Captured -> Settled`, exactly once.
    pub async fn mark_settled(&self, payment_id: Uuid) -> AppResult<Payment> {
        let updated = {
            let mut state = self.state.write().await;
            let payment = state
                .payments
                .get_mut(&payment_id)
                .ok_or_else(|| AppError::NotFound(format!("payment {}", payment_id)))?;

            match payment.status {
                PaymentStatus::Captured => {
                    payment.status = PaymentStatus::Settled;
                    payment.clone()
                }
                PaymentStatus::Settled => {
                    return Err(AppError::ConcurrencyConflict(format!(
                        "payment {} already settled",
                        payment_id
                    )))
                }
                other => {
                    return Err(AppError::Validation(format!(
                        "payment {} cannot settle from status {}",
                        payment_id,
                        other.as_str()
                    )))
                }
            }
        };

        self.mirror.put(Self::key(payment_id), &updated).await;
        Ok(updated)
    }

    /// Lifetime payable earnings for a salon: sum of the salon share
    /// over captured and settled payments, excluding cash bookings the
    /// salon already holds in its till.
    pub async fn total_earned(&self, salon_id: Uuid) -> Decimal {
        self.state
            .read()
            .await
            .payments
            .values()
            .filter(|p| p.salon_id == salon_id && p.accrues_payout_balance())
            .map(|p| p.salon_amount)
            .sum()
    }

    pub async fn list_for_salon(&self, salon_id: Uuid) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .state
            .read()
            .await
            .payments
            .values()
            .filter(|p| p.salon_id == salon_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.created_at);
        payments
    }

    /// Every salon with at least one balance-accruing payment. Drives
    /// the scheduler sweep.
    pub async fn earning_salons(&self) -> Vec<Uuid> {
        let state = self.state.read().await;
        let mut salons: Vec<Uuid> = state
            .payments
            .values()
            .filter(|p| p.accrues_payout_balance())
            .map(|p| p.salon_id)
            .collect();
        salons.sort();
        salons.dedup();
        salons
    }
}
