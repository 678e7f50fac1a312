//! Payout store: payout rows, balance aggregates, and the per-salon
//! request lock

use crate::domain::payout::{PayoutStatus, SalonPayout};
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use chrono::Utc;
use redis::aio::ConnectionManager;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Completed and outstanding payout totals for one salon
#[derive(Debug, Clone, Copy, Default)]
pub struct PayoutTotals {
    /// Gross obligation discharged by completed payouts
    pub completed: Decimal,
    /// Gross amount held by pending/processing requests
    pub outstanding: Decimal,
}

/// Store for salon payouts.
///
/// Also owns the per-salon request mutex: a payout request's balance
/// check and insert must happen under the same guard, otherwise two
/// concurrent requests can jointly overdraw a salon's balance.
#[derive(Clone)]
pub struct PayoutStore {
    state: Arc<RwLock<HashMap<Uuid, SalonPayout>>>,
    request_locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
    mirror: RedisMirror,
}

impl PayoutStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            request_locks: Arc::new(Mutex::new(HashMap::new())),
            mirror: RedisMirror::new(redis),
        }
    }

    fn key(payout_id: Uuid) -> String {
        format!("salon_payouts:{}", payout_id)
    }

    /// Guard serializing payout-request creation for one salon.
    pub async fn request_guard(&self, salon_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.request_locks.lock().await;
        locks
            .entry(salon_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn insert(&self, payout: SalonPayout) -> AppResult<SalonPayout> {
        if !payout.is_balanced() {
            return Err(AppError::Internal(format!(
                "unbalanced payout rejected: gross {} != net {} + fee {}",
                payout.amount, payout.net_disbursed, payout.fee_charged
            )));
        }

        {
            let mut state = self.state.write().await;
            if state.contains_key(&payout.id) {
                return Err(AppError::ConcurrencyConflict(format!(
                    "payout {} already exists",
                    payout.id
                )));
            }
            state.insert(payout.id, payout.clone());
        }

        self.mirror.put(Self::key(payout.id), &payout).await;
        Ok(payout)
    }

    pub async fn get(&self, payout_id: Uuid) -> Option<SalonPayout> {
        self.state.read().await.get(&payout_id).cloned()
    }

    /// Conditional state transition.
    ///
    /// The legal-move check runs against the current row inside the write
    /// lock, so a terminal state can never be left twice. When
    /// `expected_from` is given, a row that has moved on since the caller
    /// read it surfaces as `ConcurrencyConflict` instead of silently
    /// transitioning from the newer state.
    pub async fn transition(
        &self,
        payout_id: Uuid,
        expected_from: Option<PayoutStatus>,
        to: PayoutStatus,
        note: Option<String>,
    ) -> AppResult<SalonPayout> {
        let updated = {
            let mut state = self.state.write().await;
            let payout = state
                .get_mut(&payout_id)
                .ok_or_else(|| AppError::NotFound(format!("payout {}", payout_id)))?;

            if let Some(expected) = expected_from {
                if payout.status != expected {
                    return Err(AppError::ConcurrencyConflict(format!(
                        "payout {} is {} but transition expected {}",
                        payout_id,
                        payout.status.as_str(),
                        expected.as_str()
                    )));
                }
            }

            if !payout.status.can_transition(to) {
                if payout.status.is_terminal() {
                    return Err(AppError::ConcurrencyConflict(format!(
                        "payout {} already terminal in {}",
                        payout_id,
                        payout.status.as_str()
                    )));
                }
                return Err(AppError::Validation(format!(
                    "payout {} cannot move {} -> {}",
                    payout_id,
                    payout.status.as_str(),
                    to.as_str()
                )));
            }

            payout.status = to;
            if to.is_terminal() || to == PayoutStatus::Processing {
                payout.processed_at = Some(Utc::now());
            }
            if let Some(note) = note {
                payout.note = Some(note);
            }
            payout.clone()
        };

        self.mirror.put(Self::key(payout_id), &updated).await;
        Ok(updated)
    }

    /// Balance aggregates for one salon, read in a single lock
    /// acquisition so completed and outstanding figures are coherent.
    pub async fn totals_for(&self, salon_id: Uuid) -> PayoutTotals {
        let state = self.state.read().await;
        let mut totals = PayoutTotals::default();
        for payout in state.values().filter(|p| p.salon_id == salon_id) {
            match payout.status {
                PayoutStatus::Completed => totals.completed += payout.amount,
                status if status.holds_balance() => totals.outstanding += payout.amount,
                _ => {}
            }
        }
        totals
    }

    pub async fn list_for_salon(&self, salon_id: Uuid) -> Vec<SalonPayout> {
        let mut payouts: Vec<SalonPayout> = self
            .state
            .read()
            .await
            .values()
            .filter(|p| p.salon_id == salon_id)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        payouts
    }

    /// Requests awaiting manual review, oldest first.
    pub async fn pending(&self) -> Vec<SalonPayout> {
        let mut payouts: Vec<SalonPayout> = self
            .state
            .read()
            .await
            .values()
            .filter(|p| p.status == PayoutStatus::Pending)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        payouts
    }
}
