//! Wallet store: append-only transaction ledger plus derived aggregates
//!
//! The aggregate counters are updated inside the same write-lock section
//! as the transaction append, so no reader ever observes a balance that
//! disagrees with the ledger or a negative balance.

use crate::domain::wallet::{TransactionCategory, TransactionKind, Wallet, WalletTransaction};
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use chrono::Utc;
use redis::aio::ConnectionManager;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct WalletState {
    wallets: HashMap<Uuid, Wallet>,
    transactions: Vec<WalletTransaction>,
}

/// Store for customer wallets.
#[derive(Clone)]
pub struct WalletStore {
    state: Arc<RwLock<WalletState>>,
    mirror: RedisMirror,
}

impl WalletStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(WalletState::default())),
            mirror: RedisMirror::new(redis),
        }
    }

    fn key(wallet_id: Uuid) -> String {
        format!("wallets:{}", wallet_id)
    }

    /// Atomic debit: the balance check and the ledger append happen in
    /// one critical section, so two concurrent debits cannot both pass
    /// the check against a stale read.
    pub async fn apply_debit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        category: TransactionCategory,
        booking_id: Option<Uuid>,
    ) -> AppResult<(Wallet, WalletTransaction)> {
        let (wallet, tx) = {
            let mut state = self.state.write().await;
            let wallet = state.wallets.entry(wallet_id).or_insert_with(|| Wallet::new(wallet_id));

            if amount > wallet.balance {
                return Err(AppError::InsufficientBalance {
                    requested: amount,
                    available: wallet.balance,
                });
            }

            wallet.balance -= amount;
            wallet.total_spent += amount;
            wallet.updated_at = Utc::now();
            let wallet = wallet.clone();

            let tx = WalletTransaction {
                id: Uuid::new_v4(),
                wallet_id,
                amount,
                kind: TransactionKind::Debit,
                category,
                booking_id,
                created_at: Utc::now(),
            };
            state.transactions.push(tx.clone());

            (wallet, tx)
        };

        self.mirror.put(Self::key(wallet_id), &wallet).await;
        Ok((wallet, tx))
    }

    /// Credit always succeeds; appends the transaction and bumps the
    /// aggregate in the same critical section.
    pub async fn apply_credit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        category: TransactionCategory,
        booking_id: Option<Uuid>,
    ) -> AppResult<(Wallet, WalletTransaction)> {
        let (wallet, tx) = {
            let mut state = self.state.write().await;
            let wallet = state.wallets.entry(wallet_id).or_insert_with(|| Wallet::new(wallet_id));

            wallet.balance += amount;
            wallet.total_earned += amount;
            wallet.updated_at = Utc::now();
            let wallet = wallet.clone();

            let tx = WalletTransaction {
                id: Uuid::new_v4(),
                wallet_id,
                amount,
                kind: TransactionKind::Credit,
                category,
                booking_id,
                created_at: Utc::now(),
            };
            state.transactions.push(tx.clone());

            (wallet, tx)
        };

        self.mirror.put(Self::key(wallet_id), &wallet).await;
        Ok((wallet, tx))
    }

    pub async fn get(&self, wallet_id: Uuid) -> Option<Wallet> {
        self.state.read().await.wallets.get(&wallet_id).cloned()
    }

    pub async fn transactions_for(&self, wallet_id: Uuid) -> Vec<WalletTransaction> {
        self.state
            .read()
            .await
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id)
            .cloned()
            .collect()
    }
}
