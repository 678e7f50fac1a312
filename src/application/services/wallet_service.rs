//! Wallet service: stored customer credit

use std::sync::Arc;

use crate::domain::wallet::{TransactionCategory, Wallet, WalletTransaction};
use crate::infrastructure::adapters::MonitoringAdapter;
use crate::infrastructure::stores::WalletStore;
use crate::shared::error::AppResult;
use crate::shared::logging::LoggingUtils;
use crate::shared::validation::ValidationUtils;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wallet history with its derived aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletStatement {
    pub wallet: Wallet,
    pub transactions: Vec<WalletTransaction>,
}

/// Service for wallet ledger operations
pub struct WalletService {
    wallets: WalletStore,
    monitoring: Arc<MonitoringAdapter>,
}

impl WalletService {
    pub fn new(wallets: WalletStore, monitoring: Arc<MonitoringAdapter>) -> Self {
        Self { wallets, monitoring }
    }

    /// Debit stored credit. Rejects with `InsufficientBalance` when the
    /// wallet cannot cover the amount; the check and the ledger append
    /// are atomic, so no intermediate negative balance is ever visible.
    pub async fn debit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        category: TransactionCategory,
        booking_id: Option<Uuid>,
    ) -> AppResult<WalletTransaction> {
        ValidationUtils::validate_amount(amount, "debit amount")?;

        let (wallet, tx) = self
            .wallets
            .apply_debit(wallet_id, amount, category, booking_id)
            .await?;

        self.monitoring.record_wallet_debit();
        LoggingUtils::log_wallet_movement(wallet_id, tx.kind.as_str(), amount, wallet.balance);
        Ok(tx)
    }

    /// Credit stored value; always succeeds.
    pub async fn credit(
        &self,
        wallet_id: Uuid,
        amount: Decimal,
        category: TransactionCategory,
        booking_id: Option<Uuid>,
    ) -> AppResult<WalletTransaction> {
        ValidationUtils::validate_amount(amount, "credit amount")?;

        let (wallet, tx) = self
            .wallets
            .apply_credit(wallet_id, amount, category, booking_id)
            .await?;

        self.monitoring.record_wallet_credit();
        LoggingUtils::log_wallet_movement(wallet_id, tx.kind.as_str(), amount, wallet.balance);
        Ok(tx)
    }

    pub async fn balance(&self, wallet_id: Uuid) -> Decimal {
        self.wallets
            .get(wallet_id)
            .await
            .map(|w| w.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Full history plus the derived aggregate for one wallet.
    pub async fn statement(&self, wallet_id: Uuid) -> WalletStatement {
        let transactions = self.wallets.transactions_for(wallet_id).await;
        let wallet = self
            .wallets
            .get(wallet_id)
            .await
            .unwrap_or_else(|| Wallet::new(wallet_id));
        WalletStatement {
            wallet,
            transactions,
        }
    }
}
