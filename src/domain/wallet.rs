//! Wallet domain models: stored customer credit and its append-only ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a wallet ledger movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

/// Business category of a wallet movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    BookingPayment,
    BookingDiscount,
    ReferralReward,
    Refund,
    Adjustment,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::BookingPayment => "booking_payment",
            TransactionCategory::BookingDiscount => "booking_discount",
            TransactionCategory::ReferralReward => "referral_reward",
            TransactionCategory::Refund => "refund",
            TransactionCategory::Adjustment => "adjustment",
        }
    }
}

/// Append-only wallet ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    /// Originating booking, when the movement is booking-related
    pub booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Derived wallet aggregate, maintained in the same critical section as
/// every transaction append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub balance: Decimal,
    pub total_earned: Decimal,
    pub total_spent: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            balance: Decimal::ZERO,
            total_earned: Decimal::ZERO,
            total_spent: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Aggregate invariant: balance equals lifetime credits minus debits
    /// and never goes negative.
    pub fn is_consistent(&self) -> bool {
        self.balance == self.total_earned - self.total_spent && self.balance >= Decimal::ZERO
    }

    /// Recompute the aggregate from its source rows. Used to prove the
    /// running counters against the append-only ledger.
    pub fn recompute_from(id: Uuid, transactions: &[WalletTransaction]) -> Self {
        let mut wallet = Wallet::new(id);
        for tx in transactions.iter().filter(|t| t.wallet_id == id) {
            match tx.kind {
                TransactionKind::Credit => wallet.total_earned += tx.amount,
                TransactionKind::Debit => wallet.total_spent += tx.amount,
            }
        }
        wallet.balance = wallet.total_earned - wallet.total_spent;
        wallet
    }
}
