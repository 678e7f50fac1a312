//! Payout domain models and lifecycle state machine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payout rail selected for a transfer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethod {
    BankTransfer,
    Upi,
    InstantUpi,
}

impl PayoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::BankTransfer => "bank_transfer",
            PayoutMethod::Upi => "upi",
            PayoutMethod::InstantUpi => "instant_upi",
        }
    }

    /// Instant rails deduct a convenience fee from the disbursed amount.
    pub fn charges_fee(&self) -> bool {
        matches!(self, PayoutMethod::InstantUpi)
    }
}

impl std::str::FromStr for PayoutMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bank_transfer" => Ok(PayoutMethod::BankTransfer),
            "upi" => Ok(PayoutMethod::Upi),
            "instant_upi" => Ok(PayoutMethod::InstantUpi),
            _ => Err(format!("unsupported payout method: {}", s)),
        }
    }
}

/// Payout request lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Failed => "failed",
        }
    }

    /// Valid next states from the current state.
    pub fn valid_transitions(self) -> &'static [PayoutStatus] {
        match self {
            PayoutStatus::Pending => &[PayoutStatus::Processing, PayoutStatus::Failed],
            PayoutStatus::Processing => &[PayoutStatus::Completed, PayoutStatus::Failed],
            // Terminal states: a failed or completed payout is never resurrected
            PayoutStatus::Completed => &[],
            PayoutStatus::Failed => &[],
        }
    }

    pub fn can_transition(self, to: PayoutStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Statuses that hold earnings back from the available balance as an
    /// outstanding request.
    pub fn holds_balance(self) -> bool {
        matches!(self, PayoutStatus::Pending | PayoutStatus::Processing)
    }
}

/// Destination for a payout transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PayoutDestination {
    BankAccount {
        account_number: String,
        routing_code: String,
    },
    UpiId {
        vpa: String,
    },
}

/// One payout attempt for a salon.
///
/// `amount` is the gross ledger obligation discharged by this payout;
/// for instant rails the convenience fee and the net figure actually
/// disbursed are recorded separately so the balance calculator always
/// reconciles against gross earnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalonPayout {
    pub id: Uuid,
    pub salon_id: Uuid,
    /// Gross requested amount; the ledger-affecting quantity
    pub amount: Decimal,
    pub fee_charged: Decimal,
    pub net_disbursed: Decimal,
    pub status: PayoutStatus,
    pub method: PayoutMethod,
    pub destination: PayoutDestination,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl SalonPayout {
    /// Fee invariant: net disbursed plus fee always equals the gross
    /// obligation.
    pub fn is_balanced(&self) -> bool {
        self.net_disbursed + self.fee_charged == self.amount
    }
}
