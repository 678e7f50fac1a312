//! Payment domain models and types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported payment methods for a booking charge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    Wallet,
    CashAtSalon,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::CashAtSalon => "cash_at_salon",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "wallet" => Ok(PaymentMethod::Wallet),
            "cash_at_salon" | "cash" => Ok(PaymentMethod::CashAtSalon),
            _ => Err(format!("unsupported payment method: {}", s)),
        }
    }
}

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Authorized,
    Captured,
    Settled,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Settled => "settled",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Breakdown of a gross charge that bundles a cancellation penalty
/// alongside the service amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentBreakdown {
    pub service_amount: Decimal,
    pub penalty_amount: Decimal,
}

/// A captured booking charge and its platform/salon split.
///
/// Immutable history: the only legal mutation after creation is the
/// `Captured -> Settled` status transition. Rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub payer_id: Uuid,
    pub salon_id: Uuid,
    pub gross_amount: Decimal,
    pub platform_fee: Decimal,
    pub salon_amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    /// Present when the charge bundles a cancellation penalty
    pub breakdown: Option<PaymentBreakdown>,
    /// Wallet credit applied against the gross amount, if any
    pub wallet_amount: Decimal,
    /// Gateway reference for online charges
    pub gateway_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Money conservation invariant: the platform fee and the salon share
    /// always partition the gross amount exactly.
    pub fn is_balanced(&self) -> bool {
        self.salon_amount + self.platform_fee == self.gross_amount
    }

    /// Whether this payment accrues payable balance for the salon.
    ///
    /// Cash bookings never do: the salon already holds that money in its
    /// till, so only the embedded penalty (platform revenue) has any
    /// later payout effect.
    pub fn accrues_payout_balance(&self) -> bool {
        matches!(self.status, PaymentStatus::Captured | PaymentStatus::Settled)
            && self.method != PaymentMethod::CashAtSalon
    }
}
