//! Salon payout destination models

use crate::domain::payout::PayoutDestination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a salon receives its payouts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DestinationKind {
    Bank {
        account_number: String,
        routing_code: String,
        /// Display metadata from the directory lookup; absent when the
        /// lookup was unavailable
        bank_name: Option<String>,
        branch: Option<String>,
    },
    Upi {
        vpa: String,
    },
}

/// A salon's registered payout destination.
///
/// Exactly one destination per salon is primary; setting a new primary
/// always clears the previous one first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalonBankAccount {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub holder_name: String,
    pub destination: DestinationKind,
    pub is_primary: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl SalonBankAccount {
    /// The transfer destination for the payout rail.
    pub fn payout_destination(&self) -> PayoutDestination {
        match &self.destination {
            DestinationKind::Bank {
                account_number,
                routing_code,
                ..
            } => PayoutDestination::BankAccount {
                account_number: account_number.clone(),
                routing_code: routing_code.clone(),
            },
            DestinationKind::Upi { vpa } => PayoutDestination::UpiId { vpa: vpa.clone() },
        }
    }

    /// Default payout rail for this destination kind.
    pub fn default_method(&self) -> crate::domain::payout::PayoutMethod {
        match &self.destination {
            DestinationKind::Bank { .. } => crate::domain::payout::PayoutMethod::BankTransfer,
            DestinationKind::Upi { .. } => crate::domain::payout::PayoutMethod::Upi,
        }
    }
}
