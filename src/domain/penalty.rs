//! Cancellation penalty domain models
//!
//! A penalty is a debt owed by a customer for a cancellation. It is
//! collected either by the platform directly (bundled into an online
//! charge) or in cash by a salon on the platform's behalf; cash-collected
//! penalties remain owed to the platform until remitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel through which a penalty was collected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyChannel {
    Platform,
    Cash,
}

impl PenaltyChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyChannel::Platform => "platform",
            PenaltyChannel::Cash => "cash",
        }
    }
}

/// One cancellation penalty event.
///
/// Created unpaid at cancellation time; flips to paid exactly once,
/// atomically with the payment that cleared it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationPenalty {
    pub id: Uuid,
    /// Customer who owes the penalty
    pub customer_id: Uuid,
    pub amount: Decimal,
    /// Salon whose cancellation policy produced the penalty
    pub originating_salon_id: Uuid,
    /// Set only when the customer paid in cash at some salon's counter;
    /// may differ from the originating salon
    pub collecting_salon_id: Option<Uuid>,
    pub is_paid: bool,
    pub paid_via: Option<PenaltyChannel>,
    /// Relevant only for cash collection: whether the platform has
    /// recovered the amount by netting it against the collecting salon's
    /// payout
    pub remitted_to_platform: bool,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl CancellationPenalty {
    pub fn new(customer_id: Uuid, originating_salon_id: Uuid, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            amount,
            originating_salon_id,
            collecting_salon_id: None,
            is_paid: false,
            paid_via: None,
            remitted_to_platform: false,
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    /// Whether this penalty currently reduces what the platform owes the
    /// collecting salon.
    pub fn reduces_payout_of(&self, salon_id: Uuid) -> bool {
        self.is_paid
            && self.paid_via == Some(PenaltyChannel::Cash)
            && self.collecting_salon_id == Some(salon_id)
            && !self.remitted_to_platform
    }
}
