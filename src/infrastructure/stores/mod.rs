//! Persistence stores
//!
//! One store per persisted table. In-memory state guarded by tokio locks
//! is authoritative; every committed write is mirrored to Redis when a
//! connection is configured. The mirror is observational (dashboards,
//! recovery tooling) and is never read on the hot path, so each store's
//! critical section is the unit of atomicity.

pub mod bank_account_store;
pub mod payment_store;
pub mod payout_store;
pub mod penalty_store;
pub mod schedule_store;
pub mod wallet_store;

pub use bank_account_store::BankAccountStore;
pub use payment_store::PaymentStore;
pub use payout_store::PayoutStore;
pub use penalty_store::PenaltyStore;
pub use schedule_store::ScheduleStore;
pub use wallet_store::WalletStore;

use redis::{aio::ConnectionManager, AsyncCommands};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Write-through mirror shared by the stores.
///
/// A failed mirror write never rolls back the committed in-memory state;
/// it is logged and the entry is overwritten on the next write.
#[derive(Clone, Default)]
pub(crate) struct RedisMirror {
    conn: Option<Arc<ConnectionManager>>,
}

impl RedisMirror {
    pub(crate) fn new(conn: Option<Arc<ConnectionManager>>) -> Self {
        Self { conn }
    }

    pub(crate) async fn put<T: Serialize>(&self, key: String, value: &T) {
        let Some(conn) = &self.conn else {
            return;
        };

        let payload = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize mirror entry");
                return;
            }
        };

        let mut conn = (**conn).clone();
        let result: redis::RedisResult<()> = conn.set(&key, payload).await;
        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to mirror write to redis");
        }
    }
}
