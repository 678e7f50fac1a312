//! Notification dispatcher adapter
//!
//! Fire-and-forget delivery of payout lifecycle events. A dispatch
//! failure is logged and swallowed; it never rolls back the state
//! transition that produced the event.

use crate::config::AppConfig;
use crate::domain::payout::PayoutStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Payout lifecycle event delivered to the salon-facing notification
/// channel
#[derive(Debug, Clone, Serialize)]
pub struct PayoutEvent {
    pub payout_id: Uuid,
    pub salon_id: Uuid,
    pub status: PayoutStatus,
    pub amount: Decimal,
    pub net_disbursed: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Contract boundary with the notification channel
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, event: PayoutEvent);
}

/// Webhook implementation of the notification dispatcher
pub struct WebhookNotifier {
    config: Arc<AppConfig>,
}

impl WebhookNotifier {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookNotifier {
    async fn notify(&self, event: PayoutEvent) {
        let Some(url) = self
            .config
            .notifier
            .enabled
            .then(|| self.config.notifier.webhook_url.clone())
            .flatten()
        else {
            debug!(
                payout_id = %event.payout_id,
                status = %event.status.as_str(),
                "Notifier disabled, dropping payout event"
            );
            return;
        };

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.notifier.timeout_seconds))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to create notifier HTTP client");
                return;
            }
        };

        match client.post(&url).json(&event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(
                    payout_id = %event.payout_id,
                    status = %event.status.as_str(),
                    "Payout event delivered"
                );
            }
            Ok(response) => {
                warn!(
                    payout_id = %event.payout_id,
                    status = %response.status(),
                    "Payout event rejected by webhook"
                );
            }
            Err(e) => {
                warn!(
                    payout_id = %event.payout_id,
                    error = %e,
                    "Payout event delivery failed"
                );
            }
        }
    }
}
