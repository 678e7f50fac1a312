//! Bank/UPI directory lookup adapter
//!
//! Resolves a routing code to display metadata. The lookup never blocks
//! a payout decision: any failure degrades to "unverified display name"
//! rather than a rejected request.

use crate::config::AppConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Directory record for a routing code
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRecord {
    pub bank_name: String,
    pub branch: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Contract boundary with the external bank directory
#[async_trait]
pub trait BankDirectory: Send + Sync {
    /// `None` means the code was invalid or the directory was
    /// unavailable; callers keep the destination unverified either way.
    async fn resolve(&self, routing_code: &str) -> Option<BranchRecord>;
}

/// HTTP implementation of the directory lookup
pub struct HttpBankDirectory {
    config: Arc<AppConfig>,
}

impl HttpBankDirectory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BankDirectory for HttpBankDirectory {
    async fn resolve(&self, routing_code: &str) -> Option<BranchRecord> {
        if !self.config.directory.enabled {
            return None;
        }

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.directory.timeout_seconds))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to create directory HTTP client");
                return None;
            }
        };

        let url = format!(
            "{}/{}",
            self.config.directory.base_url.trim_end_matches('/'),
            routing_code
        );

        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<BranchRecord>().await {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(routing_code = %routing_code, error = %e, "Invalid directory response");
                        None
                    }
                }
            }
            Ok(response) => {
                warn!(
                    routing_code = %routing_code,
                    status = %response.status(),
                    "Directory lookup failed"
                );
                None
            }
            Err(e) => {
                warn!(routing_code = %routing_code, error = %e, "Directory unreachable");
                None
            }
        }
    }
}
