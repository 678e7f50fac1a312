//! Payment authorization service adapter
//!
//! The engine treats the gateway as an opaque collaborator: it asks for
//! an authorization and receives a success or a structured decline. Any
//! non-success is final for that attempt; retry policy belongs to the
//! caller. Only transport-level failures are retried here, with a
//! bounded attempt count.

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult, GatewayDecline};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Request to charge a payer
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationRequest {
    pub amount: Decimal,
    pub payer_ref: Uuid,
    pub booking_id: Uuid,
}

/// Successful authorization
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayAuthorization {
    /// Gateway-side reference for the captured charge
    pub payment_ref: String,
}

/// Wire shape of the gateway's response
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    success: bool,
    payment_id: Option<String>,
    error_code: Option<String>,
    error_reason: Option<String>,
    #[serde(default)]
    retryable: bool,
}

/// Contract boundary with the external payment authorization service
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(&self, request: &AuthorizationRequest) -> AppResult<GatewayAuthorization>;
}

/// HTTP implementation of the payment gateway contract
pub struct HttpPaymentGateway {
    config: Arc<AppConfig>,
}

impl HttpPaymentGateway {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn client(&self) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.gateway.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn authorize(&self, request: &AuthorizationRequest) -> AppResult<GatewayAuthorization> {
        info!(
            booking_id = %request.booking_id,
            amount = %request.amount,
            "Requesting payment authorization"
        );

        let client = self.client()?;

        let mut last_error = None;
        for attempt in 0..=self.config.gateway.max_retries {
            match client
                .post(&self.config.gateway.base_url)
                .json(request)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    let body: GatewayResponse = response.json().await.map_err(|e| {
                        AppError::Internal(format!("invalid gateway response: {}", e))
                    })?;

                    if body.success {
                        let payment_ref = body.payment_id.ok_or_else(|| {
                            AppError::Internal("gateway success without payment id".to_string())
                        })?;
                        return Ok(GatewayAuthorization { payment_ref });
                    }

                    // A decline is final for this attempt; never retried here
                    return Err(AppError::GatewayDeclined(GatewayDecline {
                        code: body.error_code.unwrap_or_else(|| "declined".to_string()),
                        reason: body
                            .error_reason
                            .unwrap_or_else(|| "authorization declined".to_string()),
                        source: "gateway".to_string(),
                        step: "authorize".to_string(),
                        retryable: body.retryable,
                    }));
                }
                Ok(response) => {
                    last_error = Some(format!("HTTP error: {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(format!("Request failed: {}", e));
                }
            }

            if attempt < self.config.gateway.max_retries {
                info!(
                    attempt = attempt + 1,
                    "Gateway transport failure, retrying"
                );
                tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt + 1))).await;
            }
        }

        Err(AppError::GatewayDeclined(GatewayDecline {
            code: "transport_failure".to_string(),
            reason: format!(
                "gateway unreachable after {} attempts: {:?}",
                self.config.gateway.max_retries + 1,
                last_error
            ),
            source: "transport".to_string(),
            step: "authorize".to_string(),
            retryable: true,
        }))
    }
}
