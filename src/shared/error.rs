//! Error handling module
//!
//! This module provides centralized error handling for the settlement
//! and payout engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured gateway decline details.
///
/// Carried on both [`AppError::GatewayDeclined`] and
/// [`AppError::PartialFailure`] so callers can render a detailed failure
/// banner and decide on bounded retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDecline {
    /// Machine-readable decline code from the authorization service
    pub code: String,

    /// Human-readable reason
    pub reason: String,

    /// Which collaborator reported the failure (e.g. "gateway", "transport")
    pub source: String,

    /// Step of the authorization flow that failed (e.g. "authorize", "capture")
    pub step: String,

    /// Whether the caller may retry this attempt
    pub retryable: bool,
}

impl std::fmt::Display for GatewayDecline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}/{}: {} (retryable: {})",
            self.code, self.source, self.step, self.reason, self.retryable
        )
    }
}

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Payment authorization declined: {0}")]
    GatewayDeclined(GatewayDecline),

    #[error("Partial failure: wallet debited {wallet_debited} but gateway declined: {decline}; manual reconciliation required")]
    PartialFailure {
        wallet_debited: Decimal,
        decline: GatewayDecline,
    },

    #[error("Concurrent update conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the caller may retry the failed operation.
    ///
    /// Only gateway declines explicitly flagged retryable and lost balance
    /// races qualify; anything touching money that cannot be proven
    /// idempotent is surfaced rather than retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::GatewayDeclined(decline) => decline.retryable,
            AppError::ConcurrencyConflict(_) => true,
            _ => false,
        }
    }

    /// Whether this error requires manual reconciliation before retry.
    pub fn requires_reconciliation(&self) -> bool {
        matches!(self, AppError::PartialFailure { .. })
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
