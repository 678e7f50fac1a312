//! Application configuration structures
//!
//! This module contains the main configuration structures for the
//! settlement and payout engine.

use crate::domain::schedule::PayoutScheduleSettings;
use chrono::Weekday;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Revenue split configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommissionConfig {
    /// Platform share of the service amount on online bookings,
    /// as a fraction (0.08 = 8%). Cash bookings carry no platform fee.
    pub platform_fee_percent: Decimal,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            platform_fee_percent: dec!(0.08),
        }
    }
}

/// Payout validation and fee configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PayoutConfig {
    /// Smallest amount a payout request may carry
    pub minimum_amount: Decimal,

    /// Convenience fee on instant rails, as a fraction (0.01 = 1%)
    pub instant_fee_percent: Decimal,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            minimum_amount: dec!(100),
            instant_fee_percent: dec!(0.01),
        }
    }
}

/// Scheduled payout sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleConfig {
    /// Enable the automatic sweep
    pub enabled: bool,

    /// Day of week the sweep runs, e.g. "monday"
    #[validate(length(min = 3))]
    pub run_weekday: String,

    /// Hour of day the sweep runs, UTC
    #[validate(range(min = 0, max = 23))]
    pub run_hour: u32,

    /// Requests at or below this are approved without manual review;
    /// absent means every scheduled request waits for an admin
    pub auto_approve_threshold: Option<Decimal>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            run_weekday: "monday".to_string(),
            run_hour: 6,
            auto_approve_threshold: Some(dec!(5000)),
        }
    }
}

impl ScheduleConfig {
    /// Materialize the schedule singleton from configuration.
    pub fn to_settings(&self, minimum_payout_amount: Decimal) -> crate::Result<PayoutScheduleSettings> {
        let run_weekday: Weekday = self.run_weekday.parse().map_err(|_| {
            crate::shared::error::AppError::Config(format!(
                "invalid schedule weekday: {}",
                self.run_weekday
            ))
        })?;

        Ok(PayoutScheduleSettings {
            enabled: self.enabled,
            run_weekday,
            run_hour: self.run_hour,
            minimum_payout_amount,
            auto_approve_threshold: self.auto_approve_threshold,
            last_run_at: None,
            next_run_at: None,
        })
    }
}

/// Payment authorization service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    /// Authorization endpoint
    #[validate(url)]
    pub base_url: String,

    /// Connection timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,

    /// Maximum transport-level retry attempts (a decline is never retried)
    #[validate(range(min = 0, max = 10))]
    pub max_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9080/authorize".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
        }
    }
}

/// Bank/UPI directory lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DirectoryConfig {
    pub enabled: bool,

    /// Directory endpoint; the routing code is appended as a path segment
    #[validate(url)]
    pub base_url: String,

    #[validate(range(min = 1, max = 60))]
    pub timeout_seconds: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://127.0.0.1:9081/branches".to_string(),
            timeout_seconds: 5,
        }
    }
}

/// Notification dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotifierConfig {
    pub enabled: bool,

    /// Webhook receiving payout lifecycle events
    pub webhook_url: Option<String>,

    #[validate(range(min = 1, max = 60))]
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: None,
            timeout_seconds: 5,
        }
    }
}

/// Persistence mirror configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RedisConfig {
    /// Mirror writes to Redis; the in-memory state stays authoritative
    pub enabled: bool,

    #[validate(url)]
    pub redis_url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Revenue split configuration
    pub commission: CommissionConfig,

    /// Payout validation and fees
    pub payout: PayoutConfig,

    /// Scheduled sweep configuration
    pub schedule: ScheduleConfig,

    /// Payment authorization service
    pub gateway: GatewayConfig,

    /// Bank directory lookup
    pub directory: DirectoryConfig,

    /// Notification dispatcher
    pub notifier: NotifierConfig,

    /// Persistence mirror
    pub redis: RedisConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            commission: CommissionConfig::default(),
            payout: PayoutConfig::default(),
            schedule: ScheduleConfig::default(),
            gateway: GatewayConfig::default(),
            directory: DirectoryConfig::default(),
            notifier: NotifierConfig::default(),
            redis: RedisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(config::Environment::with_prefix("SALON_SETTLEMENT").separator("__"))
            .build()
            .map_err(|e| {
                crate::shared::error::AppError::Config(format!(
                    "Failed to build configuration: {}",
                    e
                ))
            })?;

        let config: AppConfig = config.try_deserialize().map_err(|e| {
            crate::shared::error::AppError::Config(format!(
                "Failed to deserialize configuration: {}",
                e
            ))
        })?;

        crate::config::ConfigValidator::validate(&config)?;

        Ok(config)
    }
}
