//! Configuration validation
//!
//! Cross-field checks that the derive-level validators cannot express,
//! in particular range checks on exact-decimal fields.

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult};
use rust_decimal::Decimal;
use validator::Validate;

/// Validator for the complete application configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate every configuration section.
    pub fn validate(config: &AppConfig) -> AppResult<()> {
        config.commission.validate()?;
        config.payout.validate()?;
        config.schedule.validate()?;
        config.gateway.validate()?;
        config.directory.validate()?;
        config.notifier.validate()?;
        config.redis.validate()?;
        config.logging.validate()?;

        Self::validate_fractions(config)?;
        Self::validate_payout_section(config)?;
        Self::validate_schedule_section(config)?;

        Ok(())
    }

    fn validate_fractions(config: &AppConfig) -> AppResult<()> {
        let fee = config.commission.platform_fee_percent;
        if fee <= Decimal::ZERO || fee >= Decimal::ONE {
            return Err(AppError::Config(format!(
                "commission.platform_fee_percent must be a fraction in (0, 1), got {}",
                fee
            )));
        }

        let instant = config.payout.instant_fee_percent;
        if instant < Decimal::ZERO || instant >= Decimal::ONE {
            return Err(AppError::Config(format!(
                "payout.instant_fee_percent must be a fraction in [0, 1), got {}",
                instant
            )));
        }

        Ok(())
    }

    fn validate_payout_section(config: &AppConfig) -> AppResult<()> {
        if config.payout.minimum_amount <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "payout.minimum_amount must be positive, got {}",
                config.payout.minimum_amount
            )));
        }

        Ok(())
    }

    fn validate_schedule_section(config: &AppConfig) -> AppResult<()> {
        // Weekday string must parse; to_settings performs the parse
        config
            .schedule
            .to_settings(config.payout.minimum_amount)?;

        if let Some(threshold) = config.schedule.auto_approve_threshold {
            if threshold < config.payout.minimum_amount {
                return Err(AppError::Config(format!(
                    "schedule.auto_approve_threshold ({}) is below payout.minimum_amount ({}); no scheduled request could ever auto-approve",
                    threshold, config.payout.minimum_amount
                )));
            }
        }

        if config.notifier.enabled && config.notifier.webhook_url.is_none() {
            return Err(AppError::Config(
                "notifier.enabled requires notifier.webhook_url".to_string(),
            ));
        }

        Ok(())
    }
}
