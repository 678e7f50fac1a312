//! Logging utilities module
//!
//! This module provides centralized logging functionality and utilities.

use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            crate::shared::error::AppError::Internal(format!("Failed to initialize logging: {}", e))
        })?;

        Ok(())
    }

    /// Log a captured payment with its split
    pub fn log_capture(
        payment_id: Uuid,
        booking_id: Uuid,
        salon_id: Uuid,
        gross: Decimal,
        platform_fee: Decimal,
        salon_amount: Decimal,
    ) {
        info!(
            payment_id = %payment_id,
            booking_id = %booking_id,
            salon_id = %salon_id,
            gross = %gross,
            platform_fee = %platform_fee,
            salon_amount = %salon_amount,
            "Payment captured"
        );
    }

    /// Log a wallet ledger movement
    pub fn log_wallet_movement(wallet_id: Uuid, kind: &str, amount: Decimal, balance: Decimal) {
        info!(
            wallet_id = %wallet_id,
            kind = %kind,
            amount = %amount,
            balance = %balance,
            "Wallet ledger movement"
        );
    }

    /// Log a payout status transition
    pub fn log_payout_transition(payout_id: Uuid, salon_id: Uuid, from: &str, to: &str) {
        info!(
            payout_id = %payout_id,
            salon_id = %salon_id,
            from = %from,
            to = %to,
            "Payout status transition"
        );
    }

    /// Log a condition that needs manual reconciliation
    pub fn log_reconciliation_required(booking_id: Uuid, wallet_debited: Decimal, reason: &str) {
        error!(
            booking_id = %booking_id,
            wallet_debited = %wallet_debited,
            reason = %reason,
            "PARTIAL FAILURE: manual reconciliation required"
        );
    }

    /// Log a balance race lost by a caller
    pub fn log_balance_conflict(salon_id: Uuid, requested: Decimal, available: Decimal) {
        warn!(
            salon_id = %salon_id,
            requested = %requested,
            available = %available,
            "Payout request rejected: balance race or overdraw"
        );
    }
}
