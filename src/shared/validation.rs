//! Validation utilities module
//!
//! This module provides common validation functionality used across the
//! settlement and payout engine.

use crate::shared::error::AppError;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

fn upi_vpa_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]{2,256}@[A-Za-z]{2,64}$").expect("valid VPA regex"))
}

fn routing_code_regex() -> &'static Regex {
    // IFSC shape: 4 letters, a literal zero, 6 alphanumerics
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid routing code regex"))
}

/// Validation utilities for the application
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate a monetary amount: strictly positive with at most two
    /// decimal places.
    pub fn validate_amount(amount: Decimal, field: &str) -> crate::Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "{} must be positive, got {}",
                field, amount
            )));
        }

        if amount.scale() > 2 {
            return Err(AppError::Validation(format!(
                "{} has more than two decimal places: {}",
                field, amount
            )));
        }

        Ok(())
    }

    /// Validate a non-negative monetary amount (zero allowed).
    pub fn validate_non_negative(amount: Decimal, field: &str) -> crate::Result<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "{} cannot be negative, got {}",
                field, amount
            )));
        }

        Ok(())
    }

    /// Validate a UPI virtual payment address (e.g. "name@bank").
    pub fn validate_upi_vpa(vpa: &str) -> crate::Result<()> {
        if !upi_vpa_regex().is_match(vpa) {
            return Err(AppError::Validation(format!("invalid UPI id: {}", vpa)));
        }

        Ok(())
    }

    /// Validate a bank routing code (IFSC shape).
    pub fn validate_routing_code(code: &str) -> crate::Result<()> {
        if !routing_code_regex().is_match(code) {
            return Err(AppError::Validation(format!(
                "invalid routing code: {}",
                code
            )));
        }

        Ok(())
    }

    /// Validate a bank account number: 9 to 18 digits.
    pub fn validate_account_number(number: &str) -> crate::Result<()> {
        if number.len() < 9 || number.len() > 18 || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "account number must be 9-18 digits".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate an account holder name.
    pub fn validate_holder_name(name: &str) -> crate::Result<()> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "holder name cannot be empty".to_string(),
            ));
        }

        if name.len() > 100 {
            return Err(AppError::Validation(
                "holder name too long (max 100 characters)".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a free-form note attached to a payout.
    pub fn validate_note(note: &str) -> crate::Result<()> {
        if note.len() > 500 {
            return Err(AppError::Validation(
                "note too long (max 500 characters)".to_string(),
            ));
        }

        Ok(())
    }
}
