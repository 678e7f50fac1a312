//! Salon Settlement - Settlement and payout engine for the salon
//! booking marketplace
//!
//! This library turns captured customer payments into platform/salon
//! revenue splits, tracks cancellation-penalty debts collected on the
//! platform's behalf, and governs how and when a salon's accumulated
//! earnings become a bank/UPI transfer.

pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod shared;


pub use config::AppConfig;
pub use engine::SettlementEngine;
pub use shared::error::{AppError, AppResult};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::AppError>;
