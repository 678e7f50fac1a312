//! Domain layer - Core business entities and rules
//!
//! This module contains the entities owned by the settlement and payout
//! subsystems and the rules that are independent of infrastructure
//! concerns like persistence or HTTP.

pub mod bank_account;
pub mod payment;
pub mod payout;
pub mod penalty;
pub mod schedule;
pub mod wallet;

pub use bank_account::{DestinationKind, SalonBankAccount};
pub use payment::{Payment, PaymentBreakdown, PaymentMethod, PaymentStatus};
pub use payout::{PayoutDestination, PayoutMethod, PayoutStatus, SalonPayout};
pub use penalty::{CancellationPenalty, PenaltyChannel};
pub use schedule::PayoutScheduleSettings;
pub use wallet::{TransactionCategory, TransactionKind, Wallet, WalletTransaction};
