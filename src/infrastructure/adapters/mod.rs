//! Infrastructure adapters module
//!
//! This module contains adapters for external services and
//! infrastructure concerns.

pub mod directory;
pub mod gateway;
pub mod monitoring;
pub mod notifications;

// Re-export all adapters
pub use directory::{BankDirectory, BranchRecord, HttpBankDirectory};
pub use gateway::{AuthorizationRequest, GatewayAuthorization, HttpPaymentGateway, PaymentGateway};
pub use monitoring::MonitoringAdapter;
pub use notifications::{NotificationDispatcher, PayoutEvent, WebhookNotifier};
