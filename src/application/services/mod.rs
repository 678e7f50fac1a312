//! Application services - Orchestration of domain logic

pub mod bank_account_service;
pub mod payout_service;
pub mod penalty_service;
pub mod scheduler_service;
pub mod settlement_service;
pub mod wallet_service;

pub use bank_account_service::BankAccountService;
pub use payout_service::PayoutService;
pub use penalty_service::PenaltyService;
pub use scheduler_service::SchedulerService;
pub use settlement_service::SettlementService;
pub use wallet_service::WalletService;
