//! Application layer - Services orchestrating the domain

pub mod services;

pub use services::{
    BankAccountService, PayoutService, PenaltyService, SchedulerService, SettlementService,
    WalletService,
};
