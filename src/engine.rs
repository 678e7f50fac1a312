//! Engine composition root
//!
//! Wires configuration, stores, adapters, and services into one handle
//! the host application (or the scheduler sidecar) holds.

use std::sync::Arc;

use crate::application::services::{
    BankAccountService, PayoutService, PenaltyService, SchedulerService, SettlementService,
    WalletService,
};
use crate::config::AppConfig;
use crate::infrastructure::adapters::{
    BankDirectory, HttpBankDirectory, HttpPaymentGateway, MonitoringAdapter,
    NotificationDispatcher, PaymentGateway, WebhookNotifier,
};
use crate::infrastructure::stores::{
    BankAccountStore, PaymentStore, PayoutStore, PenaltyStore, ScheduleStore, WalletStore,
};
use crate::shared::error::AppResult;
use redis::aio::ConnectionManager;

/// The assembled settlement and payout engine
pub struct SettlementEngine {
    config: Arc<AppConfig>,
    settlement: Arc<SettlementService>,
    wallets: Arc<WalletService>,
    penalties: Arc<PenaltyService>,
    payouts: Arc<PayoutService>,
    scheduler: Arc<SchedulerService>,
    bank_accounts: Arc<BankAccountService>,
    monitoring: Arc<MonitoringAdapter>,
}

impl SettlementEngine {
    /// Build the engine with production collaborators (HTTP gateway,
    /// HTTP directory, webhook notifier).
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let config = Arc::new(config);
        let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(config.clone()));
        let directory: Arc<dyn BankDirectory> = Arc::new(HttpBankDirectory::new(config.clone()));
        let notifier: Arc<dyn NotificationDispatcher> =
            Arc::new(WebhookNotifier::new(config.clone()));

        Self::with_collaborators(config, gateway, directory, notifier).await
    }

    /// Build the engine with injected collaborators. This is the seam
    /// tests use to substitute gateway, directory, and notifier doubles.
    pub async fn with_collaborators(
        config: Arc<AppConfig>,
        gateway: Arc<dyn PaymentGateway>,
        directory: Arc<dyn BankDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> AppResult<Self> {
        let redis = Self::connect_redis(&config).await?;
        let monitoring = Arc::new(MonitoringAdapter::new());

        let payment_store = PaymentStore::new(redis.clone());
        let wallet_store = WalletStore::new(redis.clone());
        let penalty_store = PenaltyStore::new(redis.clone());
        let payout_store = PayoutStore::new(redis.clone());
        let bank_account_store = BankAccountStore::new(redis.clone());
        let schedule_settings = config
            .schedule
            .to_settings(config.payout.minimum_amount)?;
        let schedule_store = ScheduleStore::new(schedule_settings, redis);

        let settlement = Arc::new(SettlementService::new(
            config.clone(),
            gateway,
            payment_store.clone(),
            penalty_store.clone(),
            wallet_store.clone(),
            monitoring.clone(),
        ));
        let wallets = Arc::new(WalletService::new(wallet_store, monitoring.clone()));
        let penalties = Arc::new(PenaltyService::new(penalty_store.clone()));
        let payouts = Arc::new(PayoutService::new(
            config.clone(),
            payment_store.clone(),
            payout_store,
            penalty_store,
            notifier,
            monitoring.clone(),
        ));
        let scheduler = Arc::new(SchedulerService::new(
            payment_store,
            bank_account_store.clone(),
            schedule_store,
            payouts.clone(),
            monitoring.clone(),
        ));
        let bank_accounts = Arc::new(BankAccountService::new(bank_account_store, directory));

        Ok(Self {
            config,
            settlement,
            wallets,
            penalties,
            payouts,
            scheduler,
            bank_accounts,
            monitoring,
        })
    }

    async fn connect_redis(config: &AppConfig) -> AppResult<Option<Arc<ConnectionManager>>> {
        if !config.redis.enabled {
            return Ok(None);
        }

        let client = redis::Client::open(config.redis.redis_url.as_str())?;
        let manager = client.get_connection_manager().await?;
        Ok(Some(Arc::new(manager)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn settlement(&self) -> &Arc<SettlementService> {
        &self.settlement
    }

    pub fn wallets(&self) -> &Arc<WalletService> {
        &self.wallets
    }

    pub fn penalties(&self) -> &Arc<PenaltyService> {
        &self.penalties
    }

    pub fn payouts(&self) -> &Arc<PayoutService> {
        &self.payouts
    }

    pub fn scheduler(&self) -> &Arc<SchedulerService> {
        &self.scheduler
    }

    pub fn bank_accounts(&self) -> &Arc<BankAccountService> {
        &self.bank_accounts
    }

    pub fn monitoring(&self) -> &Arc<MonitoringAdapter> {
        &self.monitoring
    }
}
