//! Salon payout destination store

use crate::domain::bank_account::SalonBankAccount;
use crate::infrastructure::stores::RedisMirror;
use crate::shared::error::{AppError, AppResult};
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store for salon bank/UPI destinations.
#[derive(Clone)]
pub struct BankAccountStore {
    state: Arc<RwLock<HashMap<Uuid, SalonBankAccount>>>,
    mirror: RedisMirror,
}

impl BankAccountStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            mirror: RedisMirror::new(redis),
        }
    }

    fn key(account_id: Uuid) -> String {
        format!("salon_bank_accounts:{}", account_id)
    }

    /// Insert a destination. When the new account is primary, the
    /// previous primary for that salon is cleared in the same critical
    /// section so exactly one primary exists at any point.
    pub async fn insert(&self, account: SalonBankAccount) -> AppResult<SalonBankAccount> {
        let demoted = {
            let mut state = self.state.write().await;
            if state.contains_key(&account.id) {
                return Err(AppError::ConcurrencyConflict(format!(
                    "bank account {} already exists",
                    account.id
                )));
            }

            let mut demoted = Vec::new();
            if account.is_primary {
                for existing in state
                    .values_mut()
                    .filter(|a| a.salon_id == account.salon_id && a.is_primary)
                {
                    existing.is_primary = false;
                    demoted.push(existing.clone());
                }
            }
            state.insert(account.id, account.clone());
            demoted
        };

        for account in &demoted {
            self.mirror.put(Self::key(account.id), account).await;
        }
        self.mirror.put(Self::key(account.id), &account).await;
        Ok(account)
    }

    /// Promote an account to primary, demoting the previous primary
    /// under the same write lock.
    pub async fn set_primary(&self, account_id: Uuid) -> AppResult<SalonBankAccount> {
        let (promoted, demoted) = {
            let mut state = self.state.write().await;
            let salon_id = state
                .get(&account_id)
                .ok_or_else(|| AppError::NotFound(format!("bank account {}", account_id)))?
                .salon_id;

            let mut demoted = Vec::new();
            for existing in state
                .values_mut()
                .filter(|a| a.salon_id == salon_id && a.is_primary && a.id != account_id)
            {
                existing.is_primary = false;
                demoted.push(existing.clone());
            }

            let account = state.get_mut(&account_id).expect("checked above");
            account.is_primary = true;
            (account.clone(), demoted)
        };

        for account in &demoted {
            self.mirror.put(Self::key(account.id), account).await;
        }
        self.mirror.put(Self::key(account_id), &promoted).await;
        Ok(promoted)
    }

    pub async fn get(&self, account_id: Uuid) -> Option<SalonBankAccount> {
        self.state.read().await.get(&account_id).cloned()
    }

    pub async fn primary_for(&self, salon_id: Uuid) -> Option<SalonBankAccount> {
        self.state
            .read()
            .await
            .values()
            .find(|a| a.salon_id == salon_id && a.is_primary)
            .cloned()
    }

    pub async fn list_for_salon(&self, salon_id: Uuid) -> Vec<SalonBankAccount> {
        let mut accounts: Vec<SalonBankAccount> = self
            .state
            .read()
            .await
            .values()
            .filter(|a| a.salon_id == salon_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.created_at);
        accounts
    }
}
