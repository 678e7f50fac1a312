//! Bank account service: salon payout destinations

use std::sync::Arc;

use crate::domain::bank_account::{DestinationKind, SalonBankAccount};
use crate::infrastructure::adapters::BankDirectory;
use crate::infrastructure::stores::BankAccountStore;
use crate::shared::error::AppResult;
use crate::shared::validation::ValidationUtils;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Request to register a payout destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDestinationRequest {
    pub salon_id: Uuid,
    pub holder_name: String,
    pub destination: NewDestination,
    pub make_primary: bool,
}

/// Destination details before directory enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NewDestination {
    Bank {
        account_number: String,
        routing_code: String,
    },
    Upi {
        vpa: String,
    },
}

/// Service for managing salon payout destinations
pub struct BankAccountService {
    accounts: BankAccountStore,
    directory: Arc<dyn BankDirectory>,
}

impl BankAccountService {
    pub fn new(accounts: BankAccountStore, directory: Arc<dyn BankDirectory>) -> Self {
        Self { accounts, directory }
    }

    /// Register a destination for a salon.
    ///
    /// Bank destinations are enriched with display metadata from the
    /// directory; a failed lookup degrades to an unverified display
    /// name and never blocks the registration. The first destination for
    /// a salon becomes primary regardless of the request flag.
    pub async fn register(
        &self,
        request: RegisterDestinationRequest,
    ) -> AppResult<SalonBankAccount> {
        ValidationUtils::validate_holder_name(&request.holder_name)?;

        let (destination, is_verified) = match request.destination {
            NewDestination::Bank {
                account_number,
                routing_code,
            } => {
                ValidationUtils::validate_account_number(&account_number)?;
                ValidationUtils::validate_routing_code(&routing_code)?;

                let record = self.directory.resolve(&routing_code).await;
                let verified = record.is_some();
                (
                    DestinationKind::Bank {
                        account_number,
                        routing_code,
                        bank_name: record.as_ref().map(|r| r.bank_name.clone()),
                        branch: record.map(|r| r.branch),
                    },
                    verified,
                )
            }
            NewDestination::Upi { vpa } => {
                ValidationUtils::validate_upi_vpa(&vpa)?;
                (DestinationKind::Upi { vpa }, false)
            }
        };

        let has_primary = self.accounts.primary_for(request.salon_id).await.is_some();

        let account = self
            .accounts
            .insert(SalonBankAccount {
                id: Uuid::new_v4(),
                salon_id: request.salon_id,
                holder_name: request.holder_name,
                destination,
                is_primary: request.make_primary || !has_primary,
                is_verified,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            account_id = %account.id,
            salon_id = %account.salon_id,
            primary = account.is_primary,
            verified = account.is_verified,
            "Payout destination registered"
        );
        Ok(account)
    }

    /// Promote a destination to primary; the previous primary is cleared
    /// in the same store critical section.
    pub async fn set_primary(&self, account_id: Uuid) -> AppResult<SalonBankAccount> {
        let account = self.accounts.set_primary(account_id).await?;
        info!(
            account_id = %account.id,
            salon_id = %account.salon_id,
            "Primary payout destination changed"
        );
        Ok(account)
    }

    pub async fn list_for_salon(&self, salon_id: Uuid) -> Vec<SalonBankAccount> {
        self.accounts.list_for_salon(salon_id).await
    }

    pub async fn primary_for(&self, salon_id: Uuid) -> Option<SalonBankAccount> {
        self.accounts.primary_for(salon_id).await
    }
}
