//! Settlement service: turns a booking charge into a captured payment
//! with its platform/salon split and penalty carve-out

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::payment::{Payment, PaymentBreakdown, PaymentMethod, PaymentStatus};
use crate::domain::penalty::PenaltyChannel;
use crate::domain::wallet::TransactionCategory;
use crate::infrastructure::adapters::{AuthorizationRequest, MonitoringAdapter, PaymentGateway};
use crate::infrastructure::stores::{PaymentStore, PenaltyStore, WalletStore};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use crate::shared::validation::ValidationUtils;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Request to capture a booking charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub service_amount: Decimal,
    pub method: PaymentMethod,
    /// Stored wallet credit to apply against an online charge
    pub wallet_amount: Decimal,
}

/// Service orchestrating payment capture and penalty settlement
pub struct SettlementService {
    config: Arc<AppConfig>,
    gateway: Arc<dyn PaymentGateway>,
    payments: PaymentStore,
    penalties: PenaltyStore,
    wallets: WalletStore,
    monitoring: Arc<MonitoringAdapter>,
}

impl SettlementService {
    pub fn new(
        config: Arc<AppConfig>,
        gateway: Arc<dyn PaymentGateway>,
        payments: PaymentStore,
        penalties: PenaltyStore,
        wallets: WalletStore,
        monitoring: Arc<MonitoringAdapter>,
    ) -> Self {
        Self {
            config,
            gateway,
            payments,
            penalties,
            wallets,
            monitoring,
        }
    }

    /// Capture a booking charge.
    ///
    /// Idempotent by booking id: a second capture for the same booking
    /// returns the existing payment without side effects, so a retried
    /// checkout cannot double-charge or double-settle penalties.
    pub async fn capture_booking(&self, request: CaptureRequest) -> AppResult<Payment> {
        ValidationUtils::validate_amount(request.service_amount, "service_amount")?;
        ValidationUtils::validate_non_negative(request.wallet_amount, "wallet_amount")?;

        if let Some(existing) = self.payments.find_by_booking(request.booking_id).await {
            info!(
                booking_id = %request.booking_id,
                payment_id = %existing.id,
                "Booking already captured, returning existing payment"
            );
            return Ok(existing);
        }

        let pending_penalties = self.penalties.outstanding_for(request.customer_id).await;
        let penalty_total: Decimal = pending_penalties.iter().map(|p| p.amount).sum();

        let payment = match request.method {
            PaymentMethod::CashAtSalon => {
                if request.wallet_amount > Decimal::ZERO {
                    return Err(AppError::Validation(
                        "wallet credit cannot be applied to a cash booking".to_string(),
                    ));
                }
                self.capture_cash(&request, &pending_penalties, penalty_total)
                    .await?
            }
            PaymentMethod::Upi | PaymentMethod::Wallet => {
                self.capture_online(&request, &pending_penalties, penalty_total)
                    .await?
            }
        };

        self.monitoring.record_capture();
        LoggingUtils::log_capture(
            payment.id,
            payment.booking_id,
            payment.salon_id,
            payment.gross_amount,
            payment.platform_fee,
            payment.salon_amount,
        );

        Ok(payment)
    }

    /// Cash at the salon counter: the full service amount goes to the
    /// salon and the platform collects no commission; any pending
    /// penalty rides along as cash the salon collects on the platform's
    /// behalf.
    async fn capture_cash(
        &self,
        request: &CaptureRequest,
        pending_penalties: &[crate::domain::penalty::CancellationPenalty],
        penalty_total: Decimal,
    ) -> AppResult<Payment> {
        let gross = request.service_amount + penalty_total;

        let payment = Payment {
            id: Uuid::new_v4(),
            booking_id: request.booking_id,
            payer_id: request.customer_id,
            salon_id: request.salon_id,
            gross_amount: gross,
            platform_fee: penalty_total,
            salon_amount: request.service_amount,
            status: PaymentStatus::Captured,
            method: PaymentMethod::CashAtSalon,
            breakdown: (penalty_total > Decimal::ZERO).then(|| PaymentBreakdown {
                service_amount: request.service_amount,
                penalty_amount: penalty_total,
            }),
            wallet_amount: Decimal::ZERO,
            gateway_ref: None,
            created_at: Utc::now(),
        };

        let payment = self.insert_or_existing(payment).await?;

        let penalty_ids: Vec<Uuid> = pending_penalties.iter().map(|p| p.id).collect();
        self.penalties
            .settle(&penalty_ids, Some(request.salon_id), PenaltyChannel::Cash)
            .await?;

        Ok(payment)
    }

    /// Online capture, optionally split across wallet credit and the
    /// gateway. The wallet leg commits first and the gateway call is
    /// made before any local payment mutation, so a slow gateway never
    /// holds a lock; a decline after the wallet leg surfaces as
    /// `PartialFailure` for manual reconciliation.
    async fn capture_online(
        &self,
        request: &CaptureRequest,
        pending_penalties: &[crate::domain::penalty::CancellationPenalty],
        penalty_total: Decimal,
    ) -> AppResult<Payment> {
        let gross = request.service_amount + penalty_total;

        if request.wallet_amount > gross {
            return Err(AppError::Validation(format!(
                "wallet amount {} exceeds amount due {}",
                request.wallet_amount, gross
            )));
        }

        let mut wallet_debited = Decimal::ZERO;
        if request.wallet_amount > Decimal::ZERO {
            self.wallets
                .apply_debit(
                    request.customer_id,
                    request.wallet_amount,
                    TransactionCategory::BookingPayment,
                    Some(request.booking_id),
                )
                .await?;
            self.monitoring.record_wallet_debit();
            wallet_debited = request.wallet_amount;
        }

        let amount_to_charge = gross - wallet_debited;
        let mut gateway_ref = None;
        if amount_to_charge > Decimal::ZERO {
            let authorization = self
                .gateway
                .authorize(&AuthorizationRequest {
                    amount: amount_to_charge,
                    payer_ref: request.customer_id,
                    booking_id: request.booking_id,
                })
                .await;

            match authorization {
                Ok(auth) => gateway_ref = Some(auth.payment_ref),
                Err(AppError::GatewayDeclined(decline)) => {
                    self.monitoring.record_gateway_decline();
                    if wallet_debited > Decimal::ZERO {
                        // The wallet leg already committed and is not
                        // reversed here; the caller must reconcile.
                        self.monitoring.record_partial_failure();
                        LoggingUtils::log_reconciliation_required(
                            request.booking_id,
                            wallet_debited,
                            &decline.to_string(),
                        );
                        return Err(AppError::PartialFailure {
                            wallet_debited,
                            decline,
                        });
                    }
                    return Err(AppError::GatewayDeclined(decline));
                }
                Err(other) => return Err(other),
            }
        }

        let method = if amount_to_charge > Decimal::ZERO {
            PaymentMethod::Upi
        } else {
            PaymentMethod::Wallet
        };

        let salon_amount = self.salon_share(request.service_amount);
        let payment = Payment {
            id: Uuid::new_v4(),
            booking_id: request.booking_id,
            payer_id: request.customer_id,
            salon_id: request.salon_id,
            gross_amount: gross,
            // The fee partitions the gross exactly; the embedded penalty
            // is platform revenue in full
            platform_fee: gross - salon_amount,
            salon_amount,
            status: PaymentStatus::Captured,
            method,
            breakdown: (penalty_total > Decimal::ZERO).then(|| PaymentBreakdown {
                service_amount: request.service_amount,
                penalty_amount: penalty_total,
            }),
            wallet_amount: wallet_debited,
            gateway_ref,
            created_at: Utc::now(),
        };

        let payment = self.insert_or_existing(payment).await?;

        let penalty_ids: Vec<Uuid> = pending_penalties.iter().map(|p| p.id).collect();
        self.penalties
            .settle(&penalty_ids, None, PenaltyChannel::Platform)
            .await?;

        Ok(payment)
    }

    /// Salon share of the service amount on online bookings: the
    /// commission applies to the service amount only, never the penalty.
    fn salon_share(&self, service_amount: Decimal) -> Decimal {
        (service_amount * (Decimal::ONE - self.config.commission.platform_fee_percent))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Insert, folding a lost capture race into the idempotent no-op.
    async fn insert_or_existing(&self, payment: Payment) -> AppResult<Payment> {
        let booking_id = payment.booking_id;
        match self.payments.insert(payment).await {
            Ok(inserted) => Ok(inserted),
            Err(AppError::ConcurrencyConflict(_)) => self
                .payments
                .find_by_booking(booking_id)
                .await
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "capture race for booking {} left no payment",
                        booking_id
                    ))
                }),
            Err(other) => Err(other),
        }
    }

    /// Move a captured payment to settled, exactly once.
    pub async fn mark_settled(&self, payment_id: Uuid) -> AppResult<Payment> {
        let payment = self.payments.mark_settled(payment_id).await?;
        info!(payment_id = %payment_id, "Payment settled");
        Ok(payment)
    }

    pub async fn payment_for_booking(&self, booking_id: Uuid) -> Option<Payment> {
        self.payments.find_by_booking(booking_id).await
    }
}
