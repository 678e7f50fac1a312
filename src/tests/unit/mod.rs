//! Unit tests for the settlement, wallet, penalty, payout, and
//! scheduler services

use crate::application::services::payout_service::CreatePayoutRequest;
use crate::application::services::settlement_service::CaptureRequest;
use crate::domain::payment::PaymentMethod;
use crate::domain::payout::{PayoutDestination, PayoutMethod, PayoutStatus};
use crate::domain::penalty::PenaltyChannel;
use crate::domain::wallet::TransactionCategory;
use crate::shared::error::AppError;
use crate::tests::common::{engine_with_gateway, MockGateway};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn upi_capture(
    booking_id: Uuid,
    customer_id: Uuid,
    salon_id: Uuid,
    service_amount: Decimal,
    wallet_amount: Decimal,
) -> CaptureRequest {
    CaptureRequest {
        booking_id,
        customer_id,
        salon_id,
        service_amount,
        method: PaymentMethod::Upi,
        wallet_amount,
    }
}

fn upi_destination() -> PayoutDestination {
    PayoutDestination::UpiId {
        vpa: "salon@okaxis".to_string(),
    }
}

/// Settlement service tests
pub mod settlement {
    use super::*;

    #[tokio::test]
    async fn upi_booking_splits_92_8() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;

        let payment = engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        assert_eq!(payment.gross_amount, dec!(500));
        assert_eq!(payment.platform_fee, dec!(40));
        assert_eq!(payment.salon_amount, dec!(460));
        assert!(payment.is_balanced());
        assert_eq!(payment.method, PaymentMethod::Upi);
        assert_eq!(gateway.last_amount(), Some(dec!(500)));
    }

    #[tokio::test]
    async fn pending_penalty_rides_along_as_platform_revenue() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;
        let customer = Uuid::new_v4();
        let salon = Uuid::new_v4();

        let penalty = engine
            .penalties()
            .accrue(customer, salon, dec!(50))
            .await
            .unwrap();

        let payment = engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                customer,
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        // Commission applies to the service amount only; the penalty is
        // platform revenue in full
        assert_eq!(payment.gross_amount, dec!(550));
        assert_eq!(payment.platform_fee, dec!(90));
        assert_eq!(payment.salon_amount, dec!(460));
        assert_eq!(gateway.last_amount(), Some(dec!(550)));

        let settled = engine.penalties().get(penalty.id).await.unwrap();
        assert!(settled.is_paid);
        assert_eq!(settled.paid_via, Some(PenaltyChannel::Platform));
        assert!(engine.penalties().outstanding_for(customer).await.is_empty());
    }

    #[tokio::test]
    async fn cash_booking_keeps_service_amount_at_the_salon() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;
        let customer = Uuid::new_v4();
        let originating = Uuid::new_v4();
        let collecting = Uuid::new_v4();

        let penalty = engine
            .penalties()
            .accrue(customer, originating, dec!(50))
            .await
            .unwrap();

        let payment = engine
            .settlement()
            .capture_booking(CaptureRequest {
                booking_id: Uuid::new_v4(),
                customer_id: customer,
                salon_id: collecting,
                service_amount: dec!(500),
                method: PaymentMethod::CashAtSalon,
                wallet_amount: Decimal::ZERO,
            })
            .await
            .unwrap();

        // No gateway involvement and no commission on cash
        assert_eq!(gateway.calls(), 0);
        assert_eq!(payment.salon_amount, dec!(500));
        assert_eq!(payment.platform_fee, dec!(50));
        assert!(payment.is_balanced());

        let settled = engine.penalties().get(penalty.id).await.unwrap();
        assert_eq!(settled.paid_via, Some(PenaltyChannel::Cash));
        assert_eq!(settled.collecting_salon_id, Some(collecting));
        assert!(!settled.remitted_to_platform);
    }

    #[tokio::test]
    async fn unremitted_cash_penalty_reduces_collecting_salon_balance() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway).await;
        let customer = Uuid::new_v4();
        let salon = Uuid::new_v4();

        // Online earnings first, so the reduction is visible
        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(460));

        let penalty = engine
            .penalties()
            .accrue(customer, Uuid::new_v4(), dec!(50))
            .await
            .unwrap();
        engine
            .settlement()
            .capture_booking(CaptureRequest {
                booking_id: Uuid::new_v4(),
                customer_id: customer,
                salon_id: salon,
                service_amount: dec!(300),
                method: PaymentMethod::CashAtSalon,
                wallet_amount: Decimal::ZERO,
            })
            .await
            .unwrap();

        // Cash service amount stays in the till; only the collected
        // penalty moves the payable balance, downward
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(410));

        engine.penalties().mark_remitted(penalty.id).await.unwrap();
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(460));
    }

    #[tokio::test]
    async fn capture_is_idempotent_by_booking() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;
        let booking = Uuid::new_v4();
        let request = upi_capture(
            booking,
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec!(500),
            Decimal::ZERO,
        );

        let first = engine
            .settlement()
            .capture_booking(request.clone())
            .await
            .unwrap();
        let second = engine.settlement().capture_booking(request).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn split_payment_charges_gateway_for_the_remainder() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;
        let customer = Uuid::new_v4();

        engine
            .wallets()
            .credit(customer, dec!(100), TransactionCategory::ReferralReward, None)
            .await
            .unwrap();

        let payment = engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                customer,
                Uuid::new_v4(),
                dec!(500),
                dec!(100),
            ))
            .await
            .unwrap();

        assert_eq!(gateway.last_amount(), Some(dec!(400)));
        assert_eq!(payment.wallet_amount, dec!(100));
        assert_eq!(payment.gross_amount, dec!(500));
        assert_eq!(engine.wallets().balance(customer).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn wallet_covering_everything_skips_the_gateway() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway.clone()).await;
        let customer = Uuid::new_v4();

        engine
            .wallets()
            .credit(customer, dec!(600), TransactionCategory::Refund, None)
            .await
            .unwrap();

        let payment = engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                customer,
                Uuid::new_v4(),
                dec!(500),
                dec!(500),
            ))
            .await
            .unwrap();

        assert_eq!(gateway.calls(), 0);
        assert_eq!(payment.method, PaymentMethod::Wallet);
        assert_eq!(payment.gateway_ref, None);
        assert_eq!(engine.wallets().balance(customer).await, dec!(100));
    }

    #[tokio::test]
    async fn decline_after_wallet_debit_surfaces_partial_failure() {
        let gateway = MockGateway::declining(false);
        let engine = engine_with_gateway(gateway).await;
        let customer = Uuid::new_v4();
        let booking = Uuid::new_v4();

        engine
            .wallets()
            .credit(customer, dec!(100), TransactionCategory::ReferralReward, None)
            .await
            .unwrap();

        let err = engine
            .settlement()
            .capture_booking(upi_capture(
                booking,
                customer,
                Uuid::new_v4(),
                dec!(500),
                dec!(100),
            ))
            .await
            .unwrap_err();

        match err {
            AppError::PartialFailure {
                wallet_debited,
                decline,
            } => {
                assert_eq!(wallet_debited, dec!(100));
                assert_eq!(decline.code, "card_declined");
            }
            other => panic!("expected PartialFailure, got {:?}", other),
        }

        // The wallet leg stands and no payment exists; reconciliation is
        // the caller's responsibility
        assert_eq!(engine.wallets().balance(customer).await, Decimal::ZERO);
        assert!(engine
            .settlement()
            .payment_for_booking(booking)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn decline_without_wallet_leg_mutates_nothing() {
        let gateway = MockGateway::declining(true);
        let engine = engine_with_gateway(gateway).await;
        let customer = Uuid::new_v4();
        let booking = Uuid::new_v4();

        let penalty = engine
            .penalties()
            .accrue(customer, Uuid::new_v4(), dec!(50))
            .await
            .unwrap();

        let err = engine
            .settlement()
            .capture_booking(upi_capture(
                booking,
                customer,
                Uuid::new_v4(),
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GatewayDeclined(_)));
        assert!(err.is_retryable());
        assert!(engine
            .settlement()
            .payment_for_booking(booking)
            .await
            .is_none());

        // The penalty-clearing half never committed
        let untouched = engine.penalties().get(penalty.id).await.unwrap();
        assert!(!untouched.is_paid);
    }

    #[tokio::test]
    async fn settle_marks_a_captured_payment_exactly_once() {
        let gateway = MockGateway::approving();
        let engine = engine_with_gateway(gateway).await;

        let payment = engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        engine.settlement().mark_settled(payment.id).await.unwrap();
        let err = engine
            .settlement()
            .mark_settled(payment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConcurrencyConflict(_)));
    }
}

/// Payout balance and request tests
pub mod payouts {
    use super::*;

    async fn engine_with_earnings(
        salon: Uuid,
        service_amount: Decimal,
    ) -> crate::engine::SettlementEngine {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                service_amount,
                Decimal::ZERO,
            ))
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn instant_payout_tracks_gross_not_net() {
        let salon = Uuid::new_v4();
        // 1086.96 * 0.92 rounds to exactly 1000.00 of salon earnings
        let engine = engine_with_earnings(salon, dec!(1086.96)).await;
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(1000.00));

        let payout = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(1000),
                method: PayoutMethod::InstantUpi,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap();

        assert_eq!(payout.amount, dec!(1000));
        assert_eq!(payout.fee_charged, dec!(10.00));
        assert_eq!(payout.net_disbursed, dec!(990.00));
        assert!(payout.is_balanced());

        // The gross obligation is what the ledger discharges; the fee
        // must not resurface as available balance
        assert_eq!(
            engine.payouts().available_balance(salon).await,
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn request_below_minimum_rejected() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let err = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(50),
                method: PayoutMethod::BankTransfer,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn request_over_available_rejected() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let err = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(500),
                method: PayoutMethod::Upi,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap_err();

        match err {
            AppError::InsufficientBalance {
                requested,
                available,
            } => {
                assert_eq!(requested, dec!(500));
                assert_eq!(available, dec!(460));
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn open_request_holds_balance_and_failed_request_releases_it() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let payout = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(200),
                method: PayoutMethod::Upi,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap();

        // Held from the instant the request exists, before any admin action
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(260));

        engine.payouts().approve(payout.id).await.unwrap();
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(260));

        engine
            .payouts()
            .fail(payout.id, Some("rail timeout".to_string()))
            .await
            .unwrap();

        // A failed payout has no lasting balance effect
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(460));
    }

    #[tokio::test]
    async fn completed_request_discharges_the_obligation() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let payout = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(200),
                method: PayoutMethod::BankTransfer,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap();

        engine.payouts().approve(payout.id).await.unwrap();
        let completed = engine.payouts().complete(payout.id).await.unwrap();
        assert_eq!(completed.status, PayoutStatus::Completed);
        assert!(completed.processed_at.is_some());
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(260));
    }

    #[tokio::test]
    async fn terminal_transitions_happen_exactly_once() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let payout = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(150),
                method: PayoutMethod::Upi,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap();

        engine
            .payouts()
            .reject(payout.id, Some("destination mismatch".to_string()))
            .await
            .unwrap();

        // No resurrecting a failed payout, and a stale approve loses
        assert!(matches!(
            engine.payouts().approve(payout.id).await.unwrap_err(),
            AppError::ConcurrencyConflict(_)
        ));
        assert!(matches!(
            engine.payouts().complete(payout.id).await.unwrap_err(),
            AppError::ConcurrencyConflict(_)
        ));
    }

    #[tokio::test]
    async fn approve_requires_a_pending_request() {
        let salon = Uuid::new_v4();
        let engine = engine_with_earnings(salon, dec!(500)).await;

        let payout = engine
            .payouts()
            .create_request(CreatePayoutRequest {
                salon_id: salon,
                amount: dec!(150),
                method: PayoutMethod::Upi,
                destination: upi_destination(),
                period_start: None,
                period_end: None,
                note: None,
            })
            .await
            .unwrap();

        engine.payouts().approve(payout.id).await.unwrap();
        assert!(matches!(
            engine.payouts().approve(payout.id).await.unwrap_err(),
            AppError::ConcurrencyConflict(_)
        ));
        // An admin reject is only valid from pending
        assert!(matches!(
            engine.payouts().reject(payout.id, None).await.unwrap_err(),
            AppError::ConcurrencyConflict(_)
        ));
    }
}

/// Scheduler tests
pub mod scheduler {
    use super::*;
    use crate::application::services::bank_account_service::{
        NewDestination, RegisterDestinationRequest,
    };
    use chrono::{TimeZone, Utc};

    async fn register_primary_upi(engine: &crate::engine::SettlementEngine, salon: Uuid) {
        engine
            .bank_accounts()
            .register(RegisterDestinationRequest {
                salon_id: salon,
                holder_name: "Glow Studio".to_string(),
                destination: NewDestination::Upi {
                    vpa: "glow@okaxis".to_string(),
                },
                make_primary: true,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sweep_creates_and_auto_approves_under_threshold() {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        let salon = Uuid::new_v4();
        register_primary_upi(&engine, salon).await;

        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let report = engine.scheduler().run_tick(now).await.unwrap();

        assert!(report.ran);
        assert_eq!(report.requests_created, 1);
        assert_eq!(report.auto_approved, 1);

        let payouts = engine.payouts().list_for_salon(salon).await;
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].amount, dec!(460));
        assert_eq!(payouts[0].status, PayoutStatus::Processing);
        assert_eq!(
            engine.payouts().available_balance(salon).await,
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn double_trigger_within_a_period_is_a_no_op() {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        let salon = Uuid::new_v4();
        register_primary_upi(&engine, salon).await;

        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let first = engine.scheduler().run_tick(now).await.unwrap();
        assert!(first.ran);

        let second = engine.scheduler().run_tick(now).await.unwrap();
        assert!(!second.ran);
        assert_eq!(engine.payouts().list_for_salon(salon).await.len(), 1);
    }

    #[tokio::test]
    async fn balances_below_minimum_are_skipped() {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        let salon = Uuid::new_v4();
        register_primary_upi(&engine, salon).await;

        // 100 * 0.92 = 92, under the default minimum of 100
        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(100),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let report = engine.scheduler().run_tick(now).await.unwrap();

        assert!(report.ran);
        assert_eq!(report.requests_created, 0);
        assert_eq!(report.skipped_below_minimum, 1);
    }

    #[tokio::test]
    async fn salons_without_a_destination_are_skipped() {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        let salon = Uuid::new_v4();

        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let report = engine.scheduler().run_tick(now).await.unwrap();

        assert!(report.ran);
        assert_eq!(report.requests_created, 0);
        assert_eq!(report.skipped_no_destination, 1);
        assert_eq!(engine.payouts().available_balance(salon).await, dec!(460));
    }

    #[tokio::test]
    async fn without_threshold_requests_wait_for_review() {
        let mut config = crate::tests::config::test_config();
        config.schedule.auto_approve_threshold = None;
        let engine = crate::tests::common::engine_with(config, MockGateway::approving()).await;
        let salon = Uuid::new_v4();
        register_primary_upi(&engine, salon).await;

        engine
            .settlement()
            .capture_booking(upi_capture(
                Uuid::new_v4(),
                Uuid::new_v4(),
                salon,
                dec!(500),
                Decimal::ZERO,
            ))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let report = engine.scheduler().run_tick(now).await.unwrap();

        assert_eq!(report.requests_created, 1);
        assert_eq!(report.auto_approved, 0);
        let pending = engine.payouts().pending_requests().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].salon_id, salon);
    }

    #[tokio::test]
    async fn disabled_schedule_never_runs() {
        let mut config = crate::tests::config::test_config();
        config.schedule.enabled = false;
        let engine = crate::tests::common::engine_with(config, MockGateway::approving()).await;

        let report = engine.scheduler().run_tick(Utc::now()).await.unwrap();
        assert!(!report.ran);
    }
}

/// Bank account service tests
pub mod bank_accounts {
    use super::*;
    use crate::application::services::bank_account_service::{
        NewDestination, RegisterDestinationRequest,
    };
    use crate::tests::common::{MockDirectory, MockNotifier};
    use std::sync::Arc;

    #[tokio::test]
    async fn directory_hit_verifies_the_destination() {
        let engine = crate::engine::SettlementEngine::with_collaborators(
            Arc::new(crate::tests::config::test_config()),
            MockGateway::approving(),
            MockDirectory::with_branch(),
            MockNotifier::new(),
        )
        .await
        .unwrap();

        let account = engine
            .bank_accounts()
            .register(RegisterDestinationRequest {
                salon_id: Uuid::new_v4(),
                holder_name: "Glow Studio".to_string(),
                destination: NewDestination::Bank {
                    account_number: "123456789012".to_string(),
                    routing_code: "HDFC0001234".to_string(),
                },
                make_primary: true,
            })
            .await
            .unwrap();

        assert!(account.is_verified);
        match account.destination {
            crate::domain::bank_account::DestinationKind::Bank { bank_name, .. } => {
                assert_eq!(bank_name.as_deref(), Some("HDFC Bank"));
            }
            other => panic!("expected bank destination, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn directory_miss_degrades_to_unverified() {
        let engine = engine_with_gateway(MockGateway::approving()).await;

        let account = engine
            .bank_accounts()
            .register(RegisterDestinationRequest {
                salon_id: Uuid::new_v4(),
                holder_name: "Glow Studio".to_string(),
                destination: NewDestination::Bank {
                    account_number: "123456789012".to_string(),
                    routing_code: "HDFC0001234".to_string(),
                },
                make_primary: true,
            })
            .await
            .unwrap();

        // Lookup unavailable: registration still succeeds, unverified
        assert!(!account.is_verified);
    }

    #[tokio::test]
    async fn malformed_destinations_rejected() {
        let engine = engine_with_gateway(MockGateway::approving()).await;

        let err = engine
            .bank_accounts()
            .register(RegisterDestinationRequest {
                salon_id: Uuid::new_v4(),
                holder_name: "Glow Studio".to_string(),
                destination: NewDestination::Upi {
                    vpa: "not a vpa".to_string(),
                },
                make_primary: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn first_destination_becomes_primary() {
        let engine = engine_with_gateway(MockGateway::approving()).await;
        let salon = Uuid::new_v4();

        let account = engine
            .bank_accounts()
            .register(RegisterDestinationRequest {
                salon_id: salon,
                holder_name: "Glow Studio".to_string(),
                destination: NewDestination::Upi {
                    vpa: "glow@okaxis".to_string(),
                },
                make_primary: false,
            })
            .await
            .unwrap();

        assert!(account.is_primary);
        assert_eq!(
            engine.bank_accounts().primary_for(salon).await.unwrap().id,
            account.id
        );
    }
}
