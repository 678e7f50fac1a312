//! Integration tests: full capture-to-payout flows and the races the
//! engine must win

use crate::application::services::payout_service::CreatePayoutRequest;
use crate::application::services::settlement_service::CaptureRequest;
use crate::domain::payment::PaymentMethod;
use crate::domain::payout::{PayoutDestination, PayoutMethod, PayoutStatus};
use crate::shared::error::AppError;
use crate::tests::common::{engine_with_gateway, MockGateway};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn upi_destination() -> PayoutDestination {
    PayoutDestination::UpiId {
        vpa: "salon@okaxis".to_string(),
    }
}

#[tokio::test]
async fn concurrent_requests_cannot_jointly_overdraw_a_salon() {
    let engine = engine_with_gateway(MockGateway::approving()).await;
    let salon = Uuid::new_v4();

    // 108.70 * 0.92 rounds to exactly 100.00 of salon earnings
    engine
        .settlement()
        .capture_booking(CaptureRequest {
            booking_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            salon_id: salon,
            service_amount: dec!(108.70),
            method: PaymentMethod::Upi,
            wallet_amount: Decimal::ZERO,
        })
        .await
        .unwrap();
    assert_eq!(engine.payouts().available_balance(salon).await, dec!(100.00));

    let request = |note: &str| CreatePayoutRequest {
        salon_id: salon,
        amount: dec!(100),
        method: PayoutMethod::Upi,
        destination: upi_destination(),
        period_start: None,
        period_end: None,
        note: Some(note.to_string()),
    };

    let payouts = engine.payouts();
    let (a, b) = tokio::join!(
        payouts.create_request(request("first")),
        payouts.create_request(request("second"))
    );

    // Exactly one request wins the balance; the other is told why
    let (ok, err) = match (a, b) {
        (Ok(ok), Err(err)) => (ok, err),
        (Err(err), Ok(ok)) => (ok, err),
        other => panic!("expected exactly one success, got {:?}", other),
    };
    assert!(matches!(err, AppError::InsufficientBalance { .. }));
    assert_eq!(ok.amount, dec!(100));
    assert_eq!(engine.payouts().available_balance(salon).await, Decimal::ZERO);
}

#[tokio::test]
async fn capture_to_completed_payout_round_trip() {
    crate::tests::config::init();
    let engine = engine_with_gateway(MockGateway::approving()).await;
    let salon = Uuid::new_v4();
    let customer = Uuid::new_v4();

    // A cancellation earlier in the month left a penalty
    engine
        .penalties()
        .accrue(customer, salon, dec!(50))
        .await
        .unwrap();

    // Customer pays online; the penalty rides along
    let payment = engine
        .settlement()
        .capture_booking(CaptureRequest {
            booking_id: Uuid::new_v4(),
            customer_id: customer,
            salon_id: salon,
            service_amount: dec!(1500),
            method: PaymentMethod::Upi,
            wallet_amount: Decimal::ZERO,
        })
        .await
        .unwrap();

    assert_eq!(payment.gross_amount, dec!(1550));
    assert_eq!(payment.salon_amount, dec!(1380));
    assert_eq!(payment.platform_fee, dec!(170));
    assert!(payment.is_balanced());

    // The salon cashes out over the instant rail
    let available = engine.payouts().available_balance(salon).await;
    assert_eq!(available, dec!(1380));

    let payout = engine
        .payouts()
        .create_request(CreatePayoutRequest {
            salon_id: salon,
            amount: available,
            method: PayoutMethod::InstantUpi,
            destination: upi_destination(),
            period_start: None,
            period_end: None,
            note: None,
        })
        .await
        .unwrap();
    assert_eq!(payout.fee_charged, dec!(13.80));
    assert_eq!(payout.net_disbursed, dec!(1366.20));

    engine.payouts().approve(payout.id).await.unwrap();
    engine.payouts().complete(payout.id).await.unwrap();

    // Gross obligation fully discharged, fee never resurfaces
    assert_eq!(engine.payouts().available_balance(salon).await, Decimal::ZERO);

    let history = engine.payouts().list_for_salon(salon).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, PayoutStatus::Completed);
}

#[tokio::test]
async fn wallet_split_flow_keeps_every_ledger_consistent() {
    let engine = engine_with_gateway(MockGateway::approving()).await;
    let salon = Uuid::new_v4();
    let customer = Uuid::new_v4();

    engine
        .wallets()
        .credit(
            customer,
            dec!(250),
            crate::domain::wallet::TransactionCategory::ReferralReward,
            None,
        )
        .await
        .unwrap();

    engine
        .settlement()
        .capture_booking(CaptureRequest {
            booking_id: Uuid::new_v4(),
            customer_id: customer,
            salon_id: salon,
            service_amount: dec!(800),
            method: PaymentMethod::Upi,
            wallet_amount: dec!(250),
        })
        .await
        .unwrap();

    // Wallet aggregate against its own ledger
    let statement = engine.wallets().statement(customer).await;
    assert!(statement.wallet.is_consistent());
    assert_eq!(statement.wallet.balance, Decimal::ZERO);
    assert_eq!(statement.transactions.len(), 2);

    // The salon's payable balance reflects the full service split
    // regardless of how the customer funded it
    assert_eq!(engine.payouts().available_balance(salon).await, dec!(736));
}

#[tokio::test]
async fn monitoring_exports_the_money_counters() {
    let engine = engine_with_gateway(MockGateway::approving()).await;

    engine
        .settlement()
        .capture_booking(CaptureRequest {
            booking_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            service_amount: dec!(500),
            method: PaymentMethod::Upi,
            wallet_amount: Decimal::ZERO,
        })
        .await
        .unwrap();

    let exported = engine.monitoring().export();
    assert!(exported.contains("settlement_captures_total 1"));
    assert!(exported.contains("payout_requests_total 0"));
}
