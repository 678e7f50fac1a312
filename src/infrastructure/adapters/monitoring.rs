//! Monitoring adapter for metrics and observability
//!
//! This adapter handles Prometheus metrics collection for the money
//! paths: captures, declines, wallet movements, payout lifecycle, and
//! scheduler runs.

use prometheus::{Counter, Encoder, Registry, TextEncoder};

/// Adapter for monitoring and metrics services
pub struct MonitoringAdapter {
    registry: Registry,
    captures: Counter,
    gateway_declines: Counter,
    partial_failures: Counter,
    wallet_debits: Counter,
    wallet_credits: Counter,
    payout_requests: Counter,
    payout_transitions: Counter,
    scheduler_runs: Counter,
}

impl MonitoringAdapter {
    /// Create a new monitoring adapter
    pub fn new() -> Self {
        let registry = Registry::new();

        let captures = Counter::new("settlement_captures_total", "Payments captured").unwrap();
        let gateway_declines =
            Counter::new("settlement_gateway_declines_total", "Gateway declines").unwrap();
        let partial_failures = Counter::new(
            "settlement_partial_failures_total",
            "Split payments needing manual reconciliation",
        )
        .unwrap();
        let wallet_debits = Counter::new("wallet_debits_total", "Wallet debits applied").unwrap();
        let wallet_credits =
            Counter::new("wallet_credits_total", "Wallet credits applied").unwrap();
        let payout_requests =
            Counter::new("payout_requests_total", "Payout requests created").unwrap();
        let payout_transitions =
            Counter::new("payout_transitions_total", "Payout status transitions").unwrap();
        let scheduler_runs =
            Counter::new("payout_scheduler_runs_total", "Scheduler sweeps executed").unwrap();

        registry.register(Box::new(captures.clone())).unwrap();
        registry.register(Box::new(gateway_declines.clone())).unwrap();
        registry.register(Box::new(partial_failures.clone())).unwrap();
        registry.register(Box::new(wallet_debits.clone())).unwrap();
        registry.register(Box::new(wallet_credits.clone())).unwrap();
        registry.register(Box::new(payout_requests.clone())).unwrap();
        registry.register(Box::new(payout_transitions.clone())).unwrap();
        registry.register(Box::new(scheduler_runs.clone())).unwrap();

        Self {
            registry,
            captures,
            gateway_declines,
            partial_failures,
            wallet_debits,
            wallet_credits,
            payout_requests,
            payout_transitions,
            scheduler_runs,
        }
    }

    pub fn record_capture(&self) {
        self.captures.inc();
    }

    pub fn record_gateway_decline(&self) {
        self.gateway_declines.inc();
    }

    pub fn record_partial_failure(&self) {
        self.partial_failures.inc();
    }

    pub fn record_wallet_debit(&self) {
        self.wallet_debits.inc();
    }

    pub fn record_wallet_credit(&self) {
        self.wallet_credits.inc();
    }

    pub fn record_payout_request(&self) {
        self.payout_requests.inc();
    }

    pub fn record_payout_transition(&self) {
        self.payout_transitions.inc();
    }

    pub fn record_scheduler_run(&self) {
        self.scheduler_runs.inc();
    }

    /// Get Prometheus metrics in text format
    pub fn export(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }
}

impl Default for MonitoringAdapter {
    fn default() -> Self {
        Self::new()
    }
}
