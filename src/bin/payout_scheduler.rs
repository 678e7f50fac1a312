//! Payout scheduler sidecar
//!
//! Runs one scheduler tick and exits. Intended to be driven by cron or
//! an equivalent external trigger; the engine itself keeps the tick
//! idempotent per period, so an accidental double-invocation is safe.

use chrono::Utc;
use salon_settlement::shared::logging::LoggingUtils;
use salon_settlement::{AppConfig, SettlementEngine};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = LoggingUtils::initialize(&config.logging.level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting payout scheduler tick...");

    let engine = match SettlementEngine::new(config).await {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to initialize engine: {}", e);
            std::process::exit(1);
        }
    };

    match engine.scheduler().run_tick(Utc::now()).await {
        Ok(report) if report.ran => {
            info!(
                salons_scanned = report.salons_scanned,
                requests_created = report.requests_created,
                auto_approved = report.auto_approved,
                failures = report.failures,
                "Scheduler tick finished"
            );
            if report.failures > 0 {
                std::process::exit(2);
            }
        }
        Ok(_) => {
            info!("Scheduler tick skipped (disabled or not due)");
        }
        Err(e) => {
            error!("Scheduler tick failed: {}", e);
            std::process::exit(1);
        }
    }
}
