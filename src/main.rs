// =============================================================================
// Candle Signal Bot — Main Entry Point
// =============================================================================
//
// Polls one instrument on a fixed cadence, evaluates Bollinger / VWAP / RSI
// rules over the fetched window and forwards any signals as Telegram alerts.
// Without Telegram credentials the bot runs in dry-run mode and only logs.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod alert_format;
mod binance;
mod candle_patterns;
mod driver;
mod indicators;
mod market_data;
mod notify;
mod runtime_config;
mod signals;
mod strategy;
mod types;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::binance::BinanceClient;
use crate::driver::Driver;
use crate::notify::{LogNotifier, Notifier, TelegramNotifier};
use crate::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "signal_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Candle Signal Bot — starting up");

    let config_path =
        std::env::var("SIGNAL_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides()?;

    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        lookback_minutes = config.lookback_minutes,
        rule_set = %config.rule_set,
        custom_rules = config.custom_rules.is_some(),
        "Configured instrument"
    );

    // ── 2. Collaborators ─────────────────────────────────────────────────
    let source = Arc::new(BinanceClient::new()?);

    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_env()? {
        Some(telegram) => {
            info!("Telegram notifier configured");
            Arc::new(telegram)
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set — alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let driver = Driver::new(config, source, notifier)?;

    // ── 3. Shutdown signal ───────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown signal received — finishing current cycle");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive so the loop keeps running.
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    });

    // ── 4. Poll loop ─────────────────────────────────────────────────────
    driver.run(shutdown_rx).await;

    info!("Candle Signal Bot shut down complete.");
    Ok(())
}
