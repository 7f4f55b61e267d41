// =============================================================================
// Driver — periodic poll: fetch -> evaluate -> format -> dispatch
// =============================================================================
//
// One cycle runs to completion before the idle wait starts; cycles never
// overlap.  Shutdown is only observed before a cycle and during the idle
// wait, so a cycle is never cut off between rendering and dispatch.
//
// Every alert of a cycle is rendered before the first one is dispatched.
// Each dispatch is attempted exactly once; failures are logged and counted.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::alert_format::AlertFormatter;
use crate::market_data::DataSource;
use crate::notify::Notifier;
use crate::runtime_config::RuntimeConfig;
use crate::strategy::SignalEngine;

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub bars: usize,
    pub events: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct Driver {
    config: RuntimeConfig,
    engine: SignalEngine,
    formatter: AlertFormatter,
    source: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
}

impl Driver {
    pub fn new(
        config: RuntimeConfig,
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate().context("invalid runtime config")?;

        let engine = SignalEngine::new(config.indicator_params(), config.rule_set());
        let formatter = config.alert_formatter()?;

        Ok(Self {
            config,
            engine,
            formatter,
            source,
            notifier,
        })
    }

    /// Run a single fetch / evaluate / dispatch cycle.
    ///
    /// Fetch failures and invalid series are returned as errors with nothing
    /// dispatched.  Dispatch failures do not fail the cycle.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let cfg = &self.config;

        let bars = self
            .source
            .fetch_bars(&cfg.symbol, &cfg.interval, cfg.lookback())
            .await
            .with_context(|| format!("failed to fetch {} {} bars", cfg.symbol, cfg.interval))?;
        let bar_count = bars.len();

        let events = self
            .engine
            .evaluate(bars)
            .with_context(|| format!("rejected {} bars for {}", bar_count, cfg.symbol))?;

        let messages: Vec<String> = events.iter().map(|e| self.formatter.render(e)).collect();

        let mut report = CycleReport {
            bars: bar_count,
            events: events.len(),
            ..CycleReport::default()
        };

        if events.is_empty() {
            debug!(bars = bar_count, "no signals this cycle");
            return Ok(report);
        }

        for (event, message) in events.iter().zip(&messages) {
            match self.notifier.send(message).await {
                Ok(()) => {
                    report.delivered += 1;
                    info!(
                        kind = %event.kind,
                        price = event.price,
                        at = %event.timestamp,
                        "signal dispatched"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(kind = %event.kind, at = %event.timestamp, error = %e, "signal dispatch failed");
                }
            }
        }

        Ok(report)
    }

    /// Poll until `shutdown` flips to `true` (or its sender is dropped).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let poll = self.config.poll_interval();

        let params = self.engine.params();
        info!(
            symbol = %self.config.symbol,
            interval = %self.config.interval,
            poll_secs = poll.as_secs(),
            bollinger = %format!("{}x{}", params.bollinger_period, params.bollinger_std_dev),
            rsi = %format!("{}/{}", params.rsi_period, params.rsi_ma_period),
            rules = self.engine.rules().rules().len(),
            display_offset = %self.formatter.offset(),
            "signal loop starting"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let cycle_id = Uuid::new_v4();
            let span = info_span!("cycle", %cycle_id, symbol = %self.config.symbol);
            match self.run_cycle().instrument(span).await {
                Ok(report) => info!(
                    %cycle_id,
                    bars = report.bars,
                    events = report.events,
                    delivered = report.delivered,
                    failed = report.failed,
                    "cycle complete"
                ),
                Err(e) => error!(%cycle_id, error = %format!("{e:#}"), "cycle failed — no alerts sent"),
            }

            debug!(secs = poll.as_secs(), "waiting for the next update");
            tokio::select! {
                _ = tokio::time::sleep(poll) => {}
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        info!("signal loop stopped");
    }
}
