// =============================================================================
// Runtime Configuration — signal bot settings
// =============================================================================
//
// Every tunable lives here: the instrument, the fetch window, indicator
// periods, the active rule set and the alert display format.
//
// Loaded from JSON.  All fields carry `#[serde(default)]` so that a partial
// (or empty) file still deserialises; a handful of environment variables
// override the file for quick deployment tweaks.  Secrets (Telegram
// credentials) are read from the environment only and never live here.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alert_format::AlertFormatter;
use crate::indicators::IndicatorParams;
use crate::signals::{RulePreset, RuleSet, SignalRule};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbol() -> String {
    "ETHUSDT".to_string()
}

fn default_interval() -> String {
    "5m".to_string()
}

fn default_lookback_minutes() -> u64 {
    24 * 60
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_std_dev() -> f64 {
    2.0
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_ma_period() -> usize {
    10
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_display_offset_minutes() -> i32 {
    330
}

fn default_display_zone_label() -> String {
    "IST".to_string()
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Instrument & fetch window ------------------------------------------

    /// Exchange symbol, e.g. "ETHUSDT".
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Kline interval, e.g. "5m".
    #[serde(default = "default_interval")]
    pub interval: String,

    /// How far back each cycle fetches.
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: u64,

    // --- Indicators ----------------------------------------------------------

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    #[serde(default = "default_bollinger_std_dev")]
    pub bollinger_std_dev: f64,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_rsi_ma_period")]
    pub rsi_ma_period: usize,

    /// Rolling VWAP window in bars; `None` accumulates over the whole fetched
    /// window.
    #[serde(default)]
    pub vwap_window: Option<usize>,

    // --- Rules ---------------------------------------------------------------

    #[serde(default)]
    pub rule_set: RulePreset,

    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// When present, replaces `rule_set` entirely.
    #[serde(default)]
    pub custom_rules: Option<Vec<SignalRule>>,

    // --- Scheduling & display -----------------------------------------------

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Minutes east of UTC used for displayed times (330 => +05:30).
    #[serde(default = "default_display_offset_minutes")]
    pub display_offset_minutes: i32,

    #[serde(default = "default_display_zone_label")]
    pub display_zone_label: String,

    /// Fixed number of price decimals; `None` uses default float rendering.
    #[serde(default)]
    pub price_decimals: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            interval: default_interval(),
            lookback_minutes: default_lookback_minutes(),
            bollinger_period: default_bollinger_period(),
            bollinger_std_dev: default_bollinger_std_dev(),
            rsi_period: default_rsi_period(),
            rsi_ma_period: default_rsi_ma_period(),
            vwap_window: None,
            rule_set: RulePreset::default(),
            rsi_overbought: default_rsi_overbought(),
            rsi_oversold: default_rsi_oversold(),
            custom_rules: None,
            poll_interval_secs: default_poll_interval_secs(),
            display_offset_minutes: default_display_offset_minutes(),
            display_zone_label: default_display_zone_label(),
            price_decimals: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbol = %config.symbol,
            interval = %config.interval,
            rule_set = %config.rule_set,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `SIGNAL_SYMBOL`, `SIGNAL_INTERVAL` and `SIGNAL_POLL_SECS` on top of
    /// the loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(symbol) = lookup("SIGNAL_SYMBOL").filter(|s| !s.trim().is_empty()) {
            self.symbol = symbol.trim().to_uppercase();
        }
        if let Some(interval) = lookup("SIGNAL_INTERVAL").filter(|s| !s.trim().is_empty()) {
            self.interval = interval.trim().to_string();
        }
        if let Some(secs) = lookup("SIGNAL_POLL_SECS") {
            self.poll_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("SIGNAL_POLL_SECS is not a number: {secs}"))?;
        }
        Ok(())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            bail!("symbol must not be empty");
        }
        if self.bollinger_period == 0 || self.rsi_period == 0 || self.rsi_ma_period == 0 {
            bail!("indicator periods must be at least 1");
        }
        if self.vwap_window == Some(0) {
            bail!("vwap_window must be at least 1 when set");
        }
        if !(self.bollinger_std_dev.is_finite() && self.bollinger_std_dev > 0.0) {
            bail!("bollinger_std_dev must be positive, got {}", self.bollinger_std_dev);
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.lookback_minutes == 0 {
            bail!("lookback_minutes must be at least 1");
        }
        // The window is sent to the exchange as i64 milliseconds.
        let lookback_ms = self
            .lookback_minutes
            .checked_mul(60_000)
            .and_then(|ms| i64::try_from(ms).ok());
        if lookback_ms.is_none() {
            bail!("lookback_minutes is too large: {}", self.lookback_minutes);
        }
        if self.custom_rules.as_ref().is_some_and(Vec::is_empty) {
            bail!("custom_rules is present but empty");
        }
        self.alert_formatter()?;
        Ok(())
    }

    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            bollinger_period: self.bollinger_period,
            bollinger_std_dev: self.bollinger_std_dev,
            rsi_period: self.rsi_period,
            rsi_ma_period: self.rsi_ma_period,
            vwap_window: self.vwap_window,
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        match &self.custom_rules {
            Some(rules) => RuleSet::new(rules.clone()),
            None => RuleSet::from_preset(self.rule_set, self.rsi_overbought, self.rsi_oversold),
        }
    }

    pub fn alert_formatter(&self) -> Result<AlertFormatter> {
        AlertFormatter::new(
            self.display_offset_minutes,
            self.display_zone_label.clone(),
            self.price_decimals,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_minutes.saturating_mul(60))
    }
}
