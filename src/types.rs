// =============================================================================
// Shared types used across the signal bot
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of alert a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Breakout,
    PotentialReversal,
    BuySignal,
    RsiOverbought,
    RsiOversold,
}

impl SignalKind {
    /// Label used in the outbound alert text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Breakout => "🚀 Breakout Signal",
            Self::PotentialReversal => "⚠️ Potential Reversal",
            Self::BuySignal => "🛒 Buy Signal",
            Self::RsiOverbought => "📉 RSI Overbought",
            Self::RsiOversold => "📈 RSI Oversold",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakout => write!(f, "Breakout"),
            Self::PotentialReversal => write!(f, "PotentialReversal"),
            Self::BuySignal => write!(f, "BuySignal"),
            Self::RsiOverbought => write!(f, "RsiOverbought"),
            Self::RsiOversold => write!(f, "RsiOversold"),
        }
    }
}

/// A discrete alert emitted for one bar.  Lives for a single cycle only.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub kind: SignalKind,
}
