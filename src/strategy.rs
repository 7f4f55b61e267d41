// =============================================================================
// Signal Engine — indicators + patterns + rules in one pass
// =============================================================================
//
// Pipeline (per evaluation, nothing carried between calls):
//   1. Validate the bars into a `PriceSeries` (fatal on invalid input)
//   2. Compute indicator columns (Bollinger, VWAP, RSI, RSI-MA)
//   3. Flag shooting-star candles
//   4. Scan bars 1..N against the ordered rule set
// =============================================================================

use tracing::debug;

use crate::candle_patterns::detect_shooting_stars;
use crate::indicators::{IndicatorFrame, IndicatorParams};
use crate::market_data::{Bar, PriceSeries, SeriesError};
use crate::signals::{scan, RuleSet};
use crate::types::SignalEvent;

#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: IndicatorParams,
    rules: RuleSet,
}

impl SignalEngine {
    pub fn new(params: IndicatorParams, rules: RuleSet) -> Self {
        Self { params, rules }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate `bars` and evaluate them.
    pub fn evaluate(&self, bars: Vec<Bar>) -> Result<Vec<SignalEvent>, SeriesError> {
        let series = PriceSeries::new(bars)?;
        Ok(self.evaluate_series(&series))
    }

    /// Evaluate an already validated series.  Events come back in ascending
    /// timestamp order, at most one per bar, never for bar 0.
    pub fn evaluate_series(&self, series: &PriceSeries) -> Vec<SignalEvent> {
        let frame = IndicatorFrame::compute(series, &self.params);
        let stars = detect_shooting_stars(series.bars());
        let events = scan(series, &frame, &stars, &self.rules);

        let last = series.len() - 1;
        debug!(
            bars = series.len(),
            shooting_stars = stars.iter().filter(|s| **s).count(),
            events = events.len(),
            last_close = series.bars()[last].close,
            last_middle = ?frame.middle_band[last],
            last_vwap = ?frame.vwap[last],
            last_rsi = ?frame.rsi[last],
            "series evaluated"
        );

        events
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(IndicatorParams::default(), RuleSet::default())
    }
}
