// =============================================================================
// Signal Scanner — one pass over an annotated series
// =============================================================================
//
// Walks bars 1..N (bar 0 has no predecessor and is never evaluated), builds a
// `BarContext` from the aligned indicator columns and asks the rule set for
// the first matching kind.  At most one event per bar; output is in bar order,
// which is ascending timestamp order for a validated series.
// =============================================================================

use crate::indicators::IndicatorFrame;
use crate::market_data::PriceSeries;
use crate::types::SignalEvent;

use super::rules::{BarContext, RuleSet};

pub fn scan(
    series: &PriceSeries,
    frame: &IndicatorFrame,
    shooting_stars: &[bool],
    rules: &RuleSet,
) -> Vec<SignalEvent> {
    let bars = series.bars();

    bars.iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, bar)| {
            let ctx = BarContext {
                close: bar.close,
                upper_band: column(&frame.upper_band, i),
                lower_band: column(&frame.lower_band, i),
                vwap: column(&frame.vwap, i),
                rsi: column(&frame.rsi, i),
                rsi_ma: column(&frame.rsi_ma, i),
                shooting_star: shooting_stars.get(i).copied().unwrap_or(false),
            };
            rules.first_match(&ctx).map(|kind| SignalEvent {
                timestamp: bar.timestamp,
                price: bar.close,
                kind,
            })
        })
        .collect()
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}
