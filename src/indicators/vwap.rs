// =============================================================================
// Volume-Weighted Average Price (VWAP)
// =============================================================================
//
// VWAP_t = Σ(typical_price_i * volume_i) / Σ(volume_i)
// typical_price = (high + low + close) / 3
//
// Anchoring:
//   - `window == None`    => cumulative from the first bar of the series.  The
//                            series is re-fetched every cycle, so this is
//                            relative to the fetched window, not the session.
//   - `window == Some(n)` => trailing sum over the last `n` bars.
// =============================================================================

use crate::market_data::Bar;

/// Compute VWAP for every bar, aligned with `bars`.
///
/// A slot is `None` while its accumulated volume is zero, and (rolling mode
/// only) for the first `n - 1` bars.
pub fn calculate_vwap(bars: &[Bar], window: Option<usize>) -> Vec<Option<f64>> {
    match window {
        None => cumulative_vwap(bars),
        Some(n) => rolling_vwap(bars, n),
    }
}

fn cumulative_vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut pv_sum = 0.0_f64;
    let mut vol_sum = 0.0_f64;

    bars.iter()
        .map(|bar| {
            pv_sum += bar.typical_price() * bar.volume;
            vol_sum += bar.volume;
            ratio(pv_sum, vol_sum)
        })
        .collect()
}

fn rolling_vwap(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    for (i, window) in bars.windows(period).enumerate() {
        let (pv_sum, vol_sum) = window.iter().fold((0.0_f64, 0.0_f64), |(pv, v), bar| {
            (pv + bar.typical_price() * bar.volume, v + bar.volume)
        });
        out[i + period - 1] = ratio(pv_sum, vol_sum);
    }
    out
}

fn ratio(pv_sum: f64, vol_sum: f64) -> Option<f64> {
    if vol_sum == 0.0 {
        return None;
    }
    let vwap = pv_sum / vol_sum;
    vwap.is_finite().then_some(vwap)
}
