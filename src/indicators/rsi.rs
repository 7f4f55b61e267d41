// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1 — Per-bar change from the previous close.  Bar 0 has no previous
//          close and counts as a change of 0.
// Step 2 — Seed average gain / average loss with bar 0's (zero) gain / loss.
// Step 3 — Apply Wilder's exponential smoothing (alpha = 1 / period) from
//          bar 1 on:
//            avg_gain = (1 - alpha) * prev_avg_gain + alpha * current_gain
//            avg_loss = (1 - alpha) * prev_avg_loss + alpha * current_loss
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Values are reported once `period` bars have been seen, i.e. from index
// `period - 1`.  The RSI moving average is a plain SMA over the RSI column
// (see `sma.rs`).
// =============================================================================

use super::sma::calculate_sma_sparse;

/// Compute the RSI for every close, aligned index-for-index with `closes`.
///
/// The first `period - 1` slots are `None`; the first defined value sits at
/// index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `closes.len() < period` => all `None`
/// - Average loss of zero (including a perfectly flat market) => 100.0.
/// - A non-finite result leaves that slot and all later slots `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0_f64;
    let mut avg_loss = 0.0_f64;

    for (i, &close) in closes.iter().enumerate() {
        let delta = if i == 0 { 0.0 } else { close - closes[i - 1] };
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
            avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
        }

        if i + 1 < period {
            continue;
        }

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => out[i] = Some(rsi),
            None => break,
        }
    }

    out
}

/// Simple moving average of an aligned RSI column.
pub fn calculate_rsi_ma(rsi: &[Option<f64>], ma_period: usize) -> Vec<Option<f64>> {
    calculate_sma_sparse(rsi, ma_period)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Zero average loss maps to 100.0, whether or not there were gains.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_insufficient_data() {
        // Need `period` closes. 13 closes < 14.
        let closes: Vec<f64> = (1..=13).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 13);
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_alignment() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), closes.len());
        assert!(series[..13].iter().all(Option::is_none));
        assert!(series[13..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_100() {
        // No down moves at all => average loss is zero => 100.
        let closes = vec![100.0; 30];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.iter().flatten().count(), 17);
        for v in series.into_iter().flatten() {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_first_bar_counts_as_zero_change() {
        // alpha = 1/2.  Bar 0: gain = loss = 0.  Bar 1 (+1): gain 0.5, loss 0.
        // Bar 2 (-0.5): gain 0.25, loss 0.25.
        let series = calculate_rsi(&[10.0, 11.0, 10.5], 2);
        assert_eq!(series[0], None);
        assert_eq!(series[1], Some(100.0));
        assert!((series[2].unwrap() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_matches_reference_values() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 45.01, 44.02,
            41.90, 43.37, 47.55, 46.80, 45.12,
        ];
        let series = calculate_rsi(&closes, 14);
        assert!(series[12].is_none());
        assert!((series[13].unwrap() - 42.781_86).abs() < 1e-4);
        assert!((series[14].unwrap() - 47.827_406).abs() < 1e-4);
        assert!((series[15].unwrap() - 36.453_131).abs() < 1e-4);
        assert!((series[24].unwrap() - 51.946_985).abs() < 1e-4);
        for v in series.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_ma_defined_after_rsi_plus_ma_period() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        let ma = calculate_rsi_ma(&rsi, 10);
        assert_eq!(ma.len(), closes.len());
        assert!(ma[..22].iter().all(Option::is_none));
        assert!(ma[22..].iter().all(Option::is_some));

        let expected = rsi[13..23].iter().map(|v| v.unwrap()).sum::<f64>() / 10.0;
        assert!((ma[22].unwrap() - expected).abs() < 1e-9);
    }
}
