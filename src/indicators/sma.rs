// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = (x_{t-period+1} + ... + x_t) / period
//
// Both helpers return a vector aligned index-for-index with the input.  Slots
// without a full trailing window are `None`.
// =============================================================================

/// Rolling mean over a dense series.
///
/// # Edge cases
/// - `period == 0` => every slot is `None`
/// - The first `period - 1` slots are always `None`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let period_f = period as f64;
    for (i, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period_f;
        if mean.is_finite() {
            out[i + period - 1] = Some(mean);
        }
    }
    out
}

/// Rolling mean over a sparse series (e.g. an RSI column whose early slots are
/// undefined).  A slot is defined only when every value in its trailing
/// window is defined.
pub fn calculate_sma_sparse(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let period_f = period as f64;
    for (i, window) in values.windows(period).enumerate() {
        let sum: Option<f64> = window.iter().copied().sum();
        out[i + period - 1] = sum.map(|s| s / period_f).filter(|m| m.is_finite());
    }
    out
}
