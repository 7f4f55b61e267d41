// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the *population* standard deviation
// of the closes in the same trailing window.
//
// The bands are the volatility envelope the breakout / reversal / buy rules
// compare the close against.

use super::sma::calculate_sma;

/// Bands for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands for every bar in `closes`.
///
/// The result is aligned with `closes`; the first `period - 1` slots are
/// `None`.  A zero-variance window yields `upper == middle == lower`.
///
/// Returns all `None` when `period == 0` or there are fewer than `period`
/// closes.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerBands>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let means = calculate_sma(closes, period);
    let period_f = period as f64;
    for (i, window) in closes.windows(period).enumerate() {
        let Some(middle) = means[i + period - 1] else { continue };
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
        let std_dev = variance.sqrt();

        let upper = middle + num_std * std_dev;
        let lower = middle - num_std * std_dev;

        if upper.is_finite() && lower.is_finite() {
            out[i + period - 1] = Some(BollingerBands {
                upper,
                middle,
                lower,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let result = calculate_bollinger(&closes, 20, 2.0);
        let bb = result[19].unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!((bb.middle - 10.5).abs() < 1e-12);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes: Vec<f64> = (0..19).map(|x| 100.0 + x as f64).collect();
        let result = calculate_bollinger(&closes, 20, 2.0);
        assert_eq!(result.len(), 19);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_defined_from_period_minus_one() {
        let closes: Vec<f64> = (0..30).map(|x| 100.0 + (x % 4) as f64).collect();
        let result = calculate_bollinger(&closes, 20, 2.0);
        assert!(result[..19].iter().all(Option::is_none));
        assert!(result[19..].iter().all(Option::is_some));
    }

    #[test]
    fn bollinger_middle_is_window_mean_and_bands_symmetric() {
        let closes: Vec<f64> = (0..40)
            .map(|x| 100.0 + (x as f64 * 0.7).sin() * 3.0)
            .collect();
        let result = calculate_bollinger(&closes, 20, 2.0);

        for i in 19..closes.len() {
            let window = &closes[i - 19..=i];
            let mean = window.iter().sum::<f64>() / 20.0;
            let sd = (window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 20.0).sqrt();
            let bb = result[i].unwrap();

            assert!((bb.middle - mean).abs() < 1e-9);
            assert!((bb.upper - bb.middle - 2.0 * sd).abs() < 1e-9);
            assert!((bb.middle - bb.lower - 2.0 * sd).abs() < 1e-9);
        }
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0)[19].unwrap();
        assert_eq!(bb.upper, 100.0);
        assert_eq!(bb.middle, 100.0);
        assert_eq!(bb.lower, 100.0);
    }
}
