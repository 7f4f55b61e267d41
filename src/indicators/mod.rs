// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the signal rules
// read.  Every column is a `Vec<Option<f64>>` aligned index-for-index with the
// bars, so callers are forced to handle insufficient-history slots.

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod vwap;

use crate::market_data::PriceSeries;

/// Window lengths and multipliers for one indicator pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub rsi_period: usize,
    pub rsi_ma_period: usize,
    /// `None` => cumulative VWAP over the whole series.
    pub vwap_window: Option<usize>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            rsi_period: 14,
            rsi_ma_period: 10,
            vwap_window: None,
        }
    }
}

/// Indicator columns computed over a `PriceSeries`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub upper_band: Vec<Option<f64>>,
    pub middle_band: Vec<Option<f64>>,
    pub lower_band: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub rsi_ma: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        let closes = series.closes();

        let bands = bollinger::calculate_bollinger(
            &closes,
            params.bollinger_period,
            params.bollinger_std_dev,
        );
        let rsi = rsi::calculate_rsi(&closes, params.rsi_period);
        let rsi_ma = rsi::calculate_rsi_ma(&rsi, params.rsi_ma_period);

        Self {
            upper_band: bands.iter().map(|b| b.map(|b| b.upper)).collect(),
            middle_band: bands.iter().map(|b| b.map(|b| b.middle)).collect(),
            lower_band: bands.iter().map(|b| b.map(|b| b.lower)).collect(),
            vwap: vwap::calculate_vwap(series.bars(), params.vwap_window),
            rsi,
            rsi_ma,
        }
    }
}
