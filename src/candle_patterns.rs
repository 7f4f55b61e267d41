// =============================================================================
// Candle Pattern Detector — single-bar shape classification
// =============================================================================
//
// Shooting star: a long upper wick over a small body with almost no lower
// wick, read as buyers being rejected at the highs.
//
//   body       = |close - open|
//   upper_wick = high - max(close, open)
//   lower_wick = min(close, open) - low
//
//   shooting_star  <=>  upper_wick > 2 * body  AND  lower_wick < body
//
// There is no minimum-body floor: a doji (body == 0) with any upper wick
// passes the first test.  The second test then needs lower_wick < 0, which no
// well-formed bar has.
// =============================================================================

use crate::market_data::Bar;

/// Body and wick lengths of a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub body: f64,
    pub upper_wick: f64,
    pub lower_wick: f64,
}

impl CandleShape {
    pub fn of(bar: &Bar) -> Self {
        let top = bar.close.max(bar.open);
        let bottom = bar.close.min(bar.open);
        Self {
            body: (bar.close - bar.open).abs(),
            upper_wick: bar.high - top,
            lower_wick: bottom - bar.low,
        }
    }

    pub fn is_shooting_star(&self) -> bool {
        self.upper_wick > 2.0 * self.body && self.lower_wick < self.body
    }
}

/// Pure per-bar shooting-star test.
pub fn is_shooting_star(bar: &Bar) -> bool {
    CandleShape::of(bar).is_shooting_star()
}

/// Shooting-star flag for every bar, aligned with `bars`.
pub fn detect_shooting_stars(bars: &[Bar]) -> Vec<bool> {
    bars.iter().map(is_shooting_star).collect()
}
