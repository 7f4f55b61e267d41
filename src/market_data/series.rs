// =============================================================================
// Price Series — validated, time-ordered OHLCV bars
// =============================================================================
//
// A `PriceSeries` is the only input the signal engine accepts.  Construction
// validates every bar up front so that downstream indicator code can assume
// finite, non-negative values and strictly increasing timestamps.
// =============================================================================

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Reasons a series is rejected as invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("timestamp at index {index} ({timestamp}) is not after the previous bar")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("bar {index} has negative {field}: {value}")]
    NegativeValue {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index} has non-finite {field}")]
    NonFiniteValue { index: usize, field: &'static str },

    #[error("bar {index} has high {high} below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },
}

/// An ordered, validated sequence of bars for one instrument and interval.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate `bars` and wrap them.
    ///
    /// Rejects an empty input, non-finite or negative fields, bars whose high
    /// is below their low, and timestamps that do not strictly increase.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, bar) in bars.iter().enumerate() {
            validate_bar(index, bar)?;
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp {
                    index,
                    timestamp: bar.timestamp,
                });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

fn validate_bar(index: usize, bar: &Bar) -> Result<(), SeriesError> {
    let fields = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
        ("volume", bar.volume),
    ];

    for (field, value) in fields {
        if !value.is_finite() {
            return Err(SeriesError::NonFiniteValue { index, field });
        }
        if value < 0.0 {
            return Err(SeriesError::NegativeValue {
                index,
                field,
                value,
            });
        }
    }

    if bar.high < bar.low {
        return Err(SeriesError::InvertedRange {
            index,
            high: bar.high,
            low: bar.low,
        });
    }

    Ok(())
}
