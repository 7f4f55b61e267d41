// =============================================================================
// Binance REST API Client — public kline history
// =============================================================================
//
// Only the unsigned `GET /api/v3/klines` endpoint is used, so no API key is
// required.  A lookback window longer than one page (1000 klines) is fetched
// page by page, advancing `startTime` past the last kline received.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, instrument};

use crate::market_data::{Bar, DataSource};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Binance hard cap on klines per request.
const KLINES_PAGE_LIMIT: usize = 1000;

/// Upper bound on pages per fetch, so a misbehaving server cannot spin us.
const MAX_PAGES: usize = 50;

#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines for a `[start_ms, end_ms]` range (one page).
    ///
    /// Array indices of each kline:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
    ///   [6] closeTime, ...
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&startTime={}&endTime={}&limit={}",
            self.base_url, symbol, interval, start_ms, end_ms, limit
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!("Binance GET /api/v3/klines returned {}: {}", status, body);
        }

        let bars = parse_klines(&body)?;
        debug!(symbol, interval, count = bars.len(), "klines page fetched");
        Ok(bars)
    }

    /// Fetch every kline whose open time falls in `[now - lookback, now]`.
    #[instrument(skip(self), name = "binance::get_history")]
    pub async fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        lookback: Duration,
    ) -> Result<Vec<Bar>> {
        let end_ms = Utc::now().timestamp_millis();
        let lookback_ms = i64::try_from(lookback.as_millis()).context("lookback window too large")?;
        let mut start_ms = end_ms - lookback_ms;

        let mut bars: Vec<Bar> = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self
                .get_klines(symbol, interval, start_ms, end_ms, KLINES_PAGE_LIMIT)
                .await?;
            let next = next_page_start(&page, end_ms);
            bars.extend(page);

            match next {
                Some(next_ms) => start_ms = next_ms,
                None => break,
            }
        }

        debug!(symbol, interval, count = bars.len(), "kline history fetched");
        Ok(bars)
    }
}

#[async_trait]
impl DataSource for BinanceClient {
    async fn fetch_bars(&self, symbol: &str, interval: &str, lookback: Duration) -> Result<Vec<Bar>> {
        self.get_history(symbol, interval, lookback).await
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// -------------------------------------------------------------------------
// Response parsing
// -------------------------------------------------------------------------

/// `startTime` for the page after `page`, or `None` once the window is
/// covered.
///
/// A short (or empty) page means the server has nothing newer; a full page
/// continues one millisecond past its last open time unless that is already
/// beyond `end_ms`.
fn next_page_start(page: &[Bar], end_ms: i64) -> Option<i64> {
    if page.len() < KLINES_PAGE_LIMIT {
        return None;
    }
    let next_ms = page.last()?.timestamp.timestamp_millis() + 1;
    (next_ms <= end_ms).then_some(next_ms)
}

/// Parse Binance's array-of-arrays kline payload into bars.
///
/// Any entry that is not an array of at least six elements, or whose numeric
/// fields do not parse, fails the whole payload.
fn parse_klines(body: &serde_json::Value) -> Result<Vec<Bar>> {
    let raw = body.as_array().context("klines response is not an array")?;

    raw.iter()
        .enumerate()
        .map(|(i, entry)| {
            let arr = entry
                .as_array()
                .with_context(|| format!("kline entry {i} is not an array"))?;

            if arr.len() < 6 {
                anyhow::bail!("kline entry {i} has {} elements, expected at least 6", arr.len());
            }

            let open_time = arr[0]
                .as_i64()
                .with_context(|| format!("kline entry {i} has no integer open time"))?;

            Ok(Bar::new(
                millis_to_utc(open_time)?,
                parse_str_f64(&arr[1])?,
                parse_str_f64(&arr[2])?,
                parse_str_f64(&arr[3])?,
                parse_str_f64(&arr[4])?,
                parse_str_f64(&arr[5])?,
            ))
        })
        .collect()
}

fn millis_to_utc(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .with_context(|| format!("kline open time {ms} is out of range"))
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_klines_ok() {
        let json = serde_json::json!([
            [1700000000000i64, "2000.10", "2010.00", "1995.50", "2005.25", "123.456",
             1700000299999i64, "0", 10, "0", "0", "0"],
            [1700000300000i64, "2005.25", "2006.00", "2001.00", "2002.00", "50.0",
             1700000599999i64, "0", 10, "0", "0", "0"]
        ]);
        let bars = parse_klines(&json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp_millis(), 1_700_000_000_000);
        assert!((bars[0].close - 2005.25).abs() < f64::EPSILON);
        assert!((bars[1].volume - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_klines_accepts_numeric_fields() {
        let json = serde_json::json!([[0i64, 1.0, 2.0, 0.5, 1.5, 10.0]]);
        let bars = parse_klines(&json).unwrap();
        assert_eq!(bars[0].high, 2.0);
    }

    #[test]
    fn parse_klines_rejects_short_entry() {
        let json = serde_json::json!([[1700000000000i64, "1", "2"]]);
        assert!(parse_klines(&json).is_err());
    }

    #[test]
    fn parse_klines_rejects_garbage_number() {
        let json = serde_json::json!([[1700000000000i64, "abc", "2", "1", "1.5", "10"]]);
        assert!(parse_klines(&json).is_err());
    }

    #[test]
    fn parse_klines_rejects_non_array() {
        let json = serde_json::json!({ "code": -1121, "msg": "Invalid symbol." });
        assert!(parse_klines(&json).is_err());
    }

    fn page(len: usize, first_ms: i64) -> Vec<Bar> {
        (0..len)
            .map(|i| {
                let ms = first_ms + i as i64 * 300_000;
                Bar::new(millis_to_utc(ms).unwrap(), 1.0, 1.0, 1.0, 1.0, 1.0)
            })
            .collect()
    }

    #[test]
    fn full_page_advances_past_last_open_time() {
        let p = page(KLINES_PAGE_LIMIT, 0);
        let last_ms = 999 * 300_000;
        assert_eq!(next_page_start(&p, i64::MAX), Some(last_ms + 1));
    }

    #[test]
    fn short_page_ends_pagination() {
        assert_eq!(next_page_start(&page(KLINES_PAGE_LIMIT - 1, 0), i64::MAX), None);
        assert_eq!(next_page_start(&page(1, 0), i64::MAX), None);
    }

    #[test]
    fn empty_page_ends_pagination() {
        assert_eq!(next_page_start(&[], i64::MAX), None);
    }

    #[test]
    fn full_page_reaching_window_end_stops() {
        let p = page(KLINES_PAGE_LIMIT, 0);
        let last_ms = 999 * 300_000;
        assert_eq!(next_page_start(&p, last_ms), None);
        assert_eq!(next_page_start(&p, last_ms + 1), Some(last_ms + 1));
    }

    #[test]
    fn debug_output_shows_base_url() {
        let client = BinanceClient::with_base_url("http://localhost:1").unwrap();
        assert!(format!("{client:?}").contains("localhost:1"));
    }
}
