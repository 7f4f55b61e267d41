use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::Bar;

/// Anything that can hand back a trailing window of bars for one instrument.
///
/// Implementations own their network handles; the engine never sees them.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_bars(&self, symbol: &str, interval: &str, lookback: Duration) -> Result<Vec<Bar>>;
}
