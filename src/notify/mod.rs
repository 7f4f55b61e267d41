// =============================================================================
// Notifiers — outbound alert delivery
// =============================================================================
//
// The driver hands each rendered alert to a `Notifier` exactly once.  Delivery
// failures surface as errors; retrying is the notifier's business, not the
// engine's.

pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

pub use telegram::TelegramNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Dry-run notifier: writes alerts to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!(alert = %text, "alert (dry run, not delivered)");
        Ok(())
    }
}
