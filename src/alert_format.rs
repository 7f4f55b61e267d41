// =============================================================================
// Alert Formatter — SignalEvent -> outbound message text
// =============================================================================
//
// Layout (one field per line):
//
//   📢 Trading Signal 📢
//   Time (IST): 2024-03-01 05:30:00
//   Price: 100.5
//   Signal: 🚀 Breakout Signal
//
// Bar timestamps are UTC; the displayed time is shifted by a fixed offset
// (default +05:30).  Pure formatting, no I/O.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};

use crate::types::SignalEvent;

pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER: &str = "📢 Trading Signal 📢";

#[derive(Debug, Clone)]
pub struct AlertFormatter {
    offset: FixedOffset,
    zone_label: String,
    price_decimals: Option<usize>,
}

impl AlertFormatter {
    /// `offset_minutes` east of UTC (330 => +05:30).  `price_decimals == None`
    /// renders the price with the default float formatting.
    pub fn new(
        offset_minutes: i32,
        zone_label: impl Into<String>,
        price_decimals: Option<usize>,
    ) -> Result<Self> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("display offset of {offset_minutes} minutes is out of range"))?;

        Ok(Self {
            offset,
            zone_label: zone_label.into(),
            price_decimals,
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn display_time(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format(DISPLAY_TIME_FORMAT)
            .to_string()
    }

    pub fn display_price(&self, price: f64) -> String {
        match self.price_decimals {
            Some(decimals) => format!("{price:.decimals$}"),
            None => format!("{price}"),
        }
    }

    pub fn render(&self, event: &SignalEvent) -> String {
        format!(
            "{HEADER}\nTime ({}): {}\nPrice: {}\nSignal: {}",
            self.zone_label,
            self.display_time(event.timestamp),
            self.display_price(event.price),
            event.kind.label(),
        )
    }

    /// Parse a displayed wall-clock time back into the UTC instant it came
    /// from.
    #[cfg(test)]
    pub fn parse_display_time(&self, text: &str) -> Result<DateTime<Utc>> {
        use chrono::NaiveDateTime;

        let local = NaiveDateTime::parse_from_str(text.trim(), DISPLAY_TIME_FORMAT)
            .with_context(|| format!("'{text}' is not a display timestamp"))?;
        let utc = local - self.offset_duration();
        Ok(utc.and_utc())
    }

    #[cfg(test)]
    fn offset_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.offset.local_minus_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalKind;
    use chrono::{NaiveDateTime, TimeZone};

    fn event(kind: SignalKind) -> SignalEvent {
        SignalEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            price: 100.5,
            kind,
        }
    }

    #[test]
    fn renders_all_fields() {
        let fmt = AlertFormatter::new(330, "IST", None).unwrap();
        let text = fmt.render(&event(SignalKind::Breakout));
        assert_eq!(
            text,
            "📢 Trading Signal 📢\nTime (IST): 2024-03-01 05:30:00\nPrice: 100.5\nSignal: 🚀 Breakout Signal"
        );
    }

    #[test]
    fn fixed_decimals() {
        let fmt = AlertFormatter::new(330, "IST", Some(2)).unwrap();
        assert!(fmt.render(&event(SignalKind::BuySignal)).contains("Price: 100.50\n"));
        assert_eq!(fmt.display_price(1.23456), "1.23");
    }

    #[test]
    fn labels_by_kind() {
        let fmt = AlertFormatter::new(330, "IST", None).unwrap();
        assert!(fmt
            .render(&event(SignalKind::PotentialReversal))
            .ends_with("Signal: ⚠️ Potential Reversal"));
        assert!(fmt
            .render(&event(SignalKind::RsiOversold))
            .ends_with("Signal: 📈 RSI Oversold"));
    }

    #[test]
    fn offset_crosses_midnight() {
        let fmt = AlertFormatter::new(330, "IST", None).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(fmt.display_time(late), "2025-01-01 01:30:00");
    }

    #[test]
    fn displayed_time_round_trips_to_utc() {
        let fmt = AlertFormatter::new(330, "IST", None).unwrap();
        let ev = event(SignalKind::Breakout);
        let text = fmt.render(&ev);

        let shown = text
            .lines()
            .find_map(|l| l.strip_prefix("Time (IST): "))
            .unwrap();
        let naive = NaiveDateTime::parse_from_str(shown, DISPLAY_TIME_FORMAT).unwrap();
        assert_eq!(naive - chrono::Duration::minutes(330), ev.timestamp.naive_utc());
        assert_eq!(fmt.parse_display_time(shown).unwrap(), ev.timestamp);
    }

    #[test]
    fn negative_offset() {
        let fmt = AlertFormatter::new(-300, "EST", None).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(fmt.display_time(ts), "2024-03-01 07:00:00");
        assert_eq!(fmt.parse_display_time("2024-03-01 07:00:00").unwrap(), ts);
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert!(AlertFormatter::new(24 * 60, "X", None).is_err());
    }
}
