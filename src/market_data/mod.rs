pub mod series;
pub mod source;

// Re-export for convenient access (e.g. `use crate::market_data::Bar`).
pub use series::{Bar, PriceSeries, SeriesError};
pub use source::DataSource;
