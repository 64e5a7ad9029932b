//! Membership reporting: grouped aggregation, gap-filled time series, and
//! CSV export.

pub mod aggregate;
pub mod export;
pub mod timeseries;

pub use aggregate::{aggregate, AggregationBucket, GroupBy, AGE_BANDS};
pub use export::to_csv;
pub use timeseries::{timeseries, Granularity, TimeSeriesPoint};
