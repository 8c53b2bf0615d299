//! Anonymous usage statistics.

pub mod geo;
pub mod statistics;
pub mod usage;
pub mod webhook;

pub use geo::{CountryDatabase, GeoError};
pub use statistics::StatisticReporting;
pub use usage::{Api, UsageData, UsageResult};
pub use webhook::WebHook;
