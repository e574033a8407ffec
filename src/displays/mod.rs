//! Weather-station displays: ready-made [`Subscriber`](crate::core::Subscriber)s for `f64` readings.
//!
//! Each display writes one formatted line per received value to its sink
//! (stdout unless another writer is supplied) and keeps its own private state.

mod current;
mod statistics;

pub use current::CurrentConditionsDisplay;
pub use statistics::StatisticsDisplay;
