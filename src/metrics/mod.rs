//! Built-in metrics for notification passes.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Notification passes and their duration
//! - Successful and failed deliveries
//! - Active subscribers
//!
//! # Examples
//!
//! ```rust,no_run
//! use statehub::prelude::*;
//! use opentelemetry::global;
//!
//! # fn example() -> Result<()> {
//! let subject = Subject::builder()
//!     .with_metrics(global::meter("weather-station"))
//!     .build(21.0_f64)?;
//! # Ok(())
//! # }
//! ```

mod hub_metrics;

pub use hub_metrics::HubMetrics;
