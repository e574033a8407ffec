//! # statehub
//!
//! Synchronous one-to-many state-change notifications with dynamic subscriber management.
//!
//! ## Overview
//!
//! A [`Subject`](core::Subject) owns one observed value and an ordered list of
//! subscribers. Storing a new value pushes it to every subscriber, in the order
//! they were attached, before `set_state` returns:
//! - Duplicate attachment is allowed and yields duplicate notifications
//! - `detach` removes the first matching attachment; unknown subscribers are a no-op
//! - Each pass runs over a snapshot taken when it starts
//! - A failing subscriber is isolated (default) or stops the pass
//!
//! ## Quick Start
//!
//! ```rust
//! use statehub::displays::{CurrentConditionsDisplay, StatisticsDisplay};
//! use statehub::prelude::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let station = Subject::new(0.0_f64);
//!
//! let current = Arc::new(CurrentConditionsDisplay::new());
//! let stats = Arc::new(StatisticsDisplay::new());
//! station.attach(current.clone());
//! station.attach(stats.clone());
//!
//! station.set_state(25.5)?;
//! station.set_state(30.0)?;
//!
//! station.detach(&current);
//! station.set_state(28.0)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `history` (default): versioned history of stored values with rollback
//! - `metrics`: OpenTelemetry metrics for notification passes

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod displays;
pub mod error;
pub mod features;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::config::{FailurePolicy, HubConfig};
    pub use crate::core::{
        FnSubscriber, NotifyReport, Subject, SubjectBuilder, Subscriber, SubscriberId,
        Subscription,
    };
    pub use crate::error::{HubError, ReceiveError, Result};
}
