//! Hub configuration and its file/environment loader.

mod loader;

pub use loader::HubConfigLoader;

use crate::error::{HubError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound accepted for [`HubConfig::history_capacity`].
pub const MAX_HISTORY_CAPACITY: usize = 1_000_000;

/// What a notification pass does when a subscriber fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and record the failure, then continue with the next subscriber.
    #[default]
    Isolate,
    /// Stop the pass at the first failure and return it to the caller.
    Propagate,
}

/// Settings that govern a [`Subject`](crate::core::Subject).
///
/// Every field has a default, so an empty file (or no file at all) is a valid
/// configuration.
///
/// ```yaml
/// failure_policy: propagate
/// catch_panics: true
/// history_capacity: 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Behaviour on subscriber failure.
    pub failure_policy: FailurePolicy,
    /// Convert panics inside `receive` into [`ReceiveError::Panicked`](crate::error::ReceiveError::Panicked).
    pub catch_panics: bool,
    /// Number of stored values kept for rollback (0 disables history).
    pub history_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Isolate,
            catch_panics: true,
            history_capacity: 0,
        }
    }
}

impl HubConfig {
    /// Start building a loader for file and environment sources.
    pub fn loader() -> HubConfigLoader {
        HubConfigLoader::new()
    }

    /// Check that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`] if `history_capacity` exceeds
    /// [`MAX_HISTORY_CAPACITY`].
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(HubError::InvalidConfig(format!(
                "history_capacity must be <= {}, got {}",
                MAX_HISTORY_CAPACITY, self.history_capacity
            )));
        }
        Ok(())
    }
}
