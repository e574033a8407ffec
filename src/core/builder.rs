//! Builder for constructing Subject instances.

use crate::config::{FailurePolicy, HubConfig};
use crate::core::Subject;
use crate::core::subject::MetricsSlot;
use crate::error::Result;

/// Builder for constructing a [`Subject`].
///
/// # Examples
///
/// ```rust
/// use statehub::prelude::*;
///
/// # fn example() -> Result<()> {
/// let station = Subject::builder()
///     .with_failure_policy(FailurePolicy::Propagate)
///     .with_history(16)
///     .build(20.0_f64)?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SubjectBuilder {
    config: HubConfig,
    metrics: Option<MetricsSlot>,
}

impl SubjectBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings, e.g. with ones from [`HubConfig::loader`].
    pub fn with_config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose what a pass does when a subscriber fails.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Catch panics inside `receive` (default) or let them unwind to the caller.
    pub fn catch_panics(mut self, enabled: bool) -> Self {
        self.config.catch_panics = enabled;
        self
    }

    /// Keep the last `capacity` stored values for rollback (0 disables).
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Record pass metrics on the given OpenTelemetry meter.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.metrics = Some(crate::metrics::HubMetrics::new(meter));
        self
    }

    /// Build the subject holding `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidConfig`](crate::error::HubError::InvalidConfig)
    /// if the settings fail [`HubConfig::validate`].
    pub fn build<T>(self, initial: T) -> Result<Subject<T>>
    where
        T: Send + Sync + 'static,
    {
        self.config.validate()?;
        Ok(Subject::from_parts(initial, self.config, self.metrics))
    }
}

impl Subject<()> {
    /// Create a new builder for constructing a subject.
    pub fn builder() -> SubjectBuilder {
        SubjectBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_HISTORY_CAPACITY;
    use crate::error::HubError;

    #[test]
    fn test_builder_applies_settings() {
        let subject = SubjectBuilder::new()
            .with_failure_policy(FailurePolicy::Propagate)
            .catch_panics(false)
            .with_history(3)
            .build(1_i32)
            .unwrap();

        let config = subject.config();
        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
        assert!(!config.catch_panics);
        assert_eq!(config.history_capacity, 3);
        assert_eq!(*subject.state(), 1);
    }

    #[test]
    fn test_builder_with_config() {
        let config = HubConfig {
            failure_policy: FailurePolicy::Propagate,
            ..HubConfig::default()
        };
        let subject = Subject::builder().with_config(config.clone()).build(0_u8).unwrap();
        assert_eq!(subject.config(), &config);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = SubjectBuilder::new()
            .with_history(MAX_HISTORY_CAPACITY + 1)
            .build(0_u8);
        assert!(matches!(result, Err(HubError::InvalidConfig(_))));
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_records_initial_value() {
        let subject = SubjectBuilder::new().with_history(2).build(5_i32).unwrap();
        let history = subject.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.get_version(0).unwrap().source.as_deref(),
            Some("initial")
        );
    }
}
