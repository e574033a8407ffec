//! Hub metrics tracking using OpenTelemetry.

use crate::core::NotifyReport;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for notification passes.
///
/// # Examples
///
/// ```rust,no_run
/// use statehub::metrics::HubMetrics;
/// use opentelemetry::global;
///
/// let metrics = HubMetrics::new(global::meter("statehub"));
/// let timer = metrics.start_pass();
/// // ... notify subscribers ...
/// metrics.record_pass(timer, 3, 0);
/// ```
#[derive(Clone)]
pub struct HubMetrics {
    passes: Counter<u64>,
    deliveries: Counter<u64>,
    failures: Counter<u64>,
    pass_duration: Histogram<f64>,
    active_subscribers: Gauge<i64>,
}

impl HubMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let passes = meter
            .u64_counter("statehub.pass.count")
            .with_description("Total number of notification passes")
            .build();

        let deliveries = meter
            .u64_counter("statehub.delivery.success")
            .with_description("Number of values received without error")
            .build();

        let failures = meter
            .u64_counter("statehub.delivery.failures")
            .with_description("Number of failed receive calls")
            .build();

        let pass_duration = meter
            .f64_histogram("statehub.pass.duration")
            .with_description("Duration of notification passes in seconds")
            .with_unit("s")
            .build();

        let active_subscribers = meter
            .i64_gauge("statehub.subscribers.active")
            .with_description("Number of attached subscribers")
            .build();

        Self {
            passes,
            deliveries,
            failures,
            pass_duration,
            active_subscribers,
        }
    }

    /// Start timing a pass. Pass the returned `Instant` to [`record_pass`](Self::record_pass).
    pub fn start_pass(&self) -> Instant {
        self.passes.add(1, &[]);
        Instant::now()
    }

    /// Record a finished (or aborted) pass.
    pub fn record_pass(&self, start: Instant, delivered: usize, failed: usize) {
        self.pass_duration.record(start.elapsed().as_secs_f64(), &[]);
        self.deliveries.add(delivered as u64, &[]);
        self.failures.add(failed as u64, &[]);
    }

    /// Record a pass from its report.
    pub fn record_report(&self, start: Instant, report: &NotifyReport) {
        self.record_pass(start, report.delivered, report.failures.len());
    }

    /// Update the number of attached subscribers.
    pub fn update_subscriber_count(&self, count: usize) {
        self.active_subscribers.record(count as i64, &[]);
    }
}
