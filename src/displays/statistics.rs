use crate::core::Subscriber;
use crate::error::ReceiveError;
use parking_lot::Mutex;
use std::io::{self, Stdout, Write};

/// Running min/max/average of every temperature received.
pub struct StatisticsDisplay<W = Stdout> {
    inner: Mutex<Inner<W>>,
}

struct Inner<W> {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    out: W,
}

impl StatisticsDisplay<Stdout> {
    /// Display that prints to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StatisticsDisplay<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StatisticsDisplay<W> {
    /// Display that writes to `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                count: 0,
                sum: 0.0,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                out,
            }),
        }
    }

    /// Number of readings seen.
    pub fn count(&self) -> u64 {
        self.inner.lock().count
    }

    /// `(average, max, min)` so far, or `None` before the first reading.
    pub fn summary(&self) -> Option<(f64, f64, f64)> {
        let inner = self.inner.lock();
        (inner.count > 0).then(|| (inner.sum / inner.count as f64, inner.max, inner.min))
    }

    /// Consume the display and return its writer.
    pub fn into_writer(self) -> W {
        self.inner.into_inner().out
    }
}

impl<W: Write + Send> Subscriber<f64> for StatisticsDisplay<W> {
    fn receive(&self, value: &f64) -> Result<(), ReceiveError> {
        let mut inner = self.inner.lock();
        inner.count += 1;
        inner.sum += value;
        inner.min = inner.min.min(*value);
        inner.max = inner.max.max(*value);

        let avg = inner.sum / inner.count as f64;
        let (max, min) = (inner.max, inner.min);
        writeln!(
            inner.out,
            "Avg/Max/Min temperature = {:.1}/{:.1}/{:.1}",
            avg, max, min
        )?;
        Ok(())
    }

    fn name(&self) -> &str {
        "statistics"
    }
}
