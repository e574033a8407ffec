use crate::core::Subscriber;
use crate::error::ReceiveError;
use parking_lot::Mutex;
use std::io::{self, Stdout, Write};

/// Shows the most recent temperature.
///
/// # Examples
///
/// ```rust
/// use statehub::displays::CurrentConditionsDisplay;
/// use statehub::prelude::*;
/// use std::sync::Arc;
///
/// # fn example() -> Result<()> {
/// let station = Subject::new(0.0_f64);
/// let display = Arc::new(CurrentConditionsDisplay::with_writer(Vec::new()));
/// station.attach(display.clone());
///
/// station.set_state(25.5)?;
/// assert_eq!(display.last_temperature(), Some(25.5));
/// # Ok(())
/// # }
/// ```
pub struct CurrentConditionsDisplay<W = Stdout> {
    inner: Mutex<Inner<W>>,
}

struct Inner<W> {
    last: Option<f64>,
    out: W,
}

impl CurrentConditionsDisplay<Stdout> {
    /// Display that prints to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for CurrentConditionsDisplay<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> CurrentConditionsDisplay<W> {
    /// Display that writes to `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner { last: None, out }),
        }
    }

    /// Last temperature received, if any.
    pub fn last_temperature(&self) -> Option<f64> {
        self.inner.lock().last
    }

    /// Consume the display and return its writer.
    pub fn into_writer(self) -> W {
        self.inner.into_inner().out
    }
}

impl<W: Write + Send> Subscriber<f64> for CurrentConditionsDisplay<W> {
    fn receive(&self, value: &f64) -> Result<(), ReceiveError> {
        let mut inner = self.inner.lock();
        inner.last = Some(*value);
        writeln!(inner.out, "Current conditions: {:.1}", value)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "current-conditions"
    }
}
