//! Versioned history of stored values.
//!
//! Tracks previously published values so a subject can roll back to an
//! earlier state.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A stored value together with when and why it was stored.
#[derive(Debug)]
pub struct StateVersion<T> {
    /// Version number (matches [`Subject::version`](crate::core::Subject::version))
    pub version: u64,
    /// When the value was stored
    pub timestamp: DateTime<Utc>,
    /// The value itself
    pub value: Arc<T>,
    /// Optional description of the change
    pub source: Option<String>,
}

impl<T> Clone for StateVersion<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            timestamp: self.timestamp,
            value: Arc::clone(&self.value),
            source: self.source.clone(),
        }
    }
}

/// Bounded history of stored values.
///
/// Once `max_size` versions are held, recording a new one drops the oldest.
///
/// # Examples
///
/// ```rust
/// use statehub::features::StateHistory;
/// use std::sync::Arc;
///
/// let history = StateHistory::new(2);
/// history.record(0, Arc::new(1.5_f64), Some("initial".to_string()));
/// history.record(1, Arc::new(2.5_f64), None);
/// assert_eq!(*history.step_back(1).unwrap(), 1.5);
/// ```
pub struct StateHistory<T> {
    versions: Mutex<VecDeque<StateVersion<T>>>,
    max_size: usize,
}

impl<T> StateHistory<T> {
    /// Create an empty history holding at most `max_size` versions.
    pub fn new(max_size: usize) -> Self {
        Self {
            versions: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
        }
    }

    /// Maximum number of versions kept.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Record a stored value under `version`.
    pub fn record(&self, version: u64, value: Arc<T>, source: Option<String>) {
        let mut versions = self.versions.lock();
        versions.push_back(StateVersion {
            version,
            timestamp: Utc::now(),
            value,
            source,
        });

        while versions.len() > self.max_size {
            versions.pop_front();
        }
    }

    /// Get the number of versions held.
    pub fn len(&self) -> usize {
        self.versions.lock().len()
    }

    /// Check if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Version number of the newest entry, if any.
    pub fn current_version(&self) -> Option<u64> {
        self.versions.lock().back().map(|v| v.version)
    }

    /// Get a specific version by number.
    pub fn get_version(&self, version: u64) -> Option<StateVersion<T>> {
        self.versions
            .lock()
            .iter()
            .find(|v| v.version == version)
            .cloned()
    }

    /// Get the `count` newest versions, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<StateVersion<T>> {
        self.versions.lock().iter().rev().take(count).cloned().collect()
    }

    /// Get all versions in chronological order.
    pub fn get_all(&self) -> Vec<StateVersion<T>> {
        self.versions.lock().iter().cloned().collect()
    }

    /// Value `steps` entries before the newest (1 = previous value).
    ///
    /// Returns `None` if stepping back that far exceeds the history.
    pub fn step_back(&self, steps: usize) -> Option<Arc<T>> {
        let versions = self.versions.lock();
        if versions.len() <= steps {
            return None;
        }
        let index = versions.len() - steps - 1;
        versions.get(index).map(|v| Arc::clone(&v.value))
    }

    /// Number of entries older than the newest one.
    pub(crate) fn available_steps(&self) -> usize {
        self.len().saturating_sub(1)
    }
}
