//! Outcome of a notification pass.

use crate::core::SubscriberId;
use crate::error::ReceiveError;

/// A subscriber failure that was isolated during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Attachment that failed
    pub id: SubscriberId,
    /// Name reported by the subscriber
    pub name: String,
    /// What went wrong
    pub error: ReceiveError,
}

/// Summary of one synchronous sweep over the snapshotted subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReport {
    /// Version of the value that was pushed
    pub version: u64,
    /// Number of subscribers in the snapshot
    pub visited: usize,
    /// Number of subscribers whose `receive` returned `Ok`
    pub delivered: usize,
    /// Failures isolated under [`FailurePolicy::Isolate`](crate::config::FailurePolicy::Isolate)
    pub failures: Vec<SubscriberFailure>,
}

impl NotifyReport {
    pub(crate) fn new(version: u64, visited: usize) -> Self {
        Self {
            version,
            visited,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// `true` if every visited subscriber received the value.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
