//! Error types for statehub.

use crate::core::SubscriberId;

/// Result type alias for statehub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Errors that can occur when working with a notification hub.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A subscriber failed while the hub was configured to propagate failures.
    #[error("Subscriber '{name}' ({id}) failed: {source}")]
    Subscriber {
        /// Id of the failing attachment
        id: SubscriberId,
        /// Name reported by the subscriber
        name: String,
        /// The underlying receive failure
        #[source]
        source: ReceiveError,
    },

    /// Hub configuration is invalid.
    #[error("Invalid hub configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load hub configuration from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize hub configuration.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    #[cfg(feature = "history")]
    /// Not enough history to roll back the requested number of steps.
    #[error("Insufficient history: cannot rollback {requested} steps (only {available} available)")]
    InsufficientHistory {
        /// Number of steps requested to roll back
        requested: usize,
        /// Number of earlier versions available
        available: usize,
    },

    #[cfg(feature = "history")]
    /// The requested version is no longer (or was never) in history.
    #[error("Version {0} not found in history")]
    VersionNotFound(u64),

    #[cfg(feature = "history")]
    /// Rollback was requested on a subject built without history.
    #[error("State history is not enabled for this subject")]
    HistoryDisabled,
}

/// Error returned by a subscriber that could not handle a new value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiveError {
    /// The subscriber reported a failure.
    #[error("{0}")]
    Failed(String),

    /// The subscriber panicked and the panic was caught by the hub.
    #[error("subscriber panicked: {0}")]
    Panicked(String),
}

impl ReceiveError {
    /// Create a failure with a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl From<std::io::Error> for ReceiveError {
    fn from(err: std::io::Error) -> Self {
        ReceiveError::Failed(err.to_string())
    }
}
