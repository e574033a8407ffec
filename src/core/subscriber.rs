//! The subscriber capability and its closure adapter.

use crate::error::ReceiveError;
use std::fmt;

/// Anything that wants to be told about new values of a [`Subject`](crate::core::Subject).
///
/// Implementors keep whatever private state they need (usually behind interior
/// mutability, since `receive` takes `&self`). Returning an error does not
/// affect the stored state or the subscriber list; what happens to the rest of
/// the pass is decided by the hub's [`FailurePolicy`](crate::config::FailurePolicy).
///
/// # Examples
///
/// ```rust
/// use statehub::prelude::*;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// struct LastSeen(AtomicU64);
///
/// impl Subscriber<f64> for LastSeen {
///     fn receive(&self, value: &f64) -> std::result::Result<(), ReceiveError> {
///         self.0.store(value.to_bits(), Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait Subscriber<T>: Send + Sync {
    /// Handle a newly stored value.
    fn receive(&self, value: &T) -> Result<(), ReceiveError>;

    /// Name used in logs and failure reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Identifies one attachment of a subscriber to a subject.
///
/// Ids are unique per subject and never reused. Attaching the same subscriber
/// twice produces two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value of this id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// A [`Subscriber`] backed by a closure.
///
/// # Examples
///
/// ```rust
/// use statehub::prelude::*;
/// use std::sync::Arc;
///
/// let subject = Subject::new(0.0_f64);
/// let printer = Arc::new(FnSubscriber::new("printer", |v: &f64| {
///     println!("new value: {v}");
///     Ok(())
/// }));
/// subject.attach(printer);
/// ```
pub struct FnSubscriber<F> {
    name: String,
    callback: F,
}

impl<F> FnSubscriber<F> {
    /// Wrap `callback` under the given name.
    pub fn new<T>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&T) -> Result<(), ReceiveError> + Send + Sync,
    {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<T, F> Subscriber<T> for FnSubscriber<F>
where
    F: Fn(&T) -> Result<(), ReceiveError> + Send + Sync,
{
    fn receive(&self, value: &T) -> Result<(), ReceiveError> {
        (self.callback)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnSubscriber<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unnamed;

    impl Subscriber<i32> for Unnamed {
        fn receive(&self, _value: &i32) -> Result<(), ReceiveError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert!(Subscriber::<i32>::name(&Unnamed).ends_with("Unnamed"));
    }

    #[test]
    fn test_fn_subscriber_forwards() {
        let sub = FnSubscriber::new("even-only", |v: &i32| {
            if v % 2 == 0 {
                Ok(())
            } else {
                Err(ReceiveError::new("odd"))
            }
        });

        assert_eq!(Subscriber::<i32>::name(&sub), "even-only");
        assert!(Subscriber::<i32>::receive(&sub, &2).is_ok());
        assert_eq!(Subscriber::<i32>::receive(&sub, &3), Err(ReceiveError::new("odd")));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SubscriberId::from_raw(7).to_string(), "subscriber#7");
        assert_eq!(SubscriberId::from_raw(7).as_u64(), 7);
    }
}
