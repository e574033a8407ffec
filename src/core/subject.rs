//! The notification hub: one observed value, many subscribers.

use crate::config::{FailurePolicy, HubConfig};
use crate::core::{FnSubscriber, NotifyReport, Subscriber, SubscriberFailure, SubscriberId, Subscription};
use crate::error::{HubError, ReceiveError, Result};
use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "history")]
use crate::features::StateHistory;

#[cfg(feature = "metrics")]
use crate::metrics::HubMetrics;

#[cfg(feature = "metrics")]
pub(crate) type MetricsSlot = HubMetrics;
#[cfg(not(feature = "metrics"))]
pub(crate) type MetricsSlot = ();

/// One attachment in the ordered subscriber list.
struct Entry<T> {
    id: SubscriberId,
    subscriber: Arc<dyn Subscriber<T>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            subscriber: Arc::clone(&self.subscriber),
        }
    }
}

struct Registry<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

/// State shared between a subject, its clones and its subscription guards.
pub(crate) struct Shared<T> {
    /// Current value, readable without taking the registry lock
    state: ArcSwap<T>,
    version: AtomicU64,
    /// Guards both list mutation and the store-snapshot-notify sequence.
    /// Reentrant so subscribers may call back into the subject.
    registry: ReentrantMutex<RefCell<Registry<T>>>,
    config: HubConfig,
    #[cfg(feature = "history")]
    history: Option<StateHistory<T>>,
    #[cfg(feature = "metrics")]
    metrics: Option<HubMetrics>,
}

/// Type-erased detach used by [`Subscription`] guards.
pub(crate) trait Detach: Send + Sync {
    fn detach_id(&self, id: SubscriberId) -> bool;
}

impl<T: Send + Sync + 'static> Detach for Shared<T> {
    fn detach_id(&self, id: SubscriberId) -> bool {
        self.remove_first(|e| e.id == id)
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Find and remove the first matching entry in one locked region.
    fn remove_first<P>(&self, matches: P) -> bool
    where
        P: Fn(&Entry<T>) -> bool,
    {
        let guard = self.registry.lock();
        let (removed, remaining) = {
            let mut registry = guard.borrow_mut();
            let position = registry.entries.iter().position(|e| matches(e));
            let removed = position.map(|index| registry.entries.remove(index));
            (removed, registry.entries.len())
        };

        match removed {
            Some(entry) => {
                tracing::debug!(
                    subscriber_id = entry.id.as_u64(),
                    subscriber = entry.subscriber.name(),
                    remaining,
                    "detached subscriber"
                );
                self.subscribers_changed(remaining);
                true
            }
            None => false,
        }
    }

    fn subscribers_changed(&self, _count: usize) {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.update_subscriber_count(_count);
        }
    }

    /// Store `value`, then push it to a snapshot of the current subscribers.
    fn publish(&self, value: Arc<T>, _source: Option<String>) -> Result<NotifyReport> {
        let guard = self.registry.lock();

        self.state.store(Arc::clone(&value));
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;

        #[cfg(feature = "history")]
        if let Some(history) = &self.history {
            history.record(version, Arc::clone(&value), _source);
        }

        let snapshot: Vec<Entry<T>> = guard.borrow().entries.clone();
        self.run_pass(&snapshot, &value, version)
    }

    /// Re-run a pass with the currently stored value.
    fn renotify(&self) -> Result<NotifyReport> {
        let guard = self.registry.lock();
        let value = self.state.load_full();
        let version = self.version.load(Ordering::SeqCst);
        let snapshot: Vec<Entry<T>> = guard.borrow().entries.clone();
        self.run_pass(&snapshot, &value, version)
    }

    fn run_pass(&self, snapshot: &[Entry<T>], value: &T, version: u64) -> Result<NotifyReport> {
        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(|m| m.start_pass());

        let mut report = NotifyReport::new(version, snapshot.len());

        for entry in snapshot {
            match self.deliver(entry, value) {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::trace!(
                        subscriber_id = entry.id.as_u64(),
                        subscriber = entry.subscriber.name(),
                        version,
                        "delivered"
                    );
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::Isolate => {
                        tracing::warn!(
                            subscriber_id = entry.id.as_u64(),
                            subscriber = entry.subscriber.name(),
                            version,
                            %error,
                            "subscriber failed, continuing pass"
                        );
                        report.failures.push(SubscriberFailure {
                            id: entry.id,
                            name: entry.subscriber.name().to_string(),
                            error,
                        });
                    }
                    FailurePolicy::Propagate => {
                        #[cfg(feature = "metrics")]
                        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
                            metrics.record_pass(timer, report.delivered, 1);
                        }
                        return Err(HubError::Subscriber {
                            id: entry.id,
                            name: entry.subscriber.name().to_string(),
                            source: error,
                        });
                    }
                },
            }
        }

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_report(timer, &report);
        }

        tracing::debug!(
            version,
            visited = report.visited,
            delivered = report.delivered,
            failed = report.failures.len(),
            "notification pass complete"
        );

        Ok(report)
    }

    fn deliver(&self, entry: &Entry<T>, value: &T) -> std::result::Result<(), ReceiveError> {
        if !self.config.catch_panics {
            return entry.subscriber.receive(value);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| entry.subscriber.receive(value))) {
            Ok(result) => result,
            Err(payload) => Err(ReceiveError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The notification hub.
///
/// A `Subject` owns one value of type `T` and an ordered list of subscribers.
/// Every [`set_state`](Self::set_state) stores the new value and then calls
/// [`Subscriber::receive`] on each subscriber in attachment order before
/// returning.
///
/// Subscribers are held by `Arc` and never owned: detaching one does not drop
/// it if the application still holds a reference.
///
/// Cloning a `Subject` yields another handle to the same hub.
///
/// # Examples
///
/// ```rust
/// use statehub::prelude::*;
/// use std::sync::Arc;
///
/// # fn example() -> Result<()> {
/// let station = Subject::new(0.0_f64);
///
/// let display: Arc<dyn Subscriber<f64>> = Arc::new(FnSubscriber::new("display", |t: &f64| {
///     println!("Current conditions: {t:.1}");
///     Ok(())
/// }));
/// station.attach(Arc::clone(&display));
///
/// station.set_state(25.5)?;
/// assert_eq!(*station.state(), 25.5);
///
/// station.detach(&display);
/// # Ok(())
/// # }
/// ```
pub struct Subject<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> Subject<T> {
    /// Create a subject holding `initial`, with no subscribers and default settings.
    pub fn new(initial: T) -> Self {
        Self::from_parts(initial, HubConfig::default(), None)
    }

    pub(crate) fn from_parts(
        initial: T,
        config: HubConfig,
        metrics: Option<MetricsSlot>,
    ) -> Self {
        let initial = Arc::new(initial);

        #[cfg(not(feature = "metrics"))]
        let _ = metrics;

        #[cfg(feature = "history")]
        let history = (config.history_capacity > 0).then(|| {
            let history = StateHistory::new(config.history_capacity);
            history.record(0, Arc::clone(&initial), Some("initial".to_string()));
            history
        });

        #[cfg(not(feature = "history"))]
        if config.history_capacity > 0 {
            tracing::warn!(
                history_capacity = config.history_capacity,
                "history_capacity ignored: built without the `history` feature"
            );
        }

        Self {
            shared: Arc::new(Shared {
                state: ArcSwap::new(initial),
                version: AtomicU64::new(0),
                registry: ReentrantMutex::new(RefCell::new(Registry {
                    entries: Vec::new(),
                    next_id: 0,
                })),
                config,
                #[cfg(feature = "history")]
                history,
                #[cfg(feature = "metrics")]
                metrics,
            }),
        }
    }

    /// Append `subscriber` to the notification order.
    ///
    /// Attaching the same subscriber again is allowed and makes it receive
    /// every value once per attachment.
    pub fn attach(&self, subscriber: Arc<dyn Subscriber<T>>) -> SubscriberId {
        let guard = self.shared.registry.lock();
        let (id, count) = {
            let mut registry = guard.borrow_mut();
            let id = SubscriberId::from_raw(registry.next_id);
            registry.next_id += 1;
            registry.entries.push(Entry {
                id,
                subscriber: Arc::clone(&subscriber),
            });
            (id, registry.entries.len())
        };

        tracing::debug!(
            subscriber_id = id.as_u64(),
            subscriber = subscriber.name(),
            count,
            "attached subscriber"
        );
        self.shared.subscribers_changed(count);
        id
    }

    /// Remove the first attachment of `subscriber`.
    ///
    /// Identity is the `Arc` allocation, so any clone of the `Arc` that was
    /// attached matches. Returns `false` (and changes nothing) if it is not
    /// attached. If it was attached more than once, the later attachments stay.
    pub fn detach<S>(&self, subscriber: &Arc<S>) -> bool
    where
        S: ?Sized,
    {
        let target = Arc::as_ptr(subscriber).cast::<()>();
        self.shared
            .remove_first(|e| std::ptr::eq(Arc::as_ptr(&e.subscriber).cast::<()>(), target))
    }

    /// Remove the attachment identified by `id`. Returns `false` if it is gone already.
    pub fn detach_id(&self, id: SubscriberId) -> bool {
        self.shared.detach_id(id)
    }

    /// Attach a closure and get a guard that detaches it on drop.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statehub::prelude::*;
    ///
    /// # fn example() -> Result<()> {
    /// let subject = Subject::new(0_u32);
    /// let handle = subject.subscribe("logger", |v: &u32| {
    ///     println!("value is now {v}");
    ///     Ok(())
    /// });
    ///
    /// subject.set_state(1)?;
    ///
    /// // Unsubscribe by dropping the handle
    /// drop(handle);
    /// assert!(subject.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<F>(&self, name: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&T) -> std::result::Result<(), ReceiveError> + Send + Sync + 'static,
    {
        let id = self.attach(Arc::new(FnSubscriber::new(name, callback)));
        let shared: Arc<dyn Detach> = Arc::clone(&self.shared) as Arc<dyn Detach>;
        Subscription::new(id, Arc::downgrade(&shared))
    }

    /// Store `value` and notify every subscriber attached at this moment.
    ///
    /// The subscriber list is snapshotted after the value is stored: a
    /// subscriber attached from inside `receive` is first notified by the next
    /// pass, and one detached from inside `receive` still gets this pass.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Propagate`], returns [`HubError::Subscriber`] for
    /// the first failing subscriber; later subscribers are not visited. The
    /// value stays stored and the list is unchanged either way.
    pub fn set_state(&self, value: T) -> Result<NotifyReport> {
        self.shared.publish(Arc::new(value), None)
    }

    /// Run a pass with the stored value without changing it.
    ///
    /// # Errors
    ///
    /// Same as [`set_state`](Self::set_state).
    pub fn notify(&self) -> Result<NotifyReport> {
        self.shared.renotify()
    }

    /// The currently stored value. Never blocks.
    pub fn state(&self) -> Arc<T> {
        self.shared.state.load_full()
    }

    /// Number of values stored so far: 0 for the initial value, +1 per `set_state`.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::SeqCst)
    }

    /// Number of attachments.
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.lock().borrow().entries.len()
    }

    /// `true` if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }

    /// Ids of the current attachments, in notification order.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.shared
            .registry
            .lock()
            .borrow()
            .entries
            .iter()
            .map(|e| e.id)
            .collect()
    }

    /// Settings this subject was built with.
    pub fn config(&self) -> &HubConfig {
        &self.shared.config
    }

    /// History of stored values, if enabled via `history_capacity`.
    #[cfg(feature = "history")]
    pub fn history(&self) -> Option<&StateHistory<T>> {
        self.shared.history.as_ref()
    }

    /// Publish the value stored `steps` versions ago (1 = previous value).
    ///
    /// The old value goes through a normal pass and is recorded as a new version.
    /// `steps == 0` republishes the current value, which also counts as a new version.
    ///
    /// # Errors
    ///
    /// - [`HubError::HistoryDisabled`] if the subject keeps no history
    /// - [`HubError::InsufficientHistory`] if `steps` exceeds the recorded history
    /// - Any error [`set_state`](Self::set_state) can return
    #[cfg(feature = "history")]
    pub fn rollback(&self, steps: usize) -> Result<NotifyReport> {
        let _guard = self.shared.registry.lock();
        let history = self.shared.history.as_ref().ok_or(HubError::HistoryDisabled)?;
        let value = history
            .step_back(steps)
            .ok_or_else(|| HubError::InsufficientHistory {
                requested: steps,
                available: history.available_steps(),
            })?;

        tracing::debug!(steps, "rolling back state");
        self.shared
            .publish(value, Some(format!("Rollback {} steps", steps)))
    }

    /// Publish the value recorded as `version`.
    ///
    /// # Errors
    ///
    /// - [`HubError::HistoryDisabled`] if the subject keeps no history
    /// - [`HubError::VersionNotFound`] if that version was never recorded or was evicted
    /// - Any error [`set_state`](Self::set_state) can return
    #[cfg(feature = "history")]
    pub fn rollback_to_version(&self, version: u64) -> Result<NotifyReport> {
        let _guard = self.shared.registry.lock();
        let history = self.shared.history.as_ref().ok_or(HubError::HistoryDisabled)?;
        let value = history
            .get_version(version)
            .map(|v| v.value)
            .ok_or(HubError::VersionNotFound(version))?;

        tracing::debug!(version, "rolling back state to version");
        self.shared
            .publish(value, Some(format!("Rollback to version {}", version)))
    }
}

impl<T: Default + Send + Sync + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("state", &self.state())
            .field("version", &self.version())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
