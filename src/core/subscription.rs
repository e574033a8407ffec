//! Drop-to-detach guard returned by [`Subject::subscribe`](crate::core::Subject::subscribe).

use crate::core::SubscriberId;
use crate::core::subject::Detach;
use std::fmt;
use std::sync::Weak;

/// Handle for a subscription that can be dropped to unsubscribe.
///
/// The handle only holds a weak reference, so it never keeps the subject
/// alive. Dropping it after the subject is gone does nothing.
#[must_use = "dropping a Subscription immediately detaches its subscriber"]
pub struct Subscription {
    id: SubscriberId,
    hub: Option<Weak<dyn Detach>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, hub: Weak<dyn Detach>) -> Self {
        Self { id, hub: Some(hub) }
    }

    /// Id of the attachment this handle controls.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Detach now. Returns `false` if it was already detached or the subject is gone.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        match self.hub.take().and_then(|hub| hub.upgrade()) {
            Some(hub) => hub.detach_id(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field(
                "active",
                &self.hub.as_ref().is_some_and(|hub| hub.strong_count() > 0),
            )
            .finish()
    }
}
