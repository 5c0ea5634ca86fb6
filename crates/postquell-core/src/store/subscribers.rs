//! Observer registry for store change notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Zero-argument change callback.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Handle identifying one registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriberId, Callback)>,
}

/// Ordered list of callbacks with synchronous fan-out.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    inner: Arc<Mutex<Listeners>>,
}

impl SubscriberRegistry {
    fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
        listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, callback: Callback) -> Subscription {
        let mut listeners = Self::lock(&self.inner);
        let id = SubscriberId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, callback));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every callback once, in registration order.
    ///
    /// The list is snapshotted first so callbacks may read the store or
    /// unsubscribe without deadlocking.
    pub(crate) fn notify(&self) {
        let callbacks: Vec<Callback> = Self::lock(&self.inner)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback();
        }
    }

    pub(crate) fn len(&self) -> usize {
        Self::lock(&self.inner).entries.len()
    }
}

/// Returned by [`PostStore::subscribe`](super::PostStore::subscribe).
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Remove this callback. Returns false if the store is gone or the
    /// callback was already removed.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut listeners = SubscriberRegistry::lock(&registry);
        let before = listeners.entries.len();
        listeners.entries.retain(|(id, _)| *id != self.id);
        listeners.entries.len() != before
    }
}
