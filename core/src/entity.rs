//! Identity and the one-shot destruction notification shared by entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to players, towers and units.
///
/// Unit and tower identifiers are derived from their owning player's
/// identifier, so they are unique within a session as long as player
/// identifiers are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps the provided string as an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Capability shared by everything that can be destroyed during a match.
pub trait Entity {
    /// Immutable identifier of the entity.
    fn id(&self) -> &EntityId;

    /// Registers `callback` to run once when the entity is destroyed.
    ///
    /// Subscribing after destruction returns a handle whose callback never
    /// runs.
    fn subscribe_destroyed(&mut self, callback: DestroyedCallback) -> Subscription;

    /// Cancels a subscription. Unknown handles are ignored.
    fn unsubscribe_destroyed(&mut self, subscription: Subscription);

    /// Reports whether the entity has already been destroyed.
    fn is_destroyed(&self) -> bool;
}

/// Callback invoked with the identifier of the destroyed entity.
pub type DestroyedCallback = Box<dyn FnOnce(&EntityId)>;

/// Handle returned by [`DestroyedSignal::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

/// Observer list that fires exactly once.
#[derive(Default)]
pub struct DestroyedSignal {
    subscribers: Vec<(Subscription, DestroyedCallback)>,
    next_subscription: u64,
    fired: bool,
}

impl DestroyedSignal {
    /// Creates a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback and returns the handle that cancels it.
    pub fn subscribe(&mut self, callback: DestroyedCallback) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        if !self.fired {
            self.subscribers.push((subscription, callback));
        }
        subscription
    }

    /// Removes the callback registered under `subscription`, if any.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(handle, _)| *handle != subscription);
    }

    /// Notifies every subscriber in registration order.
    ///
    /// Returns `false` when the signal had already fired, in which case no
    /// callback runs.
    pub fn fire(&mut self, id: &EntityId) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        for (_, callback) in self.subscribers.drain(..) {
            callback(id);
        }
        true
    }

    /// Reports whether [`DestroyedSignal::fire`] already ran.
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// Number of callbacks still waiting for the signal.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for DestroyedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestroyedSignal")
            .field("subscribers", &self.subscribers.len())
            .field("fired", &self.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> DestroyedCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |tag: &'static str| -> DestroyedCallback {
            let sink = Rc::clone(&sink);
            Box::new(move |id: &EntityId| sink.borrow_mut().push(format!("{tag}:{id}")))
        };
        (log, make)
    }

    #[test]
    fn fires_each_subscriber_once_in_order() {
        let (log, make) = recorder();
        let mut signal = DestroyedSignal::new();
        let _ = signal.subscribe(make("first"));
        let _ = signal.subscribe(make("second"));

        assert!(signal.fire(&EntityId::new("p1_u_1")));
        assert!(!signal.fire(&EntityId::new("p1_u_1")));

        assert_eq!(
            *log.borrow(),
            vec!["first:p1_u_1".to_owned(), "second:p1_u_1".to_owned()]
        );
    }

    #[test]
    fn unsubscribed_callback_never_runs() {
        let (log, make) = recorder();
        let mut signal = DestroyedSignal::new();
        let cancelled = signal.subscribe(make("cancelled"));
        let _ = signal.subscribe(make("kept"));
        signal.unsubscribe(cancelled);
        signal.unsubscribe(cancelled);

        assert_eq!(signal.subscriber_count(), 1);
        assert!(signal.fire(&EntityId::new("t")));
        assert_eq!(*log.borrow(), vec!["kept:t".to_owned()]);
    }

    #[test]
    fn late_subscription_is_inert() {
        let (log, make) = recorder();
        let mut signal = DestroyedSignal::new();
        assert!(signal.fire(&EntityId::new("gone")));
        let _ = signal.subscribe(make("late"));
        assert!(!signal.fire(&EntityId::new("gone")));
        assert!(log.borrow().is_empty());
        assert!(signal.has_fired());
    }
}
