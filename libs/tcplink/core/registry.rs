//! Thread-safe, ordered collection of subscriber records.

use crate::traits::{DisconnectReason, SocketObserver};
use parking_lot::Mutex;
use std::sync::Arc;

/// Observer registry shared by the facade and the receive loop
///
/// Subscribers are dispatched in insertion order. All list mutation happens
/// under one mutex; dispatch clones the current list of `Arc`s under that
/// mutex and invokes the callbacks with the lock released, so a callback may
/// itself call [`subscribe`](Self::subscribe) or
/// [`unsubscribe_all`](Self::unsubscribe_all) without deadlocking, and a
/// concurrent clear can never corrupt an iteration already in flight.
#[derive(Default)]
pub struct ObserverRegistry {
    subscribers: Mutex<Vec<Arc<SocketObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber record
    pub fn subscribe(&self, observer: SocketObserver) {
        self.subscribers.lock().push(Arc::new(observer));
    }

    /// Remove every subscriber record
    pub fn unsubscribe_all(&self) {
        self.subscribers.lock().clear();
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }

    /// Deliver a received byte chunk to every data callback
    pub fn dispatch_data(&self, bytes: &[u8]) {
        let snapshot = self.subscribers.lock().clone();
        for subscriber in &snapshot {
            if let Some(handler) = &subscriber.on_data {
                handler(bytes);
            }
        }
    }

    /// Deliver a disconnection notice to every disconnect callback
    pub fn dispatch_disconnect(&self, reason: &DisconnectReason) {
        let snapshot = self.subscribers.lock().clone();
        for subscriber in &snapshot {
            if let Some(handler) = &subscriber.on_disconnect {
                handler(reason);
            }
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}
