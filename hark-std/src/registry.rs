//! Per-emitter listener storage.
//!
//! Each event maps to an immutable `Arc<[Listener]>`. Mutations build a new
//! slice and swap it in; readers clone the `Arc`. A snapshot taken by an
//! in-flight emission therefore never observes later registrations or
//! removals, and the lock is never held while a listener runs.

use hark_core::{Listener, ListenerId};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

type Listeners = Arc<[Listener]>;

#[derive(Default)]
pub(crate) struct EventRegistry {
    events: RwLock<HashMap<&'static str, Listeners>>,
}

impl EventRegistry {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<&'static str, Listeners>> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<&'static str, Listeners>> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current listeners of `event`, in registration order.
    pub(crate) fn snapshot(&self, event: &str) -> Listeners {
        self.read()
            .get(event)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    pub(crate) fn len(&self, event: &str) -> usize {
        self.read().get(event).map_or(0, |listeners| listeners.len())
    }

    pub(crate) fn has_listeners(&self, event: &str) -> bool {
        self.len(event) > 0
    }

    pub(crate) fn push(&self, event: &'static str, listener: Listener) {
        let mut events = self.write();
        let mut next = events
            .get(event)
            .map(|listeners| listeners.to_vec())
            .unwrap_or_default();
        next.push(listener);
        events.insert(event, next.into());
    }

    /// Removes every entry with `id`. Returns `true` if that emptied the event.
    pub(crate) fn remove(&self, event: &'static str, id: ListenerId) -> bool {
        let mut events = self.write();
        let Some(current) = events.get(event) else {
            return false;
        };
        let next: Vec<Listener> = current
            .iter()
            .filter(|listener| listener.id() != id)
            .cloned()
            .collect();
        if next.len() == current.len() {
            return false;
        }
        if next.is_empty() {
            events.remove(event);
            true
        } else {
            events.insert(event, next.into());
            false
        }
    }

    /// Whether `id` is still registered under any event.
    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.read()
            .values()
            .any(|listeners| listeners.iter().any(|listener| listener.id() == id))
    }

    pub(crate) fn clear(&self, event: &'static str) {
        self.write().remove(event);
    }

    pub(crate) fn clear_all(&self) {
        self.write().clear();
    }

    /// Events with at least one listener.
    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.read().keys().copied().collect()
    }
}
