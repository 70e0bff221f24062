//! # Emitter Core
//!
//! An [`Emitter`] is one instance of an [`EventClass`]. It owns a registry
//! mapping each declared event to its listeners in registration order, and
//! emits through the class's dispatch strategy.
//!
//! # Lifecycle Events
//!
//! Registration and removal announce themselves as ordinary events, so they
//! re-enter [`Emitter::emit`]:
//!
//! | Event            | When                                              | Args                  |
//! |------------------|---------------------------------------------------|-----------------------|
//! | `first_listener` | before the first listener of an event is stored   | `(event, listener)`   |
//! | `new_listener`   | before any listener is stored                     | `(event, listener)`   |
//! | `no_listeners`   | after an event loses its last listener            | `(event,)`            |
//!
//! Each is only emitted when it has listeners of its own.
//!
//! ```rust
//! use hark_std::{Dispatch, Emitter, EventClass};
//!
//! static STREAM: EventClass = EventClass::new("Stream", &["data", "end"]);
//! STREAM.pin(Dispatch::Synchronous).unwrap();
//!
//! let stream = Emitter::new(&STREAM);
//! stream.on(&["data"], |args| {
//!     assert_eq!(args.get::<u32>(0), Some(&42));
//!     Ok(())
//! })?;
//! stream.emit("data", (42_u32,))?;
//! # Ok::<(), hark_std::Error>(())
//! ```

use crate::{
    class::{EventClass, FIRST_LISTENER, NEW_LISTENER, NO_LISTENERS},
    delivery::DeliveryStrategy,
    emission::Emission,
    registry::EventRegistry,
};
use hark_core::{
    Args, BoxError, Callback, DispatchKind, Error, Listener, ListenerId, Wrapper, WrapperChain,
    call_stack,
};
use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError, Weak},
};

struct Inner {
    class: &'static EventClass,
    chain: WrapperChain,
    registry: EventRegistry,
    once: Mutex<HashSet<ListenerId>>,
}

/// An event emitter instance.
///
/// Cloning yields another handle to the same instance, so listeners can
/// capture their emitter and call back into it.
#[derive(Clone)]
pub struct Emitter {
    inner: Arc<Inner>,
}

/// A non-owning handle to an [`Emitter`].
#[derive(Clone)]
pub struct WeakEmitter {
    inner: Weak<Inner>,
}

impl WeakEmitter {
    /// Returns the emitter if it is still alive.
    pub fn upgrade(&self) -> Option<Emitter> {
        self.inner.upgrade().map(|inner| Emitter { inner })
    }
}

impl Emitter {
    /// Creates an emitter instrumenting with the process-wide wrapper chain.
    pub fn new(class: &'static EventClass) -> Self {
        Self::builder(class).build()
    }

    /// Starts building an emitter.
    pub fn builder(class: &'static EventClass) -> EmitterBuilder {
        EmitterBuilder::new(class)
    }

    /// The emitter's class.
    pub fn class(&self) -> &'static EventClass {
        self.inner.class
    }

    /// The wrapper chain listeners are instrumented with.
    pub fn wrapper_chain(&self) -> &WrapperChain {
        &self.inner.chain
    }

    /// Returns a non-owning handle.
    pub fn downgrade(&self) -> WeakEmitter {
        WeakEmitter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The event currently being emitted in this context, if any.
    pub fn current_event() -> Option<&'static str> {
        call_stack::current_event()
    }

    /// Returns `true` if the class declares `event`.
    pub fn event_exists(&self, event: &str) -> bool {
        self.inner.class.declares(event)
    }

    /// The listeners of `event`, in registration order.
    pub fn event_listeners(&self, event: &str) -> Result<Vec<Listener>, Error> {
        let event = self.inner.class.check(event)?;
        Ok(self.inner.registry.snapshot(event).to_vec())
    }

    /// Number of listeners of `event`.
    pub fn listener_count(&self, event: &str) -> Result<usize, Error> {
        let event = self.inner.class.check(event)?;
        Ok(self.inner.registry.len(event))
    }

    /// Events that currently have at least one listener, in no particular order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.inner.registry.names()
    }

    /// Instruments `listener` and registers it under every event in `events`.
    ///
    /// All names are validated before anything is registered. Returns the
    /// instrumented listener, which is what [`Emitter::remove_listener`] takes.
    pub fn on<F>(&self, events: &[&str], listener: F) -> Result<Listener, Error>
    where
        F: Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let events = self.check_all(events)?;
        let listener = self.inner.chain.instrument(Arc::new(listener));
        self.attach(&events, &listener)?;
        Ok(listener)
    }

    /// Registers an already instrumented listener without instrumenting it again.
    pub fn on_listener(&self, events: &[&str], listener: &Listener) -> Result<Listener, Error> {
        let events = self.check_all(events)?;
        self.attach(&events, listener)?;
        Ok(listener.clone())
    }

    /// Like [`Emitter::on`], but the listener removes itself from an event the
    /// first time it runs under it, before the callback is invoked.
    ///
    /// Registered under several events, it fires once per event: the event
    /// to leave is read from the call stack at invocation time. Under
    /// concurrent dispatch it leaves the event when its task is scheduled, so
    /// an emission issued before that task runs no longer sees it.
    pub fn once<F>(&self, events: &[&str], listener: F) -> Result<Listener, Error>
    where
        F: Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let events = self.check_all(events)?;
        let slot = Arc::new(OnceLock::new());
        let remover = self.self_removal(slot.clone());
        let listener = self
            .inner
            .chain
            .with_scoped([remover], || self.inner.chain.instrument(Arc::new(listener)));
        let _ = slot.set(listener.id());
        self.inner
            .once
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(listener.id());
        self.attach(&events, &listener)?;
        Ok(listener)
    }

    /// Emits `event` to a snapshot of its current listeners.
    ///
    /// Returns at once if there are no listeners. Otherwise delivers through
    /// the class's dispatch strategy, selecting it first if this is the class's
    /// first emission.
    pub fn emit(&self, event: &str, args: impl Into<Args>) -> Result<Emission, Error> {
        let event = self.inner.class.check(event)?;
        let listeners = self.inner.registry.snapshot(event);
        if listeners.is_empty() {
            return Ok(Emission::skipped(event));
        }

        #[cfg(feature = "tracing")]
        {
            tracing::trace!(
                class = self.inner.class.name(),
                event,
                listeners = listeners.len(),
                depth = call_stack::depth(),
                "emit"
            );
        }

        let dispatch = self.inner.class.dispatch();
        let released = match dispatch.kind() {
            DispatchKind::Concurrent => self.release_once(event, &listeners),
            DispatchKind::Synchronous => Ok(()),
        };
        let emission = dispatch.deliver(event, listeners, args.into())?;
        released.map(|()| emission)
    }

    /// Removes `listener` from `event`.
    ///
    /// Emits `no_listeners` if this removed the event's last listener.
    pub fn remove_listener(&self, event: &str, listener: &Listener) -> Result<(), Error> {
        let event = self.inner.class.check(event)?;
        self.detach(event, listener.id())
    }

    /// Removes the listeners of one event, or of every event.
    ///
    /// With an event, clears it and emits `no_listeners` for it. Without,
    /// emits `no_listeners` for every event that has listeners, then clears
    /// the whole registry even if one of those emissions failed.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> Result<(), Error> {
        match event {
            Some(event) => {
                let event = self.inner.class.check(event)?;
                self.inner.registry.clear(event);
                self.prune_once();
                self.announce_empty(event)
            }
            None => {
                let mut result = Ok(());
                if self.inner.registry.has_listeners(NO_LISTENERS) {
                    for event in self.inner.registry.names() {
                        result = result.and(self.announce_empty(event));
                    }
                }
                self.inner.registry.clear_all();
                self.prune_once();
                result
            }
        }
    }

    /// The host's destruction hook: drops every listener.
    pub fn teardown(&self) -> Result<(), Error> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                class = self.inner.class.name(),
                events = self.inner.registry.names().len(),
                "teardown"
            );
        }
        self.remove_all_listeners(None)
    }

    /// [`Emitter::teardown`], then under concurrent dispatch yields once so
    /// that tasks spawned by the final `no_listeners` emissions can start.
    pub async fn shutdown(&self) -> Result<(), Error> {
        let result = self.teardown();
        if self.inner.class.strategy() == Some(DispatchKind::Concurrent) {
            tokio::task::yield_now().await;
        }
        result
    }

    fn check_all(&self, events: &[&str]) -> Result<Vec<&'static str>, Error> {
        events
            .iter()
            .map(|event| self.inner.class.check(event))
            .collect()
    }

    fn attach(&self, events: &[&'static str], listener: &Listener) -> Result<(), Error> {
        let registry = &self.inner.registry;
        for &event in events {
            if !registry.has_listeners(event) && registry.has_listeners(FIRST_LISTENER) {
                self.emit(FIRST_LISTENER, (event, listener.clone()))?;
            }
            if registry.has_listeners(NEW_LISTENER) {
                self.emit(NEW_LISTENER, (event, listener.clone()))?;
            }
            registry.push(event, listener.clone());

            #[cfg(feature = "tracing")]
            {
                tracing::trace!(
                    class = self.inner.class.name(),
                    event,
                    listener = %listener.id(),
                    "listener added"
                );
            }
        }
        Ok(())
    }

    fn detach(&self, event: &'static str, id: ListenerId) -> Result<(), Error> {
        let emptied = self.inner.registry.remove(event, id);
        self.prune_once();

        #[cfg(feature = "tracing")]
        {
            tracing::trace!(
                class = self.inner.class.name(),
                event,
                listener = %id,
                emptied,
                "listener removed"
            );
        }

        if emptied {
            self.announce_empty(event)?;
        }
        Ok(())
    }

    fn announce_empty(&self, event: &'static str) -> Result<(), Error> {
        if self.inner.registry.has_listeners(NO_LISTENERS) {
            self.emit(NO_LISTENERS, (event,))?;
        }
        Ok(())
    }

    /// Detaches the `once` listeners of a concurrent emission from `event`
    /// before their tasks are spawned.
    fn release_once(&self, event: &'static str, listeners: &[Listener]) -> Result<(), Error> {
        let pending: HashSet<ListenerId> = {
            let once = self.inner.once.lock().unwrap_or_else(PoisonError::into_inner);
            listeners
                .iter()
                .map(Listener::id)
                .filter(|id| once.contains(id))
                .collect()
        };
        pending
            .into_iter()
            .fold(Ok(()), |result, id| result.and(self.detach(event, id)))
    }

    /// Forgets `once` listeners that are no longer registered anywhere.
    fn prune_once(&self) {
        let mut once = self.inner.once.lock().unwrap_or_else(PoisonError::into_inner);
        if !once.is_empty() {
            once.retain(|&id| self.inner.registry.contains(id));
        }
    }

    /// The wrapper that gives `once` listeners their self-removal.
    ///
    /// A failed detach, such as a failing `no_listeners` listener, is reported
    /// after the callback has run.
    fn self_removal(&self, slot: Arc<OnceLock<ListenerId>>) -> Wrapper {
        let emitter = self.downgrade();
        Wrapper::new(move |inner: Callback| -> Callback {
            let emitter = emitter.clone();
            let slot = slot.clone();
            let fired = Mutex::new(HashSet::new());
            Arc::new(move |args: &Args| {
                let Some(event) = call_stack::current_event() else {
                    return inner(args);
                };
                if !fired
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(event)
                {
                    return Ok(());
                }
                let detached = match (emitter.upgrade(), slot.get()) {
                    (Some(emitter), Some(&id)) => emitter.detach(event, id),
                    _ => Ok(()),
                };
                let result = inner(args);
                result.and(detached.map_err(BoxError::from))
            })
        })
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("class", &self.inner.class.name())
            .field("events", &self.inner.registry.names())
            .finish()
    }
}

/// Builder for [`Emitter`].
///
/// # Example
/// ```rust
/// use hark_std::{Emitter, EventClass, WrapperChain};
///
/// static SOCKET: EventClass = EventClass::new("Socket", &["message"]);
///
/// let chain = WrapperChain::new();
/// let socket = Emitter::builder(&SOCKET).wrapper_chain(chain.clone()).build();
/// assert!(socket.event_exists("message"));
/// ```
#[derive(Debug)]
pub struct EmitterBuilder {
    class: &'static EventClass,
    chain: Option<WrapperChain>,
}

impl EmitterBuilder {
    /// Creates a builder for an instance of `class`.
    pub fn new(class: &'static EventClass) -> Self {
        Self { class, chain: None }
    }

    /// Instrument listeners with `chain` instead of the process-wide chain.
    pub fn wrapper_chain(mut self, chain: WrapperChain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Builds the emitter.
    pub fn build(self) -> Emitter {
        Emitter {
            inner: Arc::new(Inner {
                class: self.class,
                chain: self.chain.unwrap_or_else(WrapperChain::global),
                registry: EventRegistry::default(),
                once: Mutex::default(),
            }),
        }
    }
}
