//! Emitter classes.
//!
//! An [`EventClass`] is what the host supplies for a family of emitters: a
//! name, the fixed set of events its instances may use, and the cell holding
//! the dispatch strategy shared by all of them.
//!
//! ```rust
//! use hark_std::EventClass;
//!
//! static STREAM: EventClass = EventClass::new("Stream", &["data", "end"]);
//!
//! assert!(STREAM.declares("data"));
//! assert!(STREAM.declares("new_listener"));
//! assert!(!STREAM.declares("close"));
//! ```

use crate::delivery::Dispatch;
use hark_core::{DispatchKind, Error};
use std::{fmt, sync::OnceLock};

/// Emitted before a listener is stored, with `(event, listener)`.
pub const NEW_LISTENER: &str = "new_listener";
/// Emitted before the first listener of an event is stored, with `(event, listener)`.
pub const FIRST_LISTENER: &str = "first_listener";
/// Emitted after an event loses its last listener, with `(event,)`.
pub const NO_LISTENERS: &str = "no_listeners";

/// Lifecycle events every class declares implicitly.
pub const LIFECYCLE_EVENTS: [&str; 3] = [NEW_LISTENER, FIRST_LISTENER, NO_LISTENERS];

/// A static description of an emitter class.
pub struct EventClass {
    name: &'static str,
    events: &'static [&'static str],
    dispatch: OnceLock<Dispatch>,
}

impl EventClass {
    /// Declares a class. Lifecycle events need not be listed.
    pub const fn new(name: &'static str, events: &'static [&'static str]) -> Self {
        Self {
            name,
            events,
            dispatch: OnceLock::new(),
        }
    }

    /// The class name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `event` is declared by this class.
    pub fn declares(&self, event: &str) -> bool {
        self.resolve(event).is_some()
    }

    /// Every legal event name: lifecycle events first, then the declared ones.
    pub fn declared_events(&self) -> impl Iterator<Item = &'static str> + '_ {
        LIFECYCLE_EVENTS.into_iter().chain(self.events.iter().copied())
    }

    /// Maps a caller-supplied name to the class's own `'static` name.
    pub(crate) fn resolve(&self, event: &str) -> Option<&'static str> {
        self.declared_events().find(|declared| *declared == event)
    }

    pub(crate) fn check(&self, event: &str) -> Result<&'static str, Error> {
        self.resolve(event).ok_or_else(|| Error::UnknownEvent {
            class: self.name,
            event: event.to_owned(),
        })
    }

    /// Fixes the dispatch strategy before the first emission.
    ///
    /// Pinning the strategy that is already in effect succeeds. Pinning a
    /// different one fails: the choice is permanent for the process.
    pub fn pin(&self, dispatch: Dispatch) -> Result<(), Error> {
        let kind = dispatch.kind();
        let fixed = self.dispatch.get_or_init(|| dispatch).kind();
        if fixed == kind {
            Ok(())
        } else {
            Err(Error::DispatchFixed {
                class: self.name,
                fixed,
            })
        }
    }

    /// The strategy in effect, or `None` if nothing has been emitted yet.
    pub fn strategy(&self) -> Option<DispatchKind> {
        self.dispatch.get().map(Dispatch::kind)
    }

    /// The strategy in effect, selecting one from the calling context if needed.
    pub(crate) fn dispatch(&self) -> &Dispatch {
        self.dispatch.get_or_init(|| {
            let dispatch = Dispatch::detect();
            #[cfg(feature = "tracing")]
            {
                tracing::debug!(
                    class = self.name,
                    strategy = %dispatch.kind(),
                    "dispatch strategy selected"
                );
            }
            dispatch
        })
    }
}

impl fmt::Debug for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventClass")
            .field("name", &self.name)
            .field("events", &self.events)
            .field("strategy", &self.strategy())
            .finish()
    }
}
