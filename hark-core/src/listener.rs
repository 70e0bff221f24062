//! # Listeners
//!
//! A raw listener is any `Fn(&Args) -> Result<(), BoxError>`, stored as a
//! [`Callback`]. It has no identity of its own.
//!
//! Registries never store raw callbacks. They store [`Listener`]s, produced by
//! [`WrapperChain::instrument`](crate::WrapperChain::instrument): the raw
//! callback enclosed in every wrapper that was active at that moment, plus a
//! sequential [`ListenerId`]. Equality, hashing and removal go through that id
//! and nothing else.

use crate::{args::Args, error::BoxError, wrapper::Wrapper};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

/// A shared, type-erased listener callable.
pub type Callback = Arc<dyn Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static>;

type WeakCallback = Weak<dyn Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static>;

/// Global sequence counter for listener identities.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// The identity of an instrumented listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(LISTENER_SEQ.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

struct Inner {
    id: ListenerId,
    call: Callback,
    original: WeakCallback,
    wrappers: Arc<[Wrapper]>,
}

/// An instrumented listener, the unit stored in an emitter's registry.
///
/// Cloning is cheap and yields the same listener: clones share the id.
#[derive(Clone)]
pub struct Listener {
    inner: Arc<Inner>,
}

impl Listener {
    /// Encloses `raw` in `wrappers`, the first wrapper becoming the outermost layer.
    pub(crate) fn compose(raw: Callback, wrappers: Arc<[Wrapper]>) -> Self {
        let original = Arc::downgrade(&raw);
        let call = wrappers
            .iter()
            .rev()
            .fold(raw, |inner, wrapper| wrapper.apply(inner));

        Self {
            inner: Arc::new(Inner {
                id: ListenerId::next(),
                call,
                original,
                wrappers,
            }),
        }
    }

    /// The listener's identity.
    pub fn id(&self) -> ListenerId {
        self.inner.id
    }

    /// Invokes the composed callable.
    pub fn call(&self, args: &Args) -> Result<(), BoxError> {
        (self.inner.call)(args)
    }

    /// Returns the raw callback this listener was built from.
    ///
    /// The back-reference is non-owning. It resolves as long as something keeps
    /// the raw callback alive, which the wrapper layers do unless a wrapper
    /// discarded the callable it was given.
    pub fn original(&self) -> Option<Callback> {
        self.inner.original.upgrade()
    }

    /// The wrappers that were active when this listener was instrumented,
    /// outermost first.
    pub fn wrappers(&self) -> &[Wrapper] {
        &self.inner.wrappers
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.inner.id)
            .field("wrappers", &self.inner.wrappers.len())
            .finish()
    }
}
