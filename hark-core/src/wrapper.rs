//! # Wrapper Chain
//!
//! A [`Wrapper`] turns a callback into a new callback that encloses it:
//! logging, tracing, self-removal and similar cross-cutting concerns. A
//! [`WrapperChain`] is an ordered list of wrappers; [`WrapperChain::instrument`]
//! snapshots it and builds a [`Listener`] from a raw callback.
//!
//! # Nesting Order
//!
//! The chain is applied like an onion. The first wrapper in the chain becomes
//! the outermost layer: it runs first on every call and finishes last. The
//! order is fixed when the listener is instrumented; changing the chain later
//! never affects existing listeners.
//!
//! ```text
//! chain = [W1, W2]        call:  W1 ─► W2 ─► raw
//!                         return: raw ─► W2 ─► W1
//! ```
//!
//! # Scoped Wrappers
//!
//! [`WrapperChain::scoped`] appends extra wrappers for as long as the returned
//! guard lives. Scoped entries belong to the task that created them: inside a
//! tokio task they are keyed by [`tokio::task::Id`], outside one by the thread.
//! Two callers instrumenting concurrently never see each other's extensions,
//! even when their tasks share a worker thread. Entries are removed by identity
//! on drop, whatever the exit path.

use crate::{
    args::Args,
    error::BoxError,
    listener::{Callback, Listener},
};
use std::{
    cell::RefCell,
    fmt,
    marker::PhantomData,
    sync::{
        Arc, LazyLock, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::task;

type WrapFn = dyn Fn(Callback) -> Callback + Send + Sync + 'static;

static WRAPPER_SEQ: AtomicU64 = AtomicU64::new(1);
static CHAIN_SEQ: AtomicU64 = AtomicU64::new(1);

static GLOBAL: LazyLock<WrapperChain> = LazyLock::new(WrapperChain::new);

thread_local! {
    /// Scoped wrappers pushed on this thread, tagged with chain and owner.
    static SCOPED: RefCell<Vec<ScopedEntry>> = const { RefCell::new(Vec::new()) };
}

struct ScopedEntry {
    chain: u64,
    owner: Option<task::Id>,
    wrapper: Wrapper,
}

impl ScopedEntry {
    /// Whether an instrumentation of `chain` by the current task applies it.
    fn visible(&self, chain: u64) -> bool {
        self.chain == chain && self.owner == task::try_id()
    }
}

/// Identity of a [`Wrapper`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperHandle(u64);

/// A named transformation from one callback to an enclosing callback.
#[derive(Clone)]
pub struct Wrapper {
    handle: WrapperHandle,
    wrap: Arc<WrapFn>,
}

impl Wrapper {
    /// Creates a wrapper with a fresh handle.
    ///
    /// ```rust
    /// use hark_core::{Args, BoxError, Callback, Wrapper};
    /// use std::sync::Arc;
    ///
    /// let quiet = Wrapper::new(|inner: Callback| -> Callback {
    ///     Arc::new(move |args: &Args| -> Result<(), BoxError> {
    ///         let _ = inner(args);
    ///         Ok(())
    ///     })
    /// });
    /// ```
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(Callback) -> Callback + Send + Sync + 'static,
    {
        Self {
            handle: WrapperHandle(WRAPPER_SEQ.fetch_add(1, Ordering::Relaxed)),
            wrap: Arc::new(wrap),
        }
    }

    /// The wrapper's identity.
    pub fn handle(&self) -> WrapperHandle {
        self.handle
    }

    /// Encloses `inner`.
    pub fn apply(&self, inner: Callback) -> Callback {
        (self.wrap)(inner)
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Wrapper").field(&self.handle.0).finish()
    }
}

struct ChainInner {
    id: u64,
    entries: RwLock<Vec<Wrapper>>,
}

/// An ordered, shareable list of wrappers.
///
/// Cloning yields a handle to the same chain. [`WrapperChain::global`] is the
/// process-wide default; build a private chain with [`WrapperChain::new`] to
/// keep instrumentation isolated (tests, embedded subsystems).
#[derive(Clone)]
pub struct WrapperChain {
    inner: Arc<ChainInner>,
}

impl WrapperChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ChainInner {
                id: CHAIN_SEQ.fetch_add(1, Ordering::Relaxed),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Returns a handle to the process-wide chain.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Appends a wrapper. Returns its handle for later removal.
    pub fn add(&self, wrapper: Wrapper) -> WrapperHandle {
        let handle = wrapper.handle();
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(wrapper);
        handle
    }

    /// Builds a wrapper from `wrap` and appends it.
    pub fn add_fn<F>(&self, wrap: F) -> WrapperHandle
    where
        F: Fn(Callback) -> Callback + Send + Sync + 'static,
    {
        self.add(Wrapper::new(wrap))
    }

    /// Removes every entry with `handle`. Unknown handles are ignored.
    pub fn remove(&self, handle: WrapperHandle) {
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|w| w.handle != handle);
    }

    /// Number of persistent entries (scoped entries are not counted).
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the chain has no persistent entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wrappers an instrumentation by the current task would apply right
    /// now: persistent entries followed by this task's scoped entries.
    pub fn snapshot(&self) -> Arc<[Wrapper]> {
        let mut wrappers = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let _ = SCOPED.try_with(|scoped| {
            wrappers.extend(
                scoped
                    .borrow()
                    .iter()
                    .filter(|entry| entry.visible(self.inner.id))
                    .map(|entry| entry.wrapper.clone()),
            );
        });

        wrappers.into()
    }

    /// Appends `extra` for the current task until the returned guard is dropped.
    pub fn scoped(&self, extra: impl IntoIterator<Item = Wrapper>) -> ScopedWrappers {
        let extra: Vec<Wrapper> = extra.into_iter().collect();
        let handles = extra.iter().map(Wrapper::handle).collect();

        let owner = task::try_id();
        SCOPED.with(|scoped| {
            scoped
                .borrow_mut()
                .extend(extra.into_iter().map(|wrapper| ScopedEntry {
                    chain: self.inner.id,
                    owner,
                    wrapper,
                }));
        });

        ScopedWrappers {
            chain: self.inner.id,
            handles,
            _not_send: PhantomData,
        }
    }

    /// Runs `body` with `extra` appended, restoring the chain afterwards.
    pub fn with_scoped<R>(
        &self,
        extra: impl IntoIterator<Item = Wrapper>,
        body: impl FnOnce() -> R,
    ) -> R {
        let _guard = self.scoped(extra);
        body()
    }

    /// Builds an instrumented listener from `raw` using the current snapshot.
    pub fn instrument(&self, raw: Callback) -> Listener {
        Listener::compose(raw, self.snapshot())
    }
}

impl Default for WrapperChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WrapperChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperChain")
            .field("id", &self.inner.id)
            .field("len", &self.len())
            .finish()
    }
}

/// Guard returned by [`WrapperChain::scoped`].
///
/// Not `Send`: scoped entries belong to the task that created them, so the
/// guard cannot be held across an `.await` in a spawned future.
#[must_use = "scoped wrappers are removed as soon as the guard is dropped"]
pub struct ScopedWrappers {
    chain: u64,
    handles: Vec<WrapperHandle>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopedWrappers {
    fn drop(&mut self) {
        let _ = SCOPED.try_with(|scoped| {
            scoped.borrow_mut().retain(|entry| {
                entry.chain != self.chain || !self.handles.contains(&entry.wrapper.handle)
            });
        });
    }
}

/// Appends a wrapper to the process-wide chain.
pub fn add_wrapper<F>(wrap: F) -> WrapperHandle
where
    F: Fn(Callback) -> Callback + Send + Sync + 'static,
{
    GLOBAL.add_fn(wrap)
}

/// Removes a wrapper from the process-wide chain.
pub fn remove_wrapper(handle: WrapperHandle) {
    GLOBAL.remove(handle);
}

/// Runs `body` with `extra` appended to the process-wide chain for this task.
pub fn with_scoped_wrappers<R>(
    extra: impl IntoIterator<Item = Wrapper>,
    body: impl FnOnce() -> R,
) -> R {
    GLOBAL.with_scoped(extra, body)
}

/// Instruments `raw` with the process-wide chain.
pub fn instrument<F>(raw: F) -> Listener
where
    F: Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static,
{
    GLOBAL.instrument(Arc::new(raw))
}

/// Resets per-thread and per-task instrumentation state in a freshly forked child.
///
/// Scoped entries and call-stack frames copied from the parent's in-flight
/// operations are discarded. Listener identities are plain integers, so every
/// listener created before the fork keeps its id, back-reference and snapshot.
pub fn after_fork() {
    let _ = SCOPED.try_with(|scoped| scoped.borrow_mut().clear());
    crate::call_stack::reset();
}
