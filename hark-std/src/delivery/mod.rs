//! Dispatch strategies.
//!
//! Every emitter class runs its emissions through exactly one
//! [`DeliveryStrategy`], chosen once and kept for the rest of the process:
//!
//! - [`SynchronousDelivery`]: in order, on the caller's thread, before `emit` returns.
//! - [`ConcurrentDelivery`]: one spawned task per listener; `emit` returns once they are scheduled.
//!
//! [`Dispatch`] is the per-class selection between the two.

pub(crate) mod concurrent;
pub(crate) mod synchronous;
pub(crate) mod traits;

pub use concurrent::ConcurrentDelivery;
pub use synchronous::SynchronousDelivery;
pub use traits::DeliveryStrategy;

use crate::emission::Emission;
use hark_core::{Args, DispatchKind, Error, Listener};
use std::sync::Arc;
use tokio::runtime::Handle;

/// The dispatch strategy of an emitter class.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// See [`SynchronousDelivery`].
    Synchronous,
    /// See [`ConcurrentDelivery`]. Listener tasks are spawned on this runtime.
    Concurrent(Handle),
}

impl Dispatch {
    /// Concurrent if a tokio runtime is active on this thread, synchronous otherwise.
    pub fn detect() -> Self {
        match Handle::try_current() {
            Ok(handle) => Dispatch::Concurrent(handle),
            Err(_) => Dispatch::Synchronous,
        }
    }

    /// Which of the two strategies this is.
    pub fn kind(&self) -> DispatchKind {
        match self {
            Dispatch::Synchronous => DispatchKind::Synchronous,
            Dispatch::Concurrent(_) => DispatchKind::Concurrent,
        }
    }
}

impl DeliveryStrategy for Dispatch {
    fn deliver(
        &self,
        event: &'static str,
        listeners: Arc<[Listener]>,
        args: Args,
    ) -> Result<Emission, Error> {
        match self {
            Dispatch::Synchronous => SynchronousDelivery.deliver(event, listeners, args),
            Dispatch::Concurrent(handle) => {
                ConcurrentDelivery::new(handle.clone()).deliver(event, listeners, args)
            }
        }
    }
}
