//! # hark-std
//!
//! The emitter core of hark, built on [`hark_core`].
//!
//! This crate provides:
//! - **Classes**: [`EventClass`], the static set of events a family of emitters declares
//! - **Emitters**: [`Emitter`] with `on` / `once` / `emit` / `remove_listener` and lifecycle events
//! - **Dispatch**: [`Dispatch`] selecting [`SynchronousDelivery`] or [`ConcurrentDelivery`]
//! - **Standard wrappers**: logging and error catching in [`wrappers`]
//! - **Testing**: recorders and counters in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core primitives
pub use hark_core;
pub use hark_core::{
    Args, BoxError, Callback, DispatchKind, Error, Listener, ListenerId, Wrapper, WrapperChain,
    WrapperHandle, current_event,
};

// Modules
mod class;
pub mod delivery;
mod emission;
mod emitter;
mod registry;
pub mod testing;
pub mod wrappers;

pub use class::{EventClass, FIRST_LISTENER, LIFECYCLE_EVENTS, NEW_LISTENER, NO_LISTENERS};
pub use delivery::{ConcurrentDelivery, DeliveryStrategy, Dispatch, SynchronousDelivery};
pub use emission::Emission;
pub use emitter::{Emitter, EmitterBuilder, WeakEmitter};
