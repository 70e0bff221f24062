//! # hark-core
//!
//! Core primitives for the hark event emitter.
//!
//! This crate has minimal dependencies. It holds everything that does not
//! depend on how an emitter stores or dispatches its listeners:
//!
//! - [`Args`]: the type-erased argument list an event is emitted with
//! - [`Listener`]: an instrumented callback with a stable [`ListenerId`]
//! - [`WrapperChain`]: the ordered wrappers applied at instrumentation time
//! - [`call_stack`]: which event is currently being emitted, per thread or per task
//!
//! # Error Types
//!
//! - [`Error`] - Top-level error type
//! - [`BoxError`] - Error type returned by listeners

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod args;
pub mod call_stack;
mod dispatch;
mod error;
mod listener;
pub mod wrapper;

// Re-exports
pub use args::Args;
pub use call_stack::current_event;
pub use dispatch::DispatchKind;
pub use error::{BoxError, Error};
pub use listener::{Callback, Listener, ListenerId};
pub use wrapper::{
    ScopedWrappers, Wrapper, WrapperChain, WrapperHandle, add_wrapper, instrument, remove_wrapper,
    with_scoped_wrappers,
};
