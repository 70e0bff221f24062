//! # hark - Instrumented In-Process Event Emitters
//!
//! `hark` lets objects declare a fixed set of named events, lets other code
//! attach listeners to them, and emits events to those listeners with
//! arbitrary arguments.
//!
//! Two things set it apart from a plain callback list:
//!
//! - **Instrumentation**: every listener is built through a [`WrapperChain`].
//!   Wrappers active at registration time enclose the listener like an onion,
//!   the first wrapper outermost, whichever emitter the listener ends up on.
//! - **Dispatch**: each [`EventClass`] runs either synchronously (in order, on
//!   the caller's thread) or concurrently (one tokio task per listener). The
//!   choice is made once, at the class's first emission, or pinned up front.
//!
//! ## Quick Start
//!
//! ```rust
//! use hark::prelude::*;
//!
//! static STREAM: EventClass = EventClass::new("Stream", &["data", "end"]);
//! STREAM.pin(Dispatch::Synchronous)?;
//!
//! let stream = Emitter::new(&STREAM);
//! stream.on(&["data"], |args| {
//!     println!("got {:?}", args.get::<u32>(0));
//!     Ok(())
//! })?;
//! stream.once(&["end"], |_| {
//!     println!("done");
//!     Ok(())
//! })?;
//!
//! stream.emit("data", (42_u32,))?;
//! stream.emit("end", ())?;
//! stream.emit("end", ())?; // the `once` listener is gone
//! # Ok::<(), hark::Error>(())
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use hark_core::{
    // Arguments
    Args,
    // Errors
    BoxError,
    // Listeners
    Callback,
    DispatchKind,
    Error,
    Listener,
    ListenerId,
    ScopedWrappers,
    // Wrapper chain
    Wrapper,
    WrapperChain,
    WrapperHandle,
    add_wrapper,
    // Call stack
    current_event,
    instrument,
    remove_wrapper,
    with_scoped_wrappers,
};

pub use hark_std::{
    // Dispatch
    ConcurrentDelivery,
    DeliveryStrategy,
    Dispatch,
    Emission,
    // Emitters
    Emitter,
    EmitterBuilder,
    EventClass,
    // Lifecycle events
    FIRST_LISTENER,
    LIFECYCLE_EVENTS,
    NEW_LISTENER,
    NO_LISTENERS,
    SynchronousDelivery,
    WeakEmitter,
};

/// Call stack inspection and per-thread fork recovery.
pub mod call_stack {
    pub use hark_core::call_stack::{Frame, current_event, depth, enter, task_scope};
    pub use hark_core::wrapper::after_fork;
}

/// Standard wrapper implementations.
pub mod wrappers {
    pub use hark_std::wrappers::{catch_errors, catch_with, log_calls};
}

/// Testing utilities.
pub mod testing {
    pub use hark_std::testing::{Call, CountingListener, Recorder, failing};
}

/// Prelude module - common imports for hark.
///
/// # Usage
///
/// ```rust
/// use hark::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Args, BoxError, Dispatch, Emitter, Error, EventClass, Listener, Wrapper, WrapperChain,
        current_event,
    };
}
