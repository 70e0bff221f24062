//! Error types for hark.
//!
//! This module provides a small error hierarchy using `thiserror`:
//!
//! - [`Error`] - Top-level error type for every emitter operation
//! - [`BoxError`] - The boxed error type listeners return

use crate::dispatch::DispatchKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all hark operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// The event name is not declared by the emitter's class.
    #[error("unknown event `{event}` for emitter class `{class}`")]
    UnknownEvent {
        /// Name of the emitter class that rejected the event.
        class: &'static str,
        /// The rejected event name.
        event: String,
    },

    /// A listener failed during synchronous dispatch.
    ///
    /// The remaining listeners of that emission were not invoked.
    #[error("listener for `{event}` failed: {source}")]
    Listener {
        /// The event being emitted when the listener failed.
        event: &'static str,
        /// The listener's own error.
        #[source]
        source: BoxError,
    },

    /// The dispatch strategy of a class was already fixed to something else.
    #[error("dispatch for class `{class}` is already fixed to {fixed}")]
    DispatchFixed {
        /// Name of the emitter class.
        class: &'static str,
        /// The strategy that is in effect.
        fixed: DispatchKind,
    },
}

impl Error {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use hark_core::Error;
    ///
    /// let err = Error::UnknownEvent { class: "Stream", event: "x".into() };
    /// assert_eq!(err.as_label(), "unknown_event");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::UnknownEvent { .. } => "unknown_event",
            Error::Listener { .. } => "listener_failed",
            Error::DispatchFixed { .. } => "dispatch_fixed",
        }
    }

    /// Returns `true` if this is an [`Error::UnknownEvent`].
    pub fn is_unknown_event(&self) -> bool {
        matches!(self, Error::UnknownEvent { .. })
    }
}
