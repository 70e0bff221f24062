//! Logging wrapper for listener observation.

use hark_core::{Args, BoxError, Callback, Wrapper};
use std::sync::Arc;

/// A wrapper that logs every invocation of the listeners it encloses.
///
/// Each call runs inside a `listener` debug span carrying `label`, the event
/// being emitted and the argument count, with a `before` and an `after` event.
pub fn log_calls(label: &'static str) -> Wrapper {
    Wrapper::new(move |inner: Callback| -> Callback {
        Arc::new(move |args: &Args| observe(label, &inner, args))
    })
}

#[cfg(feature = "tracing")]
fn observe(label: &'static str, inner: &Callback, args: &Args) -> Result<(), BoxError> {
    let span = tracing::debug_span!(
        "listener",
        wrapper = label,
        event = hark_core::current_event().unwrap_or("<direct>"),
        args = args.len()
    );
    let _entered = span.enter();
    tracing::debug!("before");
    let result = inner(args);
    tracing::debug!(ok = result.is_ok(), "after");
    result
}

#[cfg(not(feature = "tracing"))]
fn observe(_label: &'static str, inner: &Callback, args: &Args) -> Result<(), BoxError> {
    inner(args)
}
