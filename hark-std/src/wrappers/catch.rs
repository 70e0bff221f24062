//! Error-catching wrappers.

use hark_core::{Args, BoxError, Callback, Wrapper};
use std::sync::Arc;

/// A wrapper that hands listener errors to `handler` and reports success.
///
/// Under synchronous dispatch this keeps one failing listener from halting
/// the rest of the emission.
pub fn catch_with<F>(handler: F) -> Wrapper
where
    F: Fn(BoxError) + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    Wrapper::new(move |inner: Callback| -> Callback {
        let handler = handler.clone();
        Arc::new(move |args: &Args| -> Result<(), BoxError> {
            if let Err(error) = inner(args) {
                handler(error);
            }
            Ok(())
        })
    })
}

/// [`catch_with`] logging each error as a warning.
pub fn catch_errors() -> Wrapper {
    catch_with(|error| {
        #[cfg(feature = "tracing")]
        {
            tracing::warn!(
                event = hark_core::current_event().unwrap_or("<direct>"),
                %error,
                "listener error caught"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = error;
        }
    })
}
