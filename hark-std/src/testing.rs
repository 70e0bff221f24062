//! Testing utilities for hark.
//!
//! This module provides listeners that make emitter behavior easy to assert on.
//!
//! # Features
//!
//! - [`Recorder`]: records every call of the listeners it hands out, in order
//! - [`CountingListener`]: counts invocations
//! - [`failing`]: a listener that always returns an error

use hark_core::{Args, BoxError, current_event};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recorder
// ============================================================================

/// A single recorded listener call.
#[derive(Debug, Clone)]
pub struct Call {
    /// Label of the listener that was called.
    pub label: String,
    /// The event it ran under, `None` for direct calls.
    pub event: Option<&'static str>,
    /// The arguments it received.
    pub args: Args,
}

/// Records calls across any number of labelled listeners.
///
/// # Example
///
/// ```rust
/// use hark_std::testing::Recorder;
/// use hark_std::{Dispatch, Emitter, EventClass};
///
/// static STREAM: EventClass = EventClass::new("RecordedStream", &["data"]);
/// STREAM.pin(Dispatch::Synchronous).unwrap();
///
/// let recorder = Recorder::new();
/// let stream = Emitter::new(&STREAM);
/// stream.on(&["data"], recorder.listener("first"))?;
/// stream.on(&["data"], recorder.listener("second"))?;
/// stream.emit("data", (1_u8,))?;
///
/// assert_eq!(recorder.labels(), vec!["first", "second"]);
/// # Ok::<(), hark_std::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener recording its calls under `label`.
    pub fn listener(
        &self,
        label: &str,
    ) -> impl Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static + use<> {
        let calls = self.calls.clone();
        let label = label.to_owned();
        move |args: &Args| {
            calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Call {
                    label: label.clone(),
                    event: current_event(),
                    args: args.clone(),
                });
            Ok(())
        }
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The labels of the recorded calls, in call order.
    pub fn labels(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.label).collect()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// Counts invocations of the listeners it hands out.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener incrementing this counter.
    pub fn listener(
        &self,
    ) -> impl Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static + use<> {
        let count = self.count.clone();
        move |_: &Args| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

// ============================================================================
// Failing Listener
// ============================================================================

/// A listener that always fails with `message`.
pub fn failing(
    message: &str,
) -> impl Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static + use<> {
    let message = message.to_owned();
    move |_: &Args| Err(message.clone().into())
}
