#![allow(dead_code)]

use hark::{Args, BoxError, Dispatch, Emitter, EventClass, WrapperChain};
use std::sync::{Arc, Mutex};

// ============================================================================
// Emitter Construction
// ============================================================================

/// A synchronous emitter of `class` with a private wrapper chain.
pub fn sync_emitter(class: &'static EventClass) -> Emitter {
    class.pin(Dispatch::Synchronous).unwrap();
    Emitter::builder(class)
        .wrapper_chain(WrapperChain::new())
        .build()
}

/// A concurrent emitter of `class` spawning on the current runtime.
pub fn concurrent_emitter(class: &'static EventClass) -> Emitter {
    class
        .pin(Dispatch::Concurrent(tokio::runtime::Handle::current()))
        .unwrap();
    Emitter::builder(class)
        .wrapper_chain(WrapperChain::new())
        .build()
}

// ============================================================================
// Shared Log
// ============================================================================

/// An ordered, shareable list of strings for asserting call order.
#[derive(Clone, Default)]
pub struct Log {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        self.lines.lock().unwrap().push(line.into());
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// A listener pushing `line` on every call.
    pub fn listener(
        &self,
        line: &str,
    ) -> impl Fn(&Args) -> Result<(), BoxError> + Send + Sync + 'static + use<> {
        let log = self.clone();
        let line = line.to_owned();
        move |_: &Args| {
            log.push(line.clone());
            Ok(())
        }
    }
}
