//! Dispatch strategy identifiers.

use std::fmt;

/// The two dispatch disciplines an emitter class can be fixed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    /// Listeners run in order on the emitting thread before `emit` returns.
    Synchronous,
    /// Each listener runs in its own spawned task; `emit` returns once they are scheduled.
    Concurrent,
}

impl DispatchKind {
    /// Returns a short stable label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            DispatchKind::Synchronous => "synchronous",
            DispatchKind::Concurrent => "concurrent",
        }
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
