//! The outcome of a single `emit` call.

use futures::future::join_all;
use hark_core::{BoxError, DispatchKind};
use tokio::task::JoinHandle;

/// What an `emit` call dispatched.
///
/// Under synchronous dispatch every listener has already run when this is
/// returned. Under concurrent dispatch the listeners have only been
/// scheduled; dropping the `Emission` detaches them, [`Emission::settled`]
/// waits for them.
#[derive(Debug)]
pub struct Emission {
    event: &'static str,
    kind: Option<DispatchKind>,
    dispatched: usize,
    tasks: Vec<JoinHandle<Result<(), BoxError>>>,
}

impl Emission {
    pub(crate) fn new(
        event: &'static str,
        kind: DispatchKind,
        dispatched: usize,
        tasks: Vec<JoinHandle<Result<(), BoxError>>>,
    ) -> Self {
        Self {
            event,
            kind: Some(kind),
            dispatched,
            tasks,
        }
    }

    /// An emission that found no listeners and did nothing.
    pub(crate) fn skipped(event: &'static str) -> Self {
        Self {
            event,
            kind: None,
            dispatched: 0,
            tasks: Vec::new(),
        }
    }

    /// The emitted event.
    pub fn event(&self) -> &'static str {
        self.event
    }

    /// The strategy that delivered the event, `None` if there were no listeners.
    pub fn kind(&self) -> Option<DispatchKind> {
        self.kind
    }

    /// Number of listeners in the emission's snapshot.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Returns `true` if no listener was dispatched.
    pub fn is_empty(&self) -> bool {
        self.dispatched == 0
    }

    /// Waits for every scheduled listener task and returns how many failed,
    /// either with an error or a panic. Synchronous emissions return `0`
    /// immediately, since their failures were already returned by `emit`.
    pub async fn settled(self) -> usize {
        join_all(self.tasks)
            .await
            .into_iter()
            .filter(|joined| !matches!(joined, Ok(Ok(()))))
            .count()
    }
}
