use super::traits::DeliveryStrategy;
use crate::emission::Emission;
use hark_core::{Args, DispatchKind, Error, Listener, call_stack};
use std::sync::Arc;
use tokio::runtime::Handle;

/// A concurrent delivery strategy.
///
/// Spawns one task per listener on the captured runtime and returns without
/// waiting for any of them. Each task gets a call stack of its own. A failing
/// listener only ends its own task; the failure is logged and never reaches
/// the emitter or the sibling tasks.
#[derive(Debug, Clone)]
pub struct ConcurrentDelivery {
    handle: Handle,
}

impl ConcurrentDelivery {
    /// Creates a strategy spawning on `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl DeliveryStrategy for ConcurrentDelivery {
    fn deliver(
        &self,
        event: &'static str,
        listeners: Arc<[Listener]>,
        args: Args,
    ) -> Result<Emission, Error> {
        let tasks = listeners
            .iter()
            .map(|listener| {
                let listener = listener.clone();
                let args = args.clone();
                self.handle.spawn(call_stack::task_scope(async move {
                    let result = {
                        let _frame = call_stack::enter(event);
                        listener.call(&args)
                    };
                    #[cfg(feature = "tracing")]
                    if let Err(error) = &result {
                        tracing::warn!(
                            event,
                            listener = %listener.id(),
                            %error,
                            "listener failed"
                        );
                    }
                    result
                }))
            })
            .collect();

        Ok(Emission::new(
            event,
            DispatchKind::Concurrent,
            listeners.len(),
            tasks,
        ))
    }
}
