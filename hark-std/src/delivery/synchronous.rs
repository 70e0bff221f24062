use super::traits::DeliveryStrategy;
use crate::emission::Emission;
use hark_core::{Args, DispatchKind, Error, Listener, call_stack};
use std::sync::Arc;

/// A synchronous delivery strategy.
///
/// Pushes the event onto the caller's call stack, runs the listeners one by
/// one and pops it again. Stops at the first error, which is returned to the
/// emitter; the remaining listeners of that emission are skipped. Listeners
/// may emit again, which nests another frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct SynchronousDelivery;

impl DeliveryStrategy for SynchronousDelivery {
    fn deliver(
        &self,
        event: &'static str,
        listeners: Arc<[Listener]>,
        args: Args,
    ) -> Result<Emission, Error> {
        let _frame = call_stack::enter(event);
        for listener in listeners.iter() {
            listener
                .call(&args)
                .map_err(|source| Error::Listener { event, source })?;
        }
        Ok(Emission::new(
            event,
            DispatchKind::Synchronous,
            listeners.len(),
            Vec::new(),
        ))
    }
}
