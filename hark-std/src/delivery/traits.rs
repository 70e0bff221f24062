use crate::emission::Emission;
use hark_core::{Args, Error, Listener};
use std::sync::Arc;

/// Strategy for delivering an event to a snapshot of listeners.
///
/// The snapshot is taken when emission begins and never changes afterwards:
/// listeners added or removed while it is being delivered only affect the
/// next emission.
pub trait DeliveryStrategy: Send + Sync {
    /// Deliver `args` to every listener in `listeners`, in order.
    fn deliver(
        &self,
        event: &'static str,
        listeners: Arc<[Listener]>,
        args: Args,
    ) -> Result<Emission, Error>;
}
