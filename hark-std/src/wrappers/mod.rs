//! Standard wrappers.
//!
//! Ready-made [`Wrapper`](hark_core::Wrapper)s for a [`WrapperChain`](hark_core::WrapperChain):
//!
//! - [`log_calls`]: a `tracing` span and before/after events around every call
//! - [`catch_errors`] / [`catch_with`]: turn listener errors into successful calls

pub mod catch;
pub mod logging;

pub use catch::{catch_errors, catch_with};
pub use logging::log_calls;
