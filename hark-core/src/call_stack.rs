//! # Call Stack
//!
//! Records which events are currently being emitted, innermost last, so a
//! listener can ask "what event am I running under" via [`current_event`].
//!
//! Two storage forms exist:
//!
//! - **Thread stack**: used by synchronous dispatch. Nested emissions push and
//!   pop on the emitting thread.
//! - **Task stack**: every listener scheduled by concurrent dispatch runs
//!   inside [`task_scope`] and gets a stack of its own, shared with neither
//!   the emitter nor its sibling tasks.
//!
//! [`enter`] always pushes onto the innermost stack in scope: the task stack
//! when running inside a scoped task, the thread stack otherwise.

use std::{cell::RefCell, future::Future, marker::PhantomData};

thread_local! {
    static THREAD_STACK: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

tokio::task_local! {
    static TASK_STACK: RefCell<Vec<&'static str>>;
}

fn in_task_scope() -> bool {
    TASK_STACK.try_with(|_| ()).is_ok()
}

fn with_stack<R>(f: impl FnOnce(&mut Vec<&'static str>) -> R) -> Option<R> {
    if in_task_scope() {
        TASK_STACK.try_with(|stack| f(&mut stack.borrow_mut())).ok()
    } else {
        THREAD_STACK.try_with(|stack| f(&mut stack.borrow_mut())).ok()
    }
}

/// The event currently being emitted in this context, if any.
pub fn current_event() -> Option<&'static str> {
    with_stack(|stack| stack.last().copied()).flatten()
}

/// Number of emissions currently in flight in this context.
pub fn depth() -> usize {
    with_stack(|stack| stack.len()).unwrap_or(0)
}

/// Pushes `event` and returns a frame that pops it when dropped.
pub fn enter(event: &'static str) -> Frame {
    with_stack(|stack| stack.push(event));
    Frame {
        event,
        _not_send: PhantomData,
    }
}

/// Runs `future` with a fresh, empty task stack.
pub fn task_scope<F: Future>(future: F) -> impl Future<Output = F::Output> {
    TASK_STACK.scope(RefCell::new(Vec::new()), future)
}

pub(crate) fn reset() {
    let _ = THREAD_STACK.try_with(|stack| stack.borrow_mut().clear());
}

/// A pushed call-stack entry. Dropping it pops the entry again.
#[must_use = "the event is popped as soon as the frame is dropped"]
pub struct Frame {
    event: &'static str,
    _not_send: PhantomData<*const ()>,
}

impl Frame {
    /// The event this frame records.
    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        with_stack(|stack| {
            let popped = stack.pop();
            debug_assert_eq!(popped, Some(self.event), "call stack frames dropped out of order");
        });
    }
}
