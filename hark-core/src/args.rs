//! Emission arguments.
//!
//! Events carry an ordered list of type-erased values. Each event decides its
//! own argument shape, so a single emitter can emit `("data", 42)` on one event
//! and `("end",)` on another. Listeners read them back with [`Args::get`].
//!
//! ```rust
//! use hark_core::Args;
//!
//! let args = Args::from((42_u32, "hello"));
//! assert_eq!(args.get::<u32>(0), Some(&42));
//! assert_eq!(args.get::<&str>(1), Some(&"hello"));
//! assert_eq!(args.get::<String>(1), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Value = Arc<dyn Any + Send + Sync>;

/// An ordered, cheaply clonable list of emission arguments.
///
/// Cloning only bumps a reference count, so every scheduled listener task
/// can own a copy.
#[derive(Clone, Default)]
pub struct Args {
    values: Arc<Vec<Value>>,
}

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        Arc::make_mut(&mut self.values).push(Arc::new(value));
        self
    }

    /// Returns the argument at `index` if it exists and has type `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Returns `true` if the argument at `index` exists and has type `T`.
    pub fn is<T: Any>(&self, index: usize) -> bool {
        self.get::<T>(index).is_some()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_values(values: Vec<Value>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.len()).finish()
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

/// Implements `From<(T1, ..)>` for argument tuples.
macro_rules! impl_from_tuple {
    ($($T:ident),+) => {
        impl<$($T,)+> From<($($T,)+)> for Args
        where
            $($T: Any + Send + Sync,)+
        {
            #[allow(non_snake_case)]
            fn from(($($T,)+): ($($T,)+)) -> Self {
                Self::from_values(vec![$(Arc::new($T) as Value,)+])
            }
        }
    };
}

impl_from_tuple!(T1);
impl_from_tuple!(T1, T2);
impl_from_tuple!(T1, T2, T3);
impl_from_tuple!(T1, T2, T3, T4);
impl_from_tuple!(T1, T2, T3, T4, T5);
impl_from_tuple!(T1, T2, T3, T4, T5, T6);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_from_tuple!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);
