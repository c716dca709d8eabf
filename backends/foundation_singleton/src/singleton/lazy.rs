//! First-use construction with double-checked locking.

use core::any::type_name;
use core::fmt;

use crate::singleton::slot::RawSlot;
use crate::singleton::{Init, PolicyKind, SingletonError, SingletonResult, SlotState, Strategy};

/// A slot that builds its instance on the first call to
/// [`instance`](LazySlot::instance).
///
/// Once built, every call is one atomic load. Concurrent first callers block
/// on the slot lock until the winner has published; exactly one initializer
/// run succeeds.
///
/// ```
/// use foundation_singleton::{from_default, LazySlot};
///
/// static NAMES: LazySlot<Vec<String>> = LazySlot::new(from_default);
///
/// assert!(NAMES.get().is_none());
/// assert!(NAMES.instance().unwrap().is_empty());
/// assert!(NAMES.get().is_some());
/// ```
///
/// An initializer must not call back into its own slot; that call waits on
/// the lock the initializer is holding.
pub struct LazySlot<T> {
    slot: RawSlot<T>,
    init: Init<T>,
}

impl<T> LazySlot<T> {
    /// An empty slot that will build with `init` on first access.
    #[must_use]
    pub const fn new(init: Init<T>) -> Self {
        Self {
            slot: RawSlot::new(),
            init,
        }
    }

    /// Returns the instance, constructing it on the first call.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` when the initializer fails. The slot
    /// stays empty and the next call tries again.
    #[inline]
    pub fn instance(&self) -> SingletonResult<&T> {
        self.slot.get_or_try_init(self.init).map_err(|err| {
            tracing::warn!(
                type_name = type_name::<T>(),
                policy = %PolicyKind::Lazy,
                error = %err,
                "singleton construction failed"
            );
            SingletonError::Construction(err)
        })
    }

    /// Returns the instance without constructing it.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    #[inline]
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }
}

impl<T: Send + Sync> Strategy<T> for LazySlot<T> {
    fn instance(&self) -> SingletonResult<&T> {
        LazySlot::instance(self)
    }

    fn get(&self) -> Option<&T> {
        LazySlot::get(self)
    }

    fn preload(&self) -> SingletonResult<&T> {
        LazySlot::instance(self)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lazy
    }

    fn state(&self) -> SlotState {
        LazySlot::state(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for LazySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySlot")
            .field("state", &self.state())
            .field("value", &self.get())
            .finish_non_exhaustive()
    }
}
