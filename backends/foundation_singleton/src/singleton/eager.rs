//! Construction as an explicit start-up step.
//!
//! Rust runs no code before `main`, and relying on implicit static
//! initialization order across modules is exactly what eager singletons must
//! not do. An [`EagerSlot`] is therefore loaded by a documented call
//! ([`EagerSlot::load`], [`Singleton::preload`](crate::Singleton::preload) or
//! [`preload!`](crate::preload)) during start-up, and from then on
//! [`EagerSlot::instance`] is a single atomic load with no locking.

use core::any::type_name;
use core::fmt;

use crate::singleton::slot::RawSlot;
use crate::singleton::{Init, PolicyKind, SingletonError, SingletonResult, SlotState, Strategy};

/// A slot whose instance is built by an explicit load step.
///
/// ```
/// use foundation_singleton::{EagerSlot, SingletonError};
///
/// static LIMITS: EagerSlot<[u32; 2]> = EagerSlot::new(|| Ok([64, 1024]));
///
/// assert!(matches!(LIMITS.instance(), Err(SingletonError::NotLoaded { .. })));
/// LIMITS.load().unwrap();
/// assert_eq!(LIMITS.instance().unwrap()[1], 1024);
/// ```
pub struct EagerSlot<T> {
    slot: RawSlot<T>,
    init: Init<T>,
}

impl<T> EagerSlot<T> {
    /// An unloaded slot that will build with `init`.
    #[must_use]
    pub const fn new(init: Init<T>) -> Self {
        Self {
            slot: RawSlot::new(),
            init,
        }
    }

    /// Builds the instance if it is not built yet. Safe to call from several
    /// threads and more than once; only the first successful run constructs.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` when the initializer fails. The slot
    /// stays unloaded and `load` may be called again.
    pub fn load(&self) -> SingletonResult<&T> {
        let loaded = self.slot.get_or_try_init(self.init).map_err(|err| {
            tracing::warn!(
                type_name = type_name::<T>(),
                policy = %PolicyKind::Eager,
                error = %err,
                "eager load failed"
            );
            SingletonError::Construction(err)
        })?;
        tracing::debug!(type_name = type_name::<T>(), "eager singleton loaded");
        Ok(loaded)
    }

    /// Returns the loaded instance. Never constructs.
    ///
    /// # Errors
    ///
    /// `SingletonError::NotLoaded` if [`load`](EagerSlot::load) has not
    /// completed yet.
    #[inline]
    pub fn instance(&self) -> SingletonResult<&T> {
        self.slot.get().ok_or(SingletonError::NotLoaded {
            type_name: type_name::<T>(),
        })
    }

    /// Returns the instance if loaded.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    #[inline]
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }
}

impl<T: Send + Sync> Strategy<T> for EagerSlot<T> {
    fn instance(&self) -> SingletonResult<&T> {
        EagerSlot::instance(self)
    }

    fn get(&self) -> Option<&T> {
        EagerSlot::get(self)
    }

    fn preload(&self) -> SingletonResult<&T> {
        self.load()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Eager
    }

    fn state(&self) -> SlotState {
        EagerSlot::state(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for EagerSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerSlot")
            .field("state", &self.state())
            .field("value", &self.get())
            .finish_non_exhaustive()
    }
}
