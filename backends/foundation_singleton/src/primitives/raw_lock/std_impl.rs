//! Lock built on `std::sync::Mutex` and `std::sync::Condvar`.
//!
//! The platform mutex only ever guards the `held` flag, so it is locked for
//! a handful of instructions at a time. A thread that finds the flag set
//! sleeps on `released` until an `unlock` wakes it.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub(crate) struct RawLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl RawLock {
    pub(crate) const fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// Nothing can panic while the flag is locked, so poison is ignored.
    #[inline]
    fn held(&self) -> MutexGuard<'_, bool> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock(&self) {
        let mut held = self.held();
        if *held {
            tracing::trace!("lock contended, parking");
            held = self
                .released
                .wait_while(held, |held| *held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    pub(crate) fn try_lock(&self) -> bool {
        let mut held = self.held();
        !core::mem::replace(&mut *held, true)
    }

    pub(crate) fn unlock(&self) {
        *self.held() = false;
        self.released.notify_one();
    }

    pub(crate) fn is_locked(&self) -> bool {
        *self.held()
    }
}
