//! Lock built on one `AtomicBool`, for targets without an OS.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::primitives::SpinWait;

pub(crate) struct RawLock {
    held: AtomicBool,
}

impl RawLock {
    pub(crate) const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn lock(&self) {
        if !self.try_lock() {
            self.lock_contended();
        }
    }

    #[cold]
    fn lock_contended(&self) {
        tracing::trace!("lock contended, spinning");
        let mut backoff = SpinWait::new();
        loop {
            // Spin on a plain load so waiters do not fight over the cache line.
            while self.held.load(Ordering::Relaxed) {
                backoff.spin();
            }
            if self.try_lock() {
                return;
            }
        }
    }

    #[inline]
    pub(crate) fn try_lock(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    pub(crate) fn unlock(&self) {
        self.held.store(false, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}
