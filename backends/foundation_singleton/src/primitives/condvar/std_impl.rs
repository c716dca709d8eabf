//! Generation counter guarded by `std::sync::Mutex`, slept on with
//! `std::sync::Condvar`.

use core::time::Duration;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::Wake;

pub(super) struct Generation {
    current: Mutex<u64>,
    advanced: Condvar,
}

impl Generation {
    pub(super) const fn new() -> Self {
        Self {
            current: Mutex::new(0),
            advanced: Condvar::new(),
        }
    }

    /// Only counter arithmetic runs under this lock, so poison is ignored.
    #[inline]
    fn current(&self) -> MutexGuard<'_, u64> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the generation, runs `release`, then sleeps until the generation
    /// moves or `timeout` elapses. Returns `true` on timeout.
    ///
    /// The counter stays locked from the read until the thread is asleep, so
    /// an `advance` issued after `release` cannot slip in between.
    pub(super) fn sleep_after<R: FnOnce()>(&self, release: R, timeout: Option<Duration>) -> bool {
        let current = self.current();
        let observed = *current;
        release();

        match timeout {
            None => {
                drop(
                    self.advanced
                        .wait_while(current, |now| *now == observed)
                        .unwrap_or_else(PoisonError::into_inner),
                );
                false
            }
            Some(timeout) => {
                let (_current, result) = self
                    .advanced
                    .wait_timeout_while(current, timeout, |now| *now == observed)
                    .unwrap_or_else(PoisonError::into_inner);
                result.timed_out()
            }
        }
    }

    pub(super) fn advance(&self, wake: Wake) {
        {
            let mut current = self.current();
            *current = current.wrapping_add(1);
        }
        match wake {
            Wake::One => self.advanced.notify_one(),
            Wake::All => self.advanced.notify_all(),
        }
    }
}
