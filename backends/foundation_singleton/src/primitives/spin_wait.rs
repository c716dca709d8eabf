//! Backoff used while polling a contended atomic.
//!
//! The `no_std` lock and condvar wait with it, since there is no OS to park
//! on. The first rounds issue an exponentially growing number of CPU spin
//! hints. Once the budget is spent each round yields the thread under `std`
//! and issues a single spin hint otherwise.

use core::hint;

const SPIN_LIMIT: u32 = 10;

/// Exponential backoff state for one wait.
#[derive(Debug)]
pub struct SpinWait {
    counter: u32,
}

impl SpinWait {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Backs off once.
    ///
    /// Returns `true` while still in the spinning phase and `false` once the
    /// spin budget is exhausted and the round yielded instead.
    ///
    /// ```
    /// use foundation_singleton::SpinWait;
    ///
    /// let mut backoff = SpinWait::new();
    /// while backoff.spin() {}
    /// assert!(backoff.is_exhausted());
    /// ```
    #[inline]
    pub fn spin(&mut self) -> bool {
        if self.counter >= SPIN_LIMIT {
            Self::relax();
            return false;
        }

        for _ in 0..(1u32 << self.counter) {
            hint::spin_loop();
        }

        self.counter += 1;
        true
    }

    /// Starts the spinning phase over.
    #[inline]
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Rounds spun so far.
    #[inline]
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// `true` once further rounds yield instead of spinning.
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.counter >= SPIN_LIMIT
    }

    #[cfg(feature = "std")]
    #[inline]
    fn relax() {
        std::thread::yield_now();
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn relax() {
        hint::spin_loop();
    }
}

impl Default for SpinWait {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
