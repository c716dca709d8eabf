//! Condition variable paired with [`Mutex`](super::Mutex).
//!
//! Waiters read a generation number while they still hold the mutex, release
//! it, and sleep until a notifier advances the generation. A notification
//! sent after that read is therefore never lost. Under `std` the sleep is a
//! wait on the platform condition variable; without it the waiter backs off
//! with [`SpinWait`](super::SpinWait). Callers re-check their predicate in a
//! loop, since a wakeup may be spurious.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use foundation_singleton::{Condvar, Mutex};
//!
//! let pair = Arc::new((Mutex::new(false), Condvar::new()));
//! let signaller = Arc::clone(&pair);
//!
//! thread::spawn(move || {
//!     let (ready, cvar) = &*signaller;
//!     *ready.lock().unwrap() = true;
//!     cvar.notify_all();
//! });
//!
//! let (ready, cvar) = &*pair;
//! let guard = cvar.wait_while(ready.lock().unwrap(), |ready| !*ready).unwrap();
//! assert!(*guard);
//! ```

use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;

use crate::primitives::{LockResult, MutexGuard, PoisonError};

#[cfg(feature = "std")]
mod std_impl;
#[cfg(feature = "std")]
use std_impl::Generation;

#[cfg(not(feature = "std"))]
mod nostd_impl;
#[cfg(not(feature = "std"))]
use nostd_impl::Generation;

/// How many sleepers a notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    One,
    All,
}

/// Whether a timed wait ended because its time ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeoutResult(bool);

impl WaitTimeoutResult {
    /// `true` if the wait ended because the timeout elapsed.
    #[inline]
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.0
    }
}

/// A condition variable for threads blocked on a [`Mutex`](super::Mutex).
pub struct Condvar {
    waiters: AtomicUsize,
    generation: Generation,
}

impl Condvar {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            waiters: AtomicUsize::new(0),
            generation: Generation::new(),
        }
    }

    /// Releases the lock held by `guard`, blocks until notified, then
    /// reacquires the lock.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoisonError)` with the reacquired guard if the mutex is
    /// poisoned when the wait ends.
    pub fn wait<'a, T: ?Sized>(&self, guard: MutexGuard<'a, T>) -> LockResult<MutexGuard<'a, T>> {
        let mutex = guard.mutex();
        self.sleep(guard, None);
        mutex.lock()
    }

    /// Waits until `condition` returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoisonError)` if the mutex is poisoned after any wake-up.
    pub fn wait_while<'a, T: ?Sized, F>(
        &self,
        mut guard: MutexGuard<'a, T>,
        mut condition: F,
    ) -> LockResult<MutexGuard<'a, T>>
    where
        F: FnMut(&mut T) -> bool,
    {
        while condition(&mut *guard) {
            guard = self.wait(guard)?;
        }
        Ok(guard)
    }

    /// Like [`Condvar::wait`] but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoisonError)` carrying the guard and the timeout status if
    /// the mutex is poisoned when the wait ends.
    pub fn wait_timeout<'a, T: ?Sized>(
        &self,
        guard: MutexGuard<'a, T>,
        timeout: Duration,
    ) -> LockResult<(MutexGuard<'a, T>, WaitTimeoutResult)> {
        let mutex = guard.mutex();
        let result = WaitTimeoutResult(self.sleep(guard, Some(timeout)));
        mutex
            .lock()
            .map(|guard| (guard, result))
            .map_err(|err| PoisonError::new((err.into_inner(), result)))
    }

    /// Wakes one waiter, if any.
    #[inline]
    pub fn notify_one(&self) {
        self.notify(Wake::One);
    }

    /// Wakes every waiter.
    #[inline]
    pub fn notify_all(&self) {
        self.notify(Wake::All);
    }

    /// Threads that have released their mutex here and not yet relocked it.
    #[inline]
    #[must_use]
    pub fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::SeqCst)
    }

    /// A waiter registers before releasing its mutex, and a notifier can only
    /// change the predicate after that release, so reading zero here means
    /// nobody can be asleep.
    fn notify(&self, wake: Wake) {
        if self.waiters.load(Ordering::SeqCst) == 0 {
            return;
        }
        self.generation.advance(wake);
    }

    /// Returns `true` if the timeout elapsed first.
    fn sleep<T: ?Sized>(&self, guard: MutexGuard<'_, T>, timeout: Option<Duration>) -> bool {
        self.waiters.fetch_add(1, Ordering::SeqCst);
        let timed_out = self.generation.sleep_after(move || drop(guard), timeout);
        self.waiters.fetch_sub(1, Ordering::SeqCst);
        timed_out
    }
}

impl Default for Condvar {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Condvar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Condvar")
            .field("waiters", &self.waiter_count())
            .finish_non_exhaustive()
    }
}
