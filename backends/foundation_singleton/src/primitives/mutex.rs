//! Mutual exclusion with poisoning.
//!
//! A [`Mutex`] owns its data and a [`RawLock`](super::raw_lock) that blocks
//! in the OS under `std`. Poisoning follows the standard library rule: the
//! guard remembers whether its thread was already unwinding when it took the
//! lock, and poisons on drop only if a panic started while it was held. A
//! critical section that runs to completion inside a destructor during an
//! unrelated unwind leaves the mutex clean.
//!
//! # Examples
//!
//! ```
//! use foundation_singleton::{Mutex, TryLockError};
//!
//! let mutex = Mutex::new(0);
//!
//! let mut guard = mutex.lock().unwrap();
//! *guard += 1;
//! assert!(matches!(mutex.try_lock(), Err(TryLockError::WouldBlock)));
//! guard.unlock();
//!
//! assert_eq!(*mutex.try_lock().unwrap(), 1);
//! ```

use core::cell::UnsafeCell;
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::primitives::raw_lock::RawLock;
use crate::primitives::{LockResult, PoisonError, TryLockError, TryLockResult};

/// A mutual exclusion lock protecting a `T`.
pub struct Mutex<T: ?Sized> {
    raw: RawLock,
    poisoned: AtomicBool,
    data: UnsafeCell<T>,
}

/// The data-less lock used to guard critical sections that protect state
/// stored elsewhere (for example the pointer inside a singleton slot).
pub type Lock = Mutex<()>;

unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}

/// Proof of ownership of a [`Mutex`]. The lock is released on drop.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct MutexGuard<'a, T: ?Sized + 'a> {
    mutex: &'a Mutex<T>,
    panicking_at_lock: bool,
}

unsafe impl<T: ?Sized + Sync> Sync for MutexGuard<'_, T> {}

#[inline]
fn thread_panicking() -> bool {
    #[cfg(feature = "std")]
    {
        std::thread::panicking()
    }
    #[cfg(not(feature = "std"))]
    {
        false
    }
}

impl<T> Mutex<T> {
    /// Creates an unlocked, unpoisoned mutex.
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            raw: RawLock::new(),
            poisoned: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Takes the data out of the mutex.
    ///
    /// # Errors
    ///
    /// The data comes back inside `PoisonError` if a holder panicked.
    pub fn into_inner(self) -> LockResult<T> {
        let poisoned = self.is_poisoned();
        let data = self.data.into_inner();
        if poisoned {
            return Err(PoisonError::new(data));
        }
        Ok(data)
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Blocks the calling thread until the lock is acquired.
    ///
    /// # Errors
    ///
    /// Returns `Err(PoisonError)` when a previous holder panicked. The lock is
    /// held in that case too; the guard is inside the error.
    #[inline]
    pub fn lock(&self) -> LockResult<MutexGuard<'_, T>> {
        self.raw.lock();
        self.acquired()
    }

    /// Attempts to acquire the lock without blocking.
    ///
    /// # Errors
    ///
    /// `Err(TryLockError::WouldBlock)` if another thread holds the lock,
    /// `Err(TryLockError::Poisoned)` if it was acquired but is poisoned.
    #[inline]
    pub fn try_lock(&self) -> TryLockResult<MutexGuard<'_, T>> {
        if !self.raw.try_lock() {
            return Err(TryLockError::WouldBlock);
        }
        self.acquired().map_err(TryLockError::Poisoned)
    }

    /// Returns `true` if some thread currently holds the lock.
    ///
    /// The answer may be stale by the time the caller looks at it.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }

    /// Returns `true` if a holder panicked and the poison was not cleared.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Relaxed)
    }

    /// Marks the data as trusted again after the caller repaired it.
    #[inline]
    pub fn clear_poison(&self) {
        self.poisoned.store(false, Ordering::Relaxed);
    }

    /// Borrows the data mutably; the `&mut self` proves nobody holds the lock.
    ///
    /// # Errors
    ///
    /// The reference comes back inside `PoisonError` if a holder panicked.
    pub fn get_mut(&mut self) -> LockResult<&mut T> {
        if self.is_poisoned() {
            return Err(PoisonError::new(self.data.get_mut()));
        }
        Ok(self.data.get_mut())
    }

    /// Releases the lock without a guard.
    ///
    /// # Safety
    ///
    /// The calling context must own the lock, typically because it leaked a
    /// guard with `core::mem::forget`. Releasing a lock held by someone else
    /// breaks mutual exclusion.
    #[inline]
    pub unsafe fn force_unlock(&self) {
        self.raw.unlock();
    }

    /// Wraps a freshly acquired lock in a guard.
    #[inline]
    fn acquired(&self) -> LockResult<MutexGuard<'_, T>> {
        let guard = MutexGuard {
            mutex: self,
            panicking_at_lock: thread_panicking(),
        };
        if self.is_poisoned() {
            return Err(PoisonError::new(guard));
        }
        Ok(guard)
    }
}

impl<'a, T: ?Sized> MutexGuard<'a, T> {
    /// Releases the lock now. Equivalent to dropping the guard.
    #[inline]
    pub fn unlock(self) {
        drop(self);
    }

    /// The mutex this guard holds; the condvar relocks it after a wait.
    #[inline]
    pub(crate) fn mutex(&self) -> &'a Mutex<T> {
        self.mutex
    }
}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the guard holds the lock for as long as it lives.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard holds the lock and is borrowed mutably.
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for MutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        if !self.panicking_at_lock && thread_panicking() {
            self.mutex.poisoned.store(true, Ordering::Relaxed);
        }
        self.mutex.raw.unlock();
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for MutexGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutexGuard").field(&&**self).finish()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let poisoned = self.is_poisoned();
        match self.try_lock() {
            Ok(guard) => f
                .debug_struct("Mutex")
                .field("data", &&*guard)
                .field("poisoned", &poisoned)
                .finish(),
            Err(TryLockError::Poisoned(err)) => f
                .debug_struct("Mutex")
                .field("data", &&**err.get_ref())
                .field("poisoned", &poisoned)
                .finish(),
            Err(TryLockError::WouldBlock) => f
                .debug_struct("Mutex")
                .field("poisoned", &poisoned)
                .finish_non_exhaustive(),
        }
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Mutex<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}
