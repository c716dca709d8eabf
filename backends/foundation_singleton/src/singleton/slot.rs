//! The storage cell behind every slot type.
//!
//! `RawSlot` publishes at most one boxed value through an `AtomicPtr`. The
//! fast path is a single `Acquire` load. The slow path serializes on a
//! [`Lock`], re-checks the pointer, runs the initializer and publishes with a
//! `Release` store, so a reader that sees the pointer also sees the fully
//! built value.

use alloc::boxed::Box;
use core::any::type_name;
use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

use crate::primitives::{Lock, MutexGuard};
use crate::singleton::SlotState;

const EMPTY: u8 = 0;
const CONSTRUCTING: u8 = 1;
const READY: u8 = 2;

pub(crate) struct RawSlot<T> {
    value: AtomicPtr<T>,
    state: AtomicU8,
    guard: Lock,
    _owns: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawSlot<T> {}
unsafe impl<T: Send + Sync> Sync for RawSlot<T> {}

/// Puts the slot back to `EMPTY` if the initializer unwinds.
struct ResetOnUnwind<'a>(&'a AtomicU8);

impl Drop for ResetOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.store(EMPTY, Ordering::Release);
    }
}

impl<T> RawSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
            state: AtomicU8::new(EMPTY),
            guard: Lock::new(()),
            _owns: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        let raw = self.value.load(Ordering::Acquire);
        // SAFETY: a non-null pointer was published once, after construction
        // finished, and is only freed by `Drop` which needs `&mut self`.
        unsafe { raw.as_ref() }
    }

    pub(crate) fn state(&self) -> SlotState {
        match self.state.load(Ordering::Acquire) {
            READY => SlotState::Ready,
            CONSTRUCTING => SlotState::Constructing,
            _ => SlotState::Empty,
        }
    }

    /// Returns the published value or runs `init` under the slot lock.
    ///
    /// Exactly one `init` succeeds per slot. A failed or panicking `init`
    /// leaves the slot empty and releases the lock before the error reaches
    /// the caller.
    #[inline]
    pub(crate) fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        self.initialize(init)
    }

    #[cold]
    fn initialize<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let _held = self.acquire();

        if let Some(value) = self.get() {
            tracing::trace!(type_name = type_name::<T>(), "slot filled while waiting");
            return Ok(value);
        }

        self.state.store(CONSTRUCTING, Ordering::Relaxed);
        let reset = ResetOnUnwind(&self.state);
        let outcome = init();
        core::mem::forget(reset);

        match outcome {
            Ok(value) => {
                let raw = Box::into_raw(Box::new(value));
                self.value.store(raw, Ordering::Release);
                self.state.store(READY, Ordering::Release);
                tracing::debug!(type_name = type_name::<T>(), "slot published");
                // SAFETY: `raw` came from `Box::into_raw` just above.
                Ok(unsafe { &*raw })
            }
            Err(err) => {
                self.state.store(EMPTY, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Takes the slot lock, clearing poison left by a panicking initializer.
    ///
    /// Nothing is published before an initializer returns, so a poisoned
    /// slot lock never guards a half-built value.
    fn acquire(&self) -> MutexGuard<'_, ()> {
        match self.guard.lock() {
            Ok(held) => held,
            Err(poisoned) => {
                tracing::warn!(
                    type_name = type_name::<T>(),
                    "slot lock poisoned by a panicking initializer, recovering"
                );
                self.guard.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

impl<T> Drop for RawSlot<T> {
    fn drop(&mut self) {
        let raw = *self.value.get_mut();
        if !raw.is_null() {
            // SAFETY: exclusive access, and `raw` came from `Box::into_raw`.
            drop(unsafe { Box::from_raw(raw) });
        }
    }
}
