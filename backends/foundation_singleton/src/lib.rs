//! Mutual exclusion and exactly-once singleton slots.
//!
//! Two layers:
//!
//! - [`primitives`]: a spin-backed [`Mutex`] with poisoning, the data-less
//!   [`Lock`] used to guard slots, and a [`Condvar`] that works directly on the
//!   mutex's lock state.
//! - [`singleton`]: process-wide slots that construct one instance per
//!   `(type, policy)` pair. Policies are [`Eager`] (explicit load step),
//!   [`Lazy`] (double-checked locking on first use) and [`Auto`] (the backing
//!   strategy is chosen once, at first use).
//!
//! # Examples
//!
//! ```
//! use foundation_singleton::{singleton, ConstructError, Construct, Lazy, Singleton};
//!
//! struct Settings {
//!     retries: u32,
//! }
//!
//! impl Construct for Settings {
//!     fn construct() -> Result<Self, ConstructError> {
//!         Ok(Settings { retries: 3 })
//!     }
//! }
//!
//! singleton!(Settings => Lazy);
//!
//! let first = <Settings as Singleton<Lazy>>::instance().unwrap();
//! let second = <Settings as Singleton<Lazy>>::instance().unwrap();
//! assert!(core::ptr::eq(first, second));
//! assert_eq!(first.retries, 3);
//! ```
//!
//! # Features
//!
//! - `std` (default): poison detection on panic, thread yielding once spinning
//!   is exhausted, and clock-based condvar timeouts. Without it the crate is
//!   `no_std` and needs only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod primitives;
pub mod singleton;

pub use primitives::{
    Condvar, Lock, LockResult, Mutex, MutexGuard, PoisonError, SpinWait, TryLockError,
    TryLockResult, WaitTimeoutResult,
};
pub use singleton::{
    from_default, instance, Auto, Construct, ConstructError, Eager, EagerSlot, HybridSlot, Init,
    Lazy, LazySlot, Policy, PolicyKind, Singleton, SingletonError, SingletonResult, SlotState,
    Strategy,
};
