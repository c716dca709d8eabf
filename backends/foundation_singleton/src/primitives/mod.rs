//! Blocking synchronization primitives.
//!
//! Under `std` waiting threads sleep on the platform mutex and condition
//! variable; without it they spin with exponential backoff.

pub mod condvar;
pub mod mutex;
pub mod poison;
mod raw_lock;
pub mod spin_wait;

pub use condvar::{Condvar, WaitTimeoutResult};
pub use mutex::{Lock, Mutex, MutexGuard};
pub use poison::{LockResult, PoisonError, TryLockError, TryLockResult};
pub use spin_wait::SpinWait;
