//! The bare lock underneath [`Mutex`](super::Mutex).
//!
//! With `std` the lock parks waiting threads on the platform mutex and
//! condition variable. Without it the lock is an atomic flag and waiters back
//! off with [`SpinWait`](super::SpinWait).
//!
//! Both implementations expose the same crate-private surface:
//! `new` (const), `lock`, `try_lock`, `unlock` and `is_locked`. Unlike the
//! platform mutex, `unlock` needs no guard, which is what
//! [`Mutex::force_unlock`](super::Mutex::force_unlock) and the condvar's
//! release step rely on.

#[cfg(feature = "std")]
mod std_impl;
#[cfg(feature = "std")]
pub(crate) use std_impl::RawLock;

#[cfg(not(feature = "std"))]
mod nostd_impl;
#[cfg(not(feature = "std"))]
pub(crate) use nostd_impl::RawLock;
