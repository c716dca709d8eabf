//! `Mutex` stress runs.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_singleton::{Mutex, TryLockError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Hammers one [`Mutex`] and checks that no two threads are ever inside the
/// critical section together.
///
/// An iteration fails if it finds another thread already inside, or if the
/// counter it guards drifts from the number of completed sections.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_mutex_exclusion_stress};
///
/// let result = run_mutex_exclusion_stress(StressConfig::new().threads(8).iterations(200));
/// assert_eq!(result.failures, 0);
/// ```
#[must_use]
pub fn run_mutex_exclusion_stress(config: StressConfig) -> StressResult {
    let mutex = Arc::new(Mutex::new(0u64));
    let inside = Arc::new(AtomicBool::new(false));

    StressHarness::new(config).run(move |_thread_id, _iteration| {
        let Ok(mut guard) = mutex.lock() else {
            return false;
        };

        if inside.swap(true, Ordering::AcqRel) {
            return false;
        }
        let before = *guard;
        core::hint::spin_loop();
        *guard = before + 1;
        inside.store(false, Ordering::Release);

        *guard == before + 1
    })
}

/// Mixes `try_lock` with held sections.
///
/// `WouldBlock` counts as a failure here, so the failure count is the number
/// of times a thread found the lock busy. A poisoned result, which nothing in
/// this run should produce, panics the worker.
#[must_use]
pub fn run_try_lock_stress(config: StressConfig) -> StressResult {
    let mutex = Arc::new(Mutex::new(0u64));

    StressHarness::new(config).run(move |_thread_id, _iteration| match mutex.try_lock() {
        Ok(mut guard) => {
            *guard += 1;
            true
        }
        Err(TryLockError::WouldBlock) => false,
        Err(TryLockError::Poisoned(err)) => panic!("unexpected poison: {err}"),
    })
}
