//! Singleton slot stress runs.
//!
//! Each iteration asks for the instance and checks that it is the same
//! object every other iteration saw.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_singleton::{Policy, Singleton, Strategy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Records the first address seen and reports whether `addr` matches it.
fn same_as_first(first: &AtomicUsize, addr: usize) -> bool {
    match first.compare_exchange(0, addr, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => true,
        Err(seen) => seen == addr,
    }
}

/// Hammers any slot through the [`Strategy`] interface.
///
/// A construction error counts as a failure.
///
/// # Examples
///
/// ```
/// use foundation_singleton::{from_default, LazySlot};
/// use foundation_testing::stress::{StressConfig, sync::run_slot_stress};
///
/// static SLOT: LazySlot<Vec<u8>> = LazySlot::new(from_default);
///
/// let config = StressConfig::new().threads(8).iterations(50).synchronized_start(true);
/// let result = run_slot_stress(config, &SLOT);
/// assert_eq!(result.failures, 0);
/// ```
#[must_use]
pub fn run_slot_stress<T, S>(config: StressConfig, slot: &'static S) -> StressResult
where
    T: Send + Sync + 'static,
    S: Strategy<T> + 'static,
{
    let first = Arc::new(AtomicUsize::new(0));

    StressHarness::new(config).run(move |_thread_id, _iteration| match slot.instance() {
        Ok(instance) => same_as_first(&first, core::ptr::from_ref(instance) as usize),
        Err(err) => {
            tracing::debug!(%err, "slot access failed during stress run");
            false
        }
    })
}

/// Hammers `T`'s process-wide slot under policy `P`.
#[must_use]
pub fn run_singleton_stress<T, P>(config: StressConfig) -> StressResult
where
    T: Singleton<P>,
    P: Policy,
{
    run_slot_stress::<T, P::Slot<T>>(config, T::slot())
}
