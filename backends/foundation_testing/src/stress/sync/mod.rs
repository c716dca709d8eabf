//! Stress runs for the `foundation_singleton` primitives.

pub mod mutex;
pub mod singleton;

pub use mutex::{run_mutex_exclusion_stress, run_try_lock_stress};
pub use singleton::{run_singleton_stress, run_slot_stress};
