//! One instance per `(type, policy)` pair, for the life of the process.
//!
//! A payload type opts in by implementing [`Singleton<P>`] for a policy `P`,
//! usually through [`singleton!`](crate::singleton!), which also declares the
//! `static` slot behind it. Each `(type, policy)` impl owns its own slot, so
//! `T` under [`Eager`] and `T` under [`Lazy`] are two independent instances.
//!
//! | policy | slot | first access | later accesses |
//! |---|---|---|---|
//! | [`Eager`] | [`EagerSlot`] | must follow an explicit load | one atomic load |
//! | [`Lazy`] | [`LazySlot`] | double-checked locking | one atomic load |
//! | [`Auto`] | [`HybridSlot`] | selects eager or lazy once, then as above | strategy lookup plus one atomic load |
//!
//! Slots never tear down while the process runs: a published instance keeps
//! its address until exit.

mod eager;
mod errors;
mod hybrid;
mod lazy;
mod macros;
mod policy;
mod slot;

pub use eager::EagerSlot;
pub use errors::{ConstructError, SingletonError, SingletonResult};
pub use hybrid::HybridSlot;
pub use lazy::LazySlot;
pub use policy::{
    from_default, Auto, Construct, Eager, Init, Lazy, Policy, PolicyKind, SlotState, Strategy,
};

/// A payload type with a process-wide slot under policy `P`.
pub trait Singleton<P: Policy>: Sized + Send + Sync + 'static {
    /// The slot owned by this `(type, policy)` pair.
    fn slot() -> &'static P::Slot<Self>;

    /// Returns the shared instance.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` if building the instance failed,
    /// `SingletonError::NotLoaded` if an eager singleton was not preloaded.
    fn instance() -> SingletonResult<&'static Self> {
        Self::slot().instance()
    }

    /// Returns the instance only if it is already built.
    fn try_get() -> Option<&'static Self> {
        Self::slot().get()
    }

    /// Builds the instance now. This is the load step for [`Eager`]
    /// singletons and a warm-up for the other policies.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` if building the instance failed.
    fn preload() -> SingletonResult<&'static Self> {
        Self::slot().preload()
    }

    /// Lifecycle position of this singleton's slot.
    fn state() -> SlotState {
        Self::slot().state()
    }
}

/// Policy-generic accessor: `instance::<Config, Lazy>()`.
///
/// The policy is resolved at compile time; nothing is dispatched at runtime.
///
/// # Errors
///
/// Same as [`Singleton::instance`].
pub fn instance<T, P>() -> SingletonResult<&'static T>
where
    T: Singleton<P>,
    P: Policy,
{
    <T as Singleton<P>>::instance()
}
