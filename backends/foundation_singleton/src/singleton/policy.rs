//! Creation policies and the strategy interface every slot implements.

use core::fmt;

use crate::singleton::{ConstructError, EagerSlot, HybridSlot, LazySlot, SingletonResult};

/// Initializer stored in a slot. A plain `fn` so slots can live in `static`s.
pub type Init<T> = fn() -> Result<T, ConstructError>;

/// Default initializer for a payload type.
pub trait Construct: Sized {
    /// Builds the instance.
    ///
    /// # Errors
    ///
    /// Any error leaves the slot empty; the next access retries.
    fn construct() -> Result<Self, ConstructError>;
}

/// Initializer for payloads whose `Default` value is the singleton.
///
/// # Errors
///
/// Never fails; the `Result` matches [`Init`].
#[allow(clippy::unnecessary_wraps)]
pub fn from_default<T: Default>() -> Result<T, ConstructError> {
    Ok(T::default())
}

/// Runtime tag for a creation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Built by an explicit load step before use.
    Eager,
    /// Built on first access.
    Lazy,
    /// Backing strategy chosen once, at first access.
    Auto,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Eager => "eager",
            PolicyKind::Lazy => "lazy",
            PolicyKind::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Where a slot is in its `Empty -> Constructing -> Ready` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing published; the next constructing call will build.
    Empty,
    /// An initializer is running under the slot lock.
    Constructing,
    /// Published; the instance never changes again.
    Ready,
}

/// Behaviour shared by every slot type, usable behind `dyn`.
pub trait Strategy<T>: Send + Sync {
    /// Returns the instance, constructing it if the policy allows.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` if the initializer failed,
    /// `SingletonError::NotLoaded` for an eager slot read before loading.
    fn instance(&self) -> SingletonResult<&T>;

    /// Returns the instance only if it is already published.
    fn get(&self) -> Option<&T>;

    /// Runs the construction step now, whatever the policy.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` if the initializer failed.
    fn preload(&self) -> SingletonResult<&T>;

    /// The policy this slot implements.
    fn kind(&self) -> PolicyKind;

    /// Current lifecycle position; may be stale once returned.
    fn state(&self) -> SlotState;
}

mod sealed {
    pub trait Sealed {}
}

/// Compile-time creation policy.
///
/// Implemented by [`Eager`], [`Lazy`] and [`Auto`] only.
pub trait Policy: sealed::Sealed + Send + Sync + 'static {
    /// Runtime tag of this policy, used in logs.
    const KIND: PolicyKind;

    /// Slot type backing a singleton under this policy.
    type Slot<T: Send + Sync + 'static>: Strategy<T> + 'static;
}

/// Build during an explicit load step; reads before it fail with `NotLoaded`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eager;

/// Build on first access with double-checked locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lazy;

/// Pick eager or lazy once, on first access, through a selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Auto;

impl sealed::Sealed for Eager {}
impl sealed::Sealed for Lazy {}
impl sealed::Sealed for Auto {}

impl Policy for Eager {
    const KIND: PolicyKind = PolicyKind::Eager;
    type Slot<T: Send + Sync + 'static> = EagerSlot<T>;
}

impl Policy for Lazy {
    const KIND: PolicyKind = PolicyKind::Lazy;
    type Slot<T: Send + Sync + 'static> = LazySlot<T>;
}

impl Policy for Auto {
    const KIND: PolicyKind = PolicyKind::Auto;
    type Slot<T: Send + Sync + 'static> = HybridSlot<T>;
}
