//! Runtime choice between the eager and lazy strategies.
//!
//! A [`HybridSlot`] does not know at compile time how its payload should be
//! built. On first access it asks its selector once and stores the chosen
//! strategy in a [`RawSlot`], the same `Empty -> Constructing -> Ready` cell
//! that holds payloads, so racing threads agree on one strategy without a
//! second locking scheme.

use alloc::boxed::Box;
use core::any::type_name;
use core::fmt;

use crate::singleton::slot::RawSlot;
use crate::singleton::{
    EagerSlot, Init, LazySlot, PolicyKind, SingletonResult, SlotState, Strategy,
};

#[derive(Clone, Copy)]
enum Selector {
    Fixed(PolicyKind),
    Dynamic(fn() -> PolicyKind),
}

impl Selector {
    fn resolve(self) -> PolicyKind {
        match self {
            Selector::Fixed(kind) => kind,
            Selector::Dynamic(select) => select(),
        }
    }
}

/// A slot whose backing strategy is picked once, at first access.
///
/// - `PolicyKind::Eager`: the payload is built as part of the selection, so
///   the first caller pays construction and every later read is lock-free.
/// - `PolicyKind::Lazy` or `PolicyKind::Auto`: a [`LazySlot`] backs the
///   payload.
///
/// If an eager selection fails to build the payload, the selection itself is
/// left empty and the next access asks the selector again.
///
/// ```
/// use foundation_singleton::{from_default, HybridSlot, PolicyKind, SlotState};
///
/// fn pick() -> PolicyKind {
///     PolicyKind::Eager
/// }
///
/// static CACHE: HybridSlot<Vec<u8>> = HybridSlot::new(from_default, pick);
///
/// assert_eq!(CACHE.resolved_kind(), None);
/// assert!(CACHE.instance().unwrap().is_empty());
/// assert_eq!(CACHE.resolved_kind(), Some(PolicyKind::Eager));
/// assert_eq!(CACHE.state(), SlotState::Ready);
/// ```
pub struct HybridSlot<T: 'static> {
    selector: Selector,
    init: Init<T>,
    strategy: RawSlot<Box<dyn Strategy<T>>>,
}

impl<T: Send + Sync + 'static> HybridSlot<T> {
    /// A slot that calls `select` once to choose its strategy.
    #[must_use]
    pub const fn new(init: Init<T>, select: fn() -> PolicyKind) -> Self {
        Self {
            selector: Selector::Dynamic(select),
            init,
            strategy: RawSlot::new(),
        }
    }

    /// A slot with a fixed strategy. The choice still happens on first
    /// access, without calling out to a selector.
    #[must_use]
    pub const fn with_policy(init: Init<T>, kind: PolicyKind) -> Self {
        Self {
            selector: Selector::Fixed(kind),
            init,
            strategy: RawSlot::new(),
        }
    }

    /// Returns the instance, selecting the strategy first if needed.
    ///
    /// # Errors
    ///
    /// `SingletonError::Construction` when the initializer fails, either
    /// during an eager selection or on a lazy first access.
    pub fn instance(&self) -> SingletonResult<&T> {
        self.resolve()?.instance()
    }

    /// Returns the instance only if a strategy is selected and built.
    pub fn get(&self) -> Option<&T> {
        self.strategy.get().and_then(|strategy| strategy.get())
    }

    /// The strategy chosen for this slot, once chosen.
    pub fn resolved_kind(&self) -> Option<PolicyKind> {
        self.strategy.get().map(|strategy| strategy.kind())
    }

    /// Lifecycle of the selection while it is pending, then of the payload.
    pub fn state(&self) -> SlotState {
        match self.strategy.get() {
            Some(strategy) => strategy.state(),
            None => self.strategy.state(),
        }
    }

    fn resolve(&self) -> SingletonResult<&dyn Strategy<T>> {
        let strategy = self.strategy.get_or_try_init(|| self.select())?;
        Ok(&**strategy)
    }

    fn select(&self) -> SingletonResult<Box<dyn Strategy<T>>> {
        let kind = self.selector.resolve();
        tracing::debug!(type_name = type_name::<T>(), policy = %kind, "strategy selected");

        match kind {
            PolicyKind::Eager => {
                let slot = EagerSlot::new(self.init);
                slot.load()?;
                Ok(Box::new(slot))
            }
            PolicyKind::Lazy | PolicyKind::Auto => Ok(Box::new(LazySlot::new(self.init))),
        }
    }
}

impl<T: Send + Sync + 'static> Strategy<T> for HybridSlot<T> {
    fn instance(&self) -> SingletonResult<&T> {
        HybridSlot::instance(self)
    }

    fn get(&self) -> Option<&T> {
        HybridSlot::get(self)
    }

    fn preload(&self) -> SingletonResult<&T> {
        self.resolve()?.preload()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Auto
    }

    fn state(&self) -> SlotState {
        HybridSlot::state(self)
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> fmt::Debug for HybridSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridSlot")
            .field("resolved", &self.resolved_kind())
            .field("state", &self.state())
            .field("value", &self.get())
            .finish_non_exhaustive()
    }
}
