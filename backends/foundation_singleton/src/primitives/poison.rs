//! Lock failure reporting.
//!
//! A [`Mutex`](super::Mutex) is poisoned when a holder unwinds while the
//! guard is alive. Acquisition still succeeds, but the guard comes back
//! wrapped in a [`PoisonError`] so the caller decides whether the protected
//! state can be trusted.

use core::error::Error;
use core::fmt;

/// Status of a blocking `lock`.
pub type LockResult<Guard> = Result<Guard, PoisonError<Guard>>;

/// Status of a non-blocking `try_lock`.
pub type TryLockResult<Guard> = Result<Guard, TryLockError<Guard>>;

/// The lock was acquired, but a previous holder panicked.
///
/// The guard is carried inside so the caller can recover with
/// [`PoisonError::into_inner`].
pub struct PoisonError<G> {
    guard: G,
}

impl<G> PoisonError<G> {
    #[inline]
    pub fn new(guard: G) -> Self {
        Self { guard }
    }

    /// Accepts the poisoned state and returns the guard.
    #[inline]
    pub fn into_inner(self) -> G {
        self.guard
    }

    /// Borrows the carried guard.
    #[inline]
    pub fn get_ref(&self) -> &G {
        &self.guard
    }

    /// Mutably borrows the carried guard.
    #[inline]
    pub fn get_mut(&mut self) -> &mut G {
        &mut self.guard
    }

    /// Maps the carried guard, keeping the poisoned status.
    #[inline]
    pub fn map<U, F>(self, f: F) -> PoisonError<U>
    where
        F: FnOnce(G) -> U,
    {
        PoisonError::new(f(self.guard))
    }
}

impl<G> fmt::Debug for PoisonError<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoisonError").finish_non_exhaustive()
    }
}

impl<G> fmt::Display for PoisonError<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock poisoned: a previous holder panicked")
    }
}

impl<G> Error for PoisonError<G> {}

/// Why a `try_lock` did not hand out a clean guard.
pub enum TryLockError<G> {
    /// Another thread holds the lock. Nothing was acquired.
    WouldBlock,

    /// The lock was acquired but is poisoned.
    Poisoned(PoisonError<G>),
}

impl<G> TryLockError<G> {
    /// `true` if the lock was busy rather than poisoned.
    #[inline]
    #[must_use]
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }
}

impl<G> fmt::Debug for TryLockError<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock => f.write_str("WouldBlock"),
            Self::Poisoned(err) => f.debug_tuple("Poisoned").field(err).finish(),
        }
    }
}

impl<G> fmt::Display for TryLockError<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock => write!(f, "lock is held by another thread"),
            Self::Poisoned(err) => write!(f, "{err}"),
        }
    }
}

impl<G> Error for TryLockError<G> {}

impl<G> From<PoisonError<G>> for TryLockError<G> {
    #[inline]
    fn from(err: PoisonError<G>) -> Self {
        Self::Poisoned(err)
    }
}
