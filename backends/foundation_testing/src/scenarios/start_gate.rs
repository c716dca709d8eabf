//! Start gate built on the crate's own `Mutex` and `Condvar`.

use foundation_singleton::{Condvar, Mutex};

/// Holds threads until `parties` of them have arrived, then releases them
/// all at once.
///
/// The gate resets after each release, so it can line up several rounds.
///
/// # Examples
///
/// ```
/// use foundation_testing::scenarios::StartGate;
/// use std::sync::Arc;
/// use std::thread;
///
/// let gate = Arc::new(StartGate::new(3));
/// let handles: Vec<_> = (0..3)
///     .map(|_| {
///         let gate = Arc::clone(&gate);
///         thread::spawn(move || gate.arrive_and_wait())
///     })
///     .collect();
///
/// let leaders = handles
///     .into_iter()
///     .map(|handle| handle.join().unwrap())
///     .filter(|leader| *leader)
///     .count();
/// assert_eq!(leaders, 1);
/// ```
pub struct StartGate {
    state: Mutex<GateState>,
    released: Condvar,
    parties: usize,
}

struct GateState {
    arrived: usize,
    round: usize,
}

impl StartGate {
    /// # Panics
    ///
    /// Panics if `parties` is 0.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "StartGate needs at least one party");

        Self {
            state: Mutex::new(GateState {
                arrived: 0,
                round: 0,
            }),
            released: Condvar::new(),
            parties,
        }
    }

    #[must_use]
    pub const fn parties(&self) -> usize {
        self.parties
    }

    /// Blocks until every party of the current round has arrived.
    ///
    /// Returns `true` for the thread whose arrival opened the gate.
    pub fn arrive_and_wait(&self) -> bool {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(foundation_singleton::PoisonError::into_inner);

        let round = guard.round;
        guard.arrived += 1;

        if guard.arrived >= self.parties {
            guard.arrived = 0;
            guard.round = guard.round.wrapping_add(1);
            drop(guard);
            tracing::trace!(round, parties = self.parties, "start gate opened");
            self.released.notify_all();
            return true;
        }

        let guard = self
            .released
            .wait_while(guard, |state| state.round == round)
            .unwrap_or_else(foundation_singleton::PoisonError::into_inner);
        drop(guard);
        false
    }
}

impl core::fmt::Debug for StartGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StartGate")
            .field("parties", &self.parties)
            .finish_non_exhaustive()
    }
}
