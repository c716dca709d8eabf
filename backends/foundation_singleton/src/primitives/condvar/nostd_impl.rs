//! Generation counter in one atomic; sleepers back off with `SpinWait`.

use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;

use super::Wake;
use crate::primitives::SpinWait;

pub(super) struct Generation {
    current: AtomicUsize,
}

impl Generation {
    pub(super) const fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
        }
    }

    /// Reads the generation, runs `release`, then backs off until the
    /// generation moves or the budget for `timeout` is spent. Returns `true`
    /// on timeout.
    pub(super) fn sleep_after<R: FnOnce()>(&self, release: R, timeout: Option<Duration>) -> bool {
        let observed = self.current.load(Ordering::Acquire);
        release();

        let budget = timeout.map(Budget::for_timeout);
        let mut backoff = SpinWait::new();
        loop {
            if self.current.load(Ordering::Acquire) != observed {
                return false;
            }
            if budget.as_ref().is_some_and(Budget::spend) {
                return true;
            }
            backoff.spin();
        }
    }

    /// Every sleeper polls the same counter, so `Wake::One` may release more
    /// than one of them.
    pub(super) fn advance(&self, _wake: Wake) {
        self.current.fetch_add(1, Ordering::Release);
    }
}

/// Without a clock a timeout becomes a number of backoff rounds, roughly one
/// per ten microseconds requested.
struct Budget(Cell<u128>);

impl Budget {
    fn for_timeout(timeout: Duration) -> Self {
        Self(Cell::new((timeout.as_micros() / 10).max(1)))
    }

    fn spend(&self) -> bool {
        let left = self.0.get().saturating_sub(1);
        self.0.set(left);
        left == 0
    }
}
