//! Stress test configuration.

use core::time::Duration;

/// Configuration for stress runs.
#[derive(Debug, Clone, Copy)]
pub struct StressConfig {
    thread_count: usize,
    iterations: usize,
    duration: Option<Duration>,
    synchronized_start: bool,
}

impl StressConfig {
    /// Defaults: 4 threads, 1000 iterations, no time limit, threads start as
    /// soon as they are spawned.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thread_count: 4,
            iterations: 1000,
            duration: None,
            synchronized_start: false,
        }
    }

    #[must_use]
    pub const fn threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    #[must_use]
    pub const fn iterations(mut self, count: usize) -> Self {
        self.iterations = count;
        self
    }

    /// Stops every thread once `duration` has elapsed, even if iterations
    /// remain.
    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Holds every worker at a [`StartGate`](crate::scenarios::StartGate)
    /// until all of them are spawned, so their first iterations overlap.
    #[must_use]
    pub const fn synchronized_start(mut self, enabled: bool) -> Self {
        self.synchronized_start = enabled;
        self
    }

    #[must_use]
    pub const fn get_thread_count(&self) -> usize {
        self.thread_count
    }

    #[must_use]
    pub const fn get_iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub const fn get_duration(&self) -> Option<Duration> {
        self.duration
    }

    #[must_use]
    pub const fn is_synchronized_start(&self) -> bool {
        self.synchronized_start
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self::new()
    }
}
