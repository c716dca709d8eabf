//! Stress test framework for synchronization primitives.
//!
//! Provides configurable high-contention testing with:
//! - Thread count control
//! - Iteration limits
//! - Time-based duration
//! - Synchronized start through a [`StartGate`]
//! - Success rate tracking

use core::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::scenarios::StartGate;

pub mod config;
pub mod sync;

pub use config::StressConfig;

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressResult {
    /// Operations that returned `true`
    pub successes: usize,
    /// Operations that returned `false`
    pub failures: usize,
    /// Wall-clock time of the run
    pub duration: Duration,
    /// Number of worker threads
    pub thread_count: usize,
}

impl StressResult {
    #[must_use]
    pub const fn new(
        successes: usize,
        failures: usize,
        duration: Duration,
        thread_count: usize,
    ) -> Self {
        Self {
            successes,
            failures,
            duration,
            thread_count,
        }
    }

    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.successes + self.failures
    }

    /// Success rate between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_operations() == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_operations() as f64
        }
    }
}

/// Why a stress run could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum StressError {
    #[error("stress worker {thread_id} panicked")]
    WorkerPanicked { thread_id: usize },

    #[error("failed to spawn stress worker {thread_id}: {source}")]
    Spawn {
        thread_id: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Spawns worker threads that run one operation repeatedly.
pub struct StressHarness {
    config: StressConfig,
}

impl StressHarness {
    #[must_use]
    pub const fn new(config: StressConfig) -> Self {
        Self { config }
    }

    /// Runs `operation(thread_id, iteration)` on every worker.
    ///
    /// The operation returns `true` on success and `false` on failure.
    ///
    /// # Panics
    ///
    /// Panics if a worker panics or cannot be spawned. Use
    /// [`StressHarness::try_run`] to get the failure as an error.
    pub fn run<F>(self, operation: F) -> StressResult
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        match self.try_run(operation) {
            Ok(result) => result,
            Err(err) => panic!("stress run failed: {err}"),
        }
    }

    /// Like [`StressHarness::run`] but reports worker failures as errors.
    ///
    /// # Errors
    ///
    /// `StressError::Spawn` if a worker thread cannot be created,
    /// `StressError::WorkerPanicked` if a worker panicked.
    pub fn try_run<F>(self, operation: F) -> Result<StressResult, StressError>
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        let thread_count = self.config.get_thread_count();
        let iterations = self.config.get_iterations();
        tracing::debug!(thread_count, iterations, "starting stress run");

        let start = std::time::Instant::now();
        let operation = Arc::new(operation);
        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let gate = self
            .config
            .is_synchronized_start()
            .then(|| Arc::new(StartGate::new(thread_count)));

        if let Some(duration) = self.config.get_duration() {
            let stop_flag = Arc::clone(&stop_flag);
            thread::spawn(move || {
                thread::sleep(duration);
                stop_flag.store(true, Ordering::Release);
            });
        }

        let mut handles = Vec::with_capacity(thread_count);
        for thread_id in 0..thread_count {
            let operation = Arc::clone(&operation);
            let successes = Arc::clone(&successes);
            let failures = Arc::clone(&failures);
            let stop_flag = Arc::clone(&stop_flag);
            let gate = gate.clone();

            let handle = thread::Builder::new()
                .name(format!("stress-{thread_id}"))
                .spawn(move || {
                    if let Some(gate) = gate {
                        gate.arrive_and_wait();
                    }
                    for iteration in 0..iterations {
                        if stop_flag.load(Ordering::Acquire) {
                            break;
                        }
                        if operation(thread_id, iteration) {
                            successes.fetch_add(1, Ordering::Relaxed);
                        } else {
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
                .map_err(|source| StressError::Spawn { thread_id, source })?;

            handles.push((thread_id, handle));
        }

        let mut panicked = None;
        for (thread_id, handle) in handles {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(thread_id);
            }
        }
        if let Some(thread_id) = panicked {
            tracing::warn!(thread_id, "stress worker panicked");
            return Err(StressError::WorkerPanicked { thread_id });
        }

        Ok(StressResult::new(
            successes.load(Ordering::Relaxed),
            failures.load(Ordering::Relaxed),
            start.elapsed(),
            thread_count,
        ))
    }
}
