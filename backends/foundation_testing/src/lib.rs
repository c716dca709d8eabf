//! Stress testing infrastructure for `foundation_singleton`.
//!
//! This crate provides:
//! - **Stress harness**: many threads hammering one operation, optionally
//!   released together through a start gate
//! - **Scenarios**: the [`StartGate`](scenarios::StartGate) used to line
//!   threads up on a first access
//! - **Primitive stress runs**: ready-made runs for the mutex and the
//!   singleton slots
//!
//! # Examples
//!
//! ```rust
//! use foundation_testing::stress::{StressConfig, StressHarness};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let config = StressConfig::new().threads(8).iterations(100).synchronized_start(true);
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let counted = Arc::clone(&counter);
//! let results = StressHarness::new(config).run(move |_thread_id, _iteration| {
//!     counted.fetch_add(1, Ordering::Relaxed);
//!     true
//! });
//!
//! assert_eq!(results.successes, 800);
//! assert_eq!(counter.load(Ordering::Relaxed), 800);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod scenarios;
pub mod stress;

pub use scenarios::StartGate;
pub use stress::{StressConfig, StressError, StressHarness, StressResult};
