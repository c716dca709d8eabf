//! Reusable coordination scenarios for concurrency tests.

pub mod start_gate;

pub use start_gate::StartGate;
