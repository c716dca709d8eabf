//! Multi-threaded tests for `foundation_singleton`.
//!
//! Every test declares its own payload types: slots are process-wide, and the
//! test harness runs tests on parallel threads.

mod condvar_tests;
mod eager_tests;
mod lazy_tests;
mod mutex_tests;

/// CPU time (user plus system, in clock ticks) the calling thread has used.
#[cfg(target_os = "linux")]
pub(crate) fn thread_cpu_ticks() -> u64 {
    let stat = std::fs::read_to_string("/proc/thread-self/stat").unwrap();
    let after_name = &stat[stat.rfind(')').unwrap() + 1..];
    let fields: Vec<&str> = after_name.split_whitespace().collect();
    // Fields after the command name start at `state`; utime and stime follow
    // eleven and twelve places later.
    fields[11].parse::<u64>().unwrap() + fields[12].parse::<u64>().unwrap()
}
