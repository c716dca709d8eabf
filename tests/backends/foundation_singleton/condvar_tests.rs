use foundation_singleton::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

struct Signal {
    ready: Mutex<bool>,
    changed: Condvar,
}

impl Signal {
    fn new() -> Self {
        Self {
            ready: Mutex::new(false),
            changed: Condvar::new(),
        }
    }
}

#[test]
#[ntest::timeout(10000)]
fn test_waiter_wakes_after_notify() {
    let signal = Arc::new(Signal::new());

    let waiter = {
        let signal = Arc::clone(&signal);
        thread::spawn(move || {
            let guard = signal.ready.lock().unwrap();
            let guard = signal
                .changed
                .wait_while(guard, |ready| !*ready)
                .unwrap();
            *guard
        })
    };

    thread::sleep(Duration::from_millis(20));
    *signal.ready.lock().unwrap() = true;
    signal.changed.notify_one();

    assert!(waiter.join().unwrap());
}

#[test]
#[ntest::timeout(10000)]
fn test_notify_all_releases_every_waiter() {
    const WAITERS: usize = 6;
    let signal = Arc::new(Signal::new());

    let handles: Vec<_> = (0..WAITERS)
        .map(|_| {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                let guard = signal.ready.lock().unwrap();
                drop(
                    signal
                        .changed
                        .wait_while(guard, |ready| !*ready)
                        .unwrap(),
                );
            })
        })
        .collect();

    while signal.changed.waiter_count() < WAITERS {
        thread::yield_now();
    }
    *signal.ready.lock().unwrap() = true;
    signal.changed.notify_all();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(signal.changed.waiter_count(), 0);
}

#[test]
#[ntest::timeout(10000)]
fn test_wait_timeout_expires_without_notify() {
    let signal = Signal::new();
    let guard = signal.ready.lock().unwrap();

    let started = Instant::now();
    let (guard, result) = signal
        .changed
        .wait_timeout(guard, Duration::from_millis(30))
        .unwrap();

    assert!(result.timed_out());
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(!*guard);
}

#[test]
#[ntest::timeout(10000)]
fn test_wait_timeout_returns_early_on_notify() {
    let signal = Arc::new(Signal::new());

    let notifier = {
        let signal = Arc::clone(&signal);
        thread::spawn(move || {
            while signal.changed.waiter_count() == 0 {
                thread::yield_now();
            }
            *signal.ready.lock().unwrap() = true;
            signal.changed.notify_one();
        })
    };

    let guard = signal.ready.lock().unwrap();
    let (guard, result) = signal
        .changed
        .wait_timeout(guard, Duration::from_secs(5))
        .unwrap();

    assert!(!result.timed_out());
    assert!(*guard);
    drop(guard);
    notifier.join().unwrap();
}

#[test]
#[cfg(target_os = "linux")]
#[ntest::timeout(10000)]
fn test_waiting_thread_sleeps_instead_of_spinning() {
    let signal = Arc::new(Signal::new());

    let waiter = {
        let signal = Arc::clone(&signal);
        thread::spawn(move || {
            let before = super::thread_cpu_ticks();
            let guard = signal.ready.lock().unwrap();
            drop(
                signal
                    .changed
                    .wait_while(guard, |ready| !*ready)
                    .unwrap(),
            );
            super::thread_cpu_ticks() - before
        })
    };

    while signal.changed.waiter_count() == 0 {
        thread::yield_now();
    }
    thread::sleep(Duration::from_millis(500));
    *signal.ready.lock().unwrap() = true;
    signal.changed.notify_all();

    let ticks = waiter.join().unwrap();
    assert!(ticks < 10, "waiting thread used {ticks} ticks of CPU");
}
