use foundation_singleton::{Lock, Mutex, TryLockError};
use foundation_testing::stress::{sync::run_mutex_exclusion_stress, StressConfig};
use serial_test::serial;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
#[ntest::timeout(10000)]
fn test_try_lock_reports_busy_from_another_thread() {
    let lock = Arc::new(Lock::new(()));
    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let holder = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            let guard = lock.lock().unwrap();
            held_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(guard);
        })
    };

    held_rx.recv().unwrap();
    let started = Instant::now();
    assert!(matches!(lock.try_lock(), Err(TryLockError::WouldBlock)));
    assert!(started.elapsed() < Duration::from_secs(1));

    release_tx.send(()).unwrap();
    holder.join().unwrap();
    assert!(lock.try_lock().is_ok());
}

#[test]
#[serial]
#[ntest::timeout(20000)]
fn test_counter_is_exact_under_contention() {
    const THREADS: usize = 12;
    const ROUNDS: usize = 2000;

    let counter = Arc::new(Mutex::new(0usize));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    *counter.lock().unwrap() += 1;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(*counter.lock().unwrap(), THREADS * ROUNDS);
}

#[test]
#[serial]
#[ntest::timeout(20000)]
fn test_no_two_holders_overlap() {
    let config = StressConfig::new()
        .threads(8)
        .iterations(1000)
        .synchronized_start(true);
    let result = run_mutex_exclusion_stress(config);
    assert_eq!(result.failures, 0);
}

#[test]
#[ntest::timeout(10000)]
fn test_panicking_holder_poisons_for_others() {
    let mutex = Arc::new(Mutex::new(vec![1, 2, 3]));

    let poisoner = {
        let mutex = Arc::clone(&mutex);
        thread::spawn(move || {
            let mut guard = mutex.lock().unwrap();
            guard.push(4);
            panic!("holder failed mid-update");
        })
    };
    assert!(poisoner.join().is_err());

    assert!(mutex.is_poisoned());
    assert!(!mutex.is_locked());
    let recovered = match mutex.lock() {
        Ok(_) => panic!("expected poison"),
        Err(err) => err.into_inner(),
    };
    assert_eq!(*recovered, vec![1, 2, 3, 4]);
    drop(recovered);

    mutex.clear_poison();
    assert!(mutex.lock().is_ok());
}

#[test]
fn test_explicit_unlock_releases_immediately() {
    let lock = Lock::default();
    let guard = lock.lock().unwrap();
    assert!(lock.is_locked());
    guard.unlock();
    assert!(!lock.is_locked());
    assert!(lock.try_lock().is_ok());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
#[ntest::timeout(10000)]
fn test_blocked_lock_sleeps_instead_of_spinning() {
    let mutex = Arc::new(Mutex::new(0u32));
    let guard = mutex.lock().unwrap();
    let (ready_tx, ready_rx) = mpsc::channel();

    let waiter = {
        let mutex = Arc::clone(&mutex);
        thread::spawn(move || {
            let before = super::thread_cpu_ticks();
            ready_tx.send(()).unwrap();
            *mutex.lock().unwrap() += 1;
            super::thread_cpu_ticks() - before
        })
    };

    ready_rx.recv().unwrap();
    thread::sleep(Duration::from_millis(500));
    drop(guard);

    let ticks = waiter.join().unwrap();
    assert!(ticks < 10, "blocked waiter used {ticks} ticks of CPU");
    assert_eq!(*mutex.lock().unwrap(), 1);
}
