use foundation_singleton::{
    instance, singleton, Construct, ConstructError, Lazy, LazySlot, Singleton, SingletonError,
    SlotState,
};
use foundation_testing::scenarios::StartGate;
use foundation_testing::stress::{sync::run_singleton_stress, StressConfig};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_test::traced_test;

static COUNTER_BUILDS: AtomicUsize = AtomicUsize::new(0);

struct Counter {
    value: AtomicUsize,
}

impl Construct for Counter {
    fn construct() -> Result<Self, ConstructError> {
        COUNTER_BUILDS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Counter {
            value: AtomicUsize::new(0),
        })
    }
}

singleton!(Counter => Lazy);

#[test]
#[serial]
#[ntest::timeout(20000)]
fn test_hundred_threads_share_one_counter() {
    const THREADS: usize = 100;
    let gate = Arc::new(StartGate::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                gate.arrive_and_wait();
                let counter = instance::<Counter, Lazy>().unwrap();
                counter.value.fetch_add(1, Ordering::SeqCst);
                std::ptr::from_ref(counter) as usize
            })
        })
        .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(COUNTER_BUILDS.load(Ordering::SeqCst), 1);
    assert!(addresses.iter().all(|addr| *addr == addresses[0]));

    let counter = <Counter as Singleton<Lazy>>::try_get().unwrap();
    assert_eq!(counter.value.load(Ordering::SeqCst), THREADS);
    assert_eq!(<Counter as Singleton<Lazy>>::state(), SlotState::Ready);
}

static FLAKY_ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

struct Flaky {
    attempt: usize,
}

impl Construct for Flaky {
    fn construct() -> Result<Self, ConstructError> {
        let attempt = FLAKY_ATTEMPTS.fetch_add(1, Ordering::SeqCst);
        if attempt < 3 {
            return Err(format!("attempt {attempt} refused").into());
        }
        Ok(Flaky { attempt })
    }
}

singleton!(Flaky => Lazy);

#[test]
#[serial]
#[ntest::timeout(20000)]
fn test_failed_construction_is_retried_by_later_callers() {
    let config = StressConfig::new()
        .threads(8)
        .iterations(10)
        .synchronized_start(true);
    let result = run_singleton_stress::<Flaky, Lazy>(config);

    assert_eq!(result.failures, 3);
    assert_eq!(result.successes, 77);
    assert_eq!(FLAKY_ATTEMPTS.load(Ordering::SeqCst), 4);
    assert_eq!(<Flaky as Singleton<Lazy>>::try_get().unwrap().attempt, 3);
}

#[test]
#[traced_test]
fn test_construction_error_surfaces_to_caller() {
    static REFUSED: LazySlot<u64> =
        LazySlot::new(|| Err(ConstructError::from("database unreachable")));

    let err = REFUSED.instance().unwrap_err();
    match &err {
        SingletonError::Construction(inner) => {
            assert_eq!(inner.to_string(), "database unreachable");
        }
        other @ SingletonError::NotLoaded { .. } => panic!("unexpected error: {other}"),
    }
    assert_eq!(REFUSED.state(), SlotState::Empty);
    assert!(logs_contain("database unreachable"));
}

#[test]
#[ntest::timeout(20000)]
fn test_panicking_initializer_leaves_slot_usable() {
    static PANICKED: AtomicBool = AtomicBool::new(false);

    fn build() -> Result<String, ConstructError> {
        assert!(PANICKED.swap(true, Ordering::SeqCst), "first build panics");
        Ok(String::from("recovered"))
    }

    static SLOT: LazySlot<String> = LazySlot::new(build);

    let first = thread::spawn(|| SLOT.instance().map(|s| s.len())).join();
    assert!(first.is_err());
    assert_eq!(SLOT.state(), SlotState::Empty);

    assert_eq!(SLOT.instance().unwrap(), "recovered");
}

#[test]
#[traced_test]
fn test_first_access_publishes_once() {
    #[derive(Default)]
    struct Journal;
    static SLOT: LazySlot<Journal> = LazySlot::new(foundation_singleton::from_default);

    assert!(SLOT.get().is_none());
    let first = SLOT.instance().unwrap();
    let second = SLOT.instance().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(logs_contain("slot published"));
}
