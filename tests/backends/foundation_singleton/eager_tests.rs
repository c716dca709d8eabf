use foundation_singleton::{
    instance, preload, singleton, Construct, ConstructError, Eager, EagerSlot, Lazy, Singleton,
    SingletonError, SlotState,
};
use foundation_testing::stress::{sync::run_singleton_stress, StressConfig};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing_test::traced_test;

static TABLE_BUILDS: AtomicUsize = AtomicUsize::new(0);

struct RoutingTable {
    routes: Vec<&'static str>,
}

impl Construct for RoutingTable {
    fn construct() -> Result<Self, ConstructError> {
        TABLE_BUILDS.fetch_add(1, Ordering::SeqCst);
        Ok(RoutingTable {
            routes: vec!["/health", "/metrics"],
        })
    }
}

singleton!(RoutingTable => Eager);
singleton!(RoutingTable => Lazy);

#[test]
#[serial]
#[ntest::timeout(20000)]
fn test_preloaded_instance_is_shared_by_all_threads() {
    preload!(RoutingTable => Eager).unwrap();
    let builds_after_load = TABLE_BUILDS.load(Ordering::SeqCst);

    let config = StressConfig::new()
        .threads(16)
        .iterations(50)
        .synchronized_start(true);
    let result = run_singleton_stress::<RoutingTable, Eager>(config);

    assert_eq!(result.failures, 0);
    assert_eq!(TABLE_BUILDS.load(Ordering::SeqCst), builds_after_load);
    assert_eq!(
        instance::<RoutingTable, Eager>().unwrap().routes,
        ["/health", "/metrics"]
    );
}

#[test]
#[serial]
fn test_eager_and_lazy_instances_are_independent() {
    <RoutingTable as Singleton<Eager>>::preload().unwrap();
    let eager = instance::<RoutingTable, Eager>().unwrap();
    let lazy = instance::<RoutingTable, Lazy>().unwrap();

    assert!(!std::ptr::eq(eager, lazy));
    assert!(std::ptr::eq(lazy, instance::<RoutingTable, Lazy>().unwrap()));
}

#[test]
#[traced_test]
fn test_reading_before_load_reports_not_loaded() {
    static SLOT: EagerSlot<u32> = EagerSlot::new(|| Ok(7));

    let err = SLOT.instance().unwrap_err();
    assert!(err.is_not_loaded());
    assert!(matches!(err, SingletonError::NotLoaded { type_name } if type_name == "u32"));
    assert_eq!(SLOT.state(), SlotState::Empty);

    assert_eq!(*SLOT.load().unwrap(), 7);
    assert_eq!(*SLOT.instance().unwrap(), 7);
    assert!(logs_contain("eager singleton loaded"));
}

#[test]
#[ntest::timeout(20000)]
fn test_concurrent_loads_build_once() {
    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn build() -> Result<usize, ConstructError> {
        Ok(BUILDS.fetch_add(1, Ordering::SeqCst))
    }

    static SLOT: EagerSlot<usize> = EagerSlot::new(build);

    let handles: Vec<_> = (0..12)
        .map(|_| thread::spawn(|| *SLOT.load().unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    assert!(SLOT.is_loaded());
}

#[test]
fn test_failed_load_can_be_repeated() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    fn build() -> Result<&'static str, ConstructError> {
        if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
            Err("config file missing".into())
        } else {
            Ok("loaded")
        }
    }

    static SLOT: EagerSlot<&'static str> = EagerSlot::new(build);

    let err = SLOT.load().unwrap_err();
    assert!(matches!(err, SingletonError::Construction(_)));
    assert!(SLOT.instance().unwrap_err().is_not_loaded());

    assert_eq!(*SLOT.load().unwrap(), "loaded");
    assert_eq!(*SLOT.instance().unwrap(), "loaded");
}
