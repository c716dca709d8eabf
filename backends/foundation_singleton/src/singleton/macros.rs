/// Implements [`Singleton`](crate::Singleton) for a type under one policy and
/// declares the `static` slot that backs it.
///
/// Without an explicit initializer the type's
/// [`Construct`](crate::Construct) impl is used.
///
/// ```
/// use foundation_singleton::{
///     from_default, singleton, Auto, Eager, Lazy, PolicyKind, Singleton,
/// };
///
/// #[derive(Default)]
/// struct Routes(Vec<&'static str>);
///
/// fn choose() -> PolicyKind {
///     PolicyKind::Eager
/// }
///
/// singleton!(Routes => Lazy, from_default);
/// singleton!(Routes => Eager, from_default);
/// singleton!(Routes => Auto(choose), from_default);
///
/// <Routes as Singleton<Eager>>::preload().unwrap();
/// assert!(<Routes as Singleton<Auto>>::instance().unwrap().0.is_empty());
/// ```
#[macro_export]
macro_rules! singleton {
    ($ty:ty => Auto($select:expr)) => {
        $crate::singleton!($ty => Auto($select), <$ty as $crate::Construct>::construct);
    };
    ($ty:ty => Auto($select:expr), $init:expr) => {
        impl $crate::Singleton<$crate::Auto> for $ty {
            fn slot() -> &'static $crate::HybridSlot<$ty> {
                static SLOT: $crate::HybridSlot<$ty> = $crate::HybridSlot::new($init, $select);
                &SLOT
            }
        }
    };
    ($ty:ty => Eager) => {
        $crate::singleton!($ty => Eager, <$ty as $crate::Construct>::construct);
    };
    ($ty:ty => Eager, $init:expr) => {
        impl $crate::Singleton<$crate::Eager> for $ty {
            fn slot() -> &'static $crate::EagerSlot<$ty> {
                static SLOT: $crate::EagerSlot<$ty> = $crate::EagerSlot::new($init);
                &SLOT
            }
        }
    };
    ($ty:ty => Lazy) => {
        $crate::singleton!($ty => Lazy, <$ty as $crate::Construct>::construct);
    };
    ($ty:ty => Lazy, $init:expr) => {
        impl $crate::Singleton<$crate::Lazy> for $ty {
            fn slot() -> &'static $crate::LazySlot<$ty> {
                static SLOT: $crate::LazySlot<$ty> = $crate::LazySlot::new($init);
                &SLOT
            }
        }
    };
}

/// Loads a list of singletons in order, stopping at the first failure.
///
/// Evaluates to `SingletonResult<()>`. This is the start-up step that eager
/// singletons require before their first read.
///
/// ```
/// use foundation_singleton::{from_default, preload, singleton, Eager, Singleton};
///
/// #[derive(Default)]
/// struct Clock(u64);
///
/// singleton!(Clock => Eager, from_default);
///
/// preload!(Clock => Eager).unwrap();
/// assert_eq!(<Clock as Singleton<Eager>>::instance().unwrap().0, 0);
/// ```
#[macro_export]
macro_rules! preload {
    ($($ty:ty => $policy:ident),+ $(,)?) => {{
        let mut loaded: $crate::SingletonResult<()> = Ok(());
        $(
            if loaded.is_ok() {
                loaded = <$ty as $crate::Singleton<$crate::$policy>>::preload().map(|_| ());
            }
        )+
        loaded
    }};
}
