use alloc::boxed::Box;
use alloc::string::String;
use core::error::Error;
use core::fmt;

use derive_more::From;

/// Result of asking a slot for its instance.
pub type SingletonResult<T> = Result<T, SingletonError>;

/// Failure reported by a payload initializer.
///
/// Wraps any `Error + Send + Sync`, so initializers can forward whatever
/// their own setup returns.
pub struct ConstructError {
    source: Box<dyn Error + Send + Sync>,
}

impl ConstructError {
    /// Wraps any error raised while building an instance.
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self { source: err.into() }
    }

    /// Returns the boxed underlying error.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync> {
        self.source
    }

    /// Borrows the underlying error as `E`, if that is its type.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

impl From<&str> for ConstructError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ConstructError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl fmt::Debug for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstructError").field(&self.source).finish()
    }
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Error for ConstructError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

/// Why a singleton could not hand out its instance.
#[derive(Debug, From)]
pub enum SingletonError {
    /// The initializer failed. The slot is back to empty and a later call
    /// retries construction.
    Construction(ConstructError),

    /// An eager slot was read before its load step ran.
    #[from(ignore)]
    NotLoaded { type_name: &'static str },
}

impl SingletonError {
    /// `true` for an eager read that came before the load step.
    #[must_use]
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, SingletonError::NotLoaded { .. })
    }
}

impl Error for SingletonError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SingletonError::Construction(err) => Some(err),
            SingletonError::NotLoaded { .. } => None,
        }
    }
}

impl fmt::Display for SingletonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingletonError::Construction(err) => {
                write!(f, "SingletonError::Construction({err})")
            }
            SingletonError::NotLoaded { type_name } => {
                write!(f, "SingletonError::NotLoaded({type_name})")
            }
        }
    }
}
