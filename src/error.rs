//! Error types for backend resolution and column packing.
//!
//! None of these are operational errors. Each one means a dimension or a
//! build configuration was set up wrong, so nothing here is ever retried.

use crate::backend::BackendTag;

/// Backend resolution produced no usable execution space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing was enabled, requested, or available as a runtime default.
    NoBackend,
    /// The enabled or requested backend is not compiled into the runtime.
    Unavailable(BackendTag),
    /// The accelerator was requested as a host strategy without accelerator
    /// execution being enabled.
    AcceleratorNotEnabled,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NoBackend => {
                write!(f, "no valid execution space: no execution backend selected")
            }
            ResolveError::Unavailable(tag) => write!(
                f,
                "no valid execution space: {} was selected but the portability runtime was built without it",
                tag
            ),
            ResolveError::AcceleratorNotEnabled => write!(
                f,
                "no valid execution space: the accelerator was requested but accelerator execution is not enabled"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A packing precondition was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackingError {
    /// The physical extent was zero.
    EmptyExtent,
    /// The vector width was zero.
    ZeroWidth,
}

impl std::fmt::Display for PackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackingError::EmptyExtent => write!(f, "physical extent must be at least 1"),
            PackingError::ZeroWidth => write!(f, "vector width must be at least 1"),
        }
    }
}

impl std::error::Error for PackingError {}

/// Invalid accelerator team-size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningError {
    /// A bound was zero.
    ZeroGroups,
    /// The lower bound exceeds the upper bound.
    MinExceedsMax { min: u32, max: u32 },
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::ZeroGroups => write!(f, "groups per team must be at least 1"),
            TuningError::MinExceedsMax { min, max } => write!(
                f,
                "min groups per team ({}) exceeds max groups per team ({})",
                min, max
            ),
        }
    }
}

impl std::error::Error for TuningError {}

/// Failure to resolve a [`BuildConfig`](crate::config::BuildConfig) at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    Backend(ResolveError),
    Tuning(TuningError),
    /// The native vector width was zero.
    ZeroVectorWidth,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Backend(_) => write!(f, "backend resolution failed"),
            ConfigError::Tuning(_) => write!(f, "invalid accelerator tuning"),
            ConfigError::ZeroVectorWidth => write!(f, "native vector width must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Backend(e) => Some(e),
            ConfigError::Tuning(e) => Some(e),
            ConfigError::ZeroVectorWidth => None,
        }
    }
}

impl From<ResolveError> for ConfigError {
    fn from(err: ResolveError) -> Self {
        ConfigError::Backend(err)
    }
}

impl From<TuningError> for ConfigError {
    fn from(err: TuningError) -> Self {
        ConfigError::Tuning(err)
    }
}
