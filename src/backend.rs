//! Execution backend tags and the precedence rule that picks one.
//!
//! The portability runtime is described only by which of the four backends
//! it was compiled with. [`resolve`] turns that, plus the build's explicit
//! choices, into exactly one [`BackendTag`]. It is a `const fn` so the same
//! rule drives the compile-time [`EXEC_SPACE`](crate::space::EXEC_SPACE)
//! and runtime what-if resolution of a [`BuildConfig`](crate::config::BuildConfig).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ResolveError;

/// One concrete execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendTag {
    /// GPU-style massively parallel execution.
    Accelerator = 0,
    /// Host execution with a parallel (OpenMP-like) thread pool.
    HostParallel = 1,
    /// Host execution on runtime-managed threads.
    HostThreaded = 2,
    /// Single-threaded host execution.
    HostSerial = 3,
}

impl BackendTag {
    /// All tags, in the order the runtime prefers them for its default.
    pub const ALL: [BackendTag; 4] = [
        BackendTag::Accelerator,
        BackendTag::HostParallel,
        BackendTag::HostThreaded,
        BackendTag::HostSerial,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BackendTag::Accelerator => "accelerator",
            BackendTag::HostParallel => "host-parallel",
            BackendTag::HostThreaded => "host-threaded",
            BackendTag::HostSerial => "host-serial",
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_accelerator(self) -> bool {
        matches!(self, BackendTag::Accelerator)
    }

    /// The availability bit for this tag.
    pub const fn flag(self) -> AvailableBackends {
        match self {
            BackendTag::Accelerator => AvailableBackends::ACCELERATOR,
            BackendTag::HostParallel => AvailableBackends::HOST_PARALLEL,
            BackendTag::HostThreaded => AvailableBackends::HOST_THREADED,
            BackendTag::HostSerial => AvailableBackends::HOST_SERIAL,
        }
    }

    /// Lanes per pack on this backend.
    ///
    /// The accelerator maps one logical unit to one thread, so it always
    /// packs a single lane whatever the host SIMD width is.
    #[inline]
    pub const fn vector_width(self, native_width: usize) -> usize {
        if self.is_accelerator() {
            1
        } else {
            native_width
        }
    }
}

impl fmt::Display for BackendTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// The backends the portability runtime was compiled with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AvailableBackends: u8 {
        const ACCELERATOR = 1 << 0;
        const HOST_PARALLEL = 1 << 1;
        const HOST_THREADED = 1 << 2;
        const HOST_SERIAL = 1 << 3;
    }
}

impl AvailableBackends {
    /// Availability as declared by the `runtime-*` cargo features.
    pub const fn from_features() -> Self {
        let mut bits = 0;
        if cfg!(feature = "runtime-accelerator") {
            bits |= Self::ACCELERATOR.bits();
        }
        if cfg!(feature = "runtime-parallel") {
            bits |= Self::HOST_PARALLEL.bits();
        }
        if cfg!(feature = "runtime-threads") {
            bits |= Self::HOST_THREADED.bits();
        }
        if cfg!(feature = "runtime-serial") {
            bits |= Self::HOST_SERIAL.bits();
        }
        Self::from_bits_truncate(bits)
    }

    #[inline]
    pub const fn has(self, tag: BackendTag) -> bool {
        self.contains(tag.flag())
    }

    /// The backend the runtime itself would pick: the first available one
    /// in [`BackendTag::ALL`] order.
    pub const fn runtime_default(self) -> Option<BackendTag> {
        let mut i = 0;
        while i < BackendTag::ALL.len() {
            let tag = BackendTag::ALL[i];
            if self.has(tag) {
                return Some(tag);
            }
            i += 1;
        }
        None
    }
}

/// Which precedence rule produced a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionReason {
    /// Accelerator execution was enabled for the build.
    AcceleratorEnabled,
    /// A backend was explicitly requested.
    Requested,
    /// Nothing was asked for; the runtime default was taken.
    RuntimeDefault,
}

/// The outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub tag: BackendTag,
    pub reason: SelectionReason,
}

/// Picks the active backend.
///
/// Precedence is: enabled accelerator, then an explicit host request, then
/// the runtime default. The winner must be present in `available`; a winner
/// that is not, or no winner at all, is an error and is never replaced by a
/// fallback. Only `enable_accelerator` selects the accelerator explicitly,
/// so requesting it without enabling it is an error too.
///
/// ```
/// use column_pack::{resolve, AvailableBackends, BackendTag};
///
/// let picked = resolve(AvailableBackends::all(), false, Some(BackendTag::HostSerial));
/// assert_eq!(picked.unwrap().tag, BackendTag::HostSerial);
/// ```
///
/// Matched in a constant, an unresolvable configuration stops the build:
///
/// ```compile_fail
/// use column_pack::{resolve, AvailableBackends, Selection};
///
/// const PICKED: Selection = match resolve(AvailableBackends::empty(), false, None) {
///     Ok(selection) => selection,
///     Err(_) => panic!("no valid execution space: no execution backend selected"),
/// };
///
/// fn main() {
///     let _ = PICKED.tag;
/// }
/// ```
pub const fn resolve(
    available: AvailableBackends,
    enable_accelerator: bool,
    requested: Option<BackendTag>,
) -> Result<Selection, ResolveError> {
    let candidate = if enable_accelerator {
        Some(Selection {
            tag: BackendTag::Accelerator,
            reason: SelectionReason::AcceleratorEnabled,
        })
    } else if let Some(tag) = requested {
        if tag.is_accelerator() {
            return Err(ResolveError::AcceleratorNotEnabled);
        }
        Some(Selection {
            tag,
            reason: SelectionReason::Requested,
        })
    } else if let Some(tag) = available.runtime_default() {
        Some(Selection {
            tag,
            reason: SelectionReason::RuntimeDefault,
        })
    } else {
        None
    };

    match candidate {
        None => Err(ResolveError::NoBackend),
        Some(selection) if !available.has(selection.tag) => {
            Err(ResolveError::Unavailable(selection.tag))
        }
        Some(selection) => Ok(selection),
    }
}

/// The host strategy requested through the `space-*` cargo features.
///
/// More than one request resolves in the order parallel, threaded, serial.
pub const fn requested_from_features() -> Option<BackendTag> {
    if cfg!(feature = "space-parallel") {
        Some(BackendTag::HostParallel)
    } else if cfg!(feature = "space-threads") {
        Some(BackendTag::HostThreaded)
    } else if cfg!(feature = "space-serial") {
        Some(BackendTag::HostSerial)
    } else {
        None
    }
}
