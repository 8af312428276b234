//! The execution space this build runs on.
//!
//! [`EXEC_SPACE`] is resolved from [`BuildConfig::CURRENT`] during
//! compilation. A build whose configuration resolves to no backend does not
//! compile. [`ExecSpace`] is the matching zero-sized type, derived from the
//! tag rather than chosen separately, so the two can never disagree.

use std::fmt::Debug;

use crate::backend::{BackendTag, Selection};
use crate::config::BuildConfig;
use crate::error::{ResolveError, TuningError};
use crate::tuning::AcceleratorTuning;

/// A backend as a type. Kernels are generic over this.
pub trait ExecutionSpace: 'static + Copy + Clone + Send + Sync + Debug + Default {
    const TAG: BackendTag;

    /// Lanes per pack.
    const LANES: usize = Self::TAG.vector_width(BuildConfig::CURRENT.native_vector_width);

    /// Team-size bounds, with this build's overrides applied.
    const TUNING: AcceleratorTuning =
        match AcceleratorTuning::for_backend(Self::TAG, BuildConfig::CURRENT.tuning) {
            Ok(tuning) => tuning,
            Err(TuningError::ZeroGroups) => panic!("groups per team must be at least 1"),
            Err(TuningError::MinExceedsMax { .. }) => {
                panic!("min groups per team exceeds max groups per team")
            }
        };

    fn name() -> &'static str {
        Self::TAG.name()
    }
}

/// GPU-style execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Accelerator;

/// Parallel host execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HostParallel;

/// Threaded host execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HostThreaded;

/// Serial host execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HostSerial;

impl ExecutionSpace for Accelerator {
    const TAG: BackendTag = BackendTag::Accelerator;
}

impl ExecutionSpace for HostParallel {
    const TAG: BackendTag = BackendTag::HostParallel;
}

impl ExecutionSpace for HostThreaded {
    const TAG: BackendTag = BackendTag::HostThreaded;
}

impl ExecutionSpace for HostSerial {
    const TAG: BackendTag = BackendTag::HostSerial;
}

/// Maps a tag index to its space type.
pub struct Tagged<const TAG: u8>;

pub trait SpaceForTag {
    type Space: ExecutionSpace;
}

impl SpaceForTag for Tagged<{ BackendTag::Accelerator.index() }> {
    type Space = Accelerator;
}

impl SpaceForTag for Tagged<{ BackendTag::HostParallel.index() }> {
    type Space = HostParallel;
}

impl SpaceForTag for Tagged<{ BackendTag::HostThreaded.index() }> {
    type Space = HostThreaded;
}

impl SpaceForTag for Tagged<{ BackendTag::HostSerial.index() }> {
    type Space = HostSerial;
}

/// How this build's backend was chosen. Fails the build when nothing
/// resolves.
pub const EXEC_SELECTION: Selection = match BuildConfig::CURRENT.select() {
    Ok(selection) => selection,
    Err(ResolveError::NoBackend) => {
        panic!("no valid execution space: no execution backend selected")
    }
    Err(ResolveError::AcceleratorNotEnabled) => panic!(
        "no valid execution space: the accelerator was requested but accelerator execution is not enabled"
    ),
    Err(ResolveError::Unavailable(_)) => panic!(
        "no valid execution space: the selected execution backend is not enabled in the portability runtime"
    ),
};

/// The resolved backend.
pub const EXEC_SPACE: BackendTag = EXEC_SELECTION.tag;

/// The resolved backend as a type.
pub type ExecSpace = <Tagged<{ EXEC_SPACE.index() }> as SpaceForTag>::Space;

/// Lanes per pack on the resolved backend.
pub const VECTOR_SIZE: usize = <ExecSpace as ExecutionSpace>::LANES;

/// Team-size bounds on the resolved backend; `1..=1` on host backends.
pub const ACCELERATOR_TUNING: AcceleratorTuning = <ExecSpace as ExecutionSpace>::TUNING;

const _: () = assert!(VECTOR_SIZE >= 1, "vector width must be at least 1");

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes_of<S: ExecutionSpace>() -> usize {
        S::LANES
    }

    #[test_log::test]
    fn test_exec_space_type_matches_tag() {
        assert_eq!(<ExecSpace as ExecutionSpace>::TAG, EXEC_SPACE);
        assert_eq!(<ExecSpace as ExecutionSpace>::name(), EXEC_SPACE.name());
    }

    #[test_log::test]
    fn test_accelerator_space_has_one_lane() {
        assert_eq!(lanes_of::<Accelerator>(), 1);
        let native = BuildConfig::CURRENT.native_vector_width;
        assert_eq!(lanes_of::<HostSerial>(), native);
        assert_eq!(lanes_of::<HostParallel>(), native);
        assert_eq!(lanes_of::<HostThreaded>(), native);
    }

    #[test_log::test]
    fn test_vector_size_follows_exec_space() {
        assert_eq!(
            VECTOR_SIZE,
            EXEC_SPACE.vector_width(BuildConfig::CURRENT.native_vector_width)
        );
    }

    #[test_log::test]
    fn test_tuning_collapses_on_host() {
        assert_eq!(HostSerial::TUNING, AcceleratorTuning::HOST);
        if !EXEC_SPACE.is_accelerator() {
            assert_eq!(ACCELERATOR_TUNING, AcceleratorTuning::HOST);
        }
    }
}
