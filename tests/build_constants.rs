//! The constants this build exposes, checked against the active cargo features.

use column_pack::dimensions::{
    InterfacePacking, LevelPacking, NUM_INTERFACE_LEV, NUM_LEV, NUM_LEV_P, NUM_PHYSICAL_LEV,
};
use column_pack::{
    AcceleratorTuning, BackendTag, BuildConfig, ExecSpace, ExecutionSpace, PackingInfo,
    SelectionReason, ACCELERATOR_TUNING, BUILD_REPORT, EXEC_SPACE, VECTOR_SIZE,
};

#[test_log::test]
fn exec_space_matches_features() {
    #[cfg(feature = "accelerator")]
    {
        assert_eq!(EXEC_SPACE, BackendTag::Accelerator);
        assert_eq!(BUILD_REPORT.selected_by, SelectionReason::AcceleratorEnabled);
    }

    #[cfg(all(not(feature = "accelerator"), feature = "space-parallel"))]
    assert_eq!(EXEC_SPACE, BackendTag::HostParallel);

    #[cfg(all(
        not(feature = "accelerator"),
        not(feature = "space-parallel"),
        feature = "space-threads"
    ))]
    assert_eq!(EXEC_SPACE, BackendTag::HostThreaded);

    #[cfg(all(
        not(feature = "accelerator"),
        not(feature = "space-parallel"),
        not(feature = "space-threads"),
        feature = "space-serial"
    ))]
    assert_eq!(EXEC_SPACE, BackendTag::HostSerial);

    #[cfg(not(any(
        feature = "accelerator",
        feature = "space-parallel",
        feature = "space-threads",
        feature = "space-serial"
    )))]
    {
        assert_eq!(BUILD_REPORT.selected_by, SelectionReason::RuntimeDefault);
        assert_eq!(
            Some(EXEC_SPACE),
            BuildConfig::CURRENT.available.runtime_default()
        );
    }

    if BuildConfig::CURRENT.requested.is_some() && !cfg!(feature = "accelerator") {
        assert_eq!(BUILD_REPORT.selected_by, SelectionReason::Requested);
    }
    assert!(BackendTag::ALL.contains(&EXEC_SPACE));
    assert!(BuildConfig::CURRENT.available.has(EXEC_SPACE));
    assert_eq!(<ExecSpace as ExecutionSpace>::TAG, EXEC_SPACE);
}

#[test_log::test]
fn vector_size_follows_backend() {
    if EXEC_SPACE.is_accelerator() {
        assert_eq!(VECTOR_SIZE, 1);
        // Overrides apply however the accelerator was reached.
        assert_eq!(
            Ok(ACCELERATOR_TUNING),
            AcceleratorTuning::for_backend(EXEC_SPACE, BuildConfig::CURRENT.tuning)
        );
        assert!(ACCELERATOR_TUNING.min_groups_per_team <= ACCELERATOR_TUNING.max_groups_per_team);
    } else {
        assert_eq!(VECTOR_SIZE, BuildConfig::CURRENT.native_vector_width);
        assert_eq!(ACCELERATOR_TUNING, AcceleratorTuning::HOST);
    }
    assert!(VECTOR_SIZE >= 1);
}

#[test_log::test]
fn current_config_resolves_to_the_compiled_constants() {
    let resolved = BuildConfig::CURRENT.resolve().unwrap();
    assert_eq!(resolved.tag, EXEC_SPACE);
    assert_eq!(resolved.vector_width, VECTOR_SIZE);
    assert_eq!(resolved.tuning, ACCELERATOR_TUNING);
}

#[test_log::test]
fn column_dimensions_pack_at_vector_size() {
    assert_eq!(NUM_INTERFACE_LEV, NUM_PHYSICAL_LEV + 1);
    assert_eq!(
        LevelPacking::INFO,
        PackingInfo::new(NUM_PHYSICAL_LEV, VECTOR_SIZE).unwrap()
    );
    assert_eq!(
        InterfacePacking::INFO,
        PackingInfo::new(NUM_INTERFACE_LEV, VECTOR_SIZE).unwrap()
    );
    assert_eq!(NUM_LEV, (NUM_PHYSICAL_LEV + VECTOR_SIZE - 1) / VECTOR_SIZE);
    assert_eq!(NUM_LEV_P, (NUM_INTERFACE_LEV + VECTOR_SIZE - 1) / VECTOR_SIZE);
    if VECTOR_SIZE == 1 {
        assert_eq!(NUM_LEV, NUM_PHYSICAL_LEV);
        assert_eq!(NUM_LEV_P, NUM_INTERFACE_LEV);
    }
}

#[test_log::test]
fn report_carries_both_dimensions() {
    let dims = &BUILD_REPORT.dimensions;
    assert_eq!(dims.levels.physical_extent(), NUM_PHYSICAL_LEV);
    assert_eq!(dims.interfaces.physical_extent(), NUM_INTERFACE_LEV);
    assert_eq!(dims.num_lev, NUM_LEV);
    assert_eq!(dims.num_lev_p, NUM_LEV_P);
}
