//! A read-only summary of every constant this build resolved.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::backend::{BackendTag, SelectionReason};
use crate::config::{BuildConfig, NATIVE_SIMD_ISA};
use crate::dimensions::{
    InterfacePacking, LevelPacking, MPI_ON_DEVICE, NUM_INTERFACE_LEV, NUM_LEV, NUM_LEV_P,
    NUM_PHYSICAL_LEV, NUM_TIME_LEVELS, Q_NUM_TIME_LEVELS,
};
use crate::packing::PackingInfo;
use crate::space::{ACCELERATOR_TUNING, EXEC_SELECTION, EXEC_SPACE, VECTOR_SIZE};
use crate::tuning::AcceleratorTuning;

/// Computed on first access, never modified afterwards.
pub static BUILD_REPORT: Lazy<BuildReport> = Lazy::new(BuildReport::collect);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub exec_space: BackendTag,
    pub selected_by: SelectionReason,
    pub vector_size: usize,
    pub native_vector_width: usize,
    pub native_simd_isa: &'static str,
    pub tuning: AcceleratorTuning,
    pub config: BuildConfig,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub num_physical_lev: usize,
    pub num_interface_lev: usize,
    pub num_lev: usize,
    pub num_lev_p: usize,
    pub num_time_levels: usize,
    pub q_num_time_levels: usize,
    pub mpi_on_device: bool,
    pub levels: PackingInfo,
    pub interfaces: PackingInfo,
}

impl BuildReport {
    pub fn collect() -> Self {
        let report = BuildReport {
            exec_space: EXEC_SPACE,
            selected_by: EXEC_SELECTION.reason,
            vector_size: VECTOR_SIZE,
            native_vector_width: BuildConfig::CURRENT.native_vector_width,
            native_simd_isa: NATIVE_SIMD_ISA,
            tuning: ACCELERATOR_TUNING,
            config: BuildConfig::CURRENT,
            dimensions: Dimensions {
                num_physical_lev: NUM_PHYSICAL_LEV,
                num_interface_lev: NUM_INTERFACE_LEV,
                num_lev: NUM_LEV,
                num_lev_p: NUM_LEV_P,
                num_time_levels: NUM_TIME_LEVELS,
                q_num_time_levels: Q_NUM_TIME_LEVELS,
                mpi_on_device: MPI_ON_DEVICE,
                levels: LevelPacking::INFO,
                interfaces: InterfacePacking::INFO,
            },
        };

        log::info!(
            "execution space {} ({:?}), vector size {} (native {} via {})",
            report.exec_space,
            report.selected_by,
            report.vector_size,
            report.native_vector_width,
            report.native_simd_isa
        );
        log::info!(
            "{} levels in {} packs (last pack {} lanes), {} interfaces in {} packs (last pack {} lanes)",
            NUM_PHYSICAL_LEV,
            NUM_LEV,
            LevelPacking::LAST_PACK_LEN,
            NUM_INTERFACE_LEV,
            NUM_LEV_P,
            InterfacePacking::LAST_PACK_LEN
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_report_is_computed_once() {
        let first: &BuildReport = &BUILD_REPORT;
        let second: &BuildReport = &BUILD_REPORT;
        assert!(std::ptr::eq(first, second));
        assert_eq!(*first, BuildReport::collect());
    }

    #[test_log::test]
    fn test_report_reflects_constants() {
        let report = &*BUILD_REPORT;
        assert_eq!(report.exec_space, EXEC_SPACE);
        assert_eq!(report.vector_size, VECTOR_SIZE);
        assert_eq!(report.dimensions.num_lev, report.dimensions.levels.num_packs());
        assert_eq!(report.dimensions.num_lev_p, report.dimensions.interfaces.num_packs());
    }

    #[test_log::test]
    fn test_report_serializes() {
        let value = serde_json::to_value(&*BUILD_REPORT).unwrap();
        assert_eq!(value["exec_space"], EXEC_SPACE.name());
        assert_eq!(value["vector_size"], VECTOR_SIZE);
        assert_eq!(
            value["dimensions"]["levels"]["last_pack_len"],
            LevelPacking::LAST_PACK_LEN
        );
    }
}
