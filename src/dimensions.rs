//! Vertical dimensions of the simulation column.
//!
//! Full levels sit at layer midpoints and interface levels at layer
//! boundaries, so a column always has one more interface than full level.
//! Each dimension gets its own packing; the two differ in pack count
//! whenever `NUM_PHYSICAL_LEV` is a multiple of [`VECTOR_SIZE`].
//!
//! With a width of 1 (accelerator builds) the pack counts equal the level
//! counts.
//!
//! [`VECTOR_SIZE`]: crate::space::VECTOR_SIZE

use crate::config::build_env;
use crate::packing::ColInfo;

/// Physical full levels per column.
pub const NUM_PHYSICAL_LEV: usize = build_env::NUM_PHYSICAL_LEV;

/// Physical interface levels per column.
pub const NUM_INTERFACE_LEV: usize = NUM_PHYSICAL_LEV + 1;

pub type LevelPacking = ColInfo<NUM_PHYSICAL_LEV>;
pub type InterfacePacking = ColInfo<NUM_INTERFACE_LEV>;

/// Packs per column of full levels.
pub const NUM_LEV: usize = LevelPacking::NUM_PACKS;

/// Packs per column of interface levels.
pub const NUM_LEV_P: usize = InterfacePacking::NUM_PACKS;

/// Time levels kept for the dynamics state.
pub const NUM_TIME_LEVELS: usize = 3;

/// Time levels kept for tracers.
pub const Q_NUM_TIME_LEVELS: usize = 2;

/// Whether halo exchange buffers live in device memory.
pub const MPI_ON_DEVICE: bool = build_env::MPI_ON_DEVICE;
