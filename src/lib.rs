//! # column-pack
//!
//! Compile-time execution backend selection and vertical-column packing.
//!
//! A column kernel is written once against packs of [`VECTOR_SIZE`] lanes.
//! The build picks one execution backend ([`EXEC_SPACE`] / [`ExecSpace`]),
//! and that choice fixes the vector width: one lane on the accelerator, the
//! host's native SIMD width otherwise. Every physical dimension is then
//! packed with [`ColInfo`], whose constants are the only loop bounds a kernel
//! should use.
//!
//! ```
//! use column_pack::{ColInfo, PackingInfo};
//!
//! // 25 full levels -> 26 interfaces, 4 lanes per pack.
//! type Interfaces = ColInfo<26, 4>;
//! assert_eq!(Interfaces::NUM_PACKS, 7);
//! assert_eq!(Interfaces::LAST_PACK_LEN, 2);
//!
//! let runtime = PackingInfo::new(26, 4).unwrap();
//! assert_eq!(runtime, Interfaces::INFO);
//! ```
//!
//! ## Modules
//!
//! - `backend`: backend tags and the precedence rule.
//! - `space`: the resolved execution space, as a constant and as a type.
//! - `tuning`: accelerator team-size bounds.
//! - `packing`: extent-to-pack mapping.
//! - `dimensions`: the column's named vertical dimensions.
//! - `config`: the build configuration surface.
//! - `report`: a summary of everything resolved.

pub mod backend;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod packing;
pub mod report;
pub mod space;
pub mod tuning;

pub use backend::{resolve, AvailableBackends, BackendTag, Selection, SelectionReason};
pub use config::{BuildConfig, ResolvedBackend};
pub use error::{ConfigError, PackingError, ResolveError, TuningError};
pub use packing::{ColInfo, LaneIndex, PackSpan, PackingInfo};
pub use report::{BuildReport, BUILD_REPORT};
pub use space::{ExecSpace, ExecutionSpace, ACCELERATOR_TUNING, EXEC_SPACE, VECTOR_SIZE};
pub use tuning::{AcceleratorTuning, TuningOverrides};
