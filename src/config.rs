// src/config.rs

//! The build-time configuration surface as a single typed value.
//!
//! Cargo features say which backends the portability runtime carries and
//! what the build asks for. `build.rs` contributes the numeric knobs (native
//! SIMD width, team-size overrides, level count) through a generated file.
//! [`BuildConfig::CURRENT`] is the configuration this crate was compiled
//! with; any other `BuildConfig`, for example one deserialized from JSON,
//! can be resolved at runtime with the same rules.

use serde::{Deserialize, Serialize};

use crate::backend::{self, AvailableBackends, BackendTag, Selection, SelectionReason};
use crate::error::{ConfigError, ResolveError};
use crate::tuning::{AcceleratorTuning, TuningOverrides};

pub(crate) mod build_env {
    include!(concat!(env!("OUT_DIR"), "/build_env.rs"));
}

pub use build_env::NATIVE_SIMD_ISA;

/// Everything that decides the execution backend and its vector width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // Missing fields take this build's values.
pub struct BuildConfig {
    /// Backends compiled into the portability runtime.
    pub available: AvailableBackends,
    /// Accelerator execution explicitly enabled.
    pub enable_accelerator: bool,
    /// Explicitly requested backend, if any.
    pub requested: Option<BackendTag>,
    /// Accelerator team-size overrides.
    pub tuning: TuningOverrides,
    /// f64 lanes of the host SIMD unit.
    pub native_vector_width: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl BuildConfig {
    /// The configuration this crate was built with.
    pub const CURRENT: BuildConfig = BuildConfig {
        available: AvailableBackends::from_features(),
        enable_accelerator: cfg!(feature = "accelerator"),
        requested: backend::requested_from_features(),
        tuning: TuningOverrides {
            min_groups_per_team: build_env::MIN_GROUPS_PER_TEAM,
            max_groups_per_team: build_env::MAX_GROUPS_PER_TEAM,
        },
        native_vector_width: build_env::NATIVE_VECTOR_WIDTH,
    };

    /// A configuration with nothing enabled or requested and a scalar
    /// host unit.
    pub const fn new(available: AvailableBackends) -> Self {
        BuildConfig {
            available,
            enable_accelerator: false,
            requested: None,
            tuning: TuningOverrides::NONE,
            native_vector_width: 1,
        }
    }

    pub const fn with_accelerator(mut self, enable: bool) -> Self {
        self.enable_accelerator = enable;
        self
    }

    pub const fn with_request(mut self, requested: Option<BackendTag>) -> Self {
        self.requested = requested;
        self
    }

    pub const fn with_tuning(mut self, tuning: TuningOverrides) -> Self {
        self.tuning = tuning;
        self
    }

    pub const fn with_native_vector_width(mut self, width: usize) -> Self {
        self.native_vector_width = width;
        self
    }

    /// Applies the backend precedence rule.
    pub const fn select(&self) -> Result<Selection, ResolveError> {
        backend::resolve(self.available, self.enable_accelerator, self.requested)
    }

    /// Resolves backend, vector width and tuning together.
    pub fn resolve(&self) -> Result<ResolvedBackend, ConfigError> {
        let resolved = self.resolve_inner();
        match &resolved {
            Ok(r) => log::debug!(
                "resolved {} ({:?}): vector width {}, groups per team {}..={}",
                r.tag,
                r.reason,
                r.vector_width,
                r.tuning.min_groups_per_team,
                r.tuning.max_groups_per_team
            ),
            Err(e) => log::warn!("failed to resolve {:?}: {}", self, e),
        }
        resolved
    }

    fn resolve_inner(&self) -> Result<ResolvedBackend, ConfigError> {
        if self.native_vector_width == 0 {
            return Err(ConfigError::ZeroVectorWidth);
        }
        let selection = self.select()?;
        let tuning = AcceleratorTuning::for_backend(selection.tag, self.tuning)?;
        Ok(ResolvedBackend {
            tag: selection.tag,
            reason: selection.reason,
            vector_width: selection.tag.vector_width(self.native_vector_width),
            tuning,
        })
    }
}

/// A fully resolved backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedBackend {
    pub tag: BackendTag,
    pub reason: SelectionReason,
    pub vector_width: usize,
    pub tuning: AcceleratorTuning,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuningError;

    #[test_log::test]
    fn test_current_matches_features() {
        let config = BuildConfig::CURRENT;
        assert_eq!(config.enable_accelerator, cfg!(feature = "accelerator"));
        assert_eq!(
            config.available.has(BackendTag::HostSerial),
            cfg!(feature = "runtime-serial")
        );
        assert!(config.native_vector_width >= 1);
        assert_eq!(BuildConfig::default(), config);
    }

    #[test_log::test]
    fn test_resolve_host_uses_native_width() {
        let resolved = BuildConfig::new(AvailableBackends::HOST_SERIAL)
            .with_native_vector_width(4)
            .resolve()
            .unwrap();
        assert_eq!(resolved.tag, BackendTag::HostSerial);
        assert_eq!(resolved.reason, SelectionReason::RuntimeDefault);
        assert_eq!(resolved.vector_width, 4);
        assert_eq!(resolved.tuning, AcceleratorTuning::HOST);
    }

    #[test_log::test]
    fn test_resolve_accelerator_forces_width_one() {
        let resolved = BuildConfig::new(AvailableBackends::all())
            .with_accelerator(true)
            .with_native_vector_width(8)
            .resolve()
            .unwrap();
        assert_eq!(resolved.tag, BackendTag::Accelerator);
        assert_eq!(resolved.vector_width, 1);
        assert_eq!(resolved.tuning, AcceleratorTuning::ACCELERATOR_DEFAULT);
    }

    #[test_log::test]
    fn test_runtime_default_accelerator_applies_overrides() {
        let overrides = TuningOverrides {
            min_groups_per_team: Some(4),
            max_groups_per_team: Some(32),
        };
        let resolved = BuildConfig::new(AvailableBackends::all())
            .with_tuning(overrides)
            .resolve()
            .unwrap();
        assert_eq!(resolved.tag, BackendTag::Accelerator);
        assert_eq!(resolved.reason, SelectionReason::RuntimeDefault);
        assert_eq!(resolved.tuning, AcceleratorTuning::new(4, 32).unwrap());

        // A host request takes the accelerator out and the overrides with it.
        let host = BuildConfig::new(AvailableBackends::all())
            .with_tuning(overrides)
            .with_request(Some(BackendTag::HostSerial))
            .resolve()
            .unwrap();
        assert_eq!(host.tuning, AcceleratorTuning::HOST);
    }

    #[test_log::test]
    fn test_resolve_errors() {
        assert_eq!(
            BuildConfig::new(AvailableBackends::empty()).resolve(),
            Err(ConfigError::Backend(ResolveError::NoBackend))
        );
        assert_eq!(
            BuildConfig::new(AvailableBackends::HOST_SERIAL)
                .with_native_vector_width(0)
                .resolve(),
            Err(ConfigError::ZeroVectorWidth)
        );
        let bad_tuning = TuningOverrides {
            min_groups_per_team: Some(32),
            max_groups_per_team: Some(4),
        };
        assert_eq!(
            BuildConfig::new(AvailableBackends::ACCELERATOR)
                .with_accelerator(true)
                .with_tuning(bad_tuning)
                .resolve(),
            Err(ConfigError::Tuning(TuningError::MinExceedsMax { min: 32, max: 4 }))
        );
    }

    #[test_log::test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "available": "HOST_PARALLEL | HOST_SERIAL",
            "requested": "host-serial",
            "native_vector_width": 8
        }"#;
        let config: BuildConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.available,
            AvailableBackends::HOST_PARALLEL | AvailableBackends::HOST_SERIAL
        );
        assert_eq!(config.requested, Some(BackendTag::HostSerial));
        // Unspecified fields come from this build.
        assert_eq!(config.enable_accelerator, BuildConfig::CURRENT.enable_accelerator);

        let resolved = config.with_accelerator(false).resolve().unwrap();
        assert_eq!(resolved.tag, BackendTag::HostSerial);
        assert_eq!(resolved.vector_width, 8);
    }
}
