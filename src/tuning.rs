//! Team-size tuning for the accelerator backend.
//!
//! Schedulers batch columns into teams of execution groups. The bounds here
//! are advisory: they change scheduling efficiency, never results.

use serde::{Deserialize, Serialize};

use crate::backend::BackendTag;
use crate::error::TuningError;

/// Min/max execution groups per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceleratorTuning {
    pub min_groups_per_team: u32,
    pub max_groups_per_team: u32,
}

impl AcceleratorTuning {
    pub const DEFAULT_MIN_GROUPS_PER_TEAM: u32 = 8;
    pub const DEFAULT_MAX_GROUPS_PER_TEAM: u32 = 16;

    /// Host backends have no team grouping.
    pub const HOST: AcceleratorTuning = AcceleratorTuning {
        min_groups_per_team: 1,
        max_groups_per_team: 1,
    };

    pub const ACCELERATOR_DEFAULT: AcceleratorTuning = AcceleratorTuning {
        min_groups_per_team: Self::DEFAULT_MIN_GROUPS_PER_TEAM,
        max_groups_per_team: Self::DEFAULT_MAX_GROUPS_PER_TEAM,
    };

    pub const fn new(
        min_groups_per_team: u32,
        max_groups_per_team: u32,
    ) -> Result<Self, TuningError> {
        if min_groups_per_team == 0 || max_groups_per_team == 0 {
            return Err(TuningError::ZeroGroups);
        }
        if min_groups_per_team > max_groups_per_team {
            return Err(TuningError::MinExceedsMax {
                min: min_groups_per_team,
                max: max_groups_per_team,
            });
        }
        Ok(Self {
            min_groups_per_team,
            max_groups_per_team,
        })
    }

    /// Tuning for `tag`. Overrides only apply on the accelerator; each
    /// bound that is not overridden keeps its default.
    pub const fn for_backend(
        tag: BackendTag,
        overrides: TuningOverrides,
    ) -> Result<Self, TuningError> {
        if !tag.is_accelerator() {
            return Ok(Self::HOST);
        }
        let min = match overrides.min_groups_per_team {
            Some(min) => min,
            None => Self::DEFAULT_MIN_GROUPS_PER_TEAM,
        };
        let max = match overrides.max_groups_per_team {
            Some(max) => max,
            None => Self::DEFAULT_MAX_GROUPS_PER_TEAM,
        };
        Self::new(min, max)
    }

    /// Pulls a requested group count into `[min, max]`.
    pub const fn clamp_groups(self, groups: u32) -> u32 {
        if groups < self.min_groups_per_team {
            self.min_groups_per_team
        } else if groups > self.max_groups_per_team {
            self.max_groups_per_team
        } else {
            groups
        }
    }

    #[inline]
    pub const fn has_grouping(self) -> bool {
        self.max_groups_per_team > 1
    }
}

/// Build-time overrides of the accelerator team-size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningOverrides {
    pub min_groups_per_team: Option<u32>,
    pub max_groups_per_team: Option<u32>,
}

impl TuningOverrides {
    pub const NONE: TuningOverrides = TuningOverrides {
        min_groups_per_team: None,
        max_groups_per_team: None,
    };
}
