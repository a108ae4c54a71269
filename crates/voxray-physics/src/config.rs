//! Raycast tuning.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voxray_core::{Error, Result};

/// Margin added to every face of an entity's bounding box before testing.
///
/// Covers the lag and jitter between an entity's observed and actual
/// position so fast movers are not narrowly missed.
pub const DEFAULT_TOLERANCE: f64 = 0.35;

/// Which intersecting entity the entity test reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySelection {
    /// The first intersecting entity in iteration order.
    FirstHit,
    /// The intersecting entity whose entry point is closest to the origin.
    /// Equal distances keep the earlier entity.
    #[default]
    Nearest,
}

impl FromStr for EntitySelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first_hit" | "first" => Ok(Self::FirstHit),
            "nearest" => Ok(Self::Nearest),
            other => Err(Error::InvalidConfig(format!(
                "unknown entity selection {other:?}"
            ))),
        }
    }
}

/// Broad-phase range check applied to entities before intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPrune {
    /// Entity position must lie within the max distance of the origin.
    ///
    /// Large entities whose position is out of range but whose box is not
    /// are skipped.
    #[default]
    Position,
    /// The nearest point of the entity's expanded box must lie within the
    /// max distance of the origin.
    Volume,
}

impl FromStr for EntityPrune {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "position" => Ok(Self::Position),
            "volume" => Ok(Self::Volume),
            other => Err(Error::InvalidConfig(format!("unknown entity prune {other:?}"))),
        }
    }
}

/// Winner when the block and entity hits are exactly equidistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// The block is reported; the entity must be strictly nearer to win.
    #[default]
    PreferBlock,
    /// The entity is reported; the block must be strictly nearer to win.
    PreferEntity,
}

impl FromStr for TiePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prefer_block" | "block" => Ok(Self::PreferBlock),
            "prefer_entity" | "entity" => Ok(Self::PreferEntity),
            other => Err(Error::InvalidConfig(format!("unknown tie policy {other:?}"))),
        }
    }
}

/// Raycast configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Margin added to every face of entity bounding boxes.
    pub tolerance: f64,
    /// Entity selection policy.
    pub selection: EntitySelection,
    /// Entity broad-phase check.
    pub prune: EntityPrune,
    /// Block/entity tie resolution.
    pub tie: TiePolicy,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            selection: EntitySelection::default(),
            prune: EntityPrune::default(),
            tie: TiePolicy::default(),
        }
    }
}

impl RaycastConfig {
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub const fn with_selection(mut self, selection: EntitySelection) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub const fn with_prune(mut self, prune: EntityPrune) -> Self {
        self.prune = prune;
        self
    }

    #[must_use]
    pub const fn with_tie(mut self, tie: TiePolicy) -> Self {
        self.tie = tie;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
