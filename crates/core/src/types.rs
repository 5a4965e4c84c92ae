//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// World number (1-based in shipped content, but any value is accepted)
pub type WorldId = i32;

/// Stage number within a world
pub type StageId = i32;

/// Identifies one level by its world and stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelKey {
    pub world: WorldId,
    pub stage: StageId,
}

impl LevelKey {
    pub const fn new(world: WorldId, stage: StageId) -> Self {
        Self { world, stage }
    }

    /// Base asset name without directory or extension, e.g. `world1_stage2`
    pub fn base_name(&self) -> String {
        format!("world{}_stage{}", self.world, self.stage)
    }
}

impl From<(WorldId, StageId)> for LevelKey {
    fn from((world, stage): (WorldId, StageId)) -> Self {
        Self { world, stage }
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.world, self.stage)
    }
}
