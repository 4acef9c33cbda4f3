use std::fmt;
use std::str::FromStr;

use crate::model::world::WorldStore;
use crate::utils::WorldCoord;

/// Where a new avatar appears
pub const SPAWN: WorldCoord = WorldCoord(0, 1, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            GameMode::Survival => GameMode::Creative,
            GameMode::Creative => GameMode::Survival,
        }
    }

    pub fn can_place(self) -> bool {
        self == GameMode::Creative
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Survival => write!(f, "survival"),
            GameMode::Creative => write!(f, "creative"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "survival" => Ok(GameMode::Survival),
            "creative" => Ok(GameMode::Creative),
            other => Err(format!("unknown game mode `{other}`")),
        }
    }
}

/// The avatar. `pos.1` is always a whole resting level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: WorldCoord,
}

impl Player {
    pub fn new(pos: WorldCoord) -> Self {
        Self { pos }
    }

    pub fn is_supported(&self, world: &WorldStore) -> bool {
        is_supported_at(world, &self.pos)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(SPAWN)
    }
}

/// The avatar may rest at `pos` on the ground plane or on top of any block
pub fn is_supported_at(world: &WorldStore, pos: &WorldCoord) -> bool {
    pos.1 == 0 || world.contains(&pos.below())
}
