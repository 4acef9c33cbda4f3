// MODEL: Game state and data
pub mod world;
pub mod camera;
pub mod player;

pub use world::{Block, BlockKind, WorldStore, WorldGenerator, GeneratorConfig};
pub use camera::Camera;
pub use player::{Player, GameMode};
