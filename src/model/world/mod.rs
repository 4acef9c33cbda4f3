pub mod block;
pub mod store;
pub mod generator;

pub use block::{Block, BlockKind, Face, PLACEABLE};
pub use store::WorldStore;
pub use generator::{GeneratorConfig, WorldGenerator};
