// generator.rs - one-shot population of a fresh world
//
// The world is generated in three passes, later passes overwriting earlier
// ones where they overlap:
//
// PASS 1: Terrain
//   → Grass at y=0 and Dirt at y=-1 over the whole square
//   → Stone at y=-2 under a random subset of columns
//
// PASS 2: Trees
//   → Log column from y=1 up to the trunk height
//   → Leaves in a diamond-shaped canopy around the top log
//
// PASS 3: Water
//   → Round pool at y=0, off to one side of the spawn area
//

use tracing::{debug, info};

use super::block::{Block, BlockKind};
use super::store::WorldStore;
use crate::model::player::SPAWN;

/// Canopy neighbourhood around the top log
pub const CANOPY_RADIUS: i32 = 2;
pub const CANOPY_HEIGHT: i32 = 2;

/// Parameters for world generation
///
/// Usage:
///   // Reproducible world
///   let mut config = GeneratorConfig::default();
///   config.seed = Some(42);
///   let generator = WorldGenerator::with_config(config);
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// Terrain covers x, z in [-terrain_extent, terrain_extent]
    pub terrain_extent: i32,
    /// Probability that a column gets the extra stone layer
    pub stone_chance: f32,

    pub tree_count: u32,
    /// Trunks are placed with x, z in [-tree_extent, tree_extent). Raised to 1 if smaller.
    pub tree_extent: i32,
    /// Raised to 1 if smaller
    pub min_trunk_height: i32,
    /// Raised to `min_trunk_height` if smaller
    pub max_trunk_height: i32,

    pub pool_center: (i32, i32),
    pub pool_radius: i32,

    /// `None` draws a fresh seed per world
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            terrain_extent: 8,
            stone_chance: 0.6,
            tree_count: 8,
            tree_extent: 5,
            min_trunk_height: 4,
            max_trunk_height: 5,
            pool_center: (11, 11),
            pool_radius: 3,
            seed: None,
        }
    }
}

pub struct WorldGenerator {
    config: GeneratorConfig,
}

impl WorldGenerator {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Populate `store` and return the seed that was used
    pub fn populate(&self, store: &mut WorldStore) -> u64 {
        let seed = self.config.seed.unwrap_or_else(|| fastrand::u64(..));
        let mut rng = fastrand::Rng::with_seed(seed);

        self.place_terrain(store, &mut rng);
        for _ in 0..self.config.tree_count {
            self.plant_tree(store, &mut rng);
        }
        self.place_pool(store);

        info!("generated world: {} blocks (seed {})", store.len(), seed);
        seed
    }

    fn place_terrain(&self, store: &mut WorldStore, rng: &mut fastrand::Rng) {
        let extent = self.config.terrain_extent;
        for x in -extent..=extent {
            for z in -extent..=extent {
                store.put(Block::new(BlockKind::Grass, (x, 0, z)));
                store.put(Block::new(BlockKind::Dirt, (x, -1, z)));
                if rng.f32() < self.config.stone_chance {
                    store.put(Block::new(BlockKind::Stone, (x, -2, z)));
                }
            }
        }
    }

    fn plant_tree(&self, store: &mut WorldStore, rng: &mut fastrand::Rng) {
        let extent = self.config.tree_extent.max(1);
        // keep the spawn column free of trunks
        let (tree_x, tree_z) = loop {
            let candidate = (rng.i32(-extent..extent), rng.i32(-extent..extent));
            if candidate != (SPAWN.0, SPAWN.2) {
                break candidate;
            }
        };
        let min_height = self.config.min_trunk_height.max(1);
        let trunk_height = rng.i32(min_height..=self.config.max_trunk_height.max(min_height));

        for y in 1..=trunk_height {
            store.put(Block::new(BlockKind::Log, (tree_x, y, tree_z)));
        }

        for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
                for dy in 0..=CANOPY_HEIGHT {
                    // top log stays a log
                    if dx == 0 && dz == 0 && dy == 0 {
                        continue;
                    }
                    if dx.abs() + dz.abs() + dy < 4 {
                        store.put(Block::new(
                            BlockKind::Leaves,
                            (tree_x + dx, trunk_height + dy, tree_z + dz),
                        ));
                    }
                }
            }
        }

        debug!("tree at ({}, {}) with trunk height {}", tree_x, tree_z, trunk_height);
    }

    fn place_pool(&self, store: &mut WorldStore) {
        let (center_x, center_z) = self.config.pool_center;
        let r = self.config.pool_radius;
        for x in -r..=r {
            for z in -r..=r {
                if x * x + z * z < r * r {
                    store.put(Block::new(BlockKind::Water, (center_x + x, 0, center_z + z)));
                }
            }
        }
    }
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::WorldCoord;

    fn seeded(seed: u64) -> (GeneratorConfig, WorldStore) {
        let config = GeneratorConfig { seed: Some(seed), ..GeneratorConfig::default() };
        let mut store = WorldStore::new();
        WorldGenerator::with_config(config).populate(&mut store);
        (config, store)
    }

    #[test]
    fn test_same_seed_same_world() {
        let (_, a) = seeded(7);
        let (_, b) = seeded(7);
        let blocks_a: Vec<_> = a.all().collect();
        let blocks_b: Vec<_> = b.all().collect();
        assert_eq!(blocks_a, blocks_b);
    }

    #[test]
    fn test_populate_returns_configured_seed() {
        let config = GeneratorConfig { seed: Some(99), ..GeneratorConfig::default() };
        let mut store = WorldStore::new();
        assert_eq!(WorldGenerator::with_config(config).populate(&mut store), 99);
    }

    #[test]
    fn test_terrain_layers() {
        let (config, store) = seeded(1);
        let e = config.terrain_extent;
        let (cx, cz) = config.pool_center;
        let r = config.pool_radius;
        for x in -e..=e {
            for z in -e..=e {
                let in_pool = (x - cx).pow(2) + (z - cz).pow(2) < r * r;
                let top = store.get(&WorldCoord(x, 0, z)).map(|b| b.kind);
                let expected = if in_pool { BlockKind::Water } else { BlockKind::Grass };
                assert_eq!(top, Some(expected), "surface at ({x}, {z})");
                assert_eq!(store.get(&WorldCoord(x, -1, z)).map(|b| b.kind), Some(BlockKind::Dirt));
            }
        }
    }

    #[test]
    fn test_stone_layer_is_partial() {
        // with 289 columns, a 60% layer is neither empty nor complete
        let (config, store) = seeded(3);
        let e = config.terrain_extent;
        let columns = ((2 * e + 1) * (2 * e + 1)) as usize;
        let stones = store
            .all()
            .filter(|b| b.pos.1 == -2)
            .inspect(|b| assert_eq!(b.kind, BlockKind::Stone))
            .count();
        assert!(stones > columns / 3, "too few stones: {stones}");
        assert!(stones < columns, "stone layer should have gaps");
    }

    #[test]
    fn test_generation_bounds() {
        for seed in 0..20 {
            let (config, store) = seeded(seed);
            let e = config.terrain_extent;
            let (cx, cz) = config.pool_center;
            let r = config.pool_radius;
            let reach = config.tree_extent + CANOPY_RADIUS;

            for block in store.all() {
                let WorldCoord(x, y, z) = block.pos;
                match block.kind {
                    BlockKind::Grass | BlockKind::Dirt | BlockKind::Stone => {
                        assert!((-2..=0).contains(&y), "{block:?}");
                        assert!(x.abs() <= e && z.abs() <= e, "{block:?}");
                    }
                    BlockKind::Log => {
                        assert!((1..=config.max_trunk_height).contains(&y), "{block:?}");
                        assert!(x >= -config.tree_extent && x < config.tree_extent, "{block:?}");
                        assert!(z >= -config.tree_extent && z < config.tree_extent, "{block:?}");
                    }
                    BlockKind::Leaves => {
                        assert!(y >= config.min_trunk_height, "{block:?}");
                        assert!(y <= config.max_trunk_height + CANOPY_HEIGHT, "{block:?}");
                        assert!(x >= -reach && x < reach, "{block:?}");
                        assert!(z >= -reach && z < reach, "{block:?}");
                    }
                    BlockKind::Water => {
                        assert_eq!(y, 0);
                        assert!((x - cx).pow(2) + (z - cz).pow(2) < r * r, "{block:?}");
                    }
                    BlockKind::Air => panic!("air stored at {:?}", block.pos),
                }
            }
        }
    }

    #[test]
    fn test_spawn_column_has_no_trunk() {
        for seed in 0..50 {
            let (_, store) = seeded(seed);
            for y in 1..=2 {
                let pos = WorldCoord(SPAWN.0, y, SPAWN.2);
                assert_ne!(store.get(&pos).map(|b| b.kind), Some(BlockKind::Log), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_single_tree_canopy_neighbourhood() {
        let config = GeneratorConfig {
            tree_count: 1,
            seed: Some(11),
            ..GeneratorConfig::default()
        };
        let mut store = WorldStore::new();
        WorldGenerator::with_config(config).populate(&mut store);

        let logs: Vec<_> = store.all().filter(|b| b.kind == BlockKind::Log).collect();
        let top = logs.iter().max_by_key(|b| b.pos.1).expect("tree has a trunk");
        assert_eq!(logs.len() as i32, top.pos.1, "trunk runs from y=1 to the top");

        let leaves: Vec<_> = store.all().filter(|b| b.kind == BlockKind::Leaves).collect();
        assert!(!leaves.is_empty());
        for leaf in leaves {
            let dx = leaf.pos.0 - top.pos.0;
            let dz = leaf.pos.2 - top.pos.2;
            let dy = leaf.pos.1 - top.pos.1;
            assert!(dx.abs() <= CANOPY_RADIUS && dz.abs() <= CANOPY_RADIUS, "{leaf:?}");
            assert!((0..=CANOPY_HEIGHT).contains(&dy), "{leaf:?}");
            assert!(dx.abs() + dz.abs() + dy < 4, "{leaf:?}");
        }
    }

    #[test]
    fn test_degenerate_tree_settings_are_clamped() {
        let config = GeneratorConfig {
            seed: Some(3),
            tree_extent: 0,
            min_trunk_height: 6,
            max_trunk_height: 2,
            ..GeneratorConfig::default()
        };
        let mut store = WorldStore::new();
        WorldGenerator::with_config(config).populate(&mut store);

        // trunks use the minimum height and stay next to spawn
        let logs: Vec<WorldCoord> = store.all().filter(|b| b.kind == BlockKind::Log).map(|b| b.pos).collect();
        assert_eq!(logs.iter().map(|p| p.1).max(), Some(6));
        for pos in &logs {
            assert!((-1..1).contains(&pos.0) && (-1..1).contains(&pos.2), "{:?}", pos);
            assert!((1..=6).contains(&pos.1));
        }
        assert!(!store.contains(&WorldCoord(SPAWN.0, 1, SPAWN.2)));
    }
}
