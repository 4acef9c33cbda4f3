use std::time::Duration;

use tracing::{debug, trace};

use crate::model::player::is_supported_at;
use crate::model::{Player, WorldStore};

/// Handles avatar movement: four-way steps gated by support, and single hops
/// that drop back after a fixed delay
pub struct MovementController {
    pub fall_delay: Duration,
    /// When the pending hop comes back down
    pending_fall: Option<Duration>,
}

impl MovementController {
    pub fn new(fall_delay: Duration) -> Self {
        Self {
            fall_delay,
            pending_fall: None,
        }
    }

    /// Step one cell along x or z. Diagonal or zero vectors are rejected, as is
    /// any step that would leave the avatar standing on air above the ground plane.
    pub fn step(&self, player: &mut Player, world: &WorldStore, dx: i32, dz: i32) -> bool {
        let is_unit = matches!((dx, dz), (0, 1) | (0, -1) | (1, 0) | (-1, 0));
        if !is_unit {
            trace!("rejected move ({}, {}): not a unit step", dx, dz);
            return false;
        }

        let destination = player.pos.offset(dx, 0, dz);
        if !is_supported_at(world, &destination) {
            trace!("rejected move to {:?}: no support", destination);
            return false;
        }

        player.pos = destination;
        true
    }

    /// Hop up one level if there is headroom. Ignored while a hop is in the air.
    pub fn jump(&mut self, player: &mut Player, world: &WorldStore, now: Duration) -> bool {
        if self.pending_fall.is_some() {
            trace!("jump ignored, already airborne");
            return false;
        }

        let head = player.pos.above();
        if world.contains(&head) {
            trace!("jump blocked by {:?}", head);
            return false;
        }

        player.pos = head;
        self.pending_fall = Some(now + self.fall_delay);
        debug!("jumped to {:?}", player.pos);
        true
    }

    pub fn fall_due(&self) -> Option<Duration> {
        self.pending_fall
    }

    pub fn is_airborne(&self) -> bool {
        self.pending_fall.is_some()
    }

    /// End the pending hop: drop until something supports the avatar
    pub fn land(&mut self, player: &mut Player, world: &WorldStore) -> bool {
        if self.pending_fall.take().is_none() {
            return false;
        }

        if drop_to_support(player, world) {
            debug!("landed at {:?}", player.pos);
            true
        } else {
            debug!("hop ended supported at {:?}", player.pos);
            false
        }
    }

    /// Re-seat a grounded avatar after the world changed under it. Mid-hop the
    /// pending fall takes care of it.
    pub fn settle(&self, player: &mut Player, world: &WorldStore) -> bool {
        if self.is_airborne() {
            return false;
        }

        let changed = drop_to_support(player, world);
        if changed {
            debug!("support removed, dropped to {:?}", player.pos);
        }
        changed
    }

    pub fn cancel(&mut self) {
        self.pending_fall = None;
    }
}

/// Lower the avatar through empty cells until it rests on a block or the ground plane
fn drop_to_support(player: &mut Player, world: &WorldStore) -> bool {
    let start = player.pos;
    while player.pos.1 > 0 && !is_supported_at(world, &player.pos) {
        player.pos = player.pos.below();
    }
    player.pos != start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind};
    use crate::utils::WorldCoord;

    const DELAY: Duration = Duration::from_millis(400);

    fn flat_world(extent: i32) -> WorldStore {
        let mut world = WorldStore::new();
        for x in -extent..=extent {
            for z in -extent..=extent {
                world.put(Block::new(BlockKind::Grass, (x, 0, z)));
            }
        }
        world
    }

    #[test]
    fn test_step_on_supported_ground() {
        let world = flat_world(2);
        let movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        assert!(movement.step(&mut player, &world, 1, 0));
        assert!(movement.step(&mut player, &world, 0, -1));
        assert_eq!(player.pos, WorldCoord(1, 1, -1));
    }

    #[test]
    fn test_step_off_ledge_rejected() {
        let world = flat_world(1);
        let movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(1, 1, 0));

        assert!(!movement.step(&mut player, &world, 1, 0));
        assert_eq!(player.pos, WorldCoord(1, 1, 0));
    }

    #[test]
    fn test_ground_plane_always_walkable() {
        let world = WorldStore::new();
        let movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 0, 0));

        for _ in 0..5 {
            assert!(movement.step(&mut player, &world, 0, 1));
        }
        assert_eq!(player.pos, WorldCoord(0, 0, 5));
    }

    #[test]
    fn test_non_unit_steps_rejected() {
        let world = flat_world(3);
        let movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        for (dx, dz) in [(1, 1), (0, 0), (2, 0), (0, -3), (-1, 1)] {
            assert!(!movement.step(&mut player, &world, dx, dz), "({dx}, {dz})");
        }
        assert_eq!(player.pos, WorldCoord(0, 1, 0));
    }

    #[test]
    fn test_jump_and_fall() {
        let world = flat_world(1);
        let mut movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        assert!(movement.jump(&mut player, &world, Duration::ZERO));
        assert_eq!(player.pos, WorldCoord(0, 2, 0));
        assert_eq!(movement.fall_due(), Some(DELAY));

        assert!(movement.land(&mut player, &world));
        assert_eq!(player.pos, WorldCoord(0, 1, 0));
        assert!(!movement.is_airborne());
        assert!(player.is_supported(&world));
    }

    #[test]
    fn test_jump_blocked_by_headroom() {
        let mut world = flat_world(1);
        world.put(Block::new(BlockKind::Leaves, (0, 2, 0)));
        let mut movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        assert!(!movement.jump(&mut player, &world, Duration::ZERO));
        assert_eq!(player.pos, WorldCoord(0, 1, 0));
        assert_eq!(movement.fall_due(), None);
    }

    #[test]
    fn test_second_jump_while_airborne_ignored() {
        let world = flat_world(1);
        let mut movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        movement.jump(&mut player, &world, Duration::ZERO);
        assert!(!movement.jump(&mut player, &world, Duration::from_millis(100)));
        assert_eq!(player.pos, WorldCoord(0, 2, 0));
        assert_eq!(movement.fall_due(), Some(DELAY), "fall timer not restarted");
    }

    #[test]
    fn test_hop_onto_block_stays_up() {
        let mut world = flat_world(2);
        world.put(Block::new(BlockKind::Stone, (1, 1, 0)));
        let mut movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        movement.jump(&mut player, &world, Duration::ZERO);
        assert!(movement.step(&mut player, &world, 1, 0), "stone supports the airborne step");
        assert!(!movement.land(&mut player, &world));
        assert_eq!(player.pos, WorldCoord(1, 2, 0));
        assert!(player.is_supported(&world));
    }

    #[test]
    fn test_settle_drops_to_next_support() {
        let mut world = flat_world(1);
        world.put(Block::new(BlockKind::Stone, (0, 1, 0)));
        world.put(Block::new(BlockKind::Stone, (0, 2, 0)));
        let movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 3, 0));

        world.remove(&WorldCoord(0, 2, 0));
        world.remove(&WorldCoord(0, 1, 0));
        assert!(movement.settle(&mut player, &world));
        assert_eq!(player.pos, WorldCoord(0, 1, 0));
        assert!(!movement.settle(&mut player, &world), "already supported");
    }

    #[test]
    fn test_settle_leaves_hop_alone() {
        let world = flat_world(1);
        let mut movement = MovementController::new(DELAY);
        let mut player = Player::new(WorldCoord(0, 1, 0));

        movement.jump(&mut player, &world, Duration::ZERO);
        assert!(!movement.settle(&mut player, &world));
        assert_eq!(player.pos, WorldCoord(0, 2, 0));
    }
}
