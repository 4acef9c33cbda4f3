use std::time::Duration;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::input::Intent;
use crate::controller::interaction::{self, Interaction, TickOutcome};
use crate::controller::movement::MovementController;
use crate::model::{Block, BlockKind, Camera, GameMode, Player, WorldGenerator, WorldStore};
use crate::utils::WorldCoord;

/// One world session: the block store, avatar, camera, interaction state and
/// the logical clock that drives timed transitions.
///
/// All mutation goes through `apply` and `update`, so a shared borrow of the
/// session is always a consistent snapshot for rendering.
pub struct Session {
    config: GameConfig,
    generator: WorldGenerator,
    world: WorldStore,
    player: Player,
    camera: Camera,
    interaction: Interaction,
    movement: MovementController,
    camera_controller: CameraController,
    mode: GameMode,
    selected: BlockKind,
    now: Duration,
    seed: Option<u64>,
}

impl Session {
    /// Start a session on a freshly generated world
    pub fn new(config: GameConfig) -> Self {
        let mut session = Self::with_world(config, WorldStore::new());
        session.new_world();
        session
    }

    /// Start a session on an existing world, avatar at spawn
    pub fn with_world(config: GameConfig, world: WorldStore) -> Self {
        Self {
            generator: WorldGenerator::with_config(config.generator),
            world,
            player: Player::default(),
            camera: Camera::new(),
            interaction: Interaction::new(config.break_period, config.break_step),
            movement: MovementController::new(config.jump_fall_delay),
            camera_controller: CameraController::new(),
            mode: config.start_mode,
            selected: config.start_block,
            now: Duration::ZERO,
            seed: None,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldStore {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Block kind the next placement uses
    pub fn selected(&self) -> BlockKind {
        self.selected
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Seed of the current world, if it was generated
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_airborne(&self) -> bool {
        self.movement.is_airborne()
    }

    /// Handle one intent from the hosting shell. Returns true if anything changed.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Move { dx, dz } => self.movement.step(&mut self.player, &self.world, dx, dz),
            Intent::Jump => self.movement.jump(&mut self.player, &self.world, self.now),
            Intent::Break => self.interaction.break_intent(&self.world, &self.player, &self.camera, self.now),
            Intent::Place => {
                interaction::place_intent(&mut self.world, &self.player, &self.camera, self.mode, self.selected)
            }
            Intent::ToggleMode => {
                self.mode = self.mode.toggled();
                info!("game mode: {}", self.mode);
                true
            }
            Intent::SelectBlock(kind) => {
                if kind.is_air() || kind == self.selected {
                    return false;
                }
                self.selected = kind;
                true
            }
            Intent::CycleBlock { forward } => {
                self.selected = self.selected.cycle(forward);
                true
            }
            Intent::RotateCamera(steps) => {
                self.camera_controller.rotate(&mut self.camera, steps);
                steps != 0
            }
            Intent::Zoom(steps) => {
                let before = self.camera.distance;
                self.camera_controller.zoom(&mut self.camera, steps);
                self.camera.distance != before
            }
            Intent::NewWorld => {
                self.new_world();
                true
            }
        }
    }

    /// Advance the clock by `dt` and fire every timer that came due, oldest first.
    /// Returns true if anything changed.
    pub fn update(&mut self, dt: Duration) -> bool {
        self.now += dt;
        let mut changed = false;

        loop {
            let fall = self.movement.fall_due().filter(|&due| due <= self.now);
            let tick = self.interaction.next_due().filter(|&due| due <= self.now);

            match (fall, tick) {
                (None, None) => break,
                (Some(fall), Some(tick)) if tick < fall => self.fire_break_tick(),
                (Some(_), _) => {
                    self.movement.land(&mut self.player, &self.world);
                }
                (None, Some(_)) => self.fire_break_tick(),
            }
            changed = true;
        }

        changed
    }

    /// Remove a block by any route other than breaking, keeping the target valid
    pub fn remove_block(&mut self, pos: &WorldCoord) -> Option<Block> {
        let removed = self.world.remove(pos);
        self.interaction.release_if_missing(&self.world);
        self.movement.settle(&mut self.player, &self.world);
        removed
    }

    /// Throw the world away and generate a new one. Cancels every pending timer.
    pub fn new_world(&mut self) {
        self.interaction.reset();
        self.movement.cancel();
        self.world.clear();
        self.seed = Some(self.generator.populate(&mut self.world));
        self.player = Player::default();
        info!("new world ready, avatar at {:?}", self.player.pos);
    }

    fn fire_break_tick(&mut self) {
        match self.interaction.tick(&mut self.world) {
            TickOutcome::Progressed(progress) => debug!("break progress {}", progress),
            TickOutcome::Broken(_) => {
                self.movement.settle(&mut self.player, &self.world);
            }
            _ => {}
        }
    }
}
