use std::time::Duration;

use tracing::{debug, info, trace};

use crate::model::{Block, BlockKind, Camera, GameMode, Player, WorldStore};
use crate::utils::WorldCoord;

/// Progress at which the target block is removed
pub const BREAK_COMPLETE: u8 = 100;

/// How far ahead of the avatar a new block is placed
pub const PLACE_REACH: i32 = 2;

/// Break target lifecycle.
///
/// The target is a position key, looked up in the store on every tick. The
/// progress timer lives inside the state, so replacing the state cancels it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Target acquired at progress 0, first step pending
    Targeting { target: WorldCoord, next_tick: Duration },
    Breaking { target: WorldCoord, progress: u8, next_tick: Duration },
}

/// Result of one progress step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was being broken
    Idle,
    Progressed(u8),
    /// Target reached full progress and was removed
    Broken(Block),
    /// Target disappeared before completion
    Dropped,
}

pub struct Interaction {
    state: InteractionState,
    period: Duration,
    step: u8,
}

impl Interaction {
    pub fn new(period: Duration, step: u8) -> Self {
        Self {
            state: InteractionState::Idle,
            period,
            step: step.max(1),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn target(&self) -> Option<WorldCoord> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Targeting { target, .. } | InteractionState::Breaking { target, .. } => Some(target),
        }
    }

    pub fn progress(&self) -> Option<u8> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Targeting { .. } => Some(0),
            InteractionState::Breaking { progress, .. } => Some(progress),
        }
    }

    /// Break progress of the block at `pos`, if it is the active target
    pub fn progress_at(&self, pos: &WorldCoord) -> Option<u8> {
        if self.target() == Some(*pos) { self.progress() } else { None }
    }

    /// When the next progress step fires
    pub fn next_due(&self) -> Option<Duration> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Targeting { next_tick, .. } | InteractionState::Breaking { next_tick, .. } => Some(next_tick),
        }
    }

    /// Start breaking the block directly ahead of the avatar.
    ///
    /// No-op while a target is active or when there is nothing ahead.
    pub fn break_intent(&mut self, world: &WorldStore, player: &Player, camera: &Camera, now: Duration) -> bool {
        if self.state != InteractionState::Idle {
            trace!("break intent ignored, target already active");
            return false;
        }

        let target = camera.cell_ahead(&player.pos, 1);
        match world.get(&target) {
            Some(block) => {
                self.state = InteractionState::Targeting { target, next_tick: now + self.period };
                info!("breaking {:?} at {:?}", block.kind, target);
                true
            }
            None => {
                trace!("break intent at {:?}: nothing there", target);
                false
            }
        }
    }

    /// Apply one progress step. The caller fires this when `next_due` has passed.
    pub fn tick(&mut self, world: &mut WorldStore) -> TickOutcome {
        let (target, progress, next_tick) = match self.state {
            InteractionState::Idle => return TickOutcome::Idle,
            InteractionState::Targeting { target, next_tick } => (target, 0, next_tick),
            InteractionState::Breaking { target, progress, next_tick } => (target, progress, next_tick),
        };

        if !world.contains(&target) {
            self.state = InteractionState::Idle;
            debug!("break target {:?} vanished", target);
            return TickOutcome::Dropped;
        }

        let progress = progress.saturating_add(self.step);
        if progress >= BREAK_COMPLETE {
            // removal and timer cancellation happen in the same step
            self.state = InteractionState::Idle;
            return match world.remove(&target) {
                Some(block) => {
                    info!("broke {:?} at {:?}", block.kind, target);
                    TickOutcome::Broken(block)
                }
                None => TickOutcome::Dropped,
            };
        }

        self.state = InteractionState::Breaking {
            target,
            progress,
            next_tick: next_tick + self.period,
        };
        TickOutcome::Progressed(progress)
    }

    /// Drop the target if its block is gone. Returns true if the target was dropped.
    pub fn release_if_missing(&mut self, world: &WorldStore) -> bool {
        match self.target() {
            Some(target) if !world.contains(&target) => {
                debug!("releasing break target {:?}", target);
                self.state = InteractionState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }
}

/// Place `kind` two cells ahead of the avatar. Creative mode only; never overwrites.
pub fn place_intent(
    world: &mut WorldStore,
    player: &Player,
    camera: &Camera,
    mode: GameMode,
    kind: BlockKind,
) -> bool {
    if !mode.can_place() {
        trace!("place intent ignored in {} mode", mode);
        return false;
    }
    if kind.is_air() {
        return false;
    }

    let pos = camera.cell_ahead(&player.pos, PLACE_REACH);
    if world.contains(&pos) {
        trace!("place intent at {:?}: occupied", pos);
        return false;
    }

    world.put(Block { kind, pos });
    info!("placed {:?} at {:?}", kind, pos);
    true
}
