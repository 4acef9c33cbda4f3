use std::collections::BTreeMap;

use tracing::trace;

use super::block::{Block, BlockKind};
use crate::utils::WorldCoord;

/// Sparse block storage keyed by position.
///
/// Absence of a key means air. Iteration follows key order, so two stores
/// holding the same blocks always iterate identically.
#[derive(Clone, Debug, Default)]
pub struct WorldStore {
    blocks: BTreeMap<WorldCoord, BlockKind>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the block at `block.pos`. Putting air removes.
    pub fn put(&mut self, block: Block) {
        if block.kind.is_air() {
            self.remove(&block.pos);
            return;
        }
        if let Some(previous) = self.blocks.insert(block.pos, block.kind) {
            trace!("overwrote {:?} at {:?} with {:?}", previous, block.pos, block.kind);
        }
    }

    /// Remove the block at `pos`, returning it if one was there
    pub fn remove(&mut self, pos: &WorldCoord) -> Option<Block> {
        self.blocks.remove(pos).map(|kind| Block { kind, pos: *pos })
    }

    pub fn get(&self, pos: &WorldCoord) -> Option<Block> {
        self.blocks.get(pos).map(|&kind| Block { kind, pos: *pos })
    }

    pub fn contains(&self, pos: &WorldCoord) -> bool {
        self.blocks.contains_key(pos)
    }

    pub fn all(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks.iter().map(|(&pos, &kind)| Block { kind, pos })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
