use crate::utils::WorldCoord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Air,
    Grass,
    Dirt,
    Stone,
    Log,
    Leaves,
    Water,
}

/// Kinds the player can pick from the hotbar, in hotbar order
pub const PLACEABLE: [BlockKind; 6] = [
    BlockKind::Grass,
    BlockKind::Dirt,
    BlockKind::Stone,
    BlockKind::Log,
    BlockKind::Leaves,
    BlockKind::Water,
];

/// Visible faces of an isometric block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Top,
    Left,
    Right,
}

impl BlockKind {
    pub fn is_air(self) -> bool {
        self == BlockKind::Air
    }

    /// Flat kinds render as a single top face
    pub fn is_flat(self) -> bool {
        self == BlockKind::Water
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "Air",
            BlockKind::Grass => "Grass",
            BlockKind::Dirt => "Dirt",
            BlockKind::Stone => "Stone",
            BlockKind::Log => "Log",
            BlockKind::Leaves => "Leaves",
            BlockKind::Water => "Water",
        }
    }

    /// Base colour as RGB bytes
    pub fn base_rgb(self) -> [u8; 3] {
        match self {
            BlockKind::Air => [0, 0, 0],
            BlockKind::Grass => [0x10, 0xB9, 0x81],
            BlockKind::Dirt => [0x8B, 0x5A, 0x2B],
            BlockKind::Stone => [0x6B, 0x72, 0x80],
            BlockKind::Log => [0x92, 0x40, 0x0E],
            BlockKind::Leaves => [0x05, 0x96, 0x69],
            BlockKind::Water => [0x0E, 0xA5, 0xE9],
        }
    }

    /// Shaded colour of one face, side faces darkened
    pub fn face_rgb(self, face: Face) -> [u8; 3] {
        let brightness = match face {
            Face::Top => 1.0,
            Face::Left => 0.8,
            Face::Right => 0.6,
        };
        let [r, g, b] = self.base_rgb();
        [
            (r as f32 * brightness) as u8,
            (g as f32 * brightness) as u8,
            (b as f32 * brightness) as u8,
        ]
    }

    /// Next/previous kind in hotbar order, wrapping around
    pub fn cycle(self, forward: bool) -> Self {
        let current_idx = PLACEABLE.iter().position(|&k| k == self).unwrap_or(0);
        let next_idx = if forward {
            if current_idx < PLACEABLE.len() - 1 { current_idx + 1 } else { 0 }
        } else {
            if current_idx > 0 { current_idx - 1 } else { PLACEABLE.len() - 1 }
        };
        PLACEABLE[next_idx]
    }
}

/// A placed block. Air is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub pos: WorldCoord,
}

impl Block {
    pub fn new(kind: BlockKind, pos: impl Into<WorldCoord>) -> Self {
        Self { kind, pos: pos.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_faces_are_darker() {
        let top = BlockKind::Stone.face_rgb(Face::Top);
        let left = BlockKind::Stone.face_rgb(Face::Left);
        let right = BlockKind::Stone.face_rgb(Face::Right);
        assert_eq!(top, BlockKind::Stone.base_rgb());
        assert!(left[0] < top[0] && right[0] < left[0]);
    }

    #[test]
    fn test_cycle_wraps_and_skips_air() {
        assert_eq!(BlockKind::Grass.cycle(false), BlockKind::Water);
        assert_eq!(BlockKind::Water.cycle(true), BlockKind::Grass);
        assert_eq!(BlockKind::Air.cycle(true), BlockKind::Dirt);

        let mut kind = BlockKind::Grass;
        for _ in 0..PLACEABLE.len() {
            kind = kind.cycle(true);
            assert!(!kind.is_air());
        }
        assert_eq!(kind, BlockKind::Grass);
    }
}
