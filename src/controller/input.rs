/// Platform-agnostic input handling: raw keys and buttons become intents
use crate::model::BlockKind;
use crate::model::world::PLACEABLE;

/// Everything the hosting shell can ask of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Four-directional step; (dx, dz) must be a unit axis vector
    Move { dx: i32, dz: i32 },
    Jump,
    Break,
    Place,
    ToggleMode,
    SelectBlock(BlockKind),
    CycleBlock { forward: bool },
    /// Turn the camera by whole rotate steps
    RotateCamera(i32),
    /// Positive zooms in
    Zoom(i32),
    NewWorld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Key mapping configuration
#[derive(Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub break_block: String,
    pub place: String,
    pub rotate_left: String,
    pub rotate_right: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub toggle_mode: String,
    pub new_world: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            jump: " ".to_string(),
            break_block: "f".to_string(),
            place: "e".to_string(),
            rotate_left: "q".to_string(),
            rotate_right: "r".to_string(),
            zoom_in: "=".to_string(),
            zoom_out: "-".to_string(),
            toggle_mode: "m".to_string(),
            new_world: "n".to_string(),
        }
    }
}

/// High-level input processor
#[derive(Clone)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Intent for a key press, by key name ("w", "ArrowUp", " ", ...)
    pub fn intent_for_key(&self, key: &str) -> Option<Intent> {
        let is = |binding: &str| key.eq_ignore_ascii_case(binding);

        if is(&self.bindings.forward) || key == "ArrowUp" {
            Some(Intent::Move { dx: 0, dz: 1 })
        } else if is(&self.bindings.backward) || key == "ArrowDown" {
            Some(Intent::Move { dx: 0, dz: -1 })
        } else if is(&self.bindings.left) || key == "ArrowLeft" {
            Some(Intent::Move { dx: -1, dz: 0 })
        } else if is(&self.bindings.right) || key == "ArrowRight" {
            Some(Intent::Move { dx: 1, dz: 0 })
        } else if is(&self.bindings.jump) {
            Some(Intent::Jump)
        } else if is(&self.bindings.break_block) {
            Some(Intent::Break)
        } else if is(&self.bindings.place) {
            Some(Intent::Place)
        } else if is(&self.bindings.rotate_left) {
            Some(Intent::RotateCamera(-1))
        } else if is(&self.bindings.rotate_right) {
            Some(Intent::RotateCamera(1))
        } else if is(&self.bindings.zoom_in) || key == "+" {
            Some(Intent::Zoom(1))
        } else if is(&self.bindings.zoom_out) {
            Some(Intent::Zoom(-1))
        } else if is(&self.bindings.toggle_mode) {
            Some(Intent::ToggleMode)
        } else if is(&self.bindings.new_world) {
            Some(Intent::NewWorld)
        } else {
            self.block_from_key(key).map(Intent::SelectBlock)
        }
    }

    pub fn intent_for_click(&self, button: MouseButton) -> Option<Intent> {
        match button {
            MouseButton::Left => Some(Intent::Break),
            MouseButton::Right => Some(Intent::Place),
            MouseButton::Middle => None,
        }
    }

    /// Wheel down selects the next block, wheel up the previous one
    pub fn intent_for_wheel(&self, delta_y: f32) -> Option<Intent> {
        if delta_y > 0.0 {
            Some(Intent::CycleBlock { forward: true })
        } else if delta_y < 0.0 {
            Some(Intent::CycleBlock { forward: false })
        } else {
            None
        }
    }

    /// Number keys 1..=6 pick from the hotbar
    pub fn block_from_key(&self, key: &str) -> Option<BlockKind> {
        let digit: usize = key.parse().ok()?;
        PLACEABLE.get(digit.checked_sub(1)?).copied()
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let input = InputProcessor::default();
        assert_eq!(input.intent_for_key("w"), Some(Intent::Move { dx: 0, dz: 1 }));
        assert_eq!(input.intent_for_key("W"), Some(Intent::Move { dx: 0, dz: 1 }));
        assert_eq!(input.intent_for_key("ArrowLeft"), Some(Intent::Move { dx: -1, dz: 0 }));
        assert_eq!(input.intent_for_key(" "), Some(Intent::Jump));
        assert_eq!(input.intent_for_key("x"), None);
    }

    #[test]
    fn test_block_selection_keys() {
        let input = InputProcessor::default();
        assert_eq!(input.intent_for_key("1"), Some(Intent::SelectBlock(BlockKind::Grass)));
        assert_eq!(input.intent_for_key("6"), Some(Intent::SelectBlock(BlockKind::Water)));
        assert_eq!(input.intent_for_key("0"), None);
        assert_eq!(input.intent_for_key("7"), None);
    }

    #[test]
    fn test_mouse_intents() {
        let input = InputProcessor::default();
        assert_eq!(input.intent_for_click(MouseButton::Left), Some(Intent::Break));
        assert_eq!(input.intent_for_click(MouseButton::Right), Some(Intent::Place));
        assert_eq!(input.intent_for_wheel(3.0), Some(Intent::CycleBlock { forward: true }));
        assert_eq!(input.intent_for_wheel(0.0), None);
    }
}
