use std::env;
use std::time::Duration;

use tracing::warn;

use crate::model::{BlockKind, GameMode, GeneratorConfig};

/// Seed for world generation (u64)
pub const SEED_VAR: &str = "ISOCRAFT_SEED";
/// Starting game mode (`survival` or `creative`)
pub const MODE_VAR: &str = "ISOCRAFT_MODE";

/// Tunables for a game session
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub generator: GeneratorConfig,

    /// How long a jump hangs before the avatar drops back
    pub jump_fall_delay: Duration,
    /// Interval between break progress steps
    pub break_period: Duration,
    /// Progress added per step; a block breaks at 100
    pub break_step: u8,

    /// Pixels per block unit at the default zoom
    pub block_scale: f32,

    pub start_mode: GameMode,
    pub start_block: BlockKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            jump_fall_delay: Duration::from_millis(400),
            break_period: Duration::from_millis(100),
            break_step: 10,
            block_scale: 25.0,
            start_mode: GameMode::Survival,
            start_block: BlockKind::Grass,
        }
    }
}

impl GameConfig {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Defaults with overrides from a `?seed=..&mode=..` query string,
    /// the browser counterpart of the environment variables
    pub fn from_query(query: &str) -> Self {
        let param = |name: &str| {
            query
                .trim_start_matches('?')
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        };
        Self::default().with_overrides(|key| match key {
            SEED_VAR => param("seed"),
            MODE_VAR => param("mode"),
            _ => None,
        })
    }

    /// Apply overrides from `lookup`. Values that fail to parse are logged and skipped.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(SEED_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.generator.seed = Some(seed),
                Err(e) => warn!("ignoring {}={:?}: {}", SEED_VAR, raw, e),
            }
        }
        if let Some(raw) = lookup(MODE_VAR) {
            match raw.parse::<GameMode>() {
                Ok(mode) => self.start_mode = mode,
                Err(e) => warn!("ignoring {}={:?}: {}", MODE_VAR, raw, e),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.jump_fall_delay, Duration::from_millis(400));
        assert_eq!(config.break_period, Duration::from_millis(100));
        assert_eq!(config.break_step, 10);
        assert_eq!(config.start_mode, GameMode::Survival);
        assert!(config.generator.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = GameConfig::default().with_overrides(|key| match key {
            SEED_VAR => Some("1234".to_string()),
            MODE_VAR => Some("creative".to_string()),
            _ => None,
        });
        assert_eq!(config.generator.seed, Some(1234));
        assert_eq!(config.start_mode, GameMode::Creative);
    }

    #[test]
    fn test_query_overrides() {
        let config = GameConfig::from_query("?mode=creative&seed=42");
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.start_mode, GameMode::Creative);

        let config = GameConfig::from_query("");
        assert!(config.generator.seed.is_none());
        assert_eq!(config.start_mode, GameMode::Survival);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let config = GameConfig::default().with_overrides(|key| match key {
            SEED_VAR => Some("not-a-number".to_string()),
            MODE_VAR => Some("hardcore".to_string()),
            _ => None,
        });
        assert!(config.generator.seed.is_none());
        assert_eq!(config.start_mode, GameMode::Survival);
    }
}
