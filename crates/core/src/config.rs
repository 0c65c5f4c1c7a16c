//! Game configuration - board size, undo budget and rule variants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    BASE_TILE_VALUE, DEFAULT_GRID_SIZE, DEFAULT_UNDOS, MAX_TILE_VALUE, MAX_UNDOS,
    SUPPORTED_GRID_SIZES,
};

/// Per-game settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: u8,
    pub initial_undos: u8,
    pub max_undos: u8,
    pub base_value: u32,
    /// Rule variant: a scoring slide lets the player skip back to placing.
    /// Off under the standard rules.
    pub allow_skip_slide: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_undos: DEFAULT_UNDOS,
            max_undos: MAX_UNDOS,
            base_value: BASE_TILE_VALUE,
            allow_skip_slide: false,
        }
    }
}

impl GameConfig {
    /// Standard rules on a board of the given size
    pub fn with_grid_size(grid_size: u8) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Create from environment variables, falling back to defaults for
    /// anything missing or unparsable
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let grid_size = env::var("TETROMERGE_GRID_SIZE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|size| SUPPORTED_GRID_SIZES.contains(size))
            .unwrap_or(defaults.grid_size);

        let initial_undos = env::var("TETROMERGE_INITIAL_UNDOS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| *n <= defaults.max_undos)
            .unwrap_or(defaults.initial_undos);

        let allow_skip_slide = env::var("TETROMERGE_ALLOW_SKIP_SLIDE")
            .ok()
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.allow_skip_slide);

        Self {
            grid_size,
            initial_undos,
            allow_skip_slide,
            ..defaults
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_GRID_SIZES.contains(&self.grid_size) {
            return Err(ConfigError::UnsupportedGridSize(self.grid_size));
        }
        if self.max_undos > MAX_UNDOS {
            return Err(ConfigError::MaxUndosOverLimit {
                max: self.max_undos,
                limit: MAX_UNDOS,
            });
        }
        if self.initial_undos > self.max_undos {
            return Err(ConfigError::UndosOverCap {
                initial: self.initial_undos,
                max: self.max_undos,
            });
        }
        if !self.base_value.is_power_of_two() {
            return Err(ConfigError::InvalidBaseValue(self.base_value));
        }
        if self.base_value > MAX_TILE_VALUE {
            return Err(ConfigError::BaseValueOverCap(self.base_value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.initial_undos, 3);
        assert_eq!(config.max_undos, 99);
        assert!(!config.allow_skip_slide);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_unsupported_size() {
        let config = GameConfig::with_grid_size(6);
        assert_eq!(config.validate(), Err(ConfigError::UnsupportedGridSize(6)));
    }

    #[test]
    fn rejects_undos_over_cap() {
        let config = GameConfig {
            initial_undos: 10,
            max_undos: 5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UndosOverCap { .. })
        ));
    }

    #[test]
    fn rejects_undo_cap_above_limit() {
        let config: GameConfig = serde_json::from_str(r#"{"max_undos": 200}"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxUndosOverLimit {
                max: 200,
                limit: 99
            })
        );
    }

    #[test]
    fn rejects_base_value_over_cap() {
        let config = GameConfig {
            base_value: 1 << 31,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BaseValueOverCap(1 << 31)));

        let config = GameConfig {
            base_value: MAX_TILE_VALUE,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"grid_size": 8}"#).unwrap();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.initial_undos, 3);
    }
}
