use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::MAX_TILE;

/// What happens to the win notification once the player chooses to keep
/// playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRearm {
    /// The win fires once per session; continuing never re-arms it.
    #[default]
    Once,
    /// Continuing clears the win latch and leaves the session not marked as
    /// continuing, so the next effective move that still shows the win tile
    /// reports a win again.
    AfterContinue,
}

/// Rule knobs for an [`Engine`](crate::Engine).
///
/// ```toml
/// win_tile = 2048
/// win_rearm = "once"
/// four_probability = 0.1
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tile value that wins the game.
    #[serde(default = "defaults::win_tile")]
    pub win_tile: u32,

    #[serde(default)]
    pub win_rearm: WinRearm,

    /// Chance that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_tile: defaults::win_tile(),
            win_rearm: WinRearm::default(),
            four_probability: defaults::four_probability(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_win_tile(mut self, win_tile: u32) -> Self {
        self.win_tile = win_tile;
        self
    }

    /// Check the values a TOML file or caller may have gotten wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_tile < 4 || self.win_tile > MAX_TILE || !self.win_tile.is_power_of_two() {
            return Err(ConfigError::InvalidWinTile(self.win_tile));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(ConfigError::InvalidFourProbability(self.four_probability));
        }
        Ok(())
    }
}

mod defaults {
    pub fn win_tile() -> u32 { 2048 }
    pub fn four_probability() -> f64 { 0.1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_canonical() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.win_tile, 2048);
        assert_eq!(cfg.win_rearm, WinRearm::Once);
        assert_eq!(cfg.four_probability, 0.1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            win_tile = 8
            win_rearm = "after_continue"
            four_probability = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.win_tile, 8);
        assert_eq!(cfg.win_rearm, WinRearm::AfterContinue);
        assert_eq!(cfg.four_probability, 0.0);
    }

    #[test]
    fn test_rejects_bad_win_tile() {
        for bad in [0, 2, 3, 100, MAX_TILE * 2] {
            let err = EngineConfig::default().with_win_tile(bad).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidWinTile(v) if v == bad));
        }
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = EngineConfig::from_toml_str("four_probability = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFourProbability(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("win_tile = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_toml("/nonexistent/merge-2048.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
