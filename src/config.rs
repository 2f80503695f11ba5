//! Tunables for training and round pacing.

use crate::error::GameError;

/// Game tuning. Defaults reproduce the classic pacing: 100 samples per class,
/// a 3 second countdown at 60 frames per second, bluff glyph every 5th frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct GameConfig {
    /// Maximum captured samples per gesture class.
    pub sample_cap: u32,
    pub countdown_seconds: u32,
    /// Display refreshes that make up one countdown second.
    pub ticks_per_second: u32,
    /// The opponent bluff glyph changes every `bluff_every` ticks.
    pub bluff_every: u32,
    /// k for the nearest-neighbor vote.
    pub neighbors: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sample_cap: 100,
            countdown_seconds: 3,
            ticks_per_second: 60,
            bluff_every: 5,
            neighbors: 3,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        let zero_field = [
            ("sample_cap", self.sample_cap as usize),
            ("countdown_seconds", self.countdown_seconds as usize),
            ("ticks_per_second", self.ticks_per_second as usize),
            ("bluff_every", self.bluff_every as usize),
            ("neighbors", self.neighbors),
        ]
        .into_iter()
        .find(|(_, v)| *v == 0);
        match zero_field {
            Some((name, _)) => Err(GameError::InvalidConfig(format!("{name} must be greater than zero"))),
            None => Ok(()),
        }
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.countdown_seconds * cfg.ticks_per_second, 180);
    }

    #[test]
    fn test_zero_fields_rejected() {
        let cfg = GameConfig { ticks_per_second: 0, ..GameConfig::default() };
        match cfg.validate() {
            Err(GameError::InvalidConfig(msg)) => assert!(msg.contains("ticks_per_second")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "sample_cap": 20 }"#).unwrap();
        assert_eq!(cfg.sample_cap, 20);
        assert_eq!(cfg.countdown_seconds, 3);
        assert!(GameConfig::from_json(r#"{ "neighbors": 0 }"#).is_err());
        assert!(GameConfig::from_json("not json").is_err());
    }
}
