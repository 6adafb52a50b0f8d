//! Load-time constants that parameterise a match.

use std::time::Duration;

use serde::Deserialize;

use crate::ConfigError;

/// Stat preset shared by every tower of one tier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TowerPreset {
    /// Damage dealt per attack.
    pub attack: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Starting and maximum health.
    pub health: f32,
    /// Distance within which the tower can strike.
    pub attack_range: f32,
}

/// Configuration surface of the simulation.
///
/// Values are read once when a session is created; nothing mutates them
/// while a match runs.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical simulation rate driven by the host loop.
    pub ticks_per_second: u32,
    /// Width of every tower body.
    pub tower_width: f32,
    /// Height of every tower body.
    pub tower_height: f32,
    /// Preset applied to the single inner tower of each player.
    pub inner_tower: TowerPreset,
    /// Preset applied to every outer tower.
    pub outer_tower: TowerPreset,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 20,
            tower_width: 1.0,
            tower_height: 1.0,
            inner_tower: TowerPreset {
                attack: 15.0,
                attack_speed: 1.0,
                health: 800.0,
                attack_range: 1.0,
            },
            outer_tower: TowerPreset {
                attack: 10.0,
                attack_speed: 0.8,
                health: 500.0,
                attack_range: 1.5,
            },
        }
    }
}

impl GameConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// Missing fields fall back to [`GameConfig::default`].
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value lies within its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid {
                field: "ticks_per_second",
                reason: "must be positive",
            });
        }
        if !(self.tower_width > 0.0 && self.tower_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tower_width/tower_height",
                reason: "must be positive",
            });
        }
        validate_preset(&self.inner_tower, "inner_tower")?;
        validate_preset(&self.outer_tower, "outer_tower")
    }

    /// Duration of a single simulation tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

fn validate_preset(preset: &TowerPreset, field: &'static str) -> Result<(), ConfigError> {
    let values = [
        preset.attack,
        preset.attack_speed,
        preset.health,
        preset.attack_range,
    ];
    if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(ConfigError::Invalid {
            field,
            reason: "stats must be finite and non-negative",
        });
    }
    if preset.health <= 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "health must be positive",
        });
    }
    Ok(())
}
