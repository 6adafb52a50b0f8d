//! Immutable templates used to construct units.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base stats of a unit before any interceptor applies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitBlueprint {
    /// Damage dealt per attack.
    pub attack: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Distance within which the unit may strike its target.
    pub attack_range: f32,
    /// Distance within which the unit acquires targets.
    pub aggro_range: f32,
    /// Starting and maximum health.
    pub health: f32,
    /// Milliseconds the unit stays inert after deployment.
    pub spawn_time_ms: u32,
    /// World units travelled per second.
    pub speed: f32,
    /// Width of the unit body.
    pub width: f32,
    /// Height of the unit body.
    pub height: f32,
}

impl UnitBlueprint {
    /// Time the unit spends in the spawning state.
    #[must_use]
    pub fn spawn_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.spawn_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_time_is_expressed_in_milliseconds() {
        let blueprint = UnitBlueprint {
            attack: 1.0,
            attack_speed: 1.0,
            attack_range: 1.0,
            aggro_range: 1.0,
            health: 1.0,
            spawn_time_ms: 1_500,
            speed: 1.0,
            width: 1.0,
            height: 1.0,
        };
        assert_eq!(blueprint.spawn_time(), Duration::from_millis(1_500));
    }
}
