//! Scenario files: teams, unit templates and a per-tick command script.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use skirmish_core::{CardId, Command, EntityId, GameConfig, UnitBlueprint, Vec2};
use skirmish_world::{SessionBlueprint, TeamBlueprint};

/// Match description loaded from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) config: GameConfig,
    #[serde(default)]
    units: BTreeMap<String, UnitBlueprint>,
    teams: Vec<TeamBlueprint>,
    #[serde(default)]
    deployments: Vec<Deployment>,
    #[serde(default)]
    card_plays: Vec<ScriptedCardPlay>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Deployment {
    tick: u64,
    player: EntityId,
    unit: String,
    position: Vec2,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptedCardPlay {
    tick: u64,
    player: EntityId,
    card: CardId,
    target: Vec2,
}

/// Commands to issue before the tick with the given index, in file order.
pub(crate) type Script = BTreeMap<u64, Vec<Command>>;

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub(crate) fn session_blueprint(&self) -> SessionBlueprint {
        SessionBlueprint {
            teams: self.teams.clone(),
        }
    }

    /// Resolves unit template names and groups the scripted commands by tick.
    pub(crate) fn script(&self) -> Result<Script> {
        let mut script = Script::new();
        for deployment in &self.deployments {
            let Some(blueprint) = self.units.get(&deployment.unit) else {
                bail!(
                    "deployment at tick {} names unknown unit `{}`",
                    deployment.tick,
                    deployment.unit
                );
            };
            script
                .entry(deployment.tick)
                .or_default()
                .push(Command::DeployUnit {
                    player: deployment.player.clone(),
                    blueprint: *blueprint,
                    position: deployment.position,
                });
        }
        for play in &self.card_plays {
            script.entry(play.tick).or_default().push(Command::PlayCard {
                player: play.player.clone(),
                card: play.card.clone(),
                target: play.target,
            });
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [units.scout]
        attack = 1.0
        attack_speed = 1.0
        attack_range = 1.0
        aggro_range = 2.0
        health = 10.0
        spawn_time_ms = 0
        speed = 1.0
        width = 0.5
        height = 0.5

        [[teams]]
        id = "blue"
        deploy_zone = { x = 0.0, y = -5.0, width = 10.0, height = 10.0 }
        [[teams.players]]
        id = "p1"
        inner_tower = { x = 0.0, y = -9.0 }
        mana = { initial = 0.0, capacity = 10.0, regen_rate = 1.0 }

        [[teams]]
        id = "red"
        deploy_zone = { x = 0.0, y = 5.0, width = 10.0, height = 10.0 }
        [[teams.players]]
        id = "p2"
        inner_tower = { x = 0.0, y = 9.0 }
        mana = { initial = 0.0, capacity = 10.0, regen_rate = 1.0 }

        [[deployments]]
        tick = 3
        player = "p1"
        unit = "scout"
        position = { x = 0.0, y = -2.0 }

        [[card_plays]]
        tick = 3
        player = "p2"
        card = "rally"
        target = { x = 0.0, y = 0.0 }
    "#;

    #[test]
    fn script_groups_commands_by_tick() {
        let scenario = Scenario::parse(MINIMAL).expect("valid scenario");
        assert_eq!(scenario.config, GameConfig::default());

        let script = scenario.script().expect("known units");
        assert_eq!(script.len(), 1);
        let commands = &script[&3];
        assert!(matches!(
            &commands[0],
            Command::DeployUnit { player, blueprint, .. }
                if player.as_str() == "p1" && blueprint.health == 10.0
        ));
        assert!(matches!(&commands[1], Command::PlayCard { card, .. } if card.as_str() == "rally"));
    }

    #[test]
    fn unknown_unit_templates_are_reported() {
        let contents = MINIMAL.replace("unit = \"scout\"", "unit = \"giant\"");
        let scenario = Scenario::parse(&contents).expect("valid scenario");
        let error = scenario.script().expect_err("unknown template");
        assert!(error.to_string().contains("giant"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let contents = format!("[config]\nticks_per_second = 0\n{MINIMAL}");
        assert!(Scenario::parse(&contents).is_err());
    }
}
