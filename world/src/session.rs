//! Root of the simulation: owns the teams and fans out every tick.

use std::time::Duration;

use serde::Deserialize;
use skirmish_core::{
    CardId, CardRejection, DeployRejection, EntityId, Event, GameConfig, SerializedSession,
    SessionError, TargetView, UnitBlueprint, Vec2,
};
use tracing::{debug, info};

use crate::{
    combat::Engagement,
    player::Player,
    team::{Team, TeamBlueprint},
    unit::unit_states,
};

/// Shape of the input used to create a session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionBlueprint {
    /// Teams in fan-out order.
    pub teams: Vec<TeamBlueprint>,
}

/// Deterministic match between two or more teams.
///
/// Each tick visits the teams in session order and the players of each team
/// in insertion order. A player's whole turn completes, and its strikes are
/// applied, before the next player acts; this order decides simultaneous
/// kills. Players of a defeated team no longer take turns. The match ends as
/// soon as a single team keeps an inner tower.
///
/// Mutating methods append what happened to the caller's `out_events`; the
/// session itself keeps no event backlog.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    teams: Vec<Team>,
    tick: u64,
    winner: Option<EntityId>,
}

impl Session {
    /// Creates a session from blueprints.
    pub fn new(config: GameConfig, blueprint: &SessionBlueprint) -> Result<Self, SessionError> {
        let teams = blueprint
            .teams
            .iter()
            .map(|team| Team::from_blueprint(&config, team))
            .collect();
        Self::from_teams(config, teams)
    }

    /// Creates a session from assembled teams.
    ///
    /// Fails when fewer than two teams are provided, a team is empty, or
    /// identifiers are reused, since opponent lookup and entity ids rely on
    /// unique team and player ids.
    pub fn from_teams(config: GameConfig, teams: Vec<Team>) -> Result<Self, SessionError> {
        unit_states().validate()?;
        if teams.len() < 2 {
            return Err(SessionError::NotEnoughTeams(teams.len()));
        }

        let mut team_ids: Vec<&EntityId> = Vec::new();
        let mut player_ids: Vec<&EntityId> = Vec::new();
        for team in &teams {
            if team_ids.contains(&team.id()) {
                return Err(SessionError::DuplicateTeam(team.id().clone()));
            }
            team_ids.push(team.id());
            if team.players().is_empty() {
                return Err(SessionError::EmptyTeam(team.id().clone()));
            }
            for player in team.players() {
                if player_ids.contains(&player.id()) {
                    return Err(SessionError::DuplicatePlayer(player.id().clone()));
                }
                player_ids.push(player.id());
            }
        }

        info!(
            teams = teams.len(),
            players = player_ids.len(),
            ticks_per_second = config.ticks_per_second,
            "Session created"
        );
        Ok(Self {
            config,
            teams,
            tick: 0,
            winner: None,
        })
    }

    /// Configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Winning team, once the match concluded.
    #[must_use]
    pub fn winner(&self) -> Option<&EntityId> {
        self.winner.as_ref()
    }

    /// Teams in session order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Looks up a player across every team.
    #[must_use]
    pub fn player(&self, id: &EntityId) -> Option<&Player> {
        self.players().find(|player| player.id() == id)
    }

    /// Mutable access to a player, e.g. to register deck hooks.
    pub fn player_mut(&mut self, id: &EntityId) -> Option<&mut Player> {
        self.teams
            .iter_mut()
            .flat_map(|team| team.players_mut().iter_mut())
            .find(|player| player.id() == id)
    }

    /// Team the player belongs to.
    #[must_use]
    pub fn team_of(&self, player: &EntityId) -> Option<&Team> {
        self.teams
            .iter()
            .find(|team| team.players().iter().any(|member| member.id() == player))
    }

    /// Players of every team other than `player`'s, resolved from the
    /// current membership on each call.
    #[must_use]
    pub fn opponents(&self, player: &EntityId) -> Vec<&Player> {
        let Some(own) = self.team_of(player) else {
            return Vec::new();
        };
        self.teams
            .iter()
            .filter(|team| *team != own)
            .flat_map(|team| team.players().iter())
            .collect()
    }

    /// Advances the match by `dt`.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick += 1;
        out_events.push(Event::TimeAdvanced { dt });
        if self.winner.is_some() {
            return;
        }

        for team_index in 0..self.teams.len() {
            if self.teams[team_index].is_defeated() {
                continue;
            }
            for player_index in 0..self.teams[team_index].players().len() {
                let mut engagement = self.engagement_for(team_index);
                let player = &mut self.teams[team_index].players_mut()[player_index];
                player.update(dt, &mut engagement, out_events);

                self.resolve(engagement, out_events);
                self.reap(out_events);
                if self.conclude_if_decided(out_events) {
                    return;
                }
            }
        }
    }

    /// Deploys a unit for `player`.
    pub fn deploy_unit(
        &mut self,
        player: &EntityId,
        blueprint: UnitBlueprint,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<EntityId, DeployRejection> {
        let outcome = self.try_deploy(player, blueprint, position);
        let event = match &outcome {
            Ok(unit) => Event::UnitDeployed {
                player: player.clone(),
                unit: unit.clone(),
                position,
            },
            Err(reason) => Event::DeployRejected {
                player: player.clone(),
                position,
                reason: *reason,
            },
        };
        out_events.push(event);
        outcome
    }

    fn try_deploy(
        &mut self,
        player: &EntityId,
        blueprint: UnitBlueprint,
        position: Vec2,
    ) -> Result<EntityId, DeployRejection> {
        if self.winner.is_some() {
            return Err(DeployRejection::MatchConcluded);
        }
        self.player_mut(player)
            .ok_or(DeployRejection::UnknownPlayer)?
            .deploy_unit(blueprint, position)
            .ok_or(DeployRejection::OutsideDeployZone)
    }

    /// Plays `card` from `player`'s hand aimed at `target`.
    pub fn play_card(
        &mut self,
        player: &EntityId,
        card: &CardId,
        target: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CardRejection> {
        let outcome = if self.winner.is_some() {
            Err(CardRejection::MatchConcluded)
        } else {
            self.player_mut(player)
                .ok_or(CardRejection::UnknownPlayer)
                .and_then(|owner| owner.play_card(card, target))
        };

        let event = match outcome {
            Ok(()) => Event::CardPlayed {
                player: player.clone(),
                card: card.clone(),
                target,
            },
            Err(reason) => Event::CardRejected {
                player: player.clone(),
                card: card.clone(),
                reason,
            },
        };
        out_events.push(event);
        outcome
    }

    /// Destroys `entity` regardless of its health.
    ///
    /// Returns `false` when no live unit or tower carries the identifier.
    pub fn despawn(&mut self, entity: &EntityId, out_events: &mut Vec<Event>) -> bool {
        let destroyed = self
            .teams
            .iter_mut()
            .flat_map(|team| team.players_mut().iter_mut())
            .any(|player| player.despawn(entity));
        if destroyed {
            debug!(entity = %entity, "Entity despawned");
            self.reap(out_events);
            let _ = self.conclude_if_decided(out_events);
        }
        destroyed
    }

    /// Produces the snapshot record of the whole session.
    #[must_use]
    pub fn serialize(&self) -> SerializedSession {
        SerializedSession {
            tick: self.tick,
            winner: self.winner.clone(),
            teams: self.teams.iter().map(Team::serialize).collect(),
        }
    }

    fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|team| team.players().iter())
    }

    fn engagement_for(&self, team_index: usize) -> Engagement {
        let mut snapshots = Vec::new();
        let mut health = Vec::new();
        for (index, team) in self.teams.iter().enumerate() {
            if index == team_index {
                continue;
            }
            for player in team.players() {
                player.collect_targets(&mut snapshots, &mut health);
            }
        }
        Engagement::new(TargetView::from_snapshots(snapshots), health)
    }

    fn resolve(&mut self, engagement: Engagement, out_events: &mut Vec<Event>) {
        for strike in engagement.into_strikes() {
            let remaining = self
                .player_mut(&strike.owner)
                .and_then(|owner| owner.damage(&strike.target, strike.amount));
            let Some(remaining) = remaining else {
                continue;
            };

            debug!(
                tick = self.tick,
                source = %strike.source,
                target = %strike.target,
                amount = strike.amount,
                remaining,
                "Damage dealt"
            );
            out_events.push(Event::DamageDealt {
                source: strike.source,
                target: strike.target,
                amount: strike.amount,
                remaining,
            });
        }
    }

    fn reap(&mut self, out_events: &mut Vec<Event>) {
        for team in &mut self.teams {
            for player in team.players_mut() {
                for entity in player.reap() {
                    debug!(owner = %player.id(), entity = %entity, "Entity destroyed");
                    out_events.push(Event::EntityDestroyed {
                        entity,
                        owner: player.id().clone(),
                    });
                }
            }
        }
    }

    fn conclude_if_decided(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.winner.is_some() {
            return true;
        }
        let mut standing = self.teams.iter().filter(|team| !team.is_defeated());
        let (Some(winner), None) = (standing.next(), standing.next()) else {
            return false;
        };

        let winner = winner.id().clone();
        info!(tick = self.tick, winner = %winner, "Match concluded");
        out_events.push(Event::MatchConcluded {
            winner: winner.clone(),
        });
        self.winner = Some(winner);
        true
    }
}
