//! JSON-compatible records handed to presentation and transport collaborators.

use serde::{Deserialize, Serialize};

use crate::{Bbox, EntityId, Vec2};

/// Current and maximum health of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Remaining health, never below zero.
    pub current: f32,
    /// Health at creation.
    pub max: f32,
}

/// Lifecycle state of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitState {
    /// Inert and untargetable until the spawn timer elapses.
    Spawning,
    /// Advancing toward a target or the enemy inner tower.
    Moving,
    /// Striking an acquired target on cooldown.
    Attacking,
}

impl crate::StateKey for UnitState {
    const ALL: &'static [Self] = &[Self::Spawning, Self::Moving, Self::Attacking];
}

/// Tier of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// The single, sturdier tower guarding each player.
    Inner,
    /// Weaker long-range towers.
    Outer,
}

/// Serialized form of a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedUnit {
    /// Identifier of the unit.
    pub id: EntityId,
    /// Identifier of the owning player.
    pub player_id: EntityId,
    /// Health of the unit.
    pub health: HealthRecord,
    /// Effective attack range after interceptors.
    pub attack_range: f32,
    /// Distance within which targets are acquired.
    pub aggro_range: f32,
    /// Center-origin body rectangle.
    pub body: Bbox,
    /// Active state.
    pub state: UnitState,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Effective speed after interceptors.
    pub speed: f32,
}

/// Serialized form of a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTower {
    /// Identifier of the tower.
    pub id: EntityId,
    /// Identifier of the owning player.
    pub player_id: EntityId,
    /// Tier of the tower.
    pub kind: TowerKind,
    /// Health of the tower.
    pub health: HealthRecord,
    /// Distance within which the tower strikes.
    pub attack_range: f32,
    /// Center-origin body rectangle.
    pub body: Bbox,
}

/// Serialized form of a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPlayer {
    /// Identifier of the player.
    pub id: EntityId,
    /// Mana currently available.
    pub current_mana: f32,
    /// Mana capacity.
    pub max_mana: f32,
    /// Live towers in creation order.
    pub towers: Vec<SerializedTower>,
    /// Live units in deployment order.
    pub units: Vec<SerializedUnit>,
    /// Opaque record produced by the deck collaborator.
    pub deck_system: serde_json::Value,
}

/// Serialized form of a team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTeam {
    /// Identifier of the team.
    pub id: EntityId,
    /// Region where the team may deploy units.
    pub deploy_zone: Bbox,
    /// Players belonging to the team.
    pub players: Vec<SerializedPlayer>,
}

/// Serialized form of a whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedSession {
    /// Number of ticks processed so far.
    pub tick: u64,
    /// Winning team once the match has concluded.
    pub winner: Option<EntityId>,
    /// Teams in session order.
    pub teams: Vec<SerializedTeam>,
}
