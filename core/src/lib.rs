#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish simulation.
//!
//! This crate holds the value types, building blocks and message surface
//! used by the authoritative world and its adapters. Adapters submit
//! [`Command`] values, the world executes them through its `apply` entry
//! point and reports what happened as [`Event`] values in simulation order.
//! Presentation collaborators consume the serialized snapshot records and
//! never mutate simulation state.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod blueprint;
mod config;
mod entity;
mod error;
mod geometry;
mod interceptor;
mod snapshot;
mod state_machine;
mod targets;

pub use blueprint::UnitBlueprint;
pub use config::{GameConfig, TowerPreset};
pub use entity::{DestroyedCallback, DestroyedSignal, Entity, EntityId, Subscription};
pub use error::{ConfigError, ManaError, SessionError, StateMachineError};
pub use geometry::{Bbox, Vec2};
pub use interceptor::{Interceptable, Interceptor, InterceptorHandle};
pub use snapshot::{
    HealthRecord, SerializedPlayer, SerializedSession, SerializedTeam, SerializedTower,
    SerializedUnit, TowerKind, UnitState,
};
pub use state_machine::{
    BoxedState, State, StateKey, StateMachine, StateMachineBuilder, Transition,
};
pub use targets::{TargetKind, TargetSnapshot, TargetView};

/// Identifier of a card held by a deck.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Wraps the provided string as a card identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick of the provided duration.
    Tick {
        /// Simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a player deploy a unit.
    DeployUnit {
        /// Player performing the deployment.
        player: EntityId,
        /// Base stats of the new unit.
        blueprint: UnitBlueprint,
        /// Requested center of the new unit.
        position: Vec2,
    },
    /// Requests that a player play a card from their hand.
    PlayCard {
        /// Player playing the card.
        player: EntityId,
        /// Card being played.
        card: CardId,
        /// Point the card is aimed at.
        target: Vec2,
    },
    /// Removes an entity regardless of its health.
    Despawn {
        /// Unit or tower to remove.
        entity: EntityId,
    },
}

/// Events reported by the session while processing commands.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a unit entered the battlefield.
    UnitDeployed {
        /// Owning player.
        player: EntityId,
        /// Identifier allocated to the unit.
        unit: EntityId,
        /// Center of the new unit.
        position: Vec2,
    },
    /// Reports that a deployment request was rejected.
    DeployRejected {
        /// Player that requested the deployment.
        player: EntityId,
        /// Requested center.
        position: Vec2,
        /// Specific reason the deployment failed.
        reason: DeployRejection,
    },
    /// Announces that a unit switched state.
    UnitStateChanged {
        /// Unit that transitioned.
        unit: EntityId,
        /// State before the transition.
        from: UnitState,
        /// State after the transition.
        to: UnitState,
    },
    /// Confirms that an attack landed.
    DamageDealt {
        /// Attacking unit or tower.
        source: EntityId,
        /// Entity that received the damage.
        target: EntityId,
        /// Damage applied before clamping.
        amount: f32,
        /// Target health after the attack.
        remaining: f32,
    },
    /// Announces that an entity was destroyed and removed from its owner.
    EntityDestroyed {
        /// Destroyed unit or tower.
        entity: EntityId,
        /// Player that owned the entity.
        owner: EntityId,
    },
    /// Confirms that a card play resolved.
    CardPlayed {
        /// Player that played the card.
        player: EntityId,
        /// Card that was played.
        card: CardId,
        /// Point the card was aimed at.
        target: Vec2,
    },
    /// Reports that a card play was rejected.
    CardRejected {
        /// Player that attempted the play.
        player: EntityId,
        /// Card that was requested.
        card: CardId,
        /// Specific reason the play failed.
        reason: CardRejection,
    },
    /// Announces the winner of the match.
    MatchConcluded {
        /// Last team with a standing inner tower.
        winner: EntityId,
    },
}

/// Reasons a deployment request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeployRejection {
    /// No player with the provided identifier exists.
    UnknownPlayer,
    /// The requested position lies outside the team's deploy zone.
    OutsideDeployZone,
    /// The match already has a winner.
    MatchConcluded,
}

/// Reasons a card play may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardRejection {
    /// No player with the provided identifier exists.
    UnknownPlayer,
    /// The card is not in the player's hand.
    UnknownCard,
    /// The player cannot afford the card.
    InsufficientMana,
    /// The match already has a winner.
    MatchConcluded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::EntityDestroyed {
            entity: EntityId::new("p2_ti"),
            owner: EntityId::new("p2"),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "entityDestroyed");
        assert_eq!(json["entity"], "p2_ti");
    }

    #[test]
    fn rejection_reasons_serialize_camel_case() {
        let json = serde_json::to_value(DeployRejection::OutsideDeployZone).expect("serialize");
        assert_eq!(json, "outsideDeployZone");
    }
}
