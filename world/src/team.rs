//! Teams of players sharing a deploy zone and a common fate.

use serde::Deserialize;
use skirmish_core::{Bbox, EntityId, GameConfig, SerializedTeam};

use crate::{
    deck::DeckSystem,
    player::{Player, PlayerBlueprint},
};

/// Shape of the input used to create a team.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamBlueprint {
    /// Identifier of the team.
    pub id: EntityId,
    /// Center-origin region where the team's units may be placed.
    pub deploy_zone: Bbox,
    /// Players of the team.
    pub players: Vec<PlayerBlueprint>,
}

/// Group of players.
///
/// A team never stores its opponents; the session resolves them on demand.
#[derive(Debug)]
pub struct Team {
    id: EntityId,
    deploy_zone: Bbox,
    players: Vec<Player>,
}

impl Team {
    /// Creates an empty team.
    #[must_use]
    pub fn new(id: EntityId, deploy_zone: Bbox) -> Self {
        Self {
            id,
            deploy_zone,
            players: Vec::new(),
        }
    }

    /// Creates a team and every player described by `blueprint`.
    #[must_use]
    pub fn from_blueprint(config: &GameConfig, blueprint: &TeamBlueprint) -> Self {
        let mut team = Self::new(blueprint.id.clone(), blueprint.deploy_zone);
        for player in &blueprint.players {
            let _ = team.add_player(config, player);
        }
        team
    }

    /// Adds a player backed by the default [`crate::Deck`].
    pub fn add_player(&mut self, config: &GameConfig, blueprint: &PlayerBlueprint) -> &mut Player {
        let player = Player::new(config, self.id.clone(), self.deploy_zone, blueprint);
        self.push(player)
    }

    /// Adds a player backed by a custom deck collaborator.
    pub fn add_player_with_deck(
        &mut self,
        config: &GameConfig,
        blueprint: &PlayerBlueprint,
        deck: Box<dyn DeckSystem>,
    ) -> &mut Player {
        let player = Player::with_deck(config, self.id.clone(), self.deploy_zone, blueprint, deck);
        self.push(player)
    }

    fn push(&mut self, player: Player) -> &mut Player {
        let index = self.players.len();
        self.players.push(player);
        &mut self.players[index]
    }

    /// Identifier of the team.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Region where the team may deploy units.
    #[must_use]
    pub const fn deploy_zone(&self) -> Bbox {
        self.deploy_zone
    }

    /// Players in insertion order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// A team is defeated once none of its players has an inner tower left.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        !self.players.iter().any(Player::has_inner_tower)
    }

    /// Produces the snapshot record of the team.
    #[must_use]
    pub fn serialize(&self) -> SerializedTeam {
        SerializedTeam {
            id: self.id.clone(),
            deploy_zone: self.deploy_zone,
            players: self.players.iter().map(Player::serialize).collect(),
        }
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
