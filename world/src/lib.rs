#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Skirmish matches.
//!
//! A [`Session`] owns teams, a team owns players and a player owns its
//! towers, units, mana pool and deck. Every mutation goes through the
//! session, either directly or as a [`Command`] passed to [`apply`], and is
//! reported as [`Event`] values in simulation order.

mod combat;
mod deck;
mod mana;
mod player;
mod session;
mod team;
mod tower;
mod unit;

use skirmish_core::{Command, Event};

pub use deck::{
    Card, CardPlay, Deck, DeckBlueprint, DeckSystem, HookHandle, PlayHook, PlayHooks, PlayPhase,
};
pub use mana::{ManaBlueprint, ManaSystem};
pub use player::{Player, PlayerBlueprint};
pub use session::{Session, SessionBlueprint};
pub use team::{Team, TeamBlueprint};
pub use tower::Tower;
pub use unit::{Unit, UnitCore, UnitInterceptor, UnitStat};

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => session.update(dt, out_events),
        Command::DeployUnit {
            player,
            blueprint,
            position,
        } => {
            let _ = session.deploy_unit(&player, blueprint, position, out_events);
        }
        Command::PlayCard {
            player,
            card,
            target,
        } => {
            let _ = session.play_card(&player, &card, target, out_events);
        }
        Command::Despawn { entity } => {
            let _ = session.despawn(&entity, out_events);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use skirmish_core::{EntityId, SerializedSession, UnitState};

    use super::{Player, Session, Tower, Unit};

    /// Captures the full snapshot handed to presentation collaborators.
    #[must_use]
    pub fn snapshot(session: &Session) -> SerializedSession {
        session.serialize()
    }

    /// Finds a live unit anywhere in the session.
    #[must_use]
    pub fn unit<'a>(session: &'a Session, id: &EntityId) -> Option<&'a Unit> {
        players(session).find_map(|player| player.unit(id))
    }

    /// Finds a live tower anywhere in the session.
    #[must_use]
    pub fn tower<'a>(session: &'a Session, id: &EntityId) -> Option<&'a Tower> {
        players(session).find_map(|player| player.tower(id))
    }

    /// Active state of a live unit.
    #[must_use]
    pub fn unit_state(session: &Session, id: &EntityId) -> Option<UnitState> {
        unit(session, id).map(Unit::state)
    }

    /// Number of live units and towers across all players.
    #[must_use]
    pub fn entity_count(session: &Session) -> usize {
        players(session)
            .map(|player| player.units().len() + player.towers().len())
            .sum()
    }

    fn players(session: &Session) -> impl Iterator<Item = &Player> {
        session.teams().iter().flat_map(|team| team.players().iter())
    }
}
