//! Player aggregate: towers, units, mana and the deck collaborator.

use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

use serde::Deserialize;
use skirmish_core::{
    Bbox, CardId, CardRejection, DestroyedCallback, Entity, EntityId, Event, GameConfig,
    SerializedPlayer, TargetKind, TargetSnapshot, TowerKind, UnitBlueprint, Vec2,
};
use tracing::{debug, error};

use crate::{
    combat::Engagement,
    deck::{Deck, DeckBlueprint, DeckSystem},
    mana::{ManaBlueprint, ManaSystem},
    tower::Tower,
    unit::Unit,
};

/// Shape of the input used to create a player.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerBlueprint {
    /// Identifier of the player.
    pub id: EntityId,
    /// Center of the inner tower.
    pub inner_tower: Vec2,
    /// Centers of the outer towers, in construction order.
    #[serde(default)]
    pub outer_towers: Vec<Vec2>,
    /// Mana pool parameters.
    pub mana: ManaBlueprint,
    /// Cards handed to the default deck.
    #[serde(default)]
    pub deck: DeckBlueprint,
}

/// Identifiers of entities whose destruction signal fired but which are
/// still held by the player.
type FallenQueue = Rc<RefCell<Vec<EntityId>>>;

/// Participant owning towers, units, a mana pool and a deck.
///
/// Entities are pruned through their destruction signal: the player
/// subscribes at creation and removes fallen entities when the session
/// reaps them after each turn, so a collection is never mutated while it is
/// being iterated.
pub struct Player {
    id: EntityId,
    team: EntityId,
    deploy_zone: Bbox,
    config: GameConfig,
    towers: Vec<Tower>,
    units: Vec<Unit>,
    units_deployed: u32,
    towers_built: u32,
    mana: ManaSystem,
    deck: Box<dyn DeckSystem>,
    fallen: FallenQueue,
}

impl Player {
    pub(crate) fn new(
        config: &GameConfig,
        team: EntityId,
        deploy_zone: Bbox,
        blueprint: &PlayerBlueprint,
    ) -> Self {
        let deck = Deck::new(format!("{}_deck", blueprint.id), blueprint.deck.clone());
        Self::with_deck(config, team, deploy_zone, blueprint, Box::new(deck))
    }

    pub(crate) fn with_deck(
        config: &GameConfig,
        team: EntityId,
        deploy_zone: Bbox,
        blueprint: &PlayerBlueprint,
        deck: Box<dyn DeckSystem>,
    ) -> Self {
        let mut player = Self {
            id: blueprint.id.clone(),
            team,
            deploy_zone,
            config: *config,
            towers: Vec::new(),
            units: Vec::new(),
            units_deployed: 0,
            towers_built: 0,
            mana: ManaSystem::new(blueprint.mana),
            deck,
            fallen: Rc::new(RefCell::new(Vec::new())),
        };

        let _ = player.add_inner_tower(blueprint.inner_tower);
        for position in &blueprint.outer_towers {
            let _ = player.add_outer_tower(*position);
        }
        player
    }

    /// Identifier of the player.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Identifier of the team the player belongs to.
    #[must_use]
    pub fn team_id(&self) -> &EntityId {
        &self.team
    }

    /// Region in which the player may deploy units.
    #[must_use]
    pub const fn deploy_zone(&self) -> Bbox {
        self.deploy_zone
    }

    /// Live towers in creation order.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Live units in deployment order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Looks up a live unit.
    #[must_use]
    pub fn unit(&self, id: &EntityId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    /// Mutable access to a live unit, e.g. to attach interceptors.
    pub fn unit_mut(&mut self, id: &EntityId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id() == id)
    }

    /// Looks up a live tower.
    #[must_use]
    pub fn tower(&self, id: &EntityId) -> Option<&Tower> {
        self.towers.iter().find(|tower| tower.id() == id)
    }

    /// Reports whether the player's inner tower still stands.
    #[must_use]
    pub fn has_inner_tower(&self) -> bool {
        self.towers
            .iter()
            .any(|tower| tower.kind() == TowerKind::Inner && !tower.is_destroyed())
    }

    /// Mana pool of the player.
    #[must_use]
    pub const fn mana(&self) -> &ManaSystem {
        &self.mana
    }

    /// Deck collaborator of the player.
    #[must_use]
    pub fn deck(&self) -> &dyn DeckSystem {
        self.deck.as_ref()
    }

    /// Mutable deck access, used to register play hooks.
    pub fn deck_mut(&mut self) -> &mut dyn DeckSystem {
        self.deck.as_mut()
    }

    /// Deploys a unit at `position`.
    ///
    /// Returns `None` without allocating an identifier when the position lies
    /// outside the deploy zone.
    pub fn deploy_unit(&mut self, blueprint: UnitBlueprint, position: Vec2) -> Option<EntityId> {
        if !self.deploy_zone.contains(position) {
            debug!(
                player = %self.id,
                x = position.x,
                y = position.y,
                "Deploy outside zone rejected"
            );
            return None;
        }

        let id = EntityId::new(format!("{}_u_{}", self.id, self.units_deployed + 1));
        let mut unit = match Unit::new(id.clone(), self.id.clone(), blueprint, position) {
            Ok(unit) => unit,
            Err(err) => {
                error!(player = %self.id, error = %err, "Unit state set is incomplete");
                return None;
            }
        };
        self.units_deployed += 1;

        let _ = unit.subscribe_destroyed(self.prune_on_destroy());
        self.units.push(unit);
        debug!(player = %self.id, unit = %id, x = position.x, y = position.y, "Unit deployed");
        Some(id)
    }

    /// Builds the inner tower (`{player}_ti`).
    ///
    /// Returns `None` while the player still holds an inner tower.
    pub fn add_inner_tower(&mut self, position: Vec2) -> Option<EntityId> {
        if self.towers.iter().any(|tower| tower.kind() == TowerKind::Inner) {
            return None;
        }
        let id = EntityId::new(format!("{}_ti", self.id));
        self.build_tower(id.clone(), TowerKind::Inner, position);
        Some(id)
    }

    /// Builds an outer tower (`{player}_to_{n}`).
    ///
    /// `n` counts every tower the player ever built, the inner one included,
    /// so identifiers stay unique after towers fall.
    pub fn add_outer_tower(&mut self, position: Vec2) -> EntityId {
        let id = EntityId::new(format!("{}_to_{}", self.id, self.towers_built + 1));
        self.build_tower(id.clone(), TowerKind::Outer, position);
        id
    }

    fn build_tower(&mut self, id: EntityId, kind: TowerKind, position: Vec2) {
        let preset = match kind {
            TowerKind::Inner => self.config.inner_tower,
            TowerKind::Outer => self.config.outer_tower,
        };
        let body = Bbox::new(position, self.config.tower_width, self.config.tower_height);
        let mut tower = Tower::new(id, self.id.clone(), kind, preset, body);
        self.towers_built += 1;

        let _ = tower.subscribe_destroyed(self.prune_on_destroy());
        self.towers.push(tower);
    }

    fn prune_on_destroy(&self) -> DestroyedCallback {
        let fallen = Rc::clone(&self.fallen);
        Box::new(move |id: &EntityId| fallen.borrow_mut().push(id.clone()))
    }

    /// Pays for `card` and resolves the play through the deck hooks.
    pub fn play_card(&mut self, card: &CardId, target: Vec2) -> Result<(), CardRejection> {
        let cost = self
            .deck
            .card(card)
            .map(|held| held.cost)
            .ok_or(CardRejection::UnknownCard)?;
        if let Err(err) = self.mana.spend(cost) {
            debug!(player = %self.id, card = %card, error = %err, "Card play rejected");
            return Err(CardRejection::InsufficientMana);
        }

        self.deck.resolve_play(&self.id, card, target);
        debug!(player = %self.id, card = %card, "Card played");
        Ok(())
    }

    /// Advances mana, deck, towers and units for one turn.
    ///
    /// Strikes are queued on `engagement`; the session applies them once the
    /// whole turn completed.
    pub(crate) fn update(
        &mut self,
        dt: Duration,
        engagement: &mut Engagement,
        events: &mut Vec<Event>,
    ) {
        self.mana.update(dt);
        self.deck.update(dt);

        for tower in &mut self.towers {
            tower.update(engagement, dt);
        }

        for unit in &mut self.units {
            if let Some(transition) = unit.update(engagement, dt) {
                debug!(
                    unit = %unit.id(),
                    from = ?transition.from,
                    to = ?transition.to,
                    "Unit changed state"
                );
                events.push(Event::UnitStateChanged {
                    unit: unit.id().clone(),
                    from: transition.from,
                    to: transition.to,
                });
            }
        }
    }

    /// Appends every targetable entity with its current health.
    pub(crate) fn collect_targets(
        &self,
        snapshots: &mut Vec<TargetSnapshot>,
        health: &mut Vec<(EntityId, f32)>,
    ) {
        for tower in self.towers.iter().filter(|tower| !tower.is_destroyed()) {
            snapshots.push(TargetSnapshot {
                id: tower.id().clone(),
                owner: self.id.clone(),
                kind: TargetKind::Tower(tower.kind()),
                center: tower.position(),
            });
            health.push((tower.id().clone(), tower.current_health()));
        }
        for unit in self.units.iter().filter(|unit| unit.is_targetable()) {
            snapshots.push(TargetSnapshot {
                id: unit.id().clone(),
                owner: self.id.clone(),
                kind: TargetKind::Unit,
                center: unit.position(),
            });
            health.push((unit.id().clone(), unit.current_health()));
        }
    }

    /// Applies damage to one of the player's entities and returns its
    /// remaining health.
    pub(crate) fn damage(&mut self, target: &EntityId, amount: f32) -> Option<f32> {
        if let Some(unit) = self.units.iter_mut().find(|unit| unit.id() == target) {
            return Some(unit.take_damage(amount));
        }
        self.towers
            .iter_mut()
            .find(|tower| tower.id() == target)
            .map(|tower| tower.take_damage(amount))
    }

    /// Destroys one of the player's entities regardless of its health.
    pub(crate) fn despawn(&mut self, entity: &EntityId) -> bool {
        if let Some(unit) = self.units.iter_mut().find(|unit| unit.id() == entity) {
            return unit.destroy();
        }
        self.towers
            .iter_mut()
            .find(|tower| tower.id() == entity)
            .is_some_and(Tower::destroy)
    }

    /// Removes every entity whose destruction signal fired and returns their
    /// identifiers in destruction order.
    pub(crate) fn reap(&mut self) -> Vec<EntityId> {
        let fallen: Vec<EntityId> = self.fallen.borrow_mut().drain(..).collect();
        if fallen.is_empty() {
            return fallen;
        }

        self.units.retain(|unit| !fallen.contains(unit.id()));
        self.towers.retain(|tower| !fallen.contains(tower.id()));
        for id in &fallen {
            debug!(player = %self.id, entity = %id, "Entity removed");
        }
        fallen
    }

    /// Produces the snapshot record of the player.
    #[must_use]
    pub fn serialize(&self) -> SerializedPlayer {
        SerializedPlayer {
            id: self.id.clone(),
            current_mana: self.mana.current(),
            max_mana: self.mana.capacity(),
            towers: self.towers.iter().map(Tower::serialize).collect(),
            units: self.units.iter().map(Unit::serialize).collect(),
            deck_system: self.deck.serialize(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("team", &self.team)
            .field("towers", &self.towers.len())
            .field("units", &self.units.len())
            .field("mana", &self.mana.current())
            .finish()
    }
}
