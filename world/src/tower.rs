//! Stationary combatants guarding each player.

use std::time::Duration;

use skirmish_core::{
    Bbox, DestroyedCallback, DestroyedSignal, Entity, EntityId, HealthRecord, SerializedTower,
    Subscription, TowerKind, TowerPreset, Vec2,
};
use skirmish_system_targeting::nearest_within;

use crate::combat::{cooldown_ms, millis, Engagement};

/// Tower with a single always-active guard behaviour.
#[derive(Debug)]
pub struct Tower {
    id: EntityId,
    player: EntityId,
    kind: TowerKind,
    preset: TowerPreset,
    body: Bbox,
    health: f32,
    cooldown_ms: f32,
    destroyed: DestroyedSignal,
}

impl Tower {
    pub(crate) fn new(
        id: EntityId,
        player: EntityId,
        kind: TowerKind,
        preset: TowerPreset,
        body: Bbox,
    ) -> Self {
        Self {
            id,
            player,
            kind,
            health: preset.health.max(0.0),
            preset,
            body,
            cooldown_ms: 0.0,
            destroyed: DestroyedSignal::new(),
        }
    }

    /// Identifier of the owning player.
    #[must_use]
    pub fn player_id(&self) -> &EntityId {
        &self.player
    }

    /// Tier of the tower.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Center of the tower body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.center()
    }

    /// Remaining health.
    #[must_use]
    pub const fn current_health(&self) -> f32 {
        self.health
    }

    /// Health at creation.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.preset.health
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn attack(&self) -> f32 {
        self.preset.attack
    }

    /// Distance within which the tower strikes.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.preset.attack_range
    }

    /// Produces the snapshot record of the tower.
    #[must_use]
    pub fn serialize(&self) -> SerializedTower {
        SerializedTower {
            id: self.id.clone(),
            player_id: self.player.clone(),
            kind: self.kind,
            health: HealthRecord {
                current: self.health,
                max: self.preset.health,
            },
            attack_range: self.preset.attack_range,
            body: self.body,
        }
    }

    /// Strikes the nearest opponent in range whenever the cooldown has run
    /// out. An idle tower keeps its next attack ready instead of banking time.
    pub(crate) fn update(&mut self, engagement: &mut Engagement, dt: Duration) {
        if self.destroyed.has_fired() {
            return;
        }

        self.cooldown_ms = (self.cooldown_ms - millis(dt)).max(0.0);
        if self.cooldown_ms > 0.0 {
            return;
        }

        let target = nearest_within(self.position(), self.attack_range(), engagement.targets())
            .map(|snapshot| snapshot.id.clone());
        if let Some(target) = target {
            engagement.strike(&self.id, &target, self.attack());
            self.cooldown_ms = cooldown_ms(self.preset.attack_speed);
        }
    }

    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        if self.destroyed.has_fired() {
            return self.health;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            let _ = self.destroyed.fire(&self.id);
        }
        self.health
    }

    pub(crate) fn destroy(&mut self) -> bool {
        self.destroyed.fire(&self.id)
    }
}

impl Entity for Tower {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn subscribe_destroyed(&mut self, callback: DestroyedCallback) -> Subscription {
        self.destroyed.subscribe(callback)
    }

    fn unsubscribe_destroyed(&mut self, subscription: Subscription) {
        self.destroyed.unsubscribe(subscription);
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.has_fired()
    }
}
