//! Mobile combatants driven by a spawning → moving → attacking machine.

use std::{fmt, time::Duration};

use skirmish_core::{
    Bbox, DestroyedCallback, DestroyedSignal, Entity, EntityId, HealthRecord, Interceptable,
    Interceptor, InterceptorHandle, SerializedUnit, StateMachine, StateMachineError,
    Subscription, TargetSnapshot, Transition, UnitBlueprint, UnitState, Vec2,
};
use skirmish_system_targeting::in_range;

use crate::combat::Engagement;

mod states;

pub(crate) use states::unit_states;

/// Stat of a unit that interceptors can alter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitStat {
    /// Damage dealt per attack.
    Attack,
    /// Travel speed.
    Speed,
    /// Reach of attacks.
    AttackRange,
}

/// Interceptor signature for unit stats.
pub type UnitInterceptor = Interceptor<f32, UnitCore>;

#[derive(Debug, Default)]
struct UnitInterceptors {
    attack: Interceptable<f32, UnitCore>,
    speed: Interceptable<f32, UnitCore>,
    attack_range: Interceptable<f32, UnitCore>,
}

impl UnitInterceptors {
    fn chain_mut(&mut self, stat: UnitStat) -> &mut Interceptable<f32, UnitCore> {
        match stat {
            UnitStat::Attack => &mut self.attack,
            UnitStat::Speed => &mut self.speed,
            UnitStat::AttackRange => &mut self.attack_range,
        }
    }
}

/// Data and behaviour of a unit, lent to its state machine and interceptors.
#[derive(Debug)]
pub struct UnitCore {
    id: EntityId,
    player: EntityId,
    blueprint: UnitBlueprint,
    body: Bbox,
    velocity: Vec2,
    health: f32,
    target: Option<EntityId>,
    interceptors: UnitInterceptors,
    destroyed: DestroyedSignal,
}

impl UnitCore {
    /// Identifier of the unit.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Identifier of the owning player.
    #[must_use]
    pub fn player_id(&self) -> &EntityId {
        &self.player
    }

    /// Base stats the unit was created from.
    #[must_use]
    pub const fn blueprint(&self) -> &UnitBlueprint {
        &self.blueprint
    }

    /// Center of the unit body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.center()
    }

    /// Center-origin body rectangle.
    #[must_use]
    pub const fn body(&self) -> Bbox {
        self.body
    }

    /// Velocity in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Effective travel speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.interceptors.speed.get_value(self.blueprint.speed, self)
    }

    /// Effective damage per attack.
    #[must_use]
    pub fn attack(&self) -> f32 {
        self.interceptors.attack.get_value(self.blueprint.attack, self)
    }

    /// Effective attack range.
    #[must_use]
    pub fn attack_range(&self) -> f32 {
        self.interceptors
            .attack_range
            .get_value(self.blueprint.attack_range, self)
    }

    /// Attacks per second.
    #[must_use]
    pub const fn attack_speed(&self) -> f32 {
        self.blueprint.attack_speed
    }

    /// Distance within which targets are acquired.
    #[must_use]
    pub const fn aggro_range(&self) -> f32 {
        self.blueprint.aggro_range
    }

    /// Time spent in the spawning state.
    #[must_use]
    pub fn spawn_time(&self) -> Duration {
        self.blueprint.spawn_time()
    }

    /// Health at creation.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.blueprint.health
    }

    /// Remaining health.
    #[must_use]
    pub const fn current_health(&self) -> f32 {
        self.health
    }

    /// Currently acquired target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Reports whether `target` can be struck right now.
    #[must_use]
    pub fn can_attack(&self, target: &TargetSnapshot) -> bool {
        !self.destroyed.has_fired() && in_range(self.position(), self.attack_range(), target)
    }

    fn acquire(&mut self, target: &EntityId) {
        if self.target.as_ref() != Some(target) {
            self.target = Some(target.clone());
        }
    }

    fn release_target(&mut self) {
        self.target = None;
    }

    fn stop_moving(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Steers toward `destination` at the effective speed and travels for
    /// `dt`, never stepping past the destination.
    fn head_towards(&mut self, destination: Vec2, dt: Duration) {
        let origin = self.position();
        let offset = destination - origin;
        let direction = offset.normalize();
        let speed = self.speed();

        self.velocity = direction.scale(speed);
        let step = (speed * dt.as_secs_f32()).min(offset.magnitude()).max(0.0);
        self.body.set_center(origin + direction.scale(step));
    }

    fn take_damage(&mut self, amount: f32) -> f32 {
        if self.destroyed.has_fired() {
            return self.health;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            let _ = self.destroyed.fire(&self.id);
        }
        self.health
    }
}

/// Mobile combatant owned by a player.
pub struct Unit {
    core: UnitCore,
    machine: StateMachine<UnitState, UnitCore, Engagement>,
}

impl Unit {
    pub(crate) fn new(
        id: EntityId,
        player: EntityId,
        blueprint: UnitBlueprint,
        position: Vec2,
    ) -> Result<Self, StateMachineError> {
        let mut core = UnitCore {
            id,
            player,
            body: Bbox::new(position, blueprint.width, blueprint.height),
            velocity: Vec2::ZERO,
            health: blueprint.health.max(0.0),
            blueprint,
            target: None,
            interceptors: UnitInterceptors::default(),
            destroyed: DestroyedSignal::new(),
        };
        let machine = unit_states().build(&mut core, UnitState::Spawning)?;
        Ok(Self { core, machine })
    }

    /// Read access to the unit's data and effective stats.
    #[must_use]
    pub const fn core(&self) -> &UnitCore {
        &self.core
    }

    /// Active state of the unit.
    #[must_use]
    pub fn state(&self) -> UnitState {
        self.machine.state()
    }

    /// Center of the unit body.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.core.position()
    }

    /// Remaining health.
    #[must_use]
    pub const fn current_health(&self) -> f32 {
        self.core.current_health()
    }

    /// Reports whether other entities may engage the unit.
    #[must_use]
    pub fn is_targetable(&self) -> bool {
        !self.core.destroyed.has_fired() && self.state() != UnitState::Spawning
    }

    /// Registers `interceptor` on `stat` and returns its removal handle.
    pub fn add_interceptor(
        &mut self,
        stat: UnitStat,
        interceptor: UnitInterceptor,
        priority: i32,
    ) -> InterceptorHandle {
        self.core.interceptors.chain_mut(stat).add(interceptor, priority)
    }

    /// Removes a previously registered interceptor; unknown handles are ignored.
    pub fn remove_interceptor(&mut self, stat: UnitStat, handle: InterceptorHandle) -> bool {
        self.core.interceptors.chain_mut(stat).remove(handle)
    }

    /// Produces the snapshot record of the unit.
    #[must_use]
    pub fn serialize(&self) -> SerializedUnit {
        SerializedUnit {
            id: self.core.id.clone(),
            player_id: self.core.player.clone(),
            health: HealthRecord {
                current: self.core.health,
                max: self.core.max_health(),
            },
            attack_range: self.core.attack_range(),
            aggro_range: self.core.aggro_range(),
            body: self.core.body,
            state: self.state(),
            velocity: self.core.velocity,
            speed: self.core.speed(),
        }
    }

    pub(crate) fn update(
        &mut self,
        engagement: &mut Engagement,
        dt: Duration,
    ) -> Option<Transition<UnitState>> {
        if self.core.destroyed.has_fired() {
            return None;
        }
        self.machine.update(&mut self.core, engagement, dt)
    }

    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        self.core.take_damage(amount)
    }

    pub(crate) fn destroy(&mut self) -> bool {
        self.core.destroyed.fire(&self.core.id)
    }
}

impl Entity for Unit {
    fn id(&self) -> &EntityId {
        &self.core.id
    }

    fn subscribe_destroyed(&mut self, callback: DestroyedCallback) -> Subscription {
        self.core.destroyed.subscribe(callback)
    }

    fn unsubscribe_destroyed(&mut self, subscription: Subscription) {
        self.core.destroyed.unsubscribe(subscription);
    }

    fn is_destroyed(&self) -> bool {
        self.core.destroyed.has_fired()
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.core.id)
            .field("state", &self.state())
            .field("position", &self.core.position())
            .field("health", &self.core.health)
            .finish()
    }
}
