use std::time::Duration;

use skirmish_core::{State, StateMachineBuilder, UnitState};
use skirmish_system_targeting::{nearest_objective, nearest_within};

use super::UnitCore;
use crate::combat::{cooldown_ms, millis, Engagement};

type UnitStates = StateMachineBuilder<UnitState, UnitCore, Engagement>;

/// Registers the three unit behaviours.
pub(crate) fn unit_states() -> UnitStates {
    StateMachineBuilder::new()
        .add(UnitState::Spawning, Box::new(Spawning::default()))
        .add(UnitState::Moving, Box::new(Moving))
        .add(UnitState::Attacking, Box::new(Attacking::default()))
}

#[derive(Debug, Default)]
struct Spawning {
    elapsed_ms: f32,
}

impl State<UnitState, UnitCore, Engagement> for Spawning {
    fn on_enter(&mut self, unit: &mut UnitCore) {
        self.elapsed_ms = 0.0;
        unit.stop_moving();
    }

    fn on_update(
        &mut self,
        unit: &mut UnitCore,
        _engagement: &mut Engagement,
        dt: Duration,
    ) -> Option<UnitState> {
        self.elapsed_ms += millis(dt);
        (self.elapsed_ms >= millis(unit.spawn_time())).then_some(UnitState::Moving)
    }
}

/// Chases the nearest opponent in aggro range, otherwise advances on the
/// nearest opposing inner tower.
#[derive(Debug)]
struct Moving;

impl State<UnitState, UnitCore, Engagement> for Moving {
    fn on_update(
        &mut self,
        unit: &mut UnitCore,
        engagement: &mut Engagement,
        dt: Duration,
    ) -> Option<UnitState> {
        let origin = unit.position();
        let targets = engagement.targets();

        if let Some(target) = nearest_within(origin, unit.aggro_range(), targets) {
            unit.acquire(&target.id);
            if unit.can_attack(target) {
                return Some(UnitState::Attacking);
            }
            unit.head_towards(target.center, dt);
            return None;
        }

        unit.release_target();
        match nearest_objective(origin, targets) {
            Some(objective) => unit.head_towards(objective.center, dt),
            None => unit.stop_moving(),
        }
        None
    }
}

/// Strikes the acquired target on a cooldown of `1000 / attack_speed` ms.
///
/// The cooldown survives leaving and re-entering the state, so a unit that
/// briefly loses its target cannot attack faster than its cadence.
#[derive(Debug, Default)]
struct Attacking {
    cooldown_ms: f32,
}

impl State<UnitState, UnitCore, Engagement> for Attacking {
    fn on_enter(&mut self, unit: &mut UnitCore) {
        unit.stop_moving();
    }

    fn on_update(
        &mut self,
        unit: &mut UnitCore,
        engagement: &mut Engagement,
        dt: Duration,
    ) -> Option<UnitState> {
        let target = match unit.target() {
            Some(id) => engagement.targets().get(id).cloned(),
            None => None,
        };
        let Some(target) = target.filter(|target| unit.can_attack(target)) else {
            unit.release_target();
            return Some(UnitState::Moving);
        };

        self.cooldown_ms -= millis(dt);
        if self.cooldown_ms <= 0.0 {
            engagement.strike(unit.id(), &target.id, unit.attack());
            self.cooldown_ms = cooldown_ms(unit.attack_speed());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;
    use skirmish_core::{
        EntityId, TargetKind, TargetSnapshot, TargetView, TowerKind, UnitBlueprint, Vec2,
    };

    const TICK: Duration = Duration::from_millis(50);

    fn blueprint() -> UnitBlueprint {
        UnitBlueprint {
            attack: 15.0,
            attack_speed: 1.0,
            attack_range: 2.0,
            aggro_range: 20.0,
            health: 100.0,
            spawn_time_ms: 100,
            speed: 5.0,
            width: 1.0,
            height: 1.0,
        }
    }

    fn facing_tower(x: f32, health: f32) -> Engagement {
        let id = EntityId::new("p2_ti");
        Engagement::new(
            TargetView::from_snapshots(vec![TargetSnapshot {
                id: id.clone(),
                owner: EntityId::new("p2"),
                kind: TargetKind::Tower(TowerKind::Inner),
                center: Vec2::new(x, 0.0),
            }]),
            vec![(id, health)],
        )
    }

    fn unit() -> Unit {
        Unit::new(
            EntityId::new("p1_u_1"),
            EntityId::new("p1"),
            blueprint(),
            Vec2::ZERO,
        )
        .expect("unit states are complete")
    }

    #[test]
    fn spawning_lasts_for_spawn_time() {
        let mut unit = unit();
        let mut engagement = facing_tower(50.0, 100.0);

        assert_eq!(unit.update(&mut engagement, TICK), None);
        assert_eq!(unit.state(), UnitState::Spawning);
        assert_eq!(unit.position(), Vec2::ZERO);

        let transition = unit.update(&mut engagement, TICK).expect("spawn elapsed");
        assert_eq!(transition.to, UnitState::Moving);
    }

    #[test]
    fn advances_on_objective_outside_aggro_range() {
        let mut unit = unit();
        let mut engagement = facing_tower(50.0, 100.0);
        for _ in 0..3 {
            let _ = unit.update(&mut engagement, TICK);
        }

        assert_eq!(unit.state(), UnitState::Moving);
        assert_eq!(unit.core().target(), None);
        assert_eq!(unit.core().velocity(), Vec2::new(5.0, 0.0));
        assert!((unit.position().x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn stands_still_without_opponents() {
        let mut unit = unit();
        let mut engagement = Engagement::new(TargetView::default(), Vec::new());
        for _ in 0..5 {
            let _ = unit.update(&mut engagement, TICK);
        }
        assert_eq!(unit.state(), UnitState::Moving);
        assert_eq!(unit.core().velocity(), Vec2::ZERO);
        assert_eq!(unit.position(), Vec2::ZERO);
    }

    #[test]
    fn attacks_immediately_then_on_cooldown() {
        let mut unit = unit();
        let mut engagement = facing_tower(1.5, 100.0);
        for _ in 0..3 {
            let _ = unit.update(&mut engagement, TICK);
        }
        assert_eq!(unit.state(), UnitState::Attacking);
        assert!(engagement.into_strikes().is_empty());

        let mut engagement = facing_tower(1.5, 1_000.0);
        for _ in 0..21 {
            let _ = unit.update(&mut engagement, TICK);
        }
        let strikes = engagement.into_strikes();
        assert_eq!(strikes.len(), 2);
        assert!(strikes.iter().all(|strike| strike.amount == 15.0));
    }

    #[test]
    fn returns_to_moving_when_target_leaves_view() {
        let mut unit = unit();
        let mut engagement = facing_tower(1.5, 100.0);
        for _ in 0..3 {
            let _ = unit.update(&mut engagement, TICK);
        }
        assert_eq!(unit.state(), UnitState::Attacking);

        let mut empty = Engagement::new(TargetView::default(), Vec::new());
        let transition = unit.update(&mut empty, TICK).expect("target vanished");
        assert_eq!(transition.to, UnitState::Moving);
        assert_eq!(unit.core().target(), None);
    }
}
