//! Per-player combat bookkeeping for a single tick.

use std::time::Duration;

use skirmish_core::{EntityId, TargetView};

/// Length of `dt` in milliseconds, the unit of every cooldown.
pub(crate) fn millis(dt: Duration) -> f32 {
    dt.as_secs_f32() * 1000.0
}

/// Milliseconds between two attacks at `attack_speed` attacks per second.
///
/// A non-positive speed never attacks again.
pub(crate) fn cooldown_ms(attack_speed: f32) -> f32 {
    if attack_speed > 0.0 && attack_speed.is_finite() {
        1000.0 / attack_speed
    } else {
        f32::INFINITY
    }
}

/// Damage request produced by a tower or unit.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Strike {
    pub(crate) source: EntityId,
    pub(crate) target: EntityId,
    pub(crate) owner: EntityId,
    pub(crate) amount: f32,
}

/// Opponents visible to one player during its turn, plus the strikes its
/// entities queued.
///
/// Only the acting player's entities strike during its turn, so tracking the
/// projected health of each target here is equivalent to applying damage
/// immediately: a target that would fall is dropped from the view and no
/// later entity of the same turn can engage it.
#[derive(Debug)]
pub(crate) struct Engagement {
    targets: TargetView,
    health: Vec<(EntityId, f32)>,
    strikes: Vec<Strike>,
}

impl Engagement {
    pub(crate) fn new(targets: TargetView, health: Vec<(EntityId, f32)>) -> Self {
        Self {
            targets,
            health,
            strikes: Vec::new(),
        }
    }

    pub(crate) fn targets(&self) -> &TargetView {
        &self.targets
    }

    /// Queues `amount` damage from `source` against `target`.
    ///
    /// Ignored when the target already left the view.
    pub(crate) fn strike(&mut self, source: &EntityId, target: &EntityId, amount: f32) {
        let Some(snapshot) = self.targets.get(target) else {
            return;
        };
        let owner = snapshot.owner.clone();
        let amount = amount.max(0.0);

        let mut fallen = false;
        if let Some((_, health)) = self.health.iter_mut().find(|(id, _)| id == target) {
            *health = (*health - amount).max(0.0);
            fallen = *health <= 0.0;
        }
        if fallen {
            self.targets.remove(target);
        }

        self.strikes.push(Strike {
            source: source.clone(),
            target: target.clone(),
            owner,
            amount,
        });
    }

    pub(crate) fn into_strikes(self) -> Vec<Strike> {
        self.strikes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{TargetKind, TargetSnapshot, Vec2};

    fn engagement() -> Engagement {
        let target = TargetSnapshot {
            id: EntityId::new("p2_u_1"),
            owner: EntityId::new("p2"),
            kind: TargetKind::Unit,
            center: Vec2::ZERO,
        };
        Engagement::new(
            TargetView::from_snapshots(vec![target]),
            vec![(EntityId::new("p2_u_1"), 20.0)],
        )
    }

    #[test]
    fn lethal_strike_removes_target_from_view() {
        let mut engagement = engagement();
        let source = EntityId::new("p1_ti");
        let target = EntityId::new("p2_u_1");

        engagement.strike(&source, &target, 15.0);
        assert!(engagement.targets().get(&target).is_some());

        engagement.strike(&source, &target, 15.0);
        assert!(engagement.targets().get(&target).is_none());

        engagement.strike(&source, &target, 15.0);
        let strikes = engagement.into_strikes();
        assert_eq!(strikes.len(), 2);
        assert_eq!(strikes[0].owner, EntityId::new("p2"));
    }
}
