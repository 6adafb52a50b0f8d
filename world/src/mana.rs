//! Regenerating, capped mana pool owned by each player.

use std::time::Duration;

use serde::Deserialize;
use skirmish_core::ManaError;

/// Shape of the input used to create a mana pool.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManaBlueprint {
    /// Mana available when the match starts.
    pub initial: f32,
    /// Upper bound of the pool.
    pub capacity: f32,
    /// Mana regenerated per second.
    pub regen_rate: f32,
}

/// Mana pool whose amount always stays within `0..=capacity`.
#[derive(Clone, Debug, PartialEq)]
pub struct ManaSystem {
    current: f32,
    capacity: f32,
    regen_rate: f32,
}

impl ManaSystem {
    /// Creates a pool from `blueprint`, clamping out-of-range values.
    #[must_use]
    pub fn new(blueprint: ManaBlueprint) -> Self {
        let capacity = finite_or_zero(blueprint.capacity).max(0.0);
        Self {
            current: finite_or_zero(blueprint.initial).clamp(0.0, capacity),
            capacity,
            regen_rate: finite_or_zero(blueprint.regen_rate),
        }
    }

    /// Regenerates mana for `dt`, never exceeding the capacity.
    pub fn update(&mut self, dt: Duration) {
        let regenerated = self.regen_rate * dt.as_secs_f32();
        self.current = (self.current + regenerated).clamp(0.0, self.capacity);
    }

    /// Mana currently available.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum amount the pool can hold.
    #[must_use]
    pub const fn capacity(&self) -> f32 {
        self.capacity
    }

    /// Mana regenerated per second.
    #[must_use]
    pub const fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    /// Withdraws `amount`, leaving the pool untouched when it cannot pay.
    pub fn spend(&mut self, amount: f32) -> Result<(), ManaError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ManaError::InvalidAmount(amount));
        }
        if amount > self.current {
            return Err(ManaError::Insufficient {
                required: amount,
                available: self.current,
            });
        }
        self.current = (self.current - amount).max(0.0);
        Ok(())
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn pool(initial: f32, capacity: f32, regen_rate: f32) -> ManaSystem {
        ManaSystem::new(ManaBlueprint {
            initial,
            capacity,
            regen_rate,
        })
    }

    #[test]
    fn regenerates_per_second() {
        let mut mana = pool(0.0, 10.0, 2.0);
        mana.update(Duration::from_millis(500));
        assert!((mana.current() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn regeneration_stops_at_capacity() {
        let mut mana = pool(9.5, 10.0, 2.0);
        mana.update(Duration::from_secs(5));
        assert_eq!(mana.current(), mana.capacity());
    }

    #[test]
    fn initial_amount_is_clamped() {
        assert_eq!(pool(25.0, 10.0, 0.0).current(), 10.0);
        assert_eq!(pool(-3.0, 10.0, 0.0).current(), 0.0);
    }

    #[test]
    fn spending_more_than_available_fails_without_change() {
        let mut mana = pool(3.0, 10.0, 0.0);
        assert_eq!(
            mana.spend(4.0),
            Err(ManaError::Insufficient {
                required: 4.0,
                available: 3.0
            })
        );
        assert_eq!(mana.current(), 3.0);

        assert_eq!(mana.spend(3.0), Ok(()));
        assert_eq!(mana.current(), 0.0);
    }

    #[test]
    fn negative_spend_is_rejected() {
        let mut mana = pool(3.0, 10.0, 0.0);
        assert_eq!(mana.spend(-1.0), Err(ManaError::InvalidAmount(-1.0)));
        assert_eq!(mana.current(), 3.0);
    }

    #[test]
    fn pool_stays_within_bounds_for_random_ticks() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xa11c_e5);
        for _ in 0..32 {
            let capacity = rng.gen_range(0.0..20.0);
            let regen_rate = rng.gen_range(-5.0..5.0);
            let mut mana = pool(rng.gen_range(-5.0..25.0), capacity, regen_rate);
            for _ in 0..200 {
                mana.update(Duration::from_millis(rng.gen_range(0..400)));
                if rng.gen_bool(0.2) {
                    let _ = mana.spend(rng.gen_range(0.0..5.0));
                }
                assert!(mana.current() >= 0.0);
                assert!(mana.current() <= mana.capacity());
            }
        }
    }
}
