//! Ordered chains of value modifiers used to derive effective stats.

use std::fmt;

/// Modifier applied to the running value of an [`Interceptable`].
pub type Interceptor<V, C> = Box<dyn Fn(V, &C) -> V>;

/// Handle that identifies a single registration within an [`Interceptable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterceptorHandle(u64);

struct Entry<V, C> {
    priority: i32,
    sequence: u64,
    handle: InterceptorHandle,
    modifier: Interceptor<V, C>,
}

/// Folds a base value through registered modifiers.
///
/// Modifiers run in ascending priority; equal priorities run in registration
/// order. Registering the same behaviour twice applies it twice.
pub struct Interceptable<V, C> {
    entries: Vec<Entry<V, C>>,
    next_sequence: u64,
}

impl<V, C> Interceptable<V, C> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Registers `modifier` at `priority` and returns its removal handle.
    pub fn add(&mut self, modifier: Interceptor<V, C>, priority: i32) -> InterceptorHandle {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        let handle = InterceptorHandle(sequence);

        // entries stay sorted by (priority, sequence)
        let index = self
            .entries
            .partition_point(|entry| (entry.priority, entry.sequence) <= (priority, sequence));
        self.entries.insert(
            index,
            Entry {
                priority,
                sequence,
                handle,
                modifier,
            },
        );
        handle
    }

    /// Removes the modifier registered under `handle`.
    ///
    /// Returns `false` without touching the chain when the handle is unknown.
    pub fn remove(&mut self, handle: InterceptorHandle) -> bool {
        match self.entries.iter().position(|entry| entry.handle == handle) {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no modifier is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds `base` through every modifier and returns the effective value.
    #[must_use]
    pub fn get_value(&self, base: V, context: &C) -> V {
        self.entries
            .iter()
            .fold(base, |value, entry| (entry.modifier)(value, context))
    }
}

impl<V, C> Default for Interceptable<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> fmt::Debug for Interceptable<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let priorities: Vec<i32> = self.entries.iter().map(|entry| entry.priority).collect();
        f.debug_struct("Interceptable")
            .field("priorities", &priorities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{seq::SliceRandom, Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn tagging(tag: u32) -> Interceptor<Vec<u32>, ()> {
        Box::new(move |mut trail: Vec<u32>, _: &()| {
            trail.push(tag);
            trail
        })
    }

    #[test]
    fn empty_chain_returns_base() {
        let chain: Interceptable<f32, ()> = Interceptable::new();
        assert_eq!(chain.get_value(12.5, &()), 12.5);
        assert!(chain.is_empty());
    }

    #[test]
    fn lower_priority_applies_first() {
        let mut chain: Interceptable<f32, ()> = Interceptable::new();
        let _ = chain.add(Box::new(|value, _| value * 2.0), 10);
        let _ = chain.add(Box::new(|value, _| value + 3.0), -5);

        assert_eq!(chain.get_value(1.0, &()), 8.0);
    }

    #[test]
    fn ties_keep_registration_order() {
        let mut chain = Interceptable::new();
        let _ = chain.add(tagging(1), 0);
        let _ = chain.add(tagging(2), 0);
        let _ = chain.add(tagging(3), 0);

        assert_eq!(chain.get_value(Vec::new(), &()), vec![1, 2, 3]);
    }

    #[test]
    fn removal_keeps_remaining_order() {
        let mut chain = Interceptable::new();
        let first = chain.add(tagging(1), 1);
        let _ = chain.add(tagging(2), 1);
        let _ = chain.add(tagging(3), 0);

        assert!(chain.remove(first));
        assert!(!chain.remove(first));
        assert_eq!(chain.get_value(Vec::new(), &()), vec![3, 2]);

        let _ = chain.add(tagging(4), 1);
        assert_eq!(chain.get_value(Vec::new(), &()), vec![3, 2, 4]);
    }

    #[test]
    fn duplicate_registrations_apply_twice() {
        let mut chain: Interceptable<f32, ()> = Interceptable::new();
        let _ = chain.add(Box::new(|value, _| value + 1.0), 0);
        let _ = chain.add(Box::new(|value, _| value + 1.0), 0);
        assert_eq!(chain.get_value(0.0, &()), 2.0);
    }

    #[test]
    fn modifiers_observe_context() {
        let mut chain: Interceptable<f32, f32> = Interceptable::new();
        let _ = chain.add(Box::new(|value, bonus| value + *bonus), 0);
        assert_eq!(chain.get_value(3.0, &4.0), 7.0);
    }

    #[test]
    fn application_order_follows_priority_for_random_registrations() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_1234);
        for _ in 0..64 {
            let count = rng.gen_range(1..12);
            let mut priorities: Vec<(i32, u32)> = (0..count)
                .map(|tag| (rng.gen_range(-4..4), tag))
                .collect();
            priorities.shuffle(&mut rng);

            let mut chain = Interceptable::new();
            for (priority, tag) in &priorities {
                let _ = chain.add(tagging(*tag), *priority);
            }

            // stable sort keeps registration order among equal priorities
            let mut expected = priorities.clone();
            expected.sort_by_key(|(priority, _)| *priority);
            let expected: Vec<u32> = expected.into_iter().map(|(_, tag)| tag).collect();

            assert_eq!(chain.get_value(Vec::new(), &()), expected);
        }
    }
}
