//! Read-only snapshots of the entities a combatant may engage.

use crate::{EntityId, TowerKind, Vec2};

/// Category of an attackable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A mobile unit that finished spawning.
    Unit,
    /// A tower of the given tier.
    Tower(TowerKind),
}

/// Immutable description of a single live, targetable entity.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Identifier of the player that owns the entity.
    pub owner: EntityId,
    /// Category of the entity.
    pub kind: TargetKind,
    /// Center of the entity's body.
    pub center: Vec2,
}

/// Targetable opponents visible to one player, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by(|left, right| left.id.cmp(&right.id));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of `id`, if it is still targetable.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&TargetSnapshot> {
        self.snapshots
            .binary_search_by(|snapshot| snapshot.id.cmp(id))
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Drops `id` from the view once the entity is destroyed.
    pub fn remove(&mut self, id: &EntityId) {
        if let Ok(index) = self.snapshots.binary_search_by(|snapshot| snapshot.id.cmp(id)) {
            let _ = self.snapshots.remove(index);
        }
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether nothing is targetable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
