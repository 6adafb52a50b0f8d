#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects deterministic targets from a [`TargetView`].
//!
//! Distances are measured between body centers. Candidates at equal distance
//! are ordered by identifier so that two runs over the same view always pick
//! the same target.

use skirmish_core::{TargetKind, TargetSnapshot, TargetView, TowerKind, Vec2};

/// Selects the nearest target whose center lies within `range` of `origin`.
#[must_use]
pub fn nearest_within<'view>(
    origin: Vec2,
    range: f32,
    targets: &'view TargetView,
) -> Option<&'view TargetSnapshot> {
    select(origin, targets, |_, distance| distance <= range)
}

/// Selects the nearest opposing inner tower regardless of range.
///
/// Units without a target in aggro range advance toward this objective.
#[must_use]
pub fn nearest_objective<'view>(
    origin: Vec2,
    targets: &'view TargetView,
) -> Option<&'view TargetSnapshot> {
    select(origin, targets, |snapshot, _| {
        snapshot.kind == TargetKind::Tower(TowerKind::Inner)
    })
}

/// Reports whether `target` lies within `range` of `origin`.
#[must_use]
pub fn in_range(origin: Vec2, range: f32, target: &TargetSnapshot) -> bool {
    origin.distance(target.center) <= range
}

fn select<'view, F>(
    origin: Vec2,
    targets: &'view TargetView,
    accept: F,
) -> Option<&'view TargetSnapshot>
where
    F: Fn(&TargetSnapshot, f32) -> bool,
{
    let mut best: Option<BestCandidate<'view>> = None;

    for snapshot in targets.iter() {
        let distance = origin.distance(snapshot.center);
        if !accept(snapshot, distance) {
            continue;
        }

        let current = BestCandidate { distance, snapshot };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.snapshot)
}

#[derive(Clone, Copy, Debug)]
struct BestCandidate<'view> {
    distance: f32,
    snapshot: &'view TargetSnapshot,
}

impl BestCandidate<'_> {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.snapshot.id < other.snapshot.id
    }
}
