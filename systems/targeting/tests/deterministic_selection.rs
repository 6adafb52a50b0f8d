use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::{EntityId, TargetKind, TargetSnapshot, TargetView, TowerKind, Vec2};
use skirmish_system_targeting::{nearest_objective, nearest_within};

fn snapshot(id: &str, kind: TargetKind, x: f32, y: f32) -> TargetSnapshot {
    TargetSnapshot {
        id: EntityId::new(id),
        owner: EntityId::new("p2"),
        kind,
        center: Vec2::new(x, y),
    }
}

fn battlefield() -> Vec<TargetSnapshot> {
    vec![
        snapshot("p2_u_3", TargetKind::Unit, 3.0, 0.0),
        snapshot("p2_u_1", TargetKind::Unit, 0.0, 3.0),
        snapshot("p2_u_2", TargetKind::Unit, -3.0, 0.0),
        snapshot("p2_to_2", TargetKind::Tower(TowerKind::Outer), 0.0, 6.0),
        snapshot("p2_ti", TargetKind::Tower(TowerKind::Inner), 0.0, 12.0),
        snapshot("p2_u_4", TargetKind::Unit, 0.0, -9.0),
    ]
}

#[test]
fn selection_ignores_insertion_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let expected = TargetView::from_snapshots(battlefield());
    let nearest = nearest_within(Vec2::ZERO, 5.0, &expected).map(|target| target.id.clone());
    let objective = nearest_objective(Vec2::ZERO, &expected).map(|target| target.id.clone());

    assert_eq!(nearest, Some(EntityId::new("p2_u_1")));
    assert_eq!(objective, Some(EntityId::new("p2_ti")));

    for _ in 0..32 {
        let mut shuffled = battlefield();
        shuffled.shuffle(&mut rng);
        let view = TargetView::from_snapshots(shuffled);

        assert_eq!(
            nearest_within(Vec2::ZERO, 5.0, &view).map(|target| target.id.clone()),
            nearest
        );
        assert_eq!(
            nearest_objective(Vec2::ZERO, &view).map(|target| target.id.clone()),
            objective
        );
    }
}

#[test]
fn objective_is_found_beyond_any_range() {
    let view = TargetView::from_snapshots(battlefield());
    let origin = Vec2::new(0.0, -40.0);

    assert!(nearest_within(origin, 5.0, &view).is_none());
    assert_eq!(
        nearest_objective(origin, &view).map(|target| target.id.as_str()),
        Some("p2_ti")
    );
}
