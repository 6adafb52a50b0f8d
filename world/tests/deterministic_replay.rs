use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use skirmish_core::{Bbox, CardId, Command, EntityId, Event, GameConfig, UnitBlueprint, Vec2};
use skirmish_world::{
    self as world, query, Card, DeckBlueprint, ManaBlueprint, PlayerBlueprint, Session,
    SessionBlueprint, TeamBlueprint,
};

const TICK: Duration = Duration::from_millis(50);
const MATCH_TICKS: usize = 1_200;

#[test]
fn deterministic_replay_produces_identical_streams() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    let deployed = first
        .events
        .iter()
        .filter(|event| event.starts_with("{\"type\":\"unitDeployed\""))
        .count();
    assert_eq!(deployed, 6);
    assert!(
        first
            .events
            .iter()
            .any(|event| event.starts_with("{\"type\":\"damageDealt\"")),
        "scripted units must engage"
    );
    assert!(
        first
            .events
            .iter()
            .any(|event| event.starts_with("{\"type\":\"cardPlayed\"")),
        "scripted card play must resolve"
    );
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<String>,
    snapshot: String,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.events.hash(&mut hasher);
        self.snapshot.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut session = session();
    let mut events = Vec::new();

    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut session, command, &mut generated);
        events.extend(generated.iter().map(encode));
    }

    let snapshot = serde_json::to_string(&query::snapshot(&session)).expect("snapshot serializes");
    ReplayOutcome { events, snapshot }
}

fn encode(event: &Event) -> String {
    serde_json::to_string(event).expect("event serializes")
}

fn session() -> Session {
    let player = |id: &str, inner: Vec2, outer: Vec<Vec2>| PlayerBlueprint {
        id: EntityId::new(id),
        inner_tower: inner,
        outer_towers: outer,
        mana: ManaBlueprint {
            initial: 4.0,
            capacity: 10.0,
            regen_rate: 0.5,
        },
        deck: DeckBlueprint {
            cards: vec![
                Card {
                    id: CardId::new("volley"),
                    cost: 3.0,
                },
                Card {
                    id: CardId::new("surge"),
                    cost: 2.0,
                },
            ],
            hand_size: 1,
        },
    };
    let blueprint = SessionBlueprint {
        teams: vec![
            TeamBlueprint {
                id: EntityId::new("blue"),
                deploy_zone: Bbox::new(Vec2::new(0.0, -6.0), 12.0, 12.0),
                players: vec![player(
                    "p1",
                    Vec2::new(0.0, -11.0),
                    vec![Vec2::new(-3.0, -8.0), Vec2::new(3.0, -8.0)],
                )],
            },
            TeamBlueprint {
                id: EntityId::new("red"),
                deploy_zone: Bbox::new(Vec2::new(0.0, 6.0), 12.0, 12.0),
                players: vec![player(
                    "p2",
                    Vec2::new(0.0, 11.0),
                    vec![Vec2::new(-3.0, 8.0), Vec2::new(3.0, 8.0)],
                )],
            },
        ],
    };
    Session::new(GameConfig::default(), &blueprint).expect("valid session")
}

fn scripted_commands() -> Vec<Command> {
    let knight = UnitBlueprint {
        attack: 12.0,
        attack_speed: 1.2,
        attack_range: 1.0,
        aggro_range: 4.0,
        health: 120.0,
        spawn_time_ms: 500,
        speed: 1.5,
        width: 0.6,
        height: 0.6,
    };
    let archer = UnitBlueprint {
        attack: 6.0,
        attack_speed: 1.5,
        attack_range: 3.5,
        aggro_range: 5.0,
        health: 60.0,
        spawn_time_ms: 300,
        speed: 1.2,
        width: 0.4,
        height: 0.4,
    };

    let deploy = |player: &str, blueprint: UnitBlueprint, x: f32, y: f32| Command::DeployUnit {
        player: EntityId::new(player),
        blueprint,
        position: Vec2::new(x, y),
    };

    let mut commands = vec![
        deploy("p1", knight, -1.0, -2.0),
        deploy("p1", archer, 1.0, -3.0),
        deploy("p2", knight, 1.0, 2.0),
        deploy("p2", archer, -1.0, 3.0),
        // Outside blue's zone: rejected.
        deploy("p1", knight, 0.0, 4.0),
    ];
    for tick in 0..MATCH_TICKS {
        if tick == 40 {
            commands.push(deploy("p1", knight, 0.0, -1.0));
            commands.push(Command::PlayCard {
                player: EntityId::new("p2"),
                card: CardId::new("volley"),
                target: Vec2::new(0.0, -2.0),
            });
        }
        if tick == 80 {
            commands.push(deploy("p2", knight, 0.5, 1.0));
        }
        commands.push(Command::Tick { dt: TICK });
    }
    commands
}
