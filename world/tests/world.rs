use robot_merge_core::{Adjacency, Command, Event, MoveError, RobotSize, TileCoord};
use robot_merge_world::{self as world, query, World, WorldConfig};

fn occupied_cells(world: &World) -> Vec<(TileCoord, RobotSize)> {
    query::board_view(world)
        .iter()
        .filter(|(_, size)| !size.is_empty())
        .collect()
}

#[test]
fn moving_releases_control_until_respawn() {
    let mut world = World::with_config(WorldConfig::new(17, Adjacency::FlatOffsets));
    let from = query::controlled(&world).expect("initial robot is controlled");
    let size = query::size_at(&world, from);
    let to = query::available_moves(&world)
        .into_iter()
        .find(|cell| query::board_view(&world).is_empty(*cell))
        .expect("empty neighbour on a nearly empty board");

    let mut events = Vec::new();
    world::apply(&mut world, Command::MoveRobot { to }, &mut events);

    assert_eq!(
        events,
        vec![
            Event::RobotMoved { from, to, size },
            Event::ControlReleased
        ]
    );
    assert_eq!(query::size_at(&world, to), size);
    assert!(query::size_at(&world, from).is_empty());
    assert_eq!(query::controlled(&world), None);

    events.clear();
    world::apply(&mut world, Command::MoveRobot { to: from }, &mut events);
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            target: from,
            reason: MoveError::NotControlled
        }]
    );

    events.clear();
    world::apply(&mut world, Command::SpawnControlledRobot, &mut events);
    let cell = query::controlled(&world).expect("respawn takes control");
    assert_eq!(occupied_cells(&world).len(), 2);
    assert_eq!(events.last(), Some(&Event::ControlAcquired { cell }));
}

#[test]
fn mixing_follows_the_merged_robot() {
    let mut world = World::with_config(WorldConfig::new(0xfeed, Adjacency::FlatOffsets));
    let mut mixed = false;

    for _ in 0..500 {
        let mut events = Vec::new();
        if query::controlled(&world).is_none() {
            world::apply(&mut world, Command::SpawnControlledRobot, &mut events);
            continue;
        }

        let from = query::controlled(&world).expect("checked above");
        let view = query::board_view(&world);
        let partner = query::available_moves(&world)
            .into_iter()
            .find(|cell| !view.is_empty(*cell));
        let Some(into) = partner else {
            world::apply(&mut world, Command::SpawnRobot, &mut events);
            continue;
        };

        let size = query::size_at(&world, from);
        world::apply(&mut world, Command::MixRobot { into }, &mut events);
        assert!(query::size_at(&world, from).is_empty());
        match size.grown() {
            Some(grown) => {
                assert_eq!(
                    events,
                    vec![
                        Event::RobotsMixed {
                            from,
                            into,
                            size: grown
                        },
                        Event::ControlAcquired { cell: into }
                    ]
                );
                assert_eq!(query::size_at(&world, into), grown);
                assert_eq!(query::controlled(&world), Some(into));
            }
            None => {
                assert_eq!(
                    events,
                    vec![Event::RobotsDestroyed { from, into }, Event::ControlReleased]
                );
                assert!(query::size_at(&world, into).is_empty());
                assert_eq!(query::controlled(&world), None);
            }
        }
        mixed = true;
        break;
    }

    assert!(mixed, "expected a mergeable neighbour to appear");
}

#[test]
fn rejected_mix_reports_reason() {
    let mut world = World::new();
    let controlled = query::controlled(&world).expect("initial robot is controlled");
    let empty_neighbour = query::available_moves(&world)[0];

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MixRobot {
            into: empty_neighbour,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            target: empty_neighbour,
            reason: MoveError::Vacant
        }]
    );
    assert_eq!(query::controlled(&world), Some(controlled));
}

#[test]
fn repeated_spawns_wrap_around_through_reset() {
    let mut world = World::new();
    let mut resets = 0;

    for _ in 0..60 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::SpawnRobot, &mut events);
        resets += events
            .iter()
            .filter(|event| matches!(event, Event::BoardReset))
            .count();
        for (cell, size) in occupied_cells(&world) {
            assert!(size <= RobotSize::MAX, "{cell:?} holds invalid size");
        }
    }

    // 24 free tiles after construction, then 25 per cycle.
    assert_eq!(resets, 2);
    assert_eq!(query::controlled(&world), None);
}
