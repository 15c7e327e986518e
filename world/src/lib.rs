#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Robot Merge.

mod board;
mod controller;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robot_merge_core::{Adjacency, Command, Event, SpawnError, WELCOME_BANNER};

pub use board::Board;
pub use controller::{ControlOutcome, ControlState, Controller};

const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Parameters fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    seed: u64,
    adjacency: Adjacency,
}

impl WorldConfig {
    /// Creates a configuration from an RNG seed and an adjacency rule.
    #[must_use]
    pub const fn new(seed: u64, adjacency: Adjacency) -> Self {
        Self { seed, adjacency }
    }

    /// Seed for every random draw the world makes.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Adjacency rule used for moves and merges.
    #[must_use]
    pub const fn adjacency(&self) -> Adjacency {
        self.adjacency
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, Adjacency::default())
    }
}

/// Represents the authoritative Robot Merge world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    controller: Controller,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world whose first robot is already spawned and under control.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        let mut board = Board::new();
        let controller = Controller::new(&mut board, config.adjacency(), &mut rng);
        Self {
            banner: WELCOME_BANNER,
            board,
            controller,
            rng,
            tick_index: 0,
        }
    }

    /// Clears the board ahead of a spawn when no empty tile is left.
    fn make_room(&mut self, out_events: &mut Vec<Event>) {
        if self.board.is_full() {
            info!("board full, resetting before spawn");
            self.clear(out_events);
        }
    }

    fn clear(&mut self, out_events: &mut Vec<Event>) {
        self.board.reset();
        out_events.push(Event::BoardReset);
        if self.controller.has_controlled() {
            self.controller.release();
            out_events.push(Event::ControlReleased);
        }
    }

    fn record_outcome(outcome: ControlOutcome, out_events: &mut Vec<Event>) {
        match outcome {
            ControlOutcome::Moved { from, to, size } => {
                debug!("robot of size {} moved {from:?} -> {to:?}", size.get());
                out_events.push(Event::RobotMoved { from, to, size });
                out_events.push(Event::ControlReleased);
            }
            ControlOutcome::Mixed { from, into, size } => {
                debug!("robots mixed {from:?} -> {into:?} into size {}", size.get());
                out_events.push(Event::RobotsMixed { from, into, size });
                out_events.push(Event::ControlAcquired { cell: into });
            }
            ControlOutcome::Destroyed { from, into } => {
                debug!("maximum-size robots at {from:?} and {into:?} destroyed");
                out_events.push(Event::RobotsDestroyed { from, into });
                out_events.push(Event::ControlReleased);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SpawnRobot => {
            world.make_room(out_events);
            let size = board::random_size(&mut world.rng);
            let cell = world.board.spawn_random(size, &mut world.rng);
            debug!("spawned robot of size {} at {cell:?}", size.get());
            out_events.push(Event::RobotSpawned {
                cell,
                size,
                controlled: false,
            });
        }
        Command::SpawnControlledRobot => {
            if world.controller.has_controlled() {
                warn!("controlled spawn rejected: a robot is already under control");
                out_events.push(Event::SpawnRejected {
                    reason: SpawnError::AlreadyControlled,
                });
                return;
            }
            world.make_room(out_events);
            let (cell, size) = world.controller.spawn(&mut world.board, &mut world.rng);
            debug!("spawned controlled robot of size {} at {cell:?}", size.get());
            out_events.push(Event::RobotSpawned {
                cell,
                size,
                controlled: true,
            });
            out_events.push(Event::ControlAcquired { cell });
        }
        Command::MoveRobot { to } => match world.controller.move_to(&mut world.board, to) {
            Ok(outcome) => World::record_outcome(outcome, out_events),
            Err(reason) => {
                warn!("move to {to:?} rejected: {reason}");
                out_events.push(Event::MoveRejected { target: to, reason });
            }
        },
        Command::MixRobot { into } => match world.controller.mix_into(&mut world.board, into) {
            Ok(outcome) => World::record_outcome(outcome, out_events),
            Err(reason) => {
                warn!("mix into {into:?} rejected: {reason}");
                out_events.push(Event::MoveRejected {
                    target: into,
                    reason,
                });
            }
        },
        Command::ResetBoard => {
            info!("board reset requested");
            world.clear(out_events);
        }
    }
}

/// Read-only queries over the world state.
pub mod query {
    use robot_merge_core::{Adjacency, BoardView, RobotSize, TileCoord};

    use super::{ControlState, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of every tile.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.board.view()
    }

    /// Size of the robot at `cell`.
    #[must_use]
    pub fn size_at(world: &World, cell: TileCoord) -> RobotSize {
        world.board.get(cell)
    }

    /// Current control state.
    #[must_use]
    pub fn control_state(world: &World) -> ControlState {
        world.controller.state()
    }

    /// Tile of the controlled robot, if any.
    #[must_use]
    pub fn controlled(world: &World) -> Option<TileCoord> {
        world.controller.controlled()
    }

    /// Tiles the controlled robot may move to or merge into.
    #[must_use]
    pub fn available_moves(world: &World) -> Vec<TileCoord> {
        world.controller.available_moves(&world.board)
    }

    /// Reports whether the controlled robot may move to or merge into `cell`.
    #[must_use]
    pub fn can_move_to(world: &World, cell: TileCoord) -> bool {
        world.controller.can_move_to(&world.board, cell)
    }

    /// Adjacency rule in effect.
    #[must_use]
    pub fn adjacency(world: &World) -> Adjacency {
        world.controller.adjacency()
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_merge_core::{RobotSize, TileCoord};
    use std::time::Duration;

    fn occupied(world: &World) -> usize {
        query::board_view(world)
            .iter()
            .filter(|(_, size)| !size.is_empty())
            .count()
    }

    fn fill_board(world: &mut World) {
        for cell in TileCoord::all() {
            world.board.set(cell, RobotSize::MIN);
        }
    }

    #[test]
    fn new_world_starts_controlled() {
        let world = World::new();
        let cell = query::controlled(&world).expect("initial robot is controlled");

        assert!(!query::size_at(&world, cell).is_empty());
        assert_eq!(occupied(&world), 1);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn same_seed_produces_same_world() {
        let config = WorldConfig::new(99, Adjacency::Geometric);
        let first = World::with_config(config);
        let second = World::with_config(config);

        assert_eq!(first.board, second.board);
        assert_eq!(query::controlled(&first), query::controlled(&second));
        assert_eq!(query::adjacency(&first), Adjacency::Geometric);
    }

    #[test]
    fn tick_advances_time() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }]
        );
    }

    #[test]
    fn spawn_on_full_board_resets_and_releases_control() {
        let mut world = World::new();
        fill_board(&mut world);
        let mut events = Vec::new();

        apply(&mut world, Command::SpawnRobot, &mut events);

        assert_eq!(events[0], Event::BoardReset);
        assert_eq!(events[1], Event::ControlReleased);
        assert!(matches!(
            events[2],
            Event::RobotSpawned {
                controlled: false,
                ..
            }
        ));
        assert_eq!(occupied(&world), 1);
        assert_eq!(query::control_state(&world), ControlState::Uncontrolled);
    }

    #[test]
    fn controlled_spawn_is_rejected_while_controlled() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::SpawnControlledRobot, &mut events);

        assert_eq!(
            events,
            vec![Event::SpawnRejected {
                reason: SpawnError::AlreadyControlled
            }]
        );
        assert_eq!(occupied(&world), 1);
    }

    #[test]
    fn reset_clears_board_and_control() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::ResetBoard, &mut events);

        assert_eq!(events, vec![Event::BoardReset, Event::ControlReleased]);
        assert_eq!(occupied(&world), 0);
        assert!(query::available_moves(&world).is_empty());

        events.clear();
        apply(&mut world, Command::SpawnControlledRobot, &mut events);
        let cell = query::controlled(&world).expect("respawned robot is controlled");
        assert_eq!(events.last(), Some(&Event::ControlAcquired { cell }));
        assert_eq!(occupied(&world), 1);
    }
}
