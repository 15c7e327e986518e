#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure player-control system that turns tile clicks into move and merge commands.

use robot_merge_core::{BoardView, Command, TileCoord};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Tile the player clicked on this frame, if the click landed on the board.
    pub clicked_tile: Option<TileCoord>,
    /// Indicates whether the player asked for an extra robot on this frame.
    pub spawn_requested: bool,
    /// Indicates whether the player asked to clear the board on this frame.
    pub reset_requested: bool,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        clicked_tile: Option<TileCoord>,
        spawn_requested: bool,
        reset_requested: bool,
    ) -> Self {
        Self {
            clicked_tile,
            spawn_requested,
            reset_requested,
        }
    }
}

/// Control system that translates player input into world commands.
#[derive(Debug, Default, Clone)]
pub struct Control;

impl Control {
    /// Creates a new control system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits commands for the provided input.
    ///
    /// `available_moves` should mirror the world's `query::available_moves`
    /// helper. Clicks outside it, or without a controlled robot, are ignored.
    pub fn handle(
        &self,
        input: ControlInput,
        board: BoardView<'_>,
        controlled: Option<TileCoord>,
        available_moves: &[TileCoord],
        out: &mut Vec<Command>,
    ) {
        if input.reset_requested {
            out.push(Command::ResetBoard);
        }

        if let (Some(target), Some(_)) = (input.clicked_tile, controlled) {
            if available_moves.contains(&target) {
                if board.is_empty(target) {
                    out.push(Command::MoveRobot { to: target });
                } else {
                    out.push(Command::MixRobot { into: target });
                }
            }
        }

        if input.spawn_requested {
            out.push(Command::SpawnRobot);
        }
    }
}
