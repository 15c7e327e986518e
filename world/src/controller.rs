//! Tracks the robot under player control and applies its moves and merges.

use rand::Rng;
use robot_merge_core::{Adjacency, MoveError, RobotSize, TileCoord};

use crate::board::{random_size, Board};

/// Whether a robot is under player control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// The robot at the contained tile is under control.
    Controlled(TileCoord),
    /// No robot is under control; the next spawn will take control.
    Uncontrolled,
}

/// Board mutation produced by a successful move or merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlOutcome {
    /// The controlled robot moved onto an empty tile and was released.
    Moved {
        /// Tile the robot left.
        from: TileCoord,
        /// Tile the robot now occupies.
        to: TileCoord,
        /// Size of the moved robot.
        size: RobotSize,
    },
    /// The controlled robot merged into its neighbour and control followed it.
    Mixed {
        /// Tile the robot left.
        from: TileCoord,
        /// Tile holding the merged robot.
        into: TileCoord,
        /// Size of the merged robot.
        size: RobotSize,
    },
    /// Two maximum-size robots merged and both left the board.
    Destroyed {
        /// Tile the controlled robot left.
        from: TileCoord,
        /// Tile of the robot it merged with.
        into: TileCoord,
    },
}

/// Owns the controlled position and the adjacency rule used for its moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controller {
    state: ControlState,
    adjacency: Adjacency,
}

impl Controller {
    /// Spawns a robot of random size on a random empty tile and takes control of it.
    pub fn new<R>(board: &mut Board, adjacency: Adjacency, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut controller = Self {
            state: ControlState::Uncontrolled,
            adjacency,
        };
        let _ = controller.spawn(board, rng);
        controller
    }

    /// Places a fresh robot of random size and makes it the controlled one.
    ///
    /// Any previously controlled robot stays on the board uncontrolled.
    pub fn spawn<R>(&mut self, board: &mut Board, rng: &mut R) -> (TileCoord, RobotSize)
    where
        R: Rng + ?Sized,
    {
        let size = random_size(rng);
        let cell = board.spawn_random(size, rng);
        self.state = ControlState::Controlled(cell);
        (cell, size)
    }

    /// Current control state.
    #[must_use]
    pub const fn state(&self) -> ControlState {
        self.state
    }

    /// Tile of the controlled robot, if any.
    #[must_use]
    pub const fn controlled(&self) -> Option<TileCoord> {
        match self.state {
            ControlState::Controlled(cell) => Some(cell),
            ControlState::Uncontrolled => None,
        }
    }

    /// Reports whether a robot is under control.
    #[must_use]
    pub const fn has_controlled(&self) -> bool {
        matches!(self.state, ControlState::Controlled(_))
    }

    /// Adjacency rule applied by [`Controller::available_moves`].
    #[must_use]
    pub const fn adjacency(&self) -> Adjacency {
        self.adjacency
    }

    /// Drops control without touching the board.
    pub fn release(&mut self) {
        self.state = ControlState::Uncontrolled;
    }

    /// Neighbouring tiles that are empty or hold a robot of the controlled size.
    #[must_use]
    pub fn available_moves(&self, board: &Board) -> Vec<TileCoord> {
        let Some(origin) = self.controlled() else {
            return Vec::new();
        };
        let size = board.get(origin);
        self.adjacency
            .neighbors(origin)
            .into_iter()
            .filter(|neighbor| {
                let occupant = board.get(*neighbor);
                occupant.is_empty() || occupant == size
            })
            .collect()
    }

    /// Reports whether `cell` is one of the [`Controller::available_moves`].
    #[must_use]
    pub fn can_move_to(&self, board: &Board, cell: TileCoord) -> bool {
        self.available_moves(board).contains(&cell)
    }

    /// Moves the controlled robot onto the empty tile `to` and releases control.
    pub fn move_to(
        &mut self,
        board: &mut Board,
        to: TileCoord,
    ) -> Result<ControlOutcome, MoveError> {
        let from = self.controlled().ok_or(MoveError::NotControlled)?;
        if !board.is_empty(to) {
            return Err(MoveError::Occupied);
        }
        if !self.can_move_to(board, to) {
            return Err(MoveError::Unreachable);
        }

        let size = board.get(from);
        board.set(to, size);
        board.set(from, RobotSize::EMPTY);
        self.release();
        Ok(ControlOutcome::Moved { from, to, size })
    }

    /// Merges the controlled robot into the equal-sized robot at `into`.
    ///
    /// Below the maximum size the merged robot stays under control. At the
    /// maximum both robots are removed and control is released.
    pub fn mix_into(
        &mut self,
        board: &mut Board,
        into: TileCoord,
    ) -> Result<ControlOutcome, MoveError> {
        let from = self.controlled().ok_or(MoveError::NotControlled)?;
        let size = board.get(from);
        let target = board.get(into);
        if target.is_empty() {
            return Err(MoveError::Vacant);
        }
        if target != size {
            return Err(MoveError::SizeMismatch);
        }
        if !self.can_move_to(board, into) {
            return Err(MoveError::Unreachable);
        }

        board.set(from, RobotSize::EMPTY);
        match size.grown() {
            Some(grown) => {
                board.set(into, grown);
                self.state = ControlState::Controlled(into);
                Ok(ControlOutcome::Mixed {
                    from,
                    into,
                    size: grown,
                })
            }
            None => {
                board.set(into, RobotSize::EMPTY);
                self.release();
                Ok(ControlOutcome::Destroyed { from, into })
            }
        }
    }
}
