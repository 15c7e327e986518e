#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robot Merge crates.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative world, and pure systems. Adapters and systems
//! submit [`Command`] values describing desired mutations, the world executes
//! them via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to. Systems consume event streams, query read-only views
//! such as [`BoardView`], and respond exclusively with new command batches.
//!
//! The board is a fixed 5×5 grid. Coordinates grow to the right (`x`) and up
//! (`y`), while the flat storage index grows to the right and *down*, hence the
//! row flip in [`to_flat_index`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Robot Merge.";

/// Number of tiles along each edge of the board.
pub const GRID_SIDE: u8 = 5;

/// Total number of tiles on the board.
pub const CELL_COUNT: usize = GRID_SIDE as usize * GRID_SIDE as usize;

/// Flat-index offsets of the 3×3 neighbourhood minus its centre.
pub const NEIGHBOR_OFFSETS: [isize; 8] = [-6, -5, -4, -1, 1, 4, 5, 6];

/// Converts a tile coordinate into its flat storage index.
///
/// `index = (4 - y) * 5 + x`.
pub fn to_flat_index(x: u8, y: u8) -> Result<usize, CoordError> {
    if x >= GRID_SIDE || y >= GRID_SIDE {
        return Err(CoordError::OutOfBounds { x, y });
    }
    let side = usize::from(GRID_SIDE);
    Ok((side - 1 - usize::from(y)) * side + usize::from(x))
}

/// Converts a flat storage index back into an `(x, y)` pair.
pub fn from_flat_index(index: usize) -> Result<(u8, u8), CoordError> {
    if index >= CELL_COUNT {
        return Err(CoordError::IndexOutOfBounds { index });
    }
    let side = usize::from(GRID_SIDE);
    let x = index % side;
    let y = side - 1 - (index - x) / side;
    // Both components are below GRID_SIDE, so the narrowing is lossless.
    Ok((x as u8, y as u8))
}

/// Errors raised when constructing board values from untrusted integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CoordError {
    /// The coordinate lies outside the 5×5 board.
    #[error("tile ({x}, {y}) lies outside the board")]
    OutOfBounds {
        /// Rejected column.
        x: u8,
        /// Rejected row.
        y: u8,
    },
    /// The flat index lies outside `0..CELL_COUNT`.
    #[error("flat index {index} lies outside the board")]
    IndexOutOfBounds {
        /// Rejected flat index.
        index: usize,
    },
    /// The robot size lies outside `0..=RobotSize::MAX`.
    #[error("robot size {size} exceeds the maximum of {}", RobotSize::MAX.get())]
    InvalidSize {
        /// Rejected size.
        size: u8,
    },
}

/// Location of a single board tile.
///
/// A `TileCoord` is always within the board; every constructor validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct TileCoord {
    x: u8,
    y: u8,
}

impl TileCoord {
    /// Creates a coordinate, failing when it lies outside the board.
    pub fn new(x: u8, y: u8) -> Result<Self, CoordError> {
        let _ = to_flat_index(x, y)?;
        Ok(Self { x, y })
    }

    /// Creates the coordinate stored at the provided flat index.
    pub fn from_flat_index(index: usize) -> Result<Self, CoordError> {
        let (x, y) = from_flat_index(index)?;
        Ok(Self { x, y })
    }

    /// Zero-based column, growing to the right.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row, growing upwards.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Flat storage index of the tile.
    #[must_use]
    pub const fn flat_index(&self) -> usize {
        (GRID_SIDE as usize - 1 - self.y as usize) * GRID_SIDE as usize + self.x as usize
    }

    /// Iterates every tile on the board in ascending flat-index order.
    pub fn all() -> impl Iterator<Item = TileCoord> {
        (0..CELL_COUNT).map(|index| {
            let (x, y) = from_flat_index(index).unwrap_or((0, 0));
            TileCoord { x, y }
        })
    }
}

impl TryFrom<(u8, u8)> for TileCoord {
    type Error = CoordError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<TileCoord> for (u8, u8) {
    fn from(cell: TileCoord) -> Self {
        (cell.x, cell.y)
    }
}

/// Size of a robot occupying a tile. Size zero means the tile is empty.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct RobotSize(u8);

impl RobotSize {
    /// The size stored in empty tiles.
    pub const EMPTY: Self = Self(0);

    /// Smallest size a living robot can have.
    pub const MIN: Self = Self(1);

    /// Largest size a robot can reach before a merge destroys it.
    pub const MAX: Self = Self(4);

    /// Number of entries in the size to colour table.
    pub const PALETTE_LEN: usize = Self::MAX.0 as usize + 1;

    /// Creates a size, failing when it exceeds [`RobotSize::MAX`].
    pub fn new(size: u8) -> Result<Self, CoordError> {
        if size > Self::MAX.0 {
            return Err(CoordError::InvalidSize { size });
        }
        Ok(Self(size))
    }

    /// Numeric value of the size.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether this size denotes an empty tile.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Size produced by merging two robots of this size.
    ///
    /// Returns `None` when the result would reach [`RobotSize::PALETTE_LEN`],
    /// in which case the merge destroys both robots.
    #[must_use]
    pub const fn grown(self) -> Option<Self> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<u8> for RobotSize {
    type Error = CoordError;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<RobotSize> for u8 {
    fn from(size: RobotSize) -> Self {
        size.0
    }
}

/// Rule used to decide which tiles neighbour a controlled robot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adjacency {
    /// Pure flat-index arithmetic with [`NEIGHBOR_OFFSETS`], bounded only by the
    /// index range. Tiles on the left edge therefore neighbour tiles on the
    /// right edge of adjacent rows.
    #[default]
    FlatOffsets,
    /// The geometric 8-neighbourhood. Offsets that would wrap across a row
    /// boundary are discarded.
    Geometric,
}

impl Adjacency {
    /// Lists the tiles adjacent to `origin` in ascending flat-index order.
    #[must_use]
    pub fn neighbors(self, origin: TileCoord) -> Vec<TileCoord> {
        let base = origin.flat_index() as isize;
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|offset| usize::try_from(base + offset).ok())
            .filter_map(|index| TileCoord::from_flat_index(index).ok())
            .filter(|neighbor| match self {
                Self::FlatOffsets => true,
                Self::Geometric => neighbor.x().abs_diff(origin.x()) <= 1,
            })
            .collect()
    }
}

/// Trigger that decides when uncontrolled robots appear on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnPolicy {
    /// Robots only appear through respawns and explicit player requests.
    #[default]
    PlayerDriven,
    /// In addition, one random robot appears every elapsed tick interval.
    OnTick,
}

/// Reasons a move or merge request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// No robot is currently under player control.
    #[error("no robot is under control")]
    NotControlled,
    /// The destination is not adjacent to the controlled robot.
    #[error("destination is not reachable from the controlled robot")]
    Unreachable,
    /// A plain move targeted an occupied tile.
    #[error("destination is occupied")]
    Occupied,
    /// A merge targeted an empty tile.
    #[error("destination holds no robot to merge with")]
    Vacant,
    /// A merge targeted a robot of a different size.
    #[error("destination robot has a different size")]
    SizeMismatch,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SpawnError {
    /// A controlled robot was requested while one is already under control.
    #[error("a robot is already under control")]
    AlreadyControlled,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places an uncontrolled robot of random size on a random empty tile.
    SpawnRobot,
    /// Places a robot of random size on a random empty tile and takes control of it.
    SpawnControlledRobot,
    /// Moves the controlled robot onto an adjacent empty tile.
    MoveRobot {
        /// Destination tile.
        to: TileCoord,
    },
    /// Merges the controlled robot into an adjacent robot of equal size.
    MixRobot {
        /// Tile holding the robot to merge into.
        into: TileCoord,
    },
    /// Clears every tile on the board.
    ResetBoard,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a robot was placed on the board.
    RobotSpawned {
        /// Tile the robot occupies.
        cell: TileCoord,
        /// Size of the new robot.
        size: RobotSize,
        /// Whether the robot is now under player control.
        controlled: bool,
    },
    /// Announces that every tile was cleared.
    BoardReset,
    /// Announces that the player now controls the robot at `cell`.
    ControlAcquired {
        /// Tile holding the controlled robot.
        cell: TileCoord,
    },
    /// Announces that no robot is under control any more.
    ControlReleased,
    /// Confirms that the controlled robot moved onto an empty tile.
    RobotMoved {
        /// Tile the robot left.
        from: TileCoord,
        /// Tile the robot now occupies.
        to: TileCoord,
        /// Size of the moved robot.
        size: RobotSize,
    },
    /// Confirms that two robots merged into a larger one.
    RobotsMixed {
        /// Tile the controlled robot left.
        from: TileCoord,
        /// Tile holding the merged robot.
        into: TileCoord,
        /// Size of the merged robot.
        size: RobotSize,
    },
    /// Confirms that two maximum-size robots merged and left the board.
    RobotsDestroyed {
        /// Tile the controlled robot left.
        from: TileCoord,
        /// Tile of the robot it merged with.
        into: TileCoord,
    },
    /// Reports that a move or merge request was rejected.
    MoveRejected {
        /// Tile named in the request.
        target: TileCoord,
        /// Specific reason the request failed.
        reason: MoveError,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Specific reason the request failed.
        reason: SpawnError,
    },
}

/// Read-only view into the board's tile sizes.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [RobotSize; CELL_COUNT],
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided cells in flat-index order.
    #[must_use]
    pub const fn new(cells: &'a [RobotSize; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Size of the robot at `cell`, or [`RobotSize::EMPTY`].
    #[must_use]
    pub fn size_at(&self, cell: TileCoord) -> RobotSize {
        self.cells[cell.flat_index()]
    }

    /// Reports whether `cell` holds no robot.
    #[must_use]
    pub fn is_empty(&self, cell: TileCoord) -> bool {
        self.size_at(cell).is_empty()
    }

    /// Iterates every tile with its size in ascending flat-index order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, RobotSize)> + 'a {
        let cells = self.cells;
        TileCoord::all().map(move |cell| (cell, cells[cell.flat_index()]))
    }
}
