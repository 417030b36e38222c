#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Two coordinate spaces exist side by side: [`CellCoord`] addresses the
//! logical cell lattice and [`GridCoord`] addresses the expanded wall/open
//! grid. They are distinct types so the spaces cannot be mixed by accident.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Runner. Find the way out.";

/// Progress of the player through the active maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// The player is still inside the maze.
    Playing,
    /// The player reached the outer boundary. Terminal until a new maze is generated.
    Won,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current maze and generates a fresh one with the provided dimensions.
    GenerateMaze {
        /// Size of the cell lattice backing the new maze.
        dimensions: Dimensions,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player move onto the provided expanded-grid tile.
    MovePlayer {
        /// Destination tile. Must be open and within one step of the player.
        to: GridCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new maze replaced the previous one.
    MazeGenerated {
        /// Monotonic counter identifying the maze within the session.
        generation: u64,
        /// Size of the cell lattice backing the maze.
        dimensions: Dimensions,
        /// Tile the player starts on.
        player: GridCoord,
        /// Boundary tile carved open as the exit.
        exit: GridCoord,
    },
    /// Reports that a generation request was refused and the previous maze kept.
    GenerationRejected {
        /// Dimensions supplied with the rejected request.
        dimensions: Dimensions,
        /// Specific reason the request failed.
        reason: MazeError,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: GridCoord,
        /// Tile the player occupies after the move.
        to: GridCoord,
    },
    /// Reports that a move request was refused and the player stayed in place.
    MoveRejected {
        /// Destination supplied with the rejected request.
        to: GridCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Announces that the player reached the boundary and won the maze.
    PlayerEscaped {
        /// Boundary tile on which the player arrived.
        at: GridCoord,
    },
}

/// Cardinal directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Reports whether the direction moves along the row axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Side of the expanded grid on which the exit is carved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Row zero.
    North,
    /// Last row.
    South,
    /// Last column.
    East,
    /// Column zero.
    West,
}

impl Side {
    /// Every side in the order used when one is drawn at random.
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];
}

/// Location of a single lattice cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new lattice cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Tile of the expanded grid that renders this cell's interior.
    #[must_use]
    pub const fn to_grid(self) -> GridCoord {
        GridCoord::new(self.row * 2 + 1, self.column * 2 + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Location of a single tile in the expanded wall/open grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    row: u32,
    column: u32,
}

impl GridCoord {
    /// Creates a new expanded-grid coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Adjacent tile in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the caller's concern since only the grid knows them.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (row, column) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.column),
            Direction::South => (self.row.checked_add(1)?, self.column),
            Direction::East => (self.row, self.column.checked_add(1)?),
            Direction::West => (self.row, self.column.checked_sub(1)?),
        };
        Some(Self::new(row, column))
    }

    /// Lattice cell rendered at this tile, if the tile is a cell interior.
    #[must_use]
    pub const fn to_cell(self) -> Option<CellCoord> {
        if self.row % 2 == 1 && self.column % 2 == 1 {
            Some(CellCoord::new(self.row / 2, self.column / 2))
        } else {
            None
        }
    }

    /// Computes the Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Size of a cell lattice measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    rows: u32,
    columns: u32,
}

impl Dimensions {
    /// Largest number of cells a maze may span along either axis.
    pub const MAX_EXTENT: u32 = 1024;

    /// Creates a new size descriptor. Validation happens when a lattice is built.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the expanded grid derived from these dimensions.
    #[must_use]
    pub const fn grid_rows(&self) -> u32 {
        self.rows * 2 + 1
    }

    /// Number of columns in the expanded grid derived from these dimensions.
    #[must_use]
    pub const fn grid_columns(&self) -> u32 {
        self.columns * 2 + 1
    }

    /// Reports whether both dimensions lie within `1..=MAX_EXTENT`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        Self::extent_in_range(self.rows) && Self::extent_in_range(self.columns)
    }

    /// Reports whether a single axis length is usable for a maze.
    #[must_use]
    pub const fn extent_in_range(extent: u32) -> bool {
        extent >= 1 && extent <= Self::MAX_EXTENT
    }
}

/// Content of a single expanded-grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable wall or corner post.
    Wall,
    /// Floor the player can stand on.
    Open,
}

impl Tile {
    /// Reports whether the tile can be entered.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Maps an edge's open flag onto the tile that renders it.
    #[must_use]
    pub const fn from_open(open: bool) -> Self {
        if open {
            Self::Open
        } else {
            Self::Wall
        }
    }
}

/// Failures raised by lattice construction, grid queries and path finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The lattice must contain at least one row and one column.
    #[error("maze dimensions must be at least 1x1 (received {rows}x{columns})")]
    InvalidDimension {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// A lattice coordinate, or the neighbor across the addressed edge, lies outside the lattice.
    #[error("cell {0} lies outside the lattice")]
    CellOutOfBounds(CellCoord),
    /// Two cells that were expected to share an edge are not orthogonal neighbors.
    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent {
        /// First cell of the pair.
        from: CellCoord,
        /// Second cell of the pair.
        to: CellCoord,
    },
    /// A grid coordinate lies outside the expanded grid.
    #[error("tile {0} lies outside the grid")]
    OutOfBounds(GridCoord),
    /// Breadth-first search exhausted the reachable region without finding the goal.
    #[error("no path from {start} to {goal}")]
    NoPath {
        /// Tile the search started from.
        start: GridCoord,
        /// Tile the search attempted to reach.
        goal: GridCoord,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The destination lies outside the expanded grid.
    OutOfBounds,
    /// The destination is a wall.
    Wall,
    /// The destination is not within one step, diagonals included, of the player.
    NotAdjacent,
    /// The player already escaped, so the maze accepts no further moves.
    GameOver,
}
