//! Expanded wall/open grid derived from a cell lattice.

use maze_runner_core::{CellCoord, GridCoord, MazeError, Side, Tile};
use rand::Rng;

use crate::{generation::random_below, lattice::CellLattice};

/// (2H+1)×(2W+1) tile grid where odd/odd tiles are cell interiors and the
/// remaining tiles encode walls and corner posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedGrid {
    rows: u32,
    columns: u32,
    tiles: Vec<Tile>,
    exit: Option<GridCoord>,
}

impl ExpandedGrid {
    /// Projects the lattice onto a renderable grid. No exit is carved.
    #[must_use]
    pub fn project(lattice: &CellLattice) -> Self {
        let dimensions = lattice.dimensions();
        let rows = dimensions.grid_rows();
        let columns = dimensions.grid_columns();
        let mut tiles = Vec::with_capacity(rows as usize * columns as usize);

        for row in 0..rows {
            for column in 0..columns {
                tiles.push(projected_tile(lattice, row, column));
            }
        }

        Self {
            rows,
            columns,
            tiles,
            exit: None,
        }
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Boundary tile carved open as the exit, once one exists.
    #[must_use]
    pub const fn exit(&self) -> Option<GridCoord> {
        self.exit
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.row() < self.rows && coord.column() < self.columns
    }

    /// Tile at `coord`, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, coord: GridCoord) -> Option<Tile> {
        self.index(coord)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether `coord` is an open tile. Off-grid coordinates are never open.
    #[must_use]
    pub fn is_open(&self, coord: GridCoord) -> bool {
        self.tile(coord).map_or(false, Tile::is_open)
    }

    /// Reports whether `coord` lies on the outermost ring of the grid.
    #[must_use]
    pub fn is_boundary(&self, coord: GridCoord) -> bool {
        self.contains(coord)
            && (coord.row() == 0
                || coord.column() == 0
                || coord.row() + 1 == self.rows
                || coord.column() + 1 == self.columns)
    }

    /// Tiles of a single row, left to right.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[Tile]> {
        if row >= self.rows {
            return None;
        }
        let width = self.columns as usize;
        let start = row as usize * width;
        self.tiles.get(start..start + width)
    }

    /// Iterator over every row, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.columns.max(1) as usize)
    }

    /// Forces open the boundary tile at the `cell_index`-th odd position along `side`.
    ///
    /// Any exit carved earlier is walled off again so the grid keeps exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] when `cell_index` exceeds the number
    /// of cells along that side.
    pub fn open_exit(&mut self, side: Side, cell_index: u32) -> Result<GridCoord, MazeError> {
        let offset = cell_index.saturating_mul(2).saturating_add(1);
        let last_row = self.rows - 1;
        let last_column = self.columns - 1;
        let coord = match side {
            Side::North => GridCoord::new(0, offset),
            Side::South => GridCoord::new(last_row, offset),
            Side::East => GridCoord::new(offset, last_column),
            Side::West => GridCoord::new(offset, 0),
        };

        let along_row = matches!(side, Side::North | Side::South);
        let limit = if along_row { last_column } else { last_row };
        if offset >= limit {
            return Err(MazeError::OutOfBounds(coord));
        }

        if let Some(previous) = self.exit.take() {
            self.set(previous, Tile::Wall);
        }
        self.set(coord, Tile::Open);
        self.exit = Some(coord);
        Ok(coord)
    }

    /// Carves the exit on a uniformly random side at a uniformly random odd offset.
    ///
    /// # Errors
    ///
    /// Only fails if the grid does not stem from a valid lattice.
    pub fn carve_exit<R>(&mut self, rng: &mut R) -> Result<GridCoord, MazeError>
    where
        R: Rng + ?Sized,
    {
        let side = Side::ALL[random_below(rng, Side::ALL.len() as u32) as usize];
        let cells_along = match side {
            Side::North | Side::South => self.columns / 2,
            Side::East | Side::West => self.rows / 2,
        };
        self.open_exit(side, random_below(rng, cells_along))
    }

    fn set(&mut self, coord: GridCoord, tile: Tile) {
        if let Some(index) = self.index(coord) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn projected_tile(lattice: &CellLattice, row: u32, column: u32) -> Tile {
    if row == 0 || column == 0 {
        return Tile::Wall;
    }

    match (row % 2 == 1, column % 2 == 1) {
        (true, true) => Tile::Open,
        (true, false) => {
            let cell = CellCoord::new((row - 1) / 2, column / 2 - 1);
            Tile::from_open(lattice.cell(cell).map_or(false, |cell| cell.east_open()))
        }
        (false, true) => {
            let cell = CellCoord::new(row / 2 - 1, (column - 1) / 2);
            Tile::from_open(lattice.cell(cell).map_or(false, |cell| cell.south_open()))
        }
        (false, false) => Tile::Wall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_runner_core::Dimensions;

    fn closed_grid(rows: u32, columns: u32) -> ExpandedGrid {
        let lattice = CellLattice::new(Dimensions::new(rows, columns)).expect("valid dimensions");
        ExpandedGrid::project(&lattice)
    }

    #[test]
    fn closed_lattice_projects_to_isolated_cells() {
        let grid = closed_grid(2, 3);

        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.columns(), 7);
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let coord = GridCoord::new(row, column);
                let expected = row % 2 == 1 && column % 2 == 1;
                assert_eq!(grid.is_open(coord), expected, "tile {coord}");
            }
        }
        assert_eq!(grid.exit(), None);
    }

    #[test]
    fn open_exit_replaces_previous_exit() {
        let mut grid = closed_grid(3, 3);

        let first = grid.open_exit(Side::North, 1).expect("inside north side");
        assert_eq!(first, GridCoord::new(0, 3));
        assert!(grid.is_open(first));

        let second = grid.open_exit(Side::West, 2).expect("inside west side");
        assert_eq!(second, GridCoord::new(5, 0));
        assert!(grid.is_open(second));
        assert!(!grid.is_open(first), "previous exit must be walled again");
        assert_eq!(grid.exit(), Some(second));
    }

    #[test]
    fn open_exit_rejects_offsets_past_the_side() {
        let mut grid = closed_grid(2, 4);

        assert_eq!(
            grid.open_exit(Side::East, 2),
            Err(MazeError::OutOfBounds(GridCoord::new(5, 8)))
        );
        assert!(grid.open_exit(Side::South, 3).is_ok());
        assert_eq!(grid.exit(), Some(GridCoord::new(4, 7)));
    }

    #[test]
    fn boundary_detection_covers_every_side() {
        let grid = closed_grid(2, 2);

        assert!(grid.is_boundary(GridCoord::new(0, 3)));
        assert!(grid.is_boundary(GridCoord::new(4, 1)));
        assert!(grid.is_boundary(GridCoord::new(3, 0)));
        assert!(grid.is_boundary(GridCoord::new(1, 4)));
        assert!(!grid.is_boundary(GridCoord::new(1, 1)));
        assert!(!grid.is_boundary(GridCoord::new(5, 5)));
    }

    #[test]
    fn rows_expose_tiles_in_order() {
        let grid = closed_grid(1, 2);

        assert_eq!(grid.iter_rows().count(), 3);
        assert_eq!(
            grid.row(1),
            Some(&[Tile::Wall, Tile::Open, Tile::Wall, Tile::Open, Tile::Wall][..])
        );
        assert_eq!(grid.row(3), None);
    }
}
