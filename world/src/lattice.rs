//! Logical cell lattice that records which interior walls are open.

use maze_runner_core::{CellCoord, Dimensions, MazeError};

/// Wall state of a single lattice cell.
///
/// Only the south and east edges are stored. The north and west edges of a
/// cell are the south and east edges of its neighbors, and the outer boundary
/// is always closed at the lattice level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    south_open: bool,
    east_open: bool,
}

impl Cell {
    /// Whether the passage toward the cell below is open.
    #[must_use]
    pub const fn south_open(&self) -> bool {
        self.south_open
    }

    /// Whether the passage toward the cell on the right is open.
    #[must_use]
    pub const fn east_open(&self) -> bool {
        self.east_open
    }
}

/// Dense H×W grid of cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellLattice {
    dimensions: Dimensions,
    cells: Vec<Cell>,
}

impl CellLattice {
    /// Creates a lattice with every wall closed.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when either dimension is zero or
    /// exceeds [`Dimensions::MAX_EXTENT`].
    pub fn new(dimensions: Dimensions) -> Result<Self, MazeError> {
        if !dimensions.is_valid() {
            return Err(MazeError::InvalidDimension {
                rows: dimensions.rows(),
                columns: dimensions.columns(),
            });
        }

        let count = usize::try_from(u64::from(dimensions.rows()) * u64::from(dimensions.columns()))
            .map_err(|_| MazeError::InvalidDimension {
                rows: dimensions.rows(),
                columns: dimensions.columns(),
            })?;

        Ok(Self {
            dimensions,
            cells: vec![Cell::default(); count],
        })
    }

    /// Size of the lattice.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.dimensions.rows()
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.dimensions.columns()
    }

    /// Reports whether the coordinate addresses a cell of this lattice.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row() < self.rows() && coord.column() < self.columns()
    }

    /// Wall state of the cell at `coord`, if it lies within the lattice.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Opens the wall between `coord` and the cell below it.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::CellOutOfBounds`] when `coord` is outside the
    /// lattice or sits on the last row.
    pub fn open_south(&mut self, coord: CellCoord) -> Result<(), MazeError> {
        if coord.row().saturating_add(1) >= self.rows() {
            return Err(MazeError::CellOutOfBounds(coord));
        }
        self.cell_mut(coord)?.south_open = true;
        Ok(())
    }

    /// Opens the wall between `coord` and the cell to its right.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::CellOutOfBounds`] when `coord` is outside the
    /// lattice or sits on the last column.
    pub fn open_east(&mut self, coord: CellCoord) -> Result<(), MazeError> {
        if coord.column().saturating_add(1) >= self.columns() {
            return Err(MazeError::CellOutOfBounds(coord));
        }
        self.cell_mut(coord)?.east_open = true;
        Ok(())
    }

    /// Opens the single wall shared by two orthogonally adjacent cells.
    ///
    /// The edge is stored on whichever of the two cells lies north or west.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::CellOutOfBounds`] when either cell lies outside the
    /// lattice and [`MazeError::NotAdjacent`] when the cells do not share an edge.
    pub fn open_between(&mut self, from: CellCoord, to: CellCoord) -> Result<(), MazeError> {
        for coord in [from, to] {
            if !self.contains(coord) {
                return Err(MazeError::CellOutOfBounds(coord));
            }
        }

        let row_delta = i64::from(to.row()) - i64::from(from.row());
        let column_delta = i64::from(to.column()) - i64::from(from.column());
        match (row_delta, column_delta) {
            (1, 0) => self.open_south(from),
            (-1, 0) => self.open_south(to),
            (0, 1) => self.open_east(from),
            (0, -1) => self.open_east(to),
            _ => Err(MazeError::NotAdjacent { from, to }),
        }
    }

    /// Number of open interior walls. A perfect maze has exactly `rows * columns - 1`.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| usize::from(cell.south_open) + usize::from(cell.east_open))
            .sum()
    }

    /// Orthogonal neighbors of `coord` that lie within the lattice, in
    /// up, down, left, right order.
    pub(crate) fn neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> {
        let rows = self.rows();
        let columns = self.columns();
        let mut candidates = [None; 4];

        if let Some(row) = coord.row().checked_sub(1) {
            candidates[0] = Some(CellCoord::new(row, coord.column()));
        }
        if coord.row() + 1 < rows {
            candidates[1] = Some(CellCoord::new(coord.row() + 1, coord.column()));
        }
        if let Some(column) = coord.column().checked_sub(1) {
            candidates[2] = Some(CellCoord::new(coord.row(), column));
        }
        if coord.column() + 1 < columns {
            candidates[3] = Some(CellCoord::new(coord.row(), coord.column() + 1));
        }

        candidates.into_iter().flatten()
    }

    pub(crate) fn index(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Result<&mut Cell, MazeError> {
        let index = self
            .index(coord)
            .ok_or(MazeError::CellOutOfBounds(coord))?;
        self.cells
            .get_mut(index)
            .ok_or(MazeError::CellOutOfBounds(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lattice_starts_with_every_wall_closed() {
        let lattice = CellLattice::new(Dimensions::new(3, 4)).expect("valid dimensions");

        assert_eq!(lattice.open_edge_count(), 0);
        assert_eq!(lattice.cell_count(), 12);
        for row in 0..3 {
            for column in 0..4 {
                let cell = lattice
                    .cell(CellCoord::new(row, column))
                    .expect("cell inside lattice");
                assert!(!cell.south_open());
                assert!(!cell.east_open());
            }
        }
    }

    #[test]
    fn new_rejects_empty_dimensions() {
        assert_eq!(
            CellLattice::new(Dimensions::new(0, 3)),
            Err(MazeError::InvalidDimension {
                rows: 0,
                columns: 3
            })
        );
        assert_eq!(
            CellLattice::new(Dimensions::new(2, 0)),
            Err(MazeError::InvalidDimension {
                rows: 2,
                columns: 0
            })
        );
    }

    #[test]
    fn new_rejects_oversized_dimensions() {
        let too_wide = Dimensions::new(2, Dimensions::MAX_EXTENT + 1);

        assert_eq!(
            CellLattice::new(too_wide),
            Err(MazeError::InvalidDimension {
                rows: 2,
                columns: Dimensions::MAX_EXTENT + 1
            })
        );
        assert_eq!(
            CellLattice::new(Dimensions::new(40_000, 40_000)),
            Err(MazeError::InvalidDimension {
                rows: 40_000,
                columns: 40_000
            })
        );
    }

    #[test]
    fn open_between_stores_edge_on_north_or_west_cell() {
        let mut lattice = CellLattice::new(Dimensions::new(2, 2)).expect("valid dimensions");

        lattice
            .open_between(CellCoord::new(1, 1), CellCoord::new(0, 1))
            .expect("vertical neighbors");
        lattice
            .open_between(CellCoord::new(1, 1), CellCoord::new(1, 0))
            .expect("horizontal neighbors");

        let north = lattice.cell(CellCoord::new(0, 1)).expect("north cell");
        let west = lattice.cell(CellCoord::new(1, 0)).expect("west cell");
        assert!(north.south_open());
        assert!(west.east_open());
        assert_eq!(lattice.open_edge_count(), 2);
    }

    #[test]
    fn open_between_rejects_distant_and_external_cells() {
        let mut lattice = CellLattice::new(Dimensions::new(3, 3)).expect("valid dimensions");

        assert_eq!(
            lattice.open_between(CellCoord::new(0, 0), CellCoord::new(1, 1)),
            Err(MazeError::NotAdjacent {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(1, 1),
            })
        );
        assert_eq!(
            lattice.open_between(CellCoord::new(2, 2), CellCoord::new(3, 2)),
            Err(MazeError::CellOutOfBounds(CellCoord::new(3, 2)))
        );
    }

    #[test]
    fn boundary_edges_cannot_be_opened() {
        let mut lattice = CellLattice::new(Dimensions::new(2, 3)).expect("valid dimensions");

        assert!(lattice.open_south(CellCoord::new(1, 0)).is_err());
        assert!(lattice.open_east(CellCoord::new(0, 2)).is_err());
        assert_eq!(lattice.open_edge_count(), 0);
    }

    #[test]
    fn neighbors_stay_within_bounds() {
        let lattice = CellLattice::new(Dimensions::new(2, 2)).expect("valid dimensions");

        let corner: Vec<_> = lattice.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);

        let single = CellLattice::new(Dimensions::new(1, 1)).expect("valid dimensions");
        assert_eq!(single.neighbors(CellCoord::new(0, 0)).count(), 0);
    }
}
