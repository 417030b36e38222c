use std::collections::VecDeque;

use maze_runner_core::{CellCoord, Dimensions, GridCoord, Side, Tile};
use maze_runner_world::{generation, grid::ExpandedGrid, lattice::CellLattice};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn carved(rows: u32, columns: u32, seed: u64) -> CellLattice {
    let mut lattice = CellLattice::new(Dimensions::new(rows, columns)).expect("valid dimensions");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generation::carve(&mut lattice, &mut rng).expect("carve succeeds");
    lattice
}

fn reachable_cells(lattice: &CellLattice) -> usize {
    let rows = lattice.rows();
    let columns = lattice.columns();
    let mut seen = vec![false; (rows * columns) as usize];
    let mut queue = VecDeque::from([CellCoord::new(0, 0)]);
    seen[0] = true;
    let mut count = 0;

    while let Some(coord) = queue.pop_front() {
        count += 1;
        let cell = lattice.cell(coord).expect("queued cells are inside");
        let mut next = Vec::new();
        if cell.south_open() {
            next.push(CellCoord::new(coord.row() + 1, coord.column()));
        }
        if cell.east_open() {
            next.push(CellCoord::new(coord.row(), coord.column() + 1));
        }
        if coord.row() > 0 {
            let above = CellCoord::new(coord.row() - 1, coord.column());
            if lattice.cell(above).expect("above").south_open() {
                next.push(above);
            }
        }
        if coord.column() > 0 {
            let left = CellCoord::new(coord.row(), coord.column() - 1);
            if lattice.cell(left).expect("left").east_open() {
                next.push(left);
            }
        }
        for neighbor in next {
            let index = (neighbor.row() * columns + neighbor.column()) as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back(neighbor);
            }
        }
    }

    count
}

#[test]
fn generated_lattices_are_perfect_mazes() {
    let sizes = [(1, 1), (1, 7), (7, 1), (2, 2), (3, 5), (8, 8), (13, 21)];
    for (rows, columns) in sizes {
        for seed in 0..8 {
            let lattice = carved(rows, columns, seed);
            let cells = (rows * columns) as usize;

            assert_eq!(
                lattice.open_edge_count(),
                cells - 1,
                "{rows}x{columns} seed {seed} must open exactly cells - 1 walls"
            );
            assert_eq!(
                reachable_cells(&lattice),
                cells,
                "{rows}x{columns} seed {seed} must be connected"
            );
        }
    }
}

#[test]
fn fixed_seed_reproduces_the_same_maze() {
    let first = carved(9, 14, 0xdead_beef);
    let second = carved(9, 14, 0xdead_beef);
    let other = carved(9, 14, 0xfeed_face);

    assert_eq!(first, second, "same seed must carve the same maze");
    assert_ne!(first, other, "different seeds should carve different mazes");
}

#[test]
fn projected_grid_has_odd_dimensions_and_walled_border() {
    for (rows, columns) in [(1, 1), (2, 5), (6, 3)] {
        let lattice = carved(rows, columns, 17);
        let grid = ExpandedGrid::project(&lattice);

        assert_eq!(grid.rows(), 2 * rows + 1);
        assert_eq!(grid.columns(), 2 * columns + 1);
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let coord = GridCoord::new(row, column);
                if grid.is_boundary(coord) {
                    assert!(!grid.is_open(coord), "border tile {coord} must be wall");
                }
                if row % 2 == 0 && column % 2 == 0 {
                    assert!(!grid.is_open(coord), "corner post {coord} must be wall");
                }
                if row % 2 == 1 && column % 2 == 1 {
                    assert!(grid.is_open(coord), "cell interior {coord} must be open");
                }
            }
        }
    }
}

#[test]
fn snake_lattice_projects_to_expected_pattern() {
    let mut lattice = CellLattice::new(Dimensions::new(3, 3)).expect("valid dimensions");
    let snake = [
        (CellCoord::new(0, 0), CellCoord::new(0, 1)),
        (CellCoord::new(0, 1), CellCoord::new(0, 2)),
        (CellCoord::new(0, 2), CellCoord::new(1, 2)),
        (CellCoord::new(1, 2), CellCoord::new(1, 1)),
        (CellCoord::new(1, 1), CellCoord::new(1, 0)),
        (CellCoord::new(1, 0), CellCoord::new(2, 0)),
        (CellCoord::new(2, 0), CellCoord::new(2, 1)),
        (CellCoord::new(2, 1), CellCoord::new(2, 2)),
    ];
    for (from, to) in snake {
        lattice.open_between(from, to).expect("snake edge");
    }
    assert_eq!(lattice.open_edge_count(), 8);

    let grid = ExpandedGrid::project(&lattice);
    let expected = [
        "#######",
        "#.....#",
        "#####.#",
        "#.....#",
        "#.#####",
        "#.....#",
        "#######",
    ];
    let rendered: Vec<String> = grid
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|tile| if *tile == Tile::Open { '.' } else { '#' })
                .collect()
        })
        .collect();

    assert_eq!(rendered, expected);
    for corner in [(0, 0), (0, 6), (6, 0), (6, 6)] {
        assert!(!grid.is_open(GridCoord::new(corner.0, corner.1)));
    }
}

#[test]
fn carved_exit_is_the_only_open_boundary_tile() {
    for seed in 0..32 {
        let lattice = carved(5, 7, seed);
        let mut grid = ExpandedGrid::project(&lattice);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let exit = grid.carve_exit(&mut rng).expect("exit fits");

        let open_boundary: Vec<GridCoord> = (0..grid.rows())
            .flat_map(|row| (0..grid.columns()).map(move |column| GridCoord::new(row, column)))
            .filter(|coord| grid.is_boundary(*coord) && grid.is_open(*coord))
            .collect();
        assert_eq!(open_boundary, vec![exit], "seed {seed}");
        assert_eq!(grid.exit(), Some(exit));

        let along = if exit.row() == 0 || exit.row() + 1 == grid.rows() {
            exit.column()
        } else {
            exit.row()
        };
        assert_eq!(along % 2, 1, "exit {exit} must sit on an odd coordinate");
    }
}

#[test]
fn exit_sides_are_all_reachable_by_the_random_draw() {
    let lattice = carved(4, 4, 1);
    let mut seen = [false; 4];
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..200 {
        let mut grid = ExpandedGrid::project(&lattice);
        let exit = grid.carve_exit(&mut rng).expect("exit fits");
        let side = if exit.row() == 0 {
            Side::North
        } else if exit.row() + 1 == grid.rows() {
            Side::South
        } else if exit.column() == 0 {
            Side::West
        } else {
            Side::East
        };
        let index = Side::ALL
            .iter()
            .position(|candidate| *candidate == side)
            .expect("known side");
        seen[index] = true;
    }

    assert!(seen.iter().all(|hit| *hit), "every side should host an exit");
}
