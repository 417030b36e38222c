//! Randomized depth-first spanning-tree generator.

use maze_runner_core::{CellCoord, MazeError};
use rand::Rng;

use crate::lattice::CellLattice;

/// Carves a perfect maze into `lattice` using randomized iterative DFS.
///
/// Every cell is discovered exactly once and each discovery opens exactly one
/// wall, so the open edges form a spanning tree over the lattice. Walls that
/// were already open before the call are left open.
///
/// # Errors
///
/// Only fails if the lattice reports an edge outside its own bounds, which
/// indicates an internal inconsistency.
pub fn carve<R>(lattice: &mut CellLattice, rng: &mut R) -> Result<(), MazeError>
where
    R: Rng + ?Sized,
{
    let start = CellCoord::new(
        random_below(rng, lattice.rows()),
        random_below(rng, lattice.columns()),
    );

    let mut discovered = vec![false; lattice.cell_count()];
    let mut stack = vec![start];
    let mut candidates: Vec<CellCoord> = Vec::with_capacity(4);

    while let Some(&current) = stack.last() {
        if let Some(index) = lattice.index(current) {
            discovered[index] = true;
        }

        candidates.clear();
        candidates.extend(lattice.neighbors(current).filter(|neighbor| {
            lattice
                .index(*neighbor)
                .map_or(false, |index| !discovered[index])
        }));

        if candidates.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let pick = random_below(rng, candidates.len() as u32) as usize;
        let next = candidates[pick];
        lattice.open_between(current, next)?;
        stack.push(next);
    }

    Ok(())
}

/// Uniform integer in `[0, n)`, or zero when `n <= 1`.
pub fn random_below<R>(rng: &mut R, n: u32) -> u32
where
    R: Rng + ?Sized,
{
    if n > 1 {
        rng.gen_range(0..n)
    } else {
        0
    }
}
