#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state management for Maze Runner.
//!
//! The [`World`] owns the session: the carved lattice, the expanded grid with
//! its exit, the player's tile and the play state. Every mutation flows
//! through [`apply`], and a `GenerateMaze` command replaces all of it at once.

pub mod generation;
pub mod grid;
pub mod lattice;
pub mod navigation;

use maze_runner_core::{
    Command, Dimensions, Event, GridCoord, MazeError, MoveError, PlayState, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{grid::ExpandedGrid, lattice::CellLattice};

/// Seed used by [`World::new`] so default sessions are reproducible.
pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

const DEFAULT_DIMENSIONS: Dimensions = Dimensions::new(10, 10);

/// Represents the authoritative Maze Runner session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    maze: Maze,
    player: GridCoord,
    play_state: PlayState,
    generation: u64,
    rng: ChaCha8Rng,
}

#[derive(Debug)]
struct Maze {
    lattice: CellLattice,
    grid: ExpandedGrid,
    exit: GridCoord,
}

impl World {
    /// Creates a world holding a default-sized maze generated from [`DEFAULT_SEED`].
    ///
    /// # Errors
    ///
    /// Propagates any failure to carve the default maze.
    pub fn new() -> Result<Self, MazeError> {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world whose mazes are drawn from the provided seed.
    ///
    /// # Errors
    ///
    /// Propagates any failure to carve the default maze.
    pub fn with_seed(seed: u64) -> Result<Self, MazeError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = build_maze(DEFAULT_DIMENSIONS, &mut rng)?;
        let player = starting_tile(&maze.grid);
        Ok(Self {
            banner: WELCOME_BANNER,
            maze,
            player,
            play_state: PlayState::Playing,
            generation: 0,
            rng,
        })
    }

    fn regenerate(&mut self, dimensions: Dimensions, out_events: &mut Vec<Event>) {
        match build_maze(dimensions, &mut self.rng) {
            Ok(maze) => {
                self.player = starting_tile(&maze.grid);
                self.maze = maze;
                self.play_state = PlayState::Playing;
                self.generation = self.generation.saturating_add(1);
                debug!(
                    generation = self.generation,
                    rows = dimensions.rows(),
                    columns = dimensions.columns(),
                    open_edges = self.maze.lattice.open_edge_count(),
                    exit = %self.maze.exit,
                    "generated maze"
                );
                out_events.push(Event::MazeGenerated {
                    generation: self.generation,
                    dimensions,
                    player: self.player,
                    exit: self.maze.exit,
                });
            }
            Err(reason) => {
                debug!(%reason, "rejected maze generation");
                out_events.push(Event::GenerationRejected { dimensions, reason });
            }
        }
    }

    fn move_player(&mut self, to: GridCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_move(to) {
            debug!(%to, ?reason, "rejected player move");
            out_events.push(Event::MoveRejected { to, reason });
            return;
        }

        let from = self.player;
        self.player = to;
        out_events.push(Event::PlayerMoved { from, to });

        if self.maze.grid.is_boundary(to) {
            self.play_state = PlayState::Won;
            info!(generation = self.generation, at = %to, "player escaped the maze");
            out_events.push(Event::PlayerEscaped { at: to });
        }
    }

    fn validate_move(&self, to: GridCoord) -> Result<(), MoveError> {
        if self.play_state == PlayState::Won {
            return Err(MoveError::GameOver);
        }
        let grid = &self.maze.grid;
        if !grid.contains(to) {
            return Err(MoveError::OutOfBounds);
        }
        let row_step = self.player.row().abs_diff(to.row());
        let column_step = self.player.column().abs_diff(to.column());
        if row_step > 1 || column_step > 1 || row_step + column_step == 0 {
            return Err(MoveError::NotAdjacent);
        }
        if !grid.is_open(to) {
            return Err(MoveError::Wall);
        }
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateMaze { dimensions } => world.regenerate(dimensions, out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::MovePlayer { to } => world.move_player(to, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_runner_core::{Dimensions, GridCoord, MazeError, PlayState};

    use super::World;
    use crate::{grid::ExpandedGrid, lattice::CellLattice, navigation};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the expanded grid of the active maze.
    #[must_use]
    pub fn grid(world: &World) -> &ExpandedGrid {
        &world.maze.grid
    }

    /// Provides read-only access to the carved cell lattice of the active maze.
    #[must_use]
    pub fn lattice(world: &World) -> &CellLattice {
        &world.maze.lattice
    }

    /// Size of the active maze's cell lattice.
    #[must_use]
    pub fn dimensions(world: &World) -> Dimensions {
        world.maze.lattice.dimensions()
    }

    /// Tile currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> GridCoord {
        world.player
    }

    /// Boundary tile carved open as the exit.
    #[must_use]
    pub fn exit(world: &World) -> GridCoord {
        world.maze.exit
    }

    /// Whether the player is still inside the maze.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Counter of mazes generated since the world was created.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Shortest route from the player to the exit.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::NoPath`] if the exit is unreachable.
    pub fn route_to_exit(world: &World) -> Result<Vec<GridCoord>, MazeError> {
        navigation::shortest_path(&world.maze.grid, world.player, world.maze.exit)
    }
}

fn build_maze<R>(dimensions: Dimensions, rng: &mut R) -> Result<Maze, MazeError>
where
    R: rand::Rng + ?Sized,
{
    let mut lattice = CellLattice::new(dimensions)?;
    generation::carve(&mut lattice, rng)?;
    let mut grid = ExpandedGrid::project(&lattice);
    let exit = grid.carve_exit(rng)?;
    Ok(Maze {
        lattice,
        grid,
        exit,
    })
}

/// Lattice cell `(rows / 2, columns / 2)` rendered in grid space.
fn starting_tile(grid: &ExpandedGrid) -> GridCoord {
    let last_row = grid.rows() - 1;
    let last_column = grid.columns() - 1;
    GridCoord::new(((last_row >> 2) << 1) + 1, ((last_column >> 2) << 1) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(world: &mut World, rows: u32, columns: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::GenerateMaze {
                dimensions: Dimensions::new(rows, columns),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn new_world_holds_default_maze() {
        let world = World::new().expect("default maze");

        assert_eq!(query::dimensions(&world), DEFAULT_DIMENSIONS);
        assert_eq!(query::generation(&world), 0);
        assert_eq!(query::play_state(&world), PlayState::Playing);
        assert!(query::grid(&world).is_open(query::player(&world)));
    }

    #[test]
    fn player_starts_in_central_cell() {
        let mut world = World::with_seed(1).expect("default maze");

        let events = generate(&mut world, 5, 8);

        assert_eq!(query::player(&world), GridCoord::new(5, 9));
        assert!(matches!(
            events.as_slice(),
            [Event::MazeGenerated {
                generation: 1,
                player,
                ..
            }] if *player == GridCoord::new(5, 9)
        ));
    }

    #[test]
    fn invalid_dimensions_keep_previous_maze() {
        let mut world = World::with_seed(2).expect("default maze");
        let _ = generate(&mut world, 4, 4);
        let before = query::grid(&world).clone();

        let events = generate(&mut world, 0, 7);

        assert_eq!(
            events,
            vec![Event::GenerationRejected {
                dimensions: Dimensions::new(0, 7),
                reason: MazeError::InvalidDimension {
                    rows: 0,
                    columns: 7
                },
            }]
        );
        assert_eq!(query::grid(&world), &before);
        assert_eq!(query::generation(&world), 1);
    }

    #[test]
    fn tick_reports_elapsed_time() {
        let mut world = World::new().expect("default maze");
        let mut events = Vec::new();
        let dt = std::time::Duration::from_millis(16);

        apply(&mut world, Command::Tick { dt }, &mut events);

        assert_eq!(events, vec![Event::TimeAdvanced { dt }]);
    }

    #[test]
    fn move_validation_rejects_distant_tiles() {
        let mut world = World::with_seed(3).expect("default maze");
        let _ = generate(&mut world, 3, 3);
        let player = query::player(&world);
        let mut events = Vec::new();

        let far = GridCoord::new(player.row() + 2, player.column());
        apply(&mut world, Command::MovePlayer { to: far }, &mut events);
        apply(&mut world, Command::MovePlayer { to: player }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::MoveRejected {
                    to: far,
                    reason: MoveError::NotAdjacent
                },
                Event::MoveRejected {
                    to: player,
                    reason: MoveError::NotAdjacent
                },
            ]
        );
        assert_eq!(query::player(&world), player);
    }
}
