#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic navigation system that turns player input into move commands.
//!
//! The system is advanced by a single entry point, [`Navigation::handle`],
//! which an adapter calls once per frame with the world events produced since
//! the previous call. Key auto-repeat and click-to-path walking are explicit
//! [`NavigationState`] variants advanced by `TimeAdvanced` events, and each
//! call emits at most one [`Command::MovePlayer`].

use std::time::Duration;

use maze_runner_core::{Command, Direction, Event, GridCoord};
use maze_runner_world::{grid::ExpandedGrid, navigation::shortest_path};

/// Delay between repeated moves while a direction key is held.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(75);
/// Delay between consecutive steps of a click-to-path walk.
pub const DEFAULT_WALK_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration parameters required to construct the navigation system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    repeat_interval: Duration,
    walk_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided repeat and walk cadences.
    #[must_use]
    pub const fn new(repeat_interval: Duration, walk_interval: Duration) -> Self {
        Self {
            repeat_interval,
            walk_interval,
        }
    }

    /// Delay between repeated moves while a direction key is held.
    #[must_use]
    pub const fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Delay between consecutive steps of a click-to-path walk.
    #[must_use]
    pub const fn walk_interval(&self) -> Duration {
        self.walk_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_INTERVAL, DEFAULT_WALK_INTERVAL)
    }
}

/// Player intent captured by an adapter during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationInput {
    /// A direction key went down.
    Press(Direction),
    /// The held direction key was released.
    Release,
    /// The player selected a tile as a walking destination.
    Click(GridCoord),
}

/// Input mode of the navigation system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationState {
    /// Waiting for fresh input.
    Idle,
    /// A direction key is held and its move is re-issued on every repeat interval.
    RepeatingKey {
        /// Direction of the held key.
        direction: Direction,
    },
    /// Replaying a shortest path one tile per walk interval.
    Walking {
        /// Remaining route, excluding the tile the walk started from.
        path: Vec<GridCoord>,
        /// Index of the next tile to step onto.
        next: usize,
    },
}

/// Pure system that reacts to world events and input to emit movement commands.
#[derive(Debug)]
pub struct Navigation {
    config: Config,
    state: NavigationState,
    accumulator: Duration,
    escaped: bool,
}

impl Navigation {
    /// Creates a new navigation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: NavigationState::Idle,
            accumulator: Duration::ZERO,
            escaped: false,
        }
    }

    /// Current input mode.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Whether the player escaped and input is ignored until the next maze.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.escaped
    }

    /// Advances the system by one frame.
    ///
    /// `grid` and `player` must describe the world after `events` were
    /// produced. Commands are appended to `out`; at most one is emitted.
    pub fn handle(
        &mut self,
        events: &[Event],
        inputs: &[NavigationInput],
        grid: &ExpandedGrid,
        player: GridCoord,
        out: &mut Vec<Command>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::MazeGenerated { .. } => {
                    self.escaped = false;
                    self.enter(NavigationState::Idle);
                    elapsed = Duration::ZERO;
                }
                Event::PlayerEscaped { .. } => {
                    self.escaped = true;
                    self.enter(NavigationState::Idle);
                }
                Event::MoveRejected { .. } => self.enter(NavigationState::Idle),
                Event::PlayerMoved { .. } | Event::GenerationRejected { .. } => {}
            }
        }

        if self.escaped {
            return;
        }

        let mut rearmed = false;
        let mut stepped = false;
        for input in inputs {
            match *input {
                NavigationInput::Press(direction) => {
                    if self.state == (NavigationState::RepeatingKey { direction }) {
                        continue;
                    }
                    rearmed = true;
                    self.enter(NavigationState::Idle);
                    if stepped {
                        self.enter(NavigationState::RepeatingKey { direction });
                        self.accumulator = self.config.repeat_interval;
                        continue;
                    }
                    if let Some(to) = resolve_move(grid, player, direction) {
                        out.push(Command::MovePlayer { to });
                        stepped = true;
                        self.enter(NavigationState::RepeatingKey { direction });
                    }
                }
                NavigationInput::Release => {
                    if matches!(self.state, NavigationState::RepeatingKey { .. }) {
                        rearmed = true;
                        self.enter(NavigationState::Idle);
                    }
                }
                NavigationInput::Click(target) => {
                    if stepped || target == player || !grid.is_open(target) {
                        continue;
                    }
                    let Ok(path) = shortest_path(grid, player, target) else {
                        continue;
                    };
                    if path.is_empty() {
                        continue;
                    }
                    rearmed = true;
                    self.enter(NavigationState::Walking { path, next: 0 });
                }
            }
        }

        if stepped {
            return;
        }
        if !rearmed {
            self.accumulator = self.accumulator.saturating_add(elapsed);
        }
        self.advance(grid, player, out);
    }

    fn advance(&mut self, grid: &ExpandedGrid, player: GridCoord, out: &mut Vec<Command>) {
        let interval = match self.state {
            NavigationState::Idle => return,
            NavigationState::RepeatingKey { .. } => self.config.repeat_interval,
            NavigationState::Walking { .. } => self.config.walk_interval,
        };
        if self.accumulator < interval {
            return;
        }
        self.accumulator = (self.accumulator - interval).min(interval);

        let step = match &mut self.state {
            NavigationState::Idle => None,
            NavigationState::RepeatingKey { direction } => resolve_move(grid, player, *direction),
            NavigationState::Walking { path, next } => {
                let step = path.get(*next).copied();
                *next += 1;
                step
            }
        };
        let finished = match &self.state {
            NavigationState::Walking { path, next } => *next >= path.len(),
            _ => step.is_none(),
        };

        if let Some(to) = step {
            out.push(Command::MovePlayer { to });
        }
        if finished {
            self.enter(NavigationState::Idle);
        }
    }

    fn enter(&mut self, state: NavigationState) {
        self.state = state;
        self.accumulator = Duration::ZERO;
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Resolves a directional move from `from`, tolerating slightly early turns.
///
/// When the tile in `direction` is open it is returned as is. When it is a
/// wall, the two tiles flanking it across the direction of travel are
/// inspected: if exactly one is open the move snaps onto it. Off-grid tiles
/// count as walls. When both or neither flanking tile is open, or the
/// destination leaves the grid, the move is rejected.
#[must_use]
pub fn resolve_move(
    grid: &ExpandedGrid,
    from: GridCoord,
    direction: Direction,
) -> Option<GridCoord> {
    let destination = from.step(direction).filter(|coord| grid.contains(*coord))?;
    if grid.is_open(destination) {
        return Some(destination);
    }

    let (first, second) = if direction.is_vertical() {
        (
            destination.step(Direction::East),
            destination.step(Direction::West),
        )
    } else {
        (
            destination.step(Direction::South),
            destination.step(Direction::North),
        )
    };
    let first = first.filter(|coord| grid.is_open(*coord));
    let second = second.filter(|coord| grid.is_open(*coord));

    match (first, second) {
        (Some(snap), None) | (None, Some(snap)) => Some(snap),
        _ => None,
    }
}
