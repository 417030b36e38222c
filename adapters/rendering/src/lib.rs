#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Runner adapters.

pub mod sizing;

use std::{collections::HashSet, error::Error, fmt, time::Duration};

use anyhow::Result as AnyResult;
use maze_runner_core::{Direction, GridCoord, PlayState, Tile};
use maze_runner_world::grid::ExpandedGrid;

pub use sizing::{SizingPolicy, Viewport};

/// Message shown once the player stepped onto the exit.
pub const WIN_MESSAGE: &str = "You escaped! Press g for a new maze or q to quit.";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts the color to byte RGB values, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Visual category of a single scene tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Closed tile.
    Wall,
    /// Open tile.
    Floor,
    /// Open tile lying on the highlighted route.
    Route,
    /// Tile occupied by the player.
    Player,
}

impl Glyph {
    /// Single character used when the scene is rendered as plain text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => ' ',
            Self::Route => '.',
            Self::Player => '@',
        }
    }
}

/// Colors assigned to each glyph and to the status line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Background drawn behind the maze.
    pub background: Color,
    /// Color of wall tiles.
    pub wall: Color,
    /// Color of open tiles.
    pub floor: Color,
    /// Color of route markers.
    pub route: Color,
    /// Color of the player marker.
    pub player: Color,
    /// Color of the status line text.
    pub text: Color,
}

impl Palette {
    /// Color used to draw the provided glyph.
    #[must_use]
    pub const fn color(&self, glyph: Glyph) -> Color {
        match glyph {
            Glyph::Wall => self.wall,
            Glyph::Floor => self.floor,
            Glyph::Route => self.route,
            Glyph::Player => self.player,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let wall = Color::from_rgb_u8(0x3b, 0x42, 0x52);
        Self {
            background: Color::from_rgb_u8(0x10, 0x12, 0x18),
            wall,
            floor: Color::from_rgb_u8(0x10, 0x12, 0x18),
            route: Color::from_rgb_u8(0x88, 0xc0, 0xd0),
            player: Color::from_rgb_u8(0xeb, 0xcb, 0x8b),
            text: wall.lighten(0.7),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction keys that went down on this frame, in arrival order.
    pub presses: Vec<Direction>,
    /// Whether the held direction key was released after the last press of this frame.
    pub release: bool,
    /// Tile selected with the pointer on this frame, if any.
    pub click: Option<GridCoord>,
    /// Whether the player asked for a fresh maze on this frame.
    pub regenerate: bool,
}

impl FrameInput {
    /// Reports whether the frame carries no player intent at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presses.is_empty() && !self.release && self.click.is_none() && !self.regenerate
    }
}

/// Scene description combining the maze grid, the player and an optional route overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Expanded grid of the active maze.
    pub grid: ExpandedGrid,
    /// Tile occupied by the player.
    pub player: GridCoord,
    /// Tiles highlighted as a route.
    pub route: HashSet<GridCoord>,
    /// Whether the player already escaped.
    pub play_state: PlayState,
    /// Text shown while the player is still inside the maze.
    pub banner: String,
}

impl Scene {
    /// Creates a new scene descriptor without a route overlay.
    #[must_use]
    pub fn new<T>(grid: ExpandedGrid, player: GridCoord, play_state: PlayState, banner: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            grid,
            player,
            route: HashSet::new(),
            play_state,
            banner: banner.into(),
        }
    }

    /// Replaces the route overlay with the provided tiles.
    #[must_use]
    pub fn with_route<I>(mut self, route: I) -> Self
    where
        I: IntoIterator<Item = GridCoord>,
    {
        self.route = route.into_iter().collect();
        self
    }

    /// Number of tile rows in the scene.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.grid.rows()
    }

    /// Number of tile columns in the scene.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.grid.columns()
    }

    /// Glyph drawn at `coord`, or `None` outside the grid.
    #[must_use]
    pub fn glyph(&self, coord: GridCoord) -> Option<Glyph> {
        let tile = self.grid.tile(coord)?;
        let glyph = if coord == self.player {
            Glyph::Player
        } else if tile == Tile::Wall {
            Glyph::Wall
        } else if self.route.contains(&coord) {
            Glyph::Route
        } else {
            Glyph::Floor
        };
        Some(glyph)
    }

    /// Text displayed below the maze.
    #[must_use]
    pub fn status_line(&self) -> &str {
        match self.play_state {
            PlayState::Playing => &self.banner,
            PlayState::Won => WIN_MESSAGE,
        }
    }
}

/// Renders the scene as one line of glyph symbols per grid row.
#[must_use]
pub fn render_text(scene: &Scene) -> String {
    let width = usize::try_from(scene.columns()).unwrap_or(0);
    let height = usize::try_from(scene.rows()).unwrap_or(0);
    let mut text = String::with_capacity((width + 1) * height);
    for row in 0..scene.rows() {
        for column in 0..scene.columns() {
            let glyph = scene
                .glyph(GridCoord::new(row, column))
                .unwrap_or(Glyph::Wall);
            text.push(glyph.symbol());
        }
        text.push('\n');
    }
    text
}

/// Placement of a scene on a character-cell screen.
///
/// Each grid tile occupies `cell_width` screen columns and one screen row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneLayout {
    origin_column: u32,
    origin_row: u32,
    cell_width: u32,
    rows: u32,
    columns: u32,
}

impl SceneLayout {
    /// Creates a layout anchoring the top-left tile of a `rows`×`columns` scene.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidCellWidth`] when `cell_width` is zero.
    pub fn new(
        origin_column: u32,
        origin_row: u32,
        cell_width: u32,
        rows: u32,
        columns: u32,
    ) -> Result<Self, RenderingError> {
        if cell_width == 0 {
            return Err(RenderingError::InvalidCellWidth { cell_width });
        }

        Ok(Self {
            origin_column,
            origin_row,
            cell_width,
            rows,
            columns,
        })
    }

    /// Creates a layout that centers the scene within the provided screen size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidCellWidth`] when `cell_width` is zero.
    pub fn centered(
        scene: &Scene,
        screen: Viewport,
        cell_width: u32,
    ) -> Result<Self, RenderingError> {
        let width = scene.columns().saturating_mul(cell_width);
        let origin_column = screen.width.saturating_sub(width) / 2;
        let origin_row = screen.height.saturating_sub(scene.rows() + 1) / 2;
        Self::new(
            origin_column,
            origin_row,
            cell_width,
            scene.rows(),
            scene.columns(),
        )
    }

    /// Screen columns occupied by each tile.
    #[must_use]
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Screen position `(column, row)` of the top-left character of a tile.
    #[must_use]
    pub fn to_screen(&self, coord: GridCoord) -> (u32, u32) {
        (
            self.origin_column
                .saturating_add(coord.column().saturating_mul(self.cell_width)),
            self.origin_row.saturating_add(coord.row()),
        )
    }

    /// Tile under the screen position `(column, row)`, if the position lies on the scene.
    #[must_use]
    pub fn to_grid(&self, column: u32, row: u32) -> Option<GridCoord> {
        let row = row.checked_sub(self.origin_row)?;
        let column = column.checked_sub(self.origin_column)? / self.cell_width;
        (row < self.rows && column < self.columns).then(|| GridCoord::new(row, column))
    }

    /// Screen row directly below the scene.
    #[must_use]
    pub const fn status_row(&self) -> u32 {
        self.origin_row.saturating_add(self.rows)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title announced by the backend.
    pub window_title: String,
    /// Colors used to draw the scene.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Runner scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Each tile must span at least one screen column.
    InvalidCellWidth {
        /// Provided width that failed validation.
        cell_width: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellWidth { cell_width } => {
                write!(f, "cell_width must be positive (received {cell_width})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use maze_runner_core::{CellCoord, Dimensions};
    use maze_runner_world::lattice::CellLattice;

    use super::*;

    fn corridor_scene() -> Scene {
        let mut lattice = CellLattice::new(Dimensions::new(1, 3)).expect("valid dimensions");
        lattice
            .open_between(CellCoord::new(0, 0), CellCoord::new(0, 1))
            .expect("adjacent");
        lattice
            .open_between(CellCoord::new(0, 1), CellCoord::new(0, 2))
            .expect("adjacent");
        Scene::new(
            ExpandedGrid::project(&lattice),
            GridCoord::new(1, 1),
            PlayState::Playing,
            "hello",
        )
    }

    #[test]
    fn color_round_trips_through_bytes() {
        let color = Color::from_rgb_u8(12, 200, 255);
        assert_eq!(color.to_rgb_u8(), (12, 200, 255));
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).to_rgb_u8(), (255, 0, 128));
    }

    #[test]
    fn render_text_marks_player_and_route() {
        let scene = corridor_scene().with_route([GridCoord::new(1, 2), GridCoord::new(1, 3)]);

        assert_eq!(render_text(&scene), "#######\n#@..  #\n#######\n");
    }

    #[test]
    fn player_glyph_wins_over_route() {
        let scene = corridor_scene().with_route([GridCoord::new(1, 1)]);

        assert_eq!(scene.glyph(GridCoord::new(1, 1)), Some(Glyph::Player));
        assert_eq!(scene.glyph(GridCoord::new(0, 0)), Some(Glyph::Wall));
        assert_eq!(scene.glyph(GridCoord::new(9, 9)), None);
    }

    #[test]
    fn status_line_switches_to_win_message() {
        let mut scene = corridor_scene();
        assert_eq!(scene.status_line(), "hello");

        scene.play_state = PlayState::Won;
        assert_eq!(scene.status_line(), WIN_MESSAGE);
    }

    #[test]
    fn layout_maps_screen_positions_back_to_tiles() {
        let layout = SceneLayout::new(4, 2, 2, 3, 7).expect("positive cell width");

        assert_eq!(layout.to_screen(GridCoord::new(1, 3)), (10, 3));
        assert_eq!(layout.to_grid(10, 3), Some(GridCoord::new(1, 3)));
        assert_eq!(layout.to_grid(11, 3), Some(GridCoord::new(1, 3)));
        assert_eq!(layout.to_grid(3, 3), None);
        assert_eq!(layout.to_grid(18, 3), None);
        assert_eq!(layout.to_grid(10, 5), None);
        assert_eq!(layout.status_row(), 5);
    }

    #[test]
    fn layout_rejects_zero_cell_width() {
        assert_eq!(
            SceneLayout::new(0, 0, 0, 3, 3),
            Err(RenderingError::InvalidCellWidth { cell_width: 0 })
        );
    }

    #[test]
    fn centered_layout_keeps_scene_on_screen() {
        let scene = corridor_scene();
        let layout = SceneLayout::centered(&scene, Viewport::new(20, 10), 2)
            .expect("positive cell width");

        assert_eq!(layout.to_screen(GridCoord::new(0, 0)), (3, 3));
        assert_eq!(layout.to_grid(3, 3), Some(GridCoord::new(0, 0)));
    }

    #[test]
    fn frame_input_reports_emptiness() {
        assert!(FrameInput::default().is_empty());
        assert!(!FrameInput {
            regenerate: true,
            ..FrameInput::default()
        }
        .is_empty());
    }
}
