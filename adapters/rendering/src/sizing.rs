//! Resolution of requested maze dimensions against the available screen.

use maze_runner_core::Dimensions;

/// Screen area measured in character cells (or pixels for graphical backends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport of the provided size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Turns user supplied dimension text into lattice dimensions.
///
/// Invalid input never reaches the generator: when either value is missing,
/// non-numeric, below one or above [`Dimensions::MAX_EXTENT`], both dimensions
/// fall back to the largest maze that fits the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizingPolicy {
    viewport: Viewport,
    reserved_rows: u32,
    cell_width: u32,
    cell_height: u32,
}

impl SizingPolicy {
    /// Creates a policy for a viewport in which each grid tile spans
    /// `cell_width`×`cell_height` units and `reserved_rows` are kept for chrome.
    #[must_use]
    pub const fn new(
        viewport: Viewport,
        reserved_rows: u32,
        cell_width: u32,
        cell_height: u32,
    ) -> Self {
        Self {
            viewport,
            reserved_rows,
            cell_width,
            cell_height,
        }
    }

    /// Policy for a terminal where tiles are two columns wide and one row tall.
    #[must_use]
    pub const fn terminal(viewport: Viewport) -> Self {
        Self::new(viewport, 1, 2, 1)
    }

    /// Largest maze that fits the viewport, kept within `1..=MAX_EXTENT` per axis.
    #[must_use]
    pub fn default_dimensions(&self) -> Dimensions {
        let usable_height = self.viewport.height.saturating_sub(self.reserved_rows);
        let rows = fit(usable_height, self.cell_height);
        let columns = fit(self.viewport.width, self.cell_width);
        Dimensions::new(rows, columns)
    }

    /// Parses both values, returning `None` unless each is an integer in
    /// `1..=MAX_EXTENT`.
    #[must_use]
    pub fn parse(rows: &str, columns: &str) -> Option<Dimensions> {
        let rows = parse_extent(rows)?;
        let columns = parse_extent(columns)?;
        Some(Dimensions::new(rows, columns))
    }

    /// Parses the requested dimensions, substituting the viewport default for both
    /// when either is unusable.
    #[must_use]
    pub fn resolve(&self, rows: &str, columns: &str) -> Dimensions {
        Self::parse(rows, columns).unwrap_or_else(|| self.default_dimensions())
    }
}

fn parse_extent(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| Dimensions::extent_in_range(*value))
}

/// `extent / (2 * cell) - 1`, clamped to `1..=MAX_EXTENT`.
fn fit(extent: u32, cell: u32) -> u32 {
    let span = cell.max(1).saturating_mul(2);
    (extent / span)
        .saturating_sub(1)
        .clamp(1, Dimensions::MAX_EXTENT)
}
