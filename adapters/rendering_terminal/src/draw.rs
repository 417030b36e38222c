//! Incremental drawing of scenes onto a character-cell terminal.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use maze_runner_core::GridCoord;
use maze_runner_rendering::{Color, Glyph, Palette, Scene, SceneLayout, Viewport};

const CONTROLS_HINT: &str = "arrows/hjkl/wasd move, click walks, g new maze, q quits";

/// Remembers what is on screen so that only changed tiles are redrawn.
#[derive(Debug)]
pub(crate) struct Canvas {
    cell_width: u32,
    layout: Option<SceneLayout>,
    last: Vec<Option<Glyph>>,
    last_status: String,
    needs_full: bool,
}

impl Canvas {
    pub(crate) fn new(cell_width: u32) -> Self {
        Self {
            cell_width,
            layout: None,
            last: Vec::new(),
            last_status: String::new(),
            needs_full: true,
        }
    }

    /// Layout used by the most recent successful draw.
    pub(crate) fn layout(&self) -> Option<&SceneLayout> {
        self.layout.as_ref()
    }

    /// Forces the next draw to repaint every tile.
    pub(crate) fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub(crate) fn draw<W: Write>(
        &mut self,
        out: &mut W,
        scene: &Scene,
        palette: &Palette,
        screen: Viewport,
    ) -> Result<()> {
        let needed_width = scene.columns().saturating_mul(self.cell_width);
        let needed_height = scene.rows().saturating_add(1);
        if screen.width < needed_width || screen.height < needed_height {
            let _ = out.queue(MoveTo(0, 0))?;
            let _ = out.queue(Clear(ClearType::All))?;
            let _ = out.queue(Print(format!(
                "Terminal too small. Need at least {needed_width}x{needed_height} (cols x rows). Current: {}x{}.",
                screen.width, screen.height
            )))?;
            out.flush()?;
            self.layout = None;
            self.needs_full = true;
            return Ok(());
        }

        let layout = SceneLayout::centered(scene, screen, self.cell_width)?;
        let tile_count = usize::try_from(u64::from(scene.rows()) * u64::from(scene.columns()))?;
        if self.layout != Some(layout) || self.last.len() != tile_count {
            self.layout = Some(layout);
            self.last = vec![None; tile_count];
            self.needs_full = true;
        }
        if self.needs_full {
            let _ = out.queue(SetBackgroundColor(term_color(palette.background)))?;
            let _ = out.queue(Clear(ClearType::All))?;
        }

        let mut index = 0;
        for row in 0..scene.rows() {
            for column in 0..scene.columns() {
                let coord = GridCoord::new(row, column);
                let glyph = scene.glyph(coord);
                if self.needs_full || self.last[index] != glyph {
                    self.last[index] = glyph;
                    if let Some(glyph) = glyph {
                        draw_tile(out, &layout, coord, glyph, palette)?;
                    }
                }
                index += 1;
            }
        }

        let status = format!("{}  ({CONTROLS_HINT})", scene.status_line());
        if self.needs_full || status != self.last_status {
            let (column, _) = layout.to_screen(GridCoord::new(0, 0));
            let _ = out.queue(MoveTo(clamp_u16(column), clamp_u16(layout.status_row())))?;
            let _ = out.queue(SetBackgroundColor(term_color(palette.background)))?;
            let _ = out.queue(SetForegroundColor(term_color(palette.text)))?;
            let _ = out.queue(Clear(ClearType::CurrentLine))?;
            let _ = out.queue(Print(&status))?;
            let _ = out.queue(ResetColor)?;
            self.last_status = status;
        }

        self.needs_full = false;
        out.flush()?;
        Ok(())
    }
}

fn draw_tile<W: Write>(
    out: &mut W,
    layout: &SceneLayout,
    coord: GridCoord,
    glyph: Glyph,
    palette: &Palette,
) -> Result<()> {
    let (column, row) = layout.to_screen(coord);
    let _ = out.queue(MoveTo(clamp_u16(column), clamp_u16(row)))?;
    let _ = out.queue(SetBackgroundColor(term_color(palette.background)))?;
    let _ = out.queue(SetForegroundColor(term_color(palette.color(glyph))))?;
    let _ = out.queue(Print(cell_text(glyph, layout.cell_width())))?;
    let _ = out.queue(ResetColor)?;
    Ok(())
}

/// Characters printed for a glyph spanning `cell_width` columns.
pub(crate) fn cell_text(glyph: Glyph, cell_width: u32) -> String {
    let width = usize::try_from(cell_width).unwrap_or(1);
    let (lead, fill) = match glyph {
        Glyph::Wall => ('█', '█'),
        Glyph::Floor => (' ', ' '),
        Glyph::Route => ('·', ' '),
        Glyph::Player => ('@', ' '),
    };
    std::iter::once(lead)
        .chain(std::iter::repeat(fill))
        .take(width)
        .collect()
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb_u8();
    TermColor::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use maze_runner_core::{CellCoord, Dimensions, PlayState};
    use maze_runner_world::{grid::ExpandedGrid, lattice::CellLattice};

    use super::*;

    fn scene() -> Scene {
        let mut lattice = CellLattice::new(Dimensions::new(1, 2)).expect("valid dimensions");
        lattice
            .open_between(CellCoord::new(0, 0), CellCoord::new(0, 1))
            .expect("adjacent");
        Scene::new(
            ExpandedGrid::project(&lattice),
            GridCoord::new(1, 1),
            PlayState::Playing,
            "Find the way out.",
        )
    }

    #[test]
    fn cell_text_fills_the_cell_width() {
        assert_eq!(cell_text(Glyph::Wall, 2), "██");
        assert_eq!(cell_text(Glyph::Player, 3), "@  ");
        assert_eq!(cell_text(Glyph::Route, 1), "·");
    }

    #[test]
    fn first_draw_paints_scene_and_status() {
        let mut canvas = Canvas::new(2);
        let mut out = Vec::new();

        canvas
            .draw(&mut out, &scene(), &Palette::default(), Viewport::new(40, 10))
            .expect("draw succeeds");

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains('@'));
        assert!(text.contains("Find the way out."));
        assert!(canvas.layout().is_some());
    }

    #[test]
    fn unchanged_scene_writes_nothing() {
        let mut canvas = Canvas::new(2);
        let scene = scene();
        let palette = Palette::default();
        let mut first = Vec::new();
        canvas
            .draw(&mut first, &scene, &palette, Viewport::new(40, 10))
            .expect("draw succeeds");

        let mut second = Vec::new();
        canvas
            .draw(&mut second, &scene, &palette, Viewport::new(40, 10))
            .expect("draw succeeds");

        assert!(second.is_empty(), "nothing changed between frames");
    }

    #[test]
    fn small_screens_show_a_hint_instead_of_the_maze() {
        let mut canvas = Canvas::new(2);
        let mut out = Vec::new();

        canvas
            .draw(&mut out, &scene(), &Palette::default(), Viewport::new(4, 2))
            .expect("draw succeeds");

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("Terminal too small"));
        assert!(canvas.layout().is_none());
    }
}
