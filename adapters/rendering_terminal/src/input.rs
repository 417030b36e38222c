//! Translation of crossterm events into per-frame input snapshots.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use maze_runner_core::Direction;
use maze_runner_rendering::{FrameInput, SceneLayout};

/// Time after the last press or repeat of a key at which it is considered released.
///
/// Terminals that cannot report key releases only deliver auto-repeat presses
/// while a key is held, so silence longer than this window ends the hold.
pub const DEFAULT_HOLD_WINDOW: Duration = Duration::from_millis(160);

/// Outcome of feeding a single terminal event to the collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// The player asked to leave.
    Quit,
}

/// Accumulates terminal events into a [`FrameInput`] for the next frame.
#[derive(Debug)]
pub struct InputCollector {
    hold_window: Duration,
    held: Option<(Direction, Instant)>,
    pending: FrameInput,
}

impl InputCollector {
    /// Creates a collector that synthesizes releases after `hold_window` of silence.
    #[must_use]
    pub fn new(hold_window: Duration) -> Self {
        Self {
            hold_window,
            held: None,
            pending: FrameInput::default(),
        }
    }

    /// Direction currently considered held down.
    #[must_use]
    pub fn held(&self) -> Option<Direction> {
        self.held.map(|(direction, _)| direction)
    }

    /// Records one terminal event observed at `now`.
    ///
    /// Mouse clicks are resolved to tiles through `layout` when one is known.
    pub fn record(&mut self, event: &Event, now: Instant, layout: Option<&SceneLayout>) -> Flow {
        match event {
            Event::Key(key) => self.record_key(key, now),
            Event::Mouse(mouse) => {
                self.record_mouse(mouse, layout);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    /// Returns the input gathered since the previous call.
    pub fn finish(&mut self, now: Instant) -> FrameInput {
        if let Some((_, seen)) = self.held {
            if now.saturating_duration_since(seen) > self.hold_window {
                self.held = None;
                self.pending.release = true;
            }
        }
        std::mem::take(&mut self.pending)
    }

    fn record_key(&mut self, key: &KeyEvent, now: Instant) -> Flow {
        if key.kind == KeyEventKind::Release {
            if let Some(direction) = direction_for(key.code) {
                if self.held() == Some(direction) {
                    self.held = None;
                    self.pending.release = true;
                }
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Flow::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Flow::Quit,
            KeyCode::Char('g') => {
                self.pending.regenerate = true;
                Flow::Continue
            }
            code => {
                if let Some(direction) = direction_for(code) {
                    if self.held() != Some(direction) {
                        self.pending.presses.push(direction);
                        self.pending.release = false;
                    }
                    self.held = Some((direction, now));
                }
                Flow::Continue
            }
        }
    }

    fn record_mouse(&mut self, mouse: &MouseEvent, layout: Option<&SceneLayout>) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(layout) = layout else {
            return;
        };
        if let Some(target) = layout.to_grid(u32::from(mouse.column), u32::from(mouse.row)) {
            self.pending.click = Some(target);
        }
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_WINDOW)
    }
}

/// Direction bound to the key: arrows, `hjkl` or `wasd`.
#[must_use]
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    let direction = match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Direction::North,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Direction::South,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Direction::West,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Direction::East,
        _ => return None,
    };
    Some(direction)
}
