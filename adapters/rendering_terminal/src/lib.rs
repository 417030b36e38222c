#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering backend built on crossterm.
//!
//! The backend owns the terminal for the duration of [`RenderingBackend::run`]:
//! it switches to the alternate screen in raw mode with mouse capture, polls
//! input once per frame, hands the collected [`FrameInput`] to the adapter's
//! update closure and repaints whatever changed.

mod draw;
pub mod input;

use std::{
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
    ExecutableCommand,
};
use maze_runner_rendering::{FrameInput, Presentation, RenderingBackend, Scene, Viewport};
use tracing::{debug, warn};

use crate::{
    draw::Canvas,
    input::{Flow, InputCollector, DEFAULT_HOLD_WINDOW},
};

/// Screen columns used to draw a single grid tile, keeping tiles roughly square.
const CELL_WIDTH: u32 = 2;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Size of the attached terminal, if it can be queried.
#[must_use]
pub fn terminal_viewport() -> Option<Viewport> {
    terminal::size()
        .ok()
        .map(|(width, height)| Viewport::new(u32::from(width), u32::from(height)))
}

/// Rendering backend that draws into the controlling terminal.
#[derive(Debug)]
pub struct TerminalBackend {
    hold_window: Duration,
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self {
            hold_window: DEFAULT_HOLD_WINDOW,
        }
    }
}

impl TerminalBackend {
    /// Returns a backend using the default key hold window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures how long a key may stay silent before it counts as released.
    #[must_use]
    pub fn with_hold_window(mut self, hold_window: Duration) -> Self {
        self.hold_window = hold_window;
        self
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self { hold_window } = self;
        let Presentation {
            window_title,
            palette,
            mut scene,
        } = presentation;

        let _session = TerminalSession::enter(&window_title)?;
        let mut stdout = io::stdout();
        let mut input = InputCollector::new(hold_window);
        let mut canvas = Canvas::new(CELL_WIDTH);
        let mut screen = terminal_viewport().context("failed to query terminal size")?;
        let mut last_frame = Instant::now();

        loop {
            let frame_start = Instant::now();
            while event::poll(Duration::ZERO).context("failed to poll terminal events")? {
                let event = event::read().context("failed to read terminal event")?;
                if let Event::Resize(width, height) = event {
                    debug!(width, height, "terminal resized");
                    screen = Viewport::new(u32::from(width), u32::from(height));
                    canvas.invalidate();
                }
                if input.record(&event, Instant::now(), canvas.layout()) == Flow::Quit {
                    return Ok(());
                }
            }

            let frame = input.finish(Instant::now());
            let dt = frame_start.saturating_duration_since(last_frame);
            last_frame = frame_start;
            update_scene(dt, frame, &mut scene);
            canvas.draw(&mut stdout, &scene, &palette, screen)?;

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_INTERVAL {
                thread::sleep(FRAME_INTERVAL - elapsed);
            }
        }
    }
}

/// Puts the terminal into interactive mode and restores it when dropped.
struct TerminalSession {
    keyboard_enhanced: bool,
}

impl TerminalSession {
    fn enter(title: &str) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut session = Self {
            keyboard_enhanced: false,
        };

        let mut stdout = io::stdout();
        let _ = stdout
            .execute(EnterAlternateScreen)?
            .execute(Hide)?
            .execute(EnableMouseCapture)?
            .execute(SetTitle(title))?;

        // Key release events are only reported under the enhanced protocol.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            let _ = stdout.execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
            session.keyboard_enhanced = true;
        }
        debug!(
            keyboard_enhanced = session.keyboard_enhanced,
            "entered terminal session"
        );
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            let _ = stdout.execute(PopKeyboardEnhancementFlags);
        }
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(Show);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.flush();
        if let Err(error) = terminal::disable_raw_mode() {
            warn!(%error, "failed to restore terminal mode");
        }
    }
}
