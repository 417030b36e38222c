//! Optional TOML configuration file and its merge with command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use maze_runner_rendering::Viewport;
use maze_runner_rendering_terminal::input::DEFAULT_HOLD_WINDOW;
use maze_runner_system_navigation as navigation;
use serde::Deserialize;

use crate::cli::Cli;

/// Contents of a `--config` file. Every key is optional.
///
/// ```toml
/// [maze]
/// rows = 12
/// columns = 30
/// seed = 7
///
/// [timing]
/// repeat_ms = 75
/// walk_ms = 50
/// hold_ms = 160
///
/// [viewport]
/// width = 120
/// height = 40
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    maze: MazeSection,
    timing: TimingSection,
    viewport: Option<ViewportSection>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct MazeSection {
    rows: Option<u32>,
    columns: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct TimingSection {
    repeat_ms: Option<u64>,
    walk_ms: Option<u64>,
    hold_ms: Option<u64>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ViewportSection {
    width: u32,
    height: u32,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Effective options after command-line flags override the file.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    /// Requested row count exactly as typed; validated by the sizing policy.
    pub(crate) rows: String,
    /// Requested column count exactly as typed; validated by the sizing policy.
    pub(crate) columns: String,
    pub(crate) seed: Option<u64>,
    pub(crate) navigation: navigation::Config,
    pub(crate) hold_window: Duration,
    pub(crate) viewport: Option<Viewport>,
}

impl Settings {
    pub(crate) fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let FileConfig {
            maze,
            timing,
            viewport,
        } = file;

        let rows = cli
            .rows
            .clone()
            .or_else(|| maze.rows.map(|rows| rows.to_string()))
            .unwrap_or_default();
        let columns = cli
            .columns
            .clone()
            .or_else(|| maze.columns.map(|columns| columns.to_string()))
            .unwrap_or_default();

        let repeat = interval(
            "timing.repeat_ms",
            timing.repeat_ms,
            navigation::DEFAULT_REPEAT_INTERVAL,
        )?;
        let walk = interval(
            "timing.walk_ms",
            timing.walk_ms,
            navigation::DEFAULT_WALK_INTERVAL,
        )?;
        let hold_window = interval("timing.hold_ms", timing.hold_ms, DEFAULT_HOLD_WINDOW)?;

        let viewport = match viewport {
            Some(ViewportSection { width, height }) => {
                if width == 0 || height == 0 {
                    bail!("viewport must be at least 1x1 (received {width}x{height})");
                }
                Some(Viewport::new(width, height))
            }
            None => None,
        };

        Ok(Self {
            rows,
            columns,
            seed: cli.seed.or(maze.seed),
            navigation: navigation::Config::new(repeat, walk),
            hold_window,
            viewport,
        })
    }
}

fn interval(key: &str, millis: Option<u64>, default: Duration) -> Result<Duration> {
    match millis {
        None => Ok(default),
        Some(0) => bail!("{key} must be positive"),
        Some(millis) => Ok(Duration::from_millis(millis)),
    }
}
