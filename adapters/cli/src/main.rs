#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Runner experience.

mod cli;
mod config;
mod session;

use std::io;

use anyhow::Result;
use clap::Parser;
use maze_runner_rendering::{
    render_text, Palette, Presentation, RenderingBackend, SizingPolicy, Viewport,
};
use maze_runner_rendering_terminal::{terminal_viewport, TerminalBackend};
use maze_runner_world::query;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    cli::Cli,
    config::{FileConfig, Settings},
    session::Session,
};

/// Screen assumed when neither the config nor the terminal report one.
const FALLBACK_VIEWPORT: Viewport = Viewport::new(80, 24);

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(&cli, file)?;

    let viewport = settings
        .viewport
        .or_else(terminal_viewport)
        .unwrap_or(FALLBACK_VIEWPORT);
    let dimensions = SizingPolicy::terminal(viewport).resolve(&settings.rows, &settings.columns);
    debug!(
        requested_rows = %settings.rows,
        requested_columns = %settings.columns,
        rows = dimensions.rows(),
        columns = dimensions.columns(),
        "resolved maze dimensions"
    );
    let seed = settings.seed.unwrap_or_else(|| {
        let seed = rand::random();
        info!(seed, "drew random maze seed");
        seed
    });

    let mut session = Session::start(seed, dimensions, settings.navigation)?;
    debug!(
        rows = dimensions.rows(),
        columns = dimensions.columns(),
        exit = %query::exit(session.world()),
        "maze ready"
    );

    if cli.print || cli.solve {
        let scene = if cli.solve {
            session.solved_scene()?
        } else {
            session.scene()
        };
        print!("{}", render_text(&scene));
        return Ok(());
    }

    let presentation = Presentation::new("Maze Runner", Palette::default(), session.scene());
    TerminalBackend::new()
        .with_hold_window(settings.hold_window)
        .run(presentation, move |dt, input, scene| {
            session.advance(dt, input);
            session.refresh(scene);
        })
}
