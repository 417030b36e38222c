//! Command-line surface of the `maze-runner` binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "maze-runner")]
#[command(version, about = "Find your way out of a randomly carved maze")]
pub(crate) struct Cli {
    /// Number of cell rows. Anything but a positive integer sizes the maze to the terminal.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) rows: Option<String>,

    /// Number of cell columns. Anything but a positive integer sizes the maze to the terminal.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) columns: Option<String>,

    /// Seed for the maze generator; a random seed is drawn when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// TOML file providing defaults for every other option.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Print the maze as text and exit.
    #[arg(long)]
    pub(crate) print: bool,

    /// Print the maze with the shortest route to the exit and exit.
    #[arg(long, conflicts_with = "print")]
    pub(crate) solve: bool,
}
