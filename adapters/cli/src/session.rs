//! Glue between the world, the navigation system and the rendered scene.

use std::time::Duration;

use anyhow::{Context, Result};
use maze_runner_core::{Command, Dimensions, Event};
use maze_runner_rendering::{FrameInput, Scene};
use maze_runner_system_navigation::{self as navigation, Navigation, NavigationInput};
use maze_runner_world::{self as world, query, World};
use tracing::warn;

/// One interactive play-through, possibly spanning several mazes.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    navigation: Navigation,
    dimensions: Dimensions,
    pending: Vec<Event>,
    shown_generation: Option<u64>,
}

impl Session {
    /// Seeds the world and carves the first maze.
    pub(crate) fn start(
        seed: u64,
        dimensions: Dimensions,
        config: navigation::Config,
    ) -> Result<Self> {
        let mut session = Self {
            world: World::with_seed(seed).context("failed to build the initial maze")?,
            navigation: Navigation::new(config),
            dimensions,
            pending: Vec::new(),
            shown_generation: None,
        };
        session.regenerate();

        let rejection = session.pending.iter().find_map(|event| match event {
            Event::GenerationRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        if let Some(reason) = rejection {
            return Err(reason).with_context(|| {
                format!(
                    "failed to generate a {}x{} maze",
                    dimensions.rows(),
                    dimensions.columns()
                )
            });
        }
        Ok(session)
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Replaces the current maze with a fresh one of the session's dimensions.
    pub(crate) fn regenerate(&mut self) {
        self.submit(Command::GenerateMaze {
            dimensions: self.dimensions,
        });
    }

    /// Runs one frame: applies regeneration, advances time and lets navigation react.
    ///
    /// Events produced by the moves issued here are delivered on the next frame.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) {
        if input.regenerate {
            self.regenerate();
        }
        self.submit(Command::Tick { dt });

        let events = std::mem::take(&mut self.pending);
        for event in &events {
            if let Event::GenerationRejected { dimensions, reason } = event {
                warn!(
                    rows = dimensions.rows(),
                    columns = dimensions.columns(),
                    %reason,
                    "kept previous maze"
                );
            }
        }

        let inputs = navigation_inputs(&input);
        let mut commands = Vec::new();
        self.navigation.handle(
            &events,
            &inputs,
            query::grid(&self.world),
            query::player(&self.world),
            &mut commands,
        );
        for command in commands {
            self.submit(command);
        }
    }

    /// Snapshot of the current maze for rendering.
    pub(crate) fn scene(&self) -> Scene {
        Scene::new(
            query::grid(&self.world).clone(),
            query::player(&self.world),
            query::play_state(&self.world),
            query::welcome_banner(&self.world),
        )
    }

    /// Snapshot with the shortest route from the player to the exit highlighted.
    pub(crate) fn solved_scene(&self) -> Result<Scene> {
        let route = query::route_to_exit(&self.world).context("exit is unreachable")?;
        Ok(self.scene().with_route(route))
    }

    /// Brings `scene` up to date, rebuilding it only when a new maze was generated.
    pub(crate) fn refresh(&mut self, scene: &mut Scene) {
        let generation = query::generation(&self.world);
        if self.shown_generation != Some(generation) {
            *scene = self.scene();
            self.shown_generation = Some(generation);
            return;
        }
        scene.player = query::player(&self.world);
        scene.play_state = query::play_state(&self.world);
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }
}

/// Presses come first so that a release reported in the same frame ends the hold.
fn navigation_inputs(input: &FrameInput) -> Vec<NavigationInput> {
    let mut inputs: Vec<NavigationInput> = input
        .presses
        .iter()
        .map(|direction| NavigationInput::Press(*direction))
        .collect();
    if input.release {
        inputs.push(NavigationInput::Release);
    }
    if let Some(target) = input.click {
        inputs.push(NavigationInput::Click(target));
    }
    inputs
}
