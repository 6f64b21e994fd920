#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Chronolife simulator.

mod config;

use anyhow::{Context, Result};
use chronolife_core::{Command, Event};
use chronolife_rendering::{
    Color, FieldPresentation, FrameInput, NavBarView, Presentation, RenderingBackend, Scene,
    CELL_SIZE,
};
use chronolife_rendering_macroquad::MacroquadBackend;
use chronolife_system_controls::{ControlInput, Controls, PointerInput};
use chronolife_world::{self as world, SimulationController};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, CliArgs};

/// Entry point for the Chronolife command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let config = CliArgs::parse()
        .resolve()
        .context("failed to resolve configuration")?;
    log_startup(&config);

    let simulation = &config.simulation;
    let mut controller = SimulationController::with_config(simulation);
    let field = FieldPresentation::new(simulation.width, simulation.height, CELL_SIZE)
        .context("failed to describe the cell field")?;
    let scene = Scene::new(
        field,
        controller.grid().clone(),
        controller.play_state(),
        controller.speed(),
        controller.history_len(),
        Color::from_rgb_u8(255, 255, 255),
        NavBarView::default(),
    );
    let presentation = Presentation::new("Chronolife", Color::from_rgb_u8(0, 0, 0), scene);

    let mut controls = Controls::new();
    let mut commands = Vec::new();
    let mut events = Vec::new();

    MacroquadBackend::new()
        .with_vsync(config.vsync)
        .with_show_fps(config.show_fps)
        .run(presentation, move |dt, input, scene| {
            events.clear();
            controls.handle(control_input(input), &mut commands);
            commands.push(Command::Tick { dt });
            for command in commands.drain(..) {
                world::apply(&mut controller, command, &mut events);
            }

            if events.iter().any(affects_scene) {
                refresh_scene(&controller, scene);
            }
        })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn log_startup(config: &AppConfig) {
    let simulation = &config.simulation;
    info!(
        width = simulation.width,
        height = simulation.height,
        density = simulation.density,
        step_interval = ?simulation.base_step_interval,
        history_limit = simulation.history_limit,
        seed = ?simulation.seed,
        vsync = config.vsync,
        show_fps = config.show_fps,
        "starting chronolife"
    );
}

fn control_input(input: FrameInput) -> ControlInput {
    ControlInput {
        toggle_pause: input.toggle_pause,
        step_backward: input.step_backward,
        step_forward: input.step_forward,
        cycle_speed: input.cycle_speed,
        randomize: input.randomize,
        clear: input.clear,
        pointer: PointerInput {
            cell: input.cursor_cell,
            pressed: input.pointer_pressed,
            held: input.pointer_held,
            released: input.pointer_released,
        },
    }
}

fn affects_scene(event: &Event) -> bool {
    !matches!(
        event,
        Event::TimeAdvanced { .. } | Event::PointerChanged { .. }
    )
}

fn refresh_scene(controller: &SimulationController, scene: &mut Scene) {
    scene.grid.clone_from(controller.grid());
    scene.play_state = controller.play_state();
    scene.speed = controller.speed();
    scene.history_len = controller.history_len();
}
