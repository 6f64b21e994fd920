#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Chronolife.
//!
//! Macroquad is pulled in without its default `audio` feature; the simulator
//! plays no sound and the ALSA headers it needs are missing on headless hosts.
//!
//! The adapter owns the frame clock and input decoding. Pointer presses over
//! a navigation-bar button activate that button and never start a paint
//! stroke; presses over the field are forwarded as pointer intents.

mod nav_bar;

use self::nav_bar::{draw_nav_bar, NavBarLayout, NavButton};
use anyhow::Result;
use chronolife_core::CellCoord;
use chronolife_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released,
    mouse_position, KeyCode, MouseButton,
};
use std::time::Duration;
use tracing::info;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `P` toggles playback.
    toggle_pause: bool,
    /// `Space` randomises the field.
    randomize: bool,
    /// `C` clears the field.
    clear: bool,
    /// `Right` steps one generation forward.
    step_forward: bool,
    /// `Left` steps one generation back.
    step_backward: bool,
    /// `S` cycles the playback speed.
    cycle_speed: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_pause: is_key_pressed(KeyCode::P),
            randomize: is_key_pressed(KeyCode::Space),
            clear: is_key_pressed(KeyCode::C),
            step_forward: is_key_pressed(KeyCode::Right),
            step_backward: is_key_pressed(KeyCode::Left),
            cycle_speed: is_key_pressed(KeyCode::S),
        }
    }
}

/// Pointer button observations for a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct PointerObservation {
    position: Vec2,
    pressed: bool,
    held: bool,
    released: bool,
}

impl PointerObservation {
    fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            position: Vec2::new(x, y),
            pressed: is_mouse_button_pressed(MouseButton::Left),
            held: is_mouse_button_down(MouseButton::Left),
            released: is_mouse_button_released(MouseButton::Left),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Counts rendered frames and reports the rate once per second of frame time.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame_dt: Duration) -> Option<f32> {
        self.elapsed += frame_dt;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let preferred = scene.preferred_size();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: preferred.x.round() as i32,
            window_height: preferred.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let layout_before = NavBarLayout::new(&metrics_before);
                let frame_input = gather_frame_input(
                    &scene,
                    &metrics_before,
                    &layout_before,
                    PointerObservation::poll(),
                    keyboard,
                );

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_cells(&scene, &metrics);
                draw_nav_bar(&scene, &metrics, &NavBarLayout::new(&metrics));

                if let Some(fps) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!(fps, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement of the field and navigation bar for one frame.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    field_origin: Vec2,
    cell_step: f32,
    nav_bar_origin: Vec2,
    nav_bar_size: Vec2,
}

impl SceneMetrics {
    /// Scales the scene uniformly to fit the screen and centres it.
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let preferred = scene.preferred_size();
        let scale = if preferred.x <= f32::EPSILON || preferred.y <= f32::EPSILON {
            0.0
        } else {
            (screen_width / preferred.x)
                .min(screen_height / preferred.y)
                .max(0.0)
        };

        let scaled = preferred * scale;
        let origin = Vec2::new(
            (screen_width - scaled.x) * 0.5,
            (screen_height - scaled.y) * 0.5,
        );
        let field_height = scene.field.height() * scale;

        Self {
            scale,
            field_origin: origin,
            cell_step: scene.field.cell_size * scale,
            nav_bar_origin: Vec2::new(origin.x, origin.y + field_height),
            nav_bar_size: Vec2::new(scaled.x, scene.nav_bar.height * scale),
        }
    }

    /// Maps a screen position onto a field cell.
    fn cell_at(&self, scene: &Scene, screen_position: Vec2) -> Option<CellCoord> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        scene
            .field
            .cell_at((screen_position - self.field_origin) / self.scale)
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    layout: &NavBarLayout,
    pointer: PointerObservation,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let mut input = FrameInput {
        toggle_pause: keyboard.toggle_pause,
        step_backward: keyboard.step_backward,
        step_forward: keyboard.step_forward,
        cycle_speed: keyboard.cycle_speed,
        randomize: keyboard.randomize,
        clear: keyboard.clear,
        cursor_cell: metrics.cell_at(scene, pointer.position),
        pointer_held: pointer.held,
        pointer_released: pointer.released,
        ..FrameInput::default()
    };

    if !pointer.pressed {
        return input;
    }

    match layout.hit(pointer.position) {
        Some(NavButton::TogglePause) => input.toggle_pause = true,
        Some(NavButton::StepBackward) => input.step_backward = true,
        Some(NavButton::StepForward) => input.step_forward = true,
        Some(NavButton::Speed) => input.cycle_speed = true,
        None => input.pointer_pressed = input.cursor_cell.is_some(),
    }

    input
}

fn draw_cells(scene: &Scene, metrics: &SceneMetrics) {
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    let gap = metrics.scale.min(metrics.cell_step * 0.5);
    let size = metrics.cell_step - gap;
    let color = to_macroquad_color(scene.cell_color);
    for cell in scene.grid.live_cells() {
        macroquad::shapes::draw_rectangle(
            metrics.field_origin.x + cell.column() as f32 * metrics.cell_step,
            metrics.field_origin.y + cell.row() as f32 * metrics.cell_step,
            size,
            size,
            color,
        );
    }
}

fn to_macroquad_color(color: chronolife_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
