#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Chronolife adapters.

use anyhow::Result as AnyResult;
use chronolife_core::{CellCoord, Grid, PlayState, SpeedSetting};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Default edge length of a single cell in screen pixels.
pub const CELL_SIZE: f32 = 10.0;

/// Default height of the navigation bar below the field in screen pixels.
pub const NAV_BAR_HEIGHT: f32 = 40.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the play/pause control was activated on this frame.
    pub toggle_pause: bool,
    /// Whether the step-backward control was activated on this frame.
    pub step_backward: bool,
    /// Whether the step-forward control was activated on this frame.
    pub step_forward: bool,
    /// Whether the speed control was activated on this frame.
    pub cycle_speed: bool,
    /// Whether a random field was requested on this frame.
    pub randomize: bool,
    /// Whether an empty field was requested on this frame.
    pub clear: bool,
    /// Cell under the cursor, if the cursor hovers the field.
    pub cursor_cell: Option<CellCoord>,
    /// Whether the pointer button went down over the field (not over a control).
    pub pointer_pressed: bool,
    /// Whether the pointer button is held.
    pub pointer_held: bool,
    /// Whether the pointer button was released on this frame.
    pub pointer_released: bool,
}

/// Describes the cell field as laid out on screen before scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Edge length of a single cell in unscaled screen units.
    pub cell_size: f32,
}

impl FieldPresentation {
    /// Creates a field descriptor, rejecting non-positive cell sizes.
    pub fn new(columns: u32, rows: u32, cell_size: f32) -> Result<Self, RenderingError> {
        if !(cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
        })
    }

    /// Total width of the field in unscaled screen units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the field in unscaled screen units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Maps a position relative to the field's top-left corner onto a cell.
    ///
    /// Positions outside the field, including negative ones, map to `None`.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        if position.x >= self.width() || position.y >= self.height() {
            return None;
        }

        let column = (position.x / self.cell_size) as u32;
        let row = (position.y / self.cell_size) as u32;
        if column < self.columns && row < self.rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

/// Colors and dimensions of the navigation bar hosting the playback controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavBarView {
    /// Height of the bar in unscaled screen units.
    pub height: f32,
    /// Fill color of the bar.
    pub background: Color,
    /// Fill color of each button.
    pub button_fill: Color,
    /// Outline color of each button.
    pub button_outline: Color,
    /// Color of button icons and labels.
    pub icon: Color,
}

impl NavBarView {
    /// Creates a new navigation bar descriptor.
    #[must_use]
    pub const fn new(
        height: f32,
        background: Color,
        button_fill: Color,
        button_outline: Color,
        icon: Color,
    ) -> Self {
        Self {
            height,
            background,
            button_fill,
            button_outline,
            icon,
        }
    }
}

impl Default for NavBarView {
    fn default() -> Self {
        Self::new(
            NAV_BAR_HEIGHT,
            Color::from_rgb_u8(50, 50, 50),
            Color::from_rgb_u8(100, 100, 100),
            Color::from_rgb_u8(255, 255, 255),
            Color::from_rgb_u8(255, 255, 255),
        )
    }
}

/// Scene content rendered every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Layout of the cell field.
    pub field: FieldPresentation,
    /// Snapshot of the current generation.
    pub grid: Grid,
    /// Playback state shown on the play/pause control.
    pub play_state: PlayState,
    /// Playback speed shown on the speed control.
    pub speed: SpeedSetting,
    /// Number of generations that can still be stepped back.
    pub history_len: usize,
    /// Color of live cells.
    pub cell_color: Color,
    /// Navigation bar hosting the playback controls.
    pub nav_bar: NavBarView,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        field: FieldPresentation,
        grid: Grid,
        play_state: PlayState,
        speed: SpeedSetting,
        history_len: usize,
        cell_color: Color,
        nav_bar: NavBarView,
    ) -> Self {
        Self {
            field,
            grid,
            play_state,
            speed,
            history_len,
            cell_color,
            nav_bar,
        }
    }

    /// Unscaled size of the field plus the navigation bar.
    #[must_use]
    pub fn preferred_size(&self) -> Vec2 {
        Vec2::new(self.field.width(), self.field.height() + self.nav_bar.height)
    }
}

/// Static description of the presentation environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Chronolife scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and refreshes the scene
    /// before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive edge length.
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}
