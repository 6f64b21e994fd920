//! Playback controls drawn in the navigation bar below the field.
//!
//! Layout and hit-testing are pure so they can be exercised without a window;
//! only the `draw_*` functions touch Macroquad.

use chronolife_core::PlayState;
use chronolife_rendering::{NavBarView, Scene};
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;

use crate::{to_macroquad_color, SceneMetrics};

const PAUSE_BUTTON_SIZE: f32 = 30.0;
const STEP_BUTTON_SIZE: f32 = 20.0;
const SPEED_BUTTON_WIDTH: f32 = 40.0;
const BUTTON_SPACING: f32 = 10.0;
const OUTLINE_THICKNESS: f32 = 2.0;
const LABEL_FONT_SIZE: u16 = 18;

/// Controls hosted by the navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum NavButton {
    StepBackward,
    TogglePause,
    StepForward,
    Speed,
}

/// Screen-space rectangle occupied by a button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ButtonRect {
    pub(crate) origin: Vec2,
    pub(crate) size: Vec2,
}

impl ButtonRect {
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.x
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.y
    }

    fn at(&self, fraction_x: f32, fraction_y: f32) -> MacroquadVec2 {
        MacroquadVec2::new(
            self.origin.x + self.size.x * fraction_x,
            self.origin.y + self.size.y * fraction_y,
        )
    }
}

/// Button placement for the current frame, centred horizontally in the bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NavBarLayout {
    buttons: [(NavButton, ButtonRect); 4],
}

impl NavBarLayout {
    pub(crate) fn new(metrics: &SceneMetrics) -> Self {
        let scale = metrics.scale;
        let sizes = [
            (NavButton::StepBackward, Vec2::splat(STEP_BUTTON_SIZE)),
            (NavButton::TogglePause, Vec2::splat(PAUSE_BUTTON_SIZE)),
            (NavButton::StepForward, Vec2::splat(STEP_BUTTON_SIZE)),
            (
                NavButton::Speed,
                Vec2::new(SPEED_BUTTON_WIDTH, STEP_BUTTON_SIZE),
            ),
        ];

        let total_width = sizes.iter().map(|(_, size)| size.x).sum::<f32>()
            + BUTTON_SPACING * (sizes.len() - 1) as f32;
        let bar_center_y = metrics.nav_bar_origin.y + metrics.nav_bar_size.y * 0.5;
        let mut cursor_x = metrics.nav_bar_origin.x
            + (metrics.nav_bar_size.x - total_width * scale) * 0.5;

        let buttons = sizes.map(|(button, size)| {
            let scaled = size * scale;
            let rect = ButtonRect {
                origin: Vec2::new(cursor_x, bar_center_y - scaled.y * 0.5),
                size: scaled,
            };
            cursor_x += scaled.x + BUTTON_SPACING * scale;
            (button, rect)
        });

        Self { buttons }
    }

    /// Returns the button under `point`, if any.
    pub(crate) fn hit(&self, point: Vec2) -> Option<NavButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(button, _)| *button)
    }

    #[cfg(test)]
    pub(crate) fn rect(&self, button: NavButton) -> Option<ButtonRect> {
        self.buttons
            .iter()
            .find(|(candidate, _)| *candidate == button)
            .map(|(_, rect)| *rect)
    }
}

/// Draws the bar background, every button and its icon.
pub(crate) fn draw_nav_bar(scene: &Scene, metrics: &SceneMetrics, layout: &NavBarLayout) {
    let NavBarView {
        background,
        button_fill,
        button_outline,
        icon,
        ..
    } = scene.nav_bar;

    macroquad::shapes::draw_rectangle(
        metrics.nav_bar_origin.x,
        metrics.nav_bar_origin.y,
        metrics.nav_bar_size.x,
        metrics.nav_bar_size.y,
        to_macroquad_color(background),
    );

    let fill = to_macroquad_color(button_fill);
    let outline = to_macroquad_color(button_outline);
    let icon = to_macroquad_color(icon);

    for (button, rect) in layout.buttons {
        macroquad::shapes::draw_rectangle(
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            fill,
        );
        macroquad::shapes::draw_rectangle_lines(
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            OUTLINE_THICKNESS * metrics.scale,
            outline,
        );

        match button {
            NavButton::TogglePause => draw_play_pause_icon(rect, scene.play_state, icon),
            NavButton::StepForward => draw_step_icon(rect, false, icon),
            NavButton::StepBackward => draw_step_icon(rect, true, icon),
            NavButton::Speed => {
                let label = format!("{}x", scene.speed.multiplier());
                draw_label(rect, &label, metrics.scale, icon);
            }
        }
    }
}

fn draw_play_pause_icon(rect: ButtonRect, play_state: PlayState, color: macroquad::color::Color) {
    match play_state {
        PlayState::Paused => {
            macroquad::shapes::draw_triangle(
                rect.at(0.3, 0.2),
                rect.at(0.3, 0.8),
                rect.at(0.8, 0.5),
                color,
            );
        }
        PlayState::Running => {
            for offset in [0.3, 0.55] {
                let top_left = rect.at(offset, 0.2);
                macroquad::shapes::draw_rectangle(
                    top_left.x,
                    top_left.y,
                    rect.size.x * 0.15,
                    rect.size.y * 0.6,
                    color,
                );
            }
        }
    }
}

fn draw_step_icon(rect: ButtonRect, backward: bool, color: macroquad::color::Color) {
    let (tip, base, bar) = if backward {
        (0.25, 0.65, 0.2)
    } else {
        (0.75, 0.35, 0.68)
    };
    macroquad::shapes::draw_triangle(
        rect.at(base, 0.2),
        rect.at(base, 0.8),
        rect.at(tip, 0.5),
        color,
    );
    let bar_top = rect.at(bar, 0.2);
    macroquad::shapes::draw_rectangle(
        bar_top.x,
        bar_top.y,
        rect.size.x * 0.12,
        rect.size.y * 0.6,
        color,
    );
}

fn draw_label(rect: ButtonRect, label: &str, scale: f32, color: macroquad::color::Color) {
    let font_size = ((f32::from(LABEL_FONT_SIZE) * scale).round() as u16).max(1);
    let dimensions = macroquad::text::measure_text(label, None, font_size, 1.0);
    let x = rect.origin.x + (rect.size.x - dimensions.width) * 0.5;
    let y = rect.origin.y + (rect.size.y + dimensions.offset_y) * 0.5;
    let _ = macroquad::text::draw_text(label, x, y, f32::from(font_size), color);
}
