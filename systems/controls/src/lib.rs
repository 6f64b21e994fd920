#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system that turns per-frame input intents into simulation commands.

use chronolife_core::{CellCoord, Command};

/// Pointer observations distilled from adapter-provided frame input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerInput {
    /// Cell under the pointer, if it hovers the field.
    pub cell: Option<CellCoord>,
    /// Whether the button went down over the field on this frame.
    pub pressed: bool,
    /// Whether the button is held on this frame.
    pub held: bool,
    /// Whether the button was released on this frame.
    pub released: bool,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Whether the player toggled playback on this frame.
    pub toggle_pause: bool,
    /// Whether the player requested a single step backwards.
    pub step_backward: bool,
    /// Whether the player requested a single step forwards.
    pub step_forward: bool,
    /// Whether the player cycled the playback speed.
    pub cycle_speed: bool,
    /// Whether the player requested a random field.
    pub randomize: bool,
    /// Whether the player requested an empty field.
    pub clear: bool,
    /// Pointer state for paint strokes.
    pub pointer: PointerInput,
}

/// Control system that translates input snapshots into command batches.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    stroke_cell: Option<CellCoord>,
}

impl Controls {
    /// Creates a new control system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { stroke_cell: None }
    }

    /// Emits the commands requested by `input`.
    ///
    /// Button intents come first so that a stroke starting on the same frame
    /// resolves its paint value against the updated playback state. A held
    /// pointer only emits a drag once it reaches a cell it has not painted yet,
    /// and a release is handled after any press reported on the same frame.
    pub fn handle(&mut self, input: ControlInput, out: &mut Vec<Command>) {
        if input.toggle_pause {
            out.push(Command::TogglePause);
        }
        if input.step_backward {
            out.push(Command::StepBackward);
        }
        if input.step_forward {
            out.push(Command::StepForward);
        }
        if input.cycle_speed {
            out.push(Command::ToggleSpeedMultiplier);
        }
        if input.randomize {
            out.push(Command::Randomize);
        }
        if input.clear {
            out.push(Command::Clear);
        }

        self.handle_pointer(input.pointer, out);
    }

    fn handle_pointer(&mut self, pointer: PointerInput, out: &mut Vec<Command>) {
        if pointer.pressed {
            if let Some(cell) = pointer.cell {
                self.stroke_cell = Some(cell);
                out.push(Command::PressPointer { cell });
            }
        } else if pointer.held {
            if let Some(cell) = pointer.cell {
                if self.stroke_cell != Some(cell) {
                    self.stroke_cell = Some(cell);
                    out.push(Command::DragPointer { cell });
                }
            }
        } else {
            self.stroke_cell = None;
        }

        // A quick click can press and release within one frame.
        if pointer.released {
            self.stroke_cell = None;
            out.push(Command::SetPointerDown { down: false });
        }
    }
}
