#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state management for Chronolife.
//!
//! [`SimulationController`] owns the current [`Grid`], the bounded
//! [`History`] of earlier generations and the playback state. Hosts either
//! call its command methods directly or route [`Command`] values through
//! [`apply`], which additionally reports the resulting [`Event`]s.

mod history;

use std::time::Duration;

use chronolife_core::{
    CellCoord, Command, Event, Grid, PlayState, SpeedSetting, BASE_STEP_INTERVAL, DEFAULT_DENSITY,
    GRID_HEIGHT, GRID_WIDTH, HISTORY_LIMIT,
};
use chronolife_system_step_engine::StepEngine;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

pub use history::History;

/// Runtime values for the simulation constants.
///
/// [`SimulationConfig::default`] mirrors the compile-time constants exported
/// by `chronolife-core`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of cell columns.
    pub width: u32,
    /// Number of cell rows.
    pub height: u32,
    /// Maximum number of generations retained for stepping backwards.
    pub history_limit: usize,
    /// Time between automatic generations at the 1x multiplier.
    pub base_step_interval: Duration,
    /// Probability that a cell starts alive when randomised.
    pub density: f64,
    /// Seed for the randomiser; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            history_limit: HISTORY_LIMIT,
            base_step_interval: BASE_STEP_INTERVAL,
            density: DEFAULT_DENSITY,
            seed: None,
        }
    }
}

/// Orchestrates the grid, its history and playback.
///
/// The field may only be edited while paused, and every generation advance
/// records the previous field first so it can be restored with
/// [`SimulationController::step_backward`].
#[derive(Debug)]
pub struct SimulationController {
    grid: Grid,
    history: History,
    engine: StepEngine,
    play_state: PlayState,
    speed: SpeedSetting,
    pointer_down: bool,
    paint_value: bool,
    accumulated: Duration,
    base_step_interval: Duration,
    density: f64,
    rng: ChaCha8Rng,
}

impl SimulationController {
    /// Creates a paused controller at 1x speed with a randomised default field.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SimulationConfig::default())
    }

    /// Creates a paused controller with a randomised field sized by `config`.
    #[must_use]
    pub fn with_config(config: &SimulationConfig) -> Self {
        let mut controller = Self::from_grid(Grid::new(config.width, config.height), config);
        controller.randomize();
        controller
    }

    /// Creates a paused controller that starts from `grid`.
    ///
    /// The grid's own dimensions take precedence over those in `config`.
    #[must_use]
    pub fn from_grid(grid: Grid, config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            grid,
            history: History::new(config.history_limit),
            engine: StepEngine::new(),
            play_state: PlayState::Paused,
            speed: SpeedSetting::default(),
            pointer_down: false,
            paint_value: true,
            accumulated: Duration::ZERO,
            base_step_interval: config.base_step_interval,
            density: config.density,
            rng,
        }
    }

    /// Accumulates frame time and advances at most one generation.
    ///
    /// Once the accumulated time reaches [`Self::step_interval`] the
    /// accumulator restarts from zero; a generation is only produced while
    /// running. Time spanning several intervals still yields a single advance.
    /// Returns whether a generation was produced.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.accumulated < self.step_interval() {
            return false;
        }

        self.accumulated = Duration::ZERO;
        if self.play_state.is_paused() {
            return false;
        }

        self.advance();
        true
    }

    /// Flips between paused and running playback.
    pub fn toggle_pause(&mut self) {
        self.play_state = self.play_state.toggled();
        debug!(state = ?self.play_state, "playback toggled");
    }

    /// Pauses playback and advances exactly one generation.
    pub fn step_forward(&mut self) {
        self.play_state = PlayState::Paused;
        self.advance();
    }

    /// Restores the most recently recorded generation.
    ///
    /// Returns `false` without touching any state when the history is empty.
    pub fn step_backward(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.grid = previous;
                trace!(history_len = self.history.len(), "generation rewound");
                true
            }
            None => {
                debug!("step backward ignored: history exhausted");
                false
            }
        }
    }

    /// Moves to the next playback multiplier, wrapping after the fastest one.
    pub fn toggle_speed_multiplier(&mut self) {
        self.speed = self.speed.next();
        debug!(multiplier = self.speed.multiplier(), "playback speed changed");
    }

    /// Replaces the field with freshly randomised cells.
    ///
    /// The replaced field is not recorded in the history.
    pub fn randomize(&mut self) {
        self.grid.randomize(self.density, &mut self.rng);
        debug!(population = self.grid.population(), "field randomised");
    }

    /// Kills every cell without recording the replaced field.
    pub fn clear(&mut self) {
        self.grid.clear();
        debug!("field cleared");
    }

    /// Records whether the pointer button is held.
    pub fn set_pointer_down(&mut self, down: bool) {
        self.pointer_down = down;
    }

    /// Writes a single cell while paused.
    ///
    /// Ignored while running and for cells outside the field. Returns whether
    /// the cell changed.
    pub fn paint_cell(&mut self, cell: CellCoord, alive: bool) -> bool {
        if !self.play_state.is_paused() || !self.grid.contains(cell) {
            return false;
        }
        if self.grid.get(cell) == alive {
            return false;
        }
        self.grid.set(cell, alive);
        true
    }

    /// Starts a paint stroke over `cell`.
    ///
    /// The stroke's paint value is fixed here: the inverse of the pressed
    /// cell while paused, live while running. Returns whether the pressed cell
    /// changed.
    pub fn press_pointer(&mut self, cell: CellCoord) -> bool {
        self.pointer_down = true;
        self.paint_value = !self.play_state.is_paused() || !self.grid.get(cell);
        self.paint_cell(cell, self.paint_value)
    }

    /// Continues the active stroke over `cell` with the value fixed at press time.
    ///
    /// Ignored while the pointer is up. Returns whether the cell changed.
    pub fn drag_pointer(&mut self, cell: CellCoord) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.paint_cell(cell, self.paint_value)
    }

    /// Reports whether playback is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.play_state.is_paused()
    }

    /// Current playback state.
    #[must_use]
    pub const fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// Liveness of a cell; cells outside the field are dead.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> bool {
        self.grid.get(cell)
    }

    /// Read-only access to the current field.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn grid_width(&self) -> u32 {
        self.grid.width()
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn grid_height(&self) -> u32 {
        self.grid.height()
    }

    /// Active playback setting.
    #[must_use]
    pub const fn speed(&self) -> SpeedSetting {
        self.speed
    }

    /// Index of the active multiplier.
    #[must_use]
    pub const fn current_speed_index(&self) -> usize {
        self.speed.index()
    }

    /// Active playback multiplier.
    #[must_use]
    pub fn current_speed_multiplier(&self) -> f32 {
        self.speed.multiplier() as f32
    }

    /// Time between automatic generations at the active multiplier.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        self.base_step_interval / self.speed.multiplier()
    }

    /// Number of generations available for stepping backwards.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Reports whether the pointer button is held.
    #[must_use]
    pub const fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Paint value fixed by the most recent stroke.
    #[must_use]
    pub const fn paint_value(&self) -> bool {
        self.paint_value
    }

    fn advance(&mut self) {
        self.history.record(&self.grid);
        self.engine.advance(&mut self.grid);
        trace!(
            population = self.grid.population(),
            history_len = self.history.len(),
            "generation advanced"
        );
    }
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the controller, reporting what changed.
pub fn apply(controller: &mut SimulationController, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if controller.tick(dt) {
                out_events.push(Event::GenerationAdvanced {
                    history_len: controller.history_len(),
                });
            }
        }
        Command::TogglePause => {
            controller.toggle_pause();
            out_events.push(Event::PlayStateChanged {
                state: controller.play_state(),
            });
        }
        Command::StepForward => {
            let was_running = !controller.is_paused();
            controller.step_forward();
            if was_running {
                out_events.push(Event::PlayStateChanged {
                    state: PlayState::Paused,
                });
            }
            out_events.push(Event::GenerationAdvanced {
                history_len: controller.history_len(),
            });
        }
        Command::StepBackward => {
            if controller.step_backward() {
                out_events.push(Event::GenerationRewound {
                    history_len: controller.history_len(),
                });
            }
        }
        Command::ToggleSpeedMultiplier => {
            controller.toggle_speed_multiplier();
            out_events.push(Event::SpeedChanged {
                speed: controller.speed(),
            });
        }
        Command::Randomize => {
            controller.randomize();
            out_events.push(Event::GridRandomized {
                population: controller.grid().population(),
            });
        }
        Command::Clear => {
            controller.clear();
            out_events.push(Event::GridCleared);
        }
        Command::PressPointer { cell } => {
            let was_down = controller.pointer_down();
            let painted = controller.press_pointer(cell);
            if !was_down {
                out_events.push(Event::PointerChanged { down: true });
            }
            if painted {
                out_events.push(Event::CellPainted {
                    cell,
                    alive: controller.paint_value(),
                });
            }
        }
        Command::DragPointer { cell } => {
            if controller.drag_pointer(cell) {
                out_events.push(Event::CellPainted {
                    cell,
                    alive: controller.paint_value(),
                });
            }
        }
        Command::SetPointerDown { down } => {
            if controller.pointer_down() != down {
                controller.set_pointer_down(down);
                out_events.push(Event::PointerChanged { down });
            }
        }
        Command::PaintCell { cell, alive } => {
            if controller.paint_cell(cell, alive) {
                out_events.push(Event::CellPainted { cell, alive });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> SimulationConfig {
        SimulationConfig {
            seed: Some(0xdead_beef),
            ..SimulationConfig::default()
        }
    }

    fn blinker() -> SimulationController {
        let grid = Grid::from_live_cells(
            5,
            5,
            [
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
                CellCoord::new(3, 2),
            ],
        );
        SimulationController::from_grid(grid, &seeded_config())
    }

    #[test]
    fn default_controller_is_paused_at_single_speed() {
        let controller = SimulationController::with_config(&seeded_config());

        assert!(controller.is_paused());
        assert_eq!(controller.current_speed_index(), 0);
        assert!((controller.current_speed_multiplier() - 1.0).abs() < f32::EPSILON);
        assert_eq!(controller.grid_width(), GRID_WIDTH);
        assert_eq!(controller.grid_height(), GRID_HEIGHT);
        assert_eq!(controller.history_len(), 0);
    }

    #[test]
    fn seeded_controllers_start_from_identical_fields() {
        let first = SimulationController::with_config(&seeded_config());
        let second = SimulationController::with_config(&seeded_config());
        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn tick_is_inert_while_paused() {
        let mut controller = blinker();
        let before = controller.grid().clone();

        assert!(!controller.tick(Duration::from_secs(5)));
        assert_eq!(controller.grid(), &before);
        assert_eq!(controller.history_len(), 0);
    }

    #[test]
    fn tick_waits_for_the_step_interval() {
        let mut controller = blinker();
        controller.toggle_pause();

        assert!(!controller.tick(Duration::from_millis(60)));
        assert!(controller.tick(Duration::from_millis(40)));
        assert_eq!(controller.history_len(), 1);
    }

    #[test]
    fn tick_advances_once_even_when_several_intervals_elapsed() {
        let mut controller = blinker();
        controller.toggle_pause();

        assert!(controller.tick(Duration::from_secs(3)));
        assert_eq!(controller.history_len(), 1);
        assert!(!controller.tick(Duration::from_millis(10)));
    }

    #[test]
    fn faster_speed_shortens_the_interval() {
        let mut controller = blinker();
        controller.toggle_pause();
        controller.toggle_speed_multiplier();
        controller.toggle_speed_multiplier();

        assert_eq!(controller.step_interval(), Duration::from_millis(25));
        assert!(controller.tick(Duration::from_millis(25)));
    }

    #[test]
    fn step_forward_pauses_running_playback() {
        let mut controller = blinker();
        controller.toggle_pause();
        controller.step_forward();

        assert!(controller.is_paused());
        assert_eq!(controller.history_len(), 1);
    }

    #[test]
    fn randomize_and_clear_are_not_recorded() {
        let mut controller = blinker();
        controller.randomize();
        controller.clear();

        assert!(controller.grid().is_empty());
        assert_eq!(controller.history_len(), 0);
        assert!(!controller.step_backward());
    }

    #[test]
    fn press_fixes_inverse_paint_value_for_the_whole_stroke() {
        let mut controller = blinker();

        assert!(controller.press_pointer(CellCoord::new(2, 2)));
        assert!(!controller.paint_value());
        assert!(controller.drag_pointer(CellCoord::new(3, 2)));
        assert!(!controller.drag_pointer(CellCoord::new(0, 0)));

        assert_eq!(
            controller.grid().live_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(1, 2)]
        );
    }

    #[test]
    fn press_while_running_resolves_to_live_but_paints_nothing() {
        let mut controller = blinker();
        controller.toggle_pause();
        let before = controller.grid().clone();

        assert!(!controller.press_pointer(CellCoord::new(2, 2)));
        assert!(controller.paint_value());
        assert_eq!(controller.grid(), &before);
    }

    #[test]
    fn drag_requires_held_pointer() {
        let mut controller = blinker();
        assert!(!controller.drag_pointer(CellCoord::new(0, 0)));

        let _ = controller.press_pointer(CellCoord::new(0, 0));
        controller.set_pointer_down(false);
        assert!(!controller.drag_pointer(CellCoord::new(4, 4)));
        assert!(!controller.cell_at(CellCoord::new(4, 4)));
    }

    #[test]
    fn apply_reports_pause_forced_by_step_forward() {
        let mut controller = blinker();
        let mut events = Vec::new();

        apply(&mut controller, Command::TogglePause, &mut events);
        apply(&mut controller, Command::StepForward, &mut events);

        assert_eq!(
            events,
            vec![
                Event::PlayStateChanged {
                    state: PlayState::Running
                },
                Event::PlayStateChanged {
                    state: PlayState::Paused
                },
                Event::GenerationAdvanced { history_len: 1 },
            ]
        );
    }

    #[test]
    fn apply_stays_silent_for_ignored_requests() {
        let mut controller = blinker();
        let mut events = Vec::new();

        apply(&mut controller, Command::StepBackward, &mut events);
        apply(
            &mut controller,
            Command::PaintCell {
                cell: CellCoord::new(9, 9),
                alive: true,
            },
            &mut events,
        );
        apply(
            &mut controller,
            Command::SetPointerDown { down: false },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn apply_reports_stroke_events() {
        let mut controller = blinker();
        let mut events = Vec::new();

        apply(
            &mut controller,
            Command::PressPointer {
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        apply(
            &mut controller,
            Command::DragPointer {
                cell: CellCoord::new(1, 0),
            },
            &mut events,
        );
        apply(
            &mut controller,
            Command::SetPointerDown { down: false },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::PointerChanged { down: true },
                Event::CellPainted {
                    cell: CellCoord::new(0, 0),
                    alive: true
                },
                Event::CellPainted {
                    cell: CellCoord::new(1, 0),
                    alive: true
                },
                Event::PointerChanged { down: false },
            ]
        );
    }
}
