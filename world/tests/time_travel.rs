use std::{collections::BTreeSet, time::Duration};

use chronolife_core::{CellCoord, Command, Event, Grid, HISTORY_LIMIT, SPEED_MULTIPLIERS};
use chronolife_world::{self as world, History, SimulationConfig, SimulationController};

fn seeded_config() -> SimulationConfig {
    SimulationConfig {
        seed: Some(42),
        ..SimulationConfig::default()
    }
}

fn glider_controller() -> SimulationController {
    let glider = Grid::from_live_cells(
        5,
        5,
        [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]
            .into_iter()
            .map(|(column, row)| CellCoord::new(column, row)),
    );
    SimulationController::from_grid(glider, &seeded_config())
}

#[test]
fn step_forward_then_backward_restores_the_exact_field() {
    let mut controller = SimulationController::with_config(&seeded_config());
    let before = controller.grid().clone();

    controller.step_forward();
    assert_ne!(controller.grid(), &before, "random field should evolve");
    assert!(controller.step_backward());

    assert_eq!(controller.grid(), &before);
    assert_eq!(controller.history_len(), 0);
}

#[test]
fn several_steps_unwind_in_reverse_order() {
    let mut controller = glider_controller();
    let mut generations = vec![controller.grid().clone()];
    for _ in 0..6 {
        controller.step_forward();
        generations.push(controller.grid().clone());
    }

    while let Some(expected) = generations.pop() {
        assert_eq!(controller.grid(), &expected);
        if generations.is_empty() {
            assert!(!controller.step_backward());
        } else {
            assert!(controller.step_backward());
        }
    }
}

#[test]
fn step_backward_on_empty_history_changes_nothing() {
    let mut controller = glider_controller();
    controller.toggle_pause();
    let before = controller.grid().clone();

    assert!(!controller.step_backward());
    assert_eq!(controller.grid(), &before);
    assert!(!controller.is_paused(), "rewind must not touch playback state");
}

#[test]
fn step_backward_keeps_running_playback_running() {
    let mut controller = glider_controller();
    controller.toggle_pause();
    assert!(controller.tick(Duration::from_millis(100)));

    assert!(controller.step_backward());
    assert!(!controller.is_paused());
}

fn binary_marker(value: usize) -> Grid {
    let bits = (0..16u32).filter(|bit| value & (1 << bit) != 0);
    Grid::from_live_cells(16, 1, bits.map(|bit| CellCoord::new(bit, 0)))
}

#[test]
fn history_is_bounded_to_the_most_recent_snapshots() {
    let mut history = History::new(HISTORY_LIMIT);
    for index in 0..HISTORY_LIMIT + 5 {
        history.record(&binary_marker(index));
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    let retained: Vec<&Grid> = history.iter().collect();
    assert_eq!(retained.first(), Some(&&binary_marker(5)), "five oldest evicted");
    assert_eq!(retained.last(), Some(&&binary_marker(HISTORY_LIMIT + 4)));
}

#[test]
fn running_simulation_caps_history_at_configured_limit() {
    let config = SimulationConfig {
        history_limit: 3,
        ..seeded_config()
    };
    let mut controller = SimulationController::with_config(&config);
    controller.toggle_pause();
    for _ in 0..10 {
        assert!(controller.tick(config.base_step_interval));
    }

    assert_eq!(controller.history_len(), 3);
    for _ in 0..3 {
        assert!(controller.step_backward());
    }
    assert!(!controller.step_backward());
}

#[test]
fn glider_phase_through_the_controller() {
    let mut controller = glider_controller();
    controller.step_forward();

    let live: BTreeSet<_> = controller.grid().live_cells().collect();
    let expected: BTreeSet<_> = [(0, 1), (2, 1), (1, 2), (2, 2), (1, 3)]
        .into_iter()
        .map(|(column, row)| CellCoord::new(column, row))
        .collect();
    assert_eq!(live, expected);
}

#[test]
fn painting_while_running_never_changes_the_field() {
    let mut controller = SimulationController::with_config(&seeded_config());
    controller.toggle_pause();
    let before = controller.grid().clone();

    for row in 0..controller.grid_height() + 2 {
        for column in 0..controller.grid_width() + 2 {
            let cell = CellCoord::new(column, row);
            assert!(!controller.paint_cell(cell, true));
            assert!(!controller.paint_cell(cell, false));
        }
    }

    assert_eq!(controller.grid(), &before);
}

#[test]
fn speed_toggle_cycles_through_every_multiplier_and_wraps() {
    let mut controller = glider_controller();
    let mut observed = Vec::new();
    for _ in 0..SPEED_MULTIPLIERS.len() * 2 {
        observed.push(controller.current_speed_multiplier());
        controller.toggle_speed_multiplier();
    }

    assert_eq!(observed, vec![1.0, 2.0, 4.0, 8.0, 1.0, 2.0, 4.0, 8.0]);
    assert!(controller.is_paused(), "speed changes must not touch playback");
}

#[test]
fn scripted_session_produces_expected_events() {
    let mut controller = glider_controller();
    let commands = vec![
        Command::TogglePause,
        Command::ToggleSpeedMultiplier,
        Command::Tick {
            dt: Duration::from_millis(30),
        },
        Command::Tick {
            dt: Duration::from_millis(30),
        },
        Command::StepBackward,
        Command::StepBackward,
        Command::Clear,
    ];

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut controller, command, &mut events);
    }

    assert_eq!(
        events,
        vec![
            Event::PlayStateChanged {
                state: chronolife_core::PlayState::Running
            },
            Event::SpeedChanged {
                speed: chronolife_core::SpeedSetting::new(1)
            },
            Event::TimeAdvanced {
                dt: Duration::from_millis(30)
            },
            Event::TimeAdvanced {
                dt: Duration::from_millis(30)
            },
            Event::GenerationAdvanced { history_len: 1 },
            Event::GenerationRewound { history_len: 0 },
            Event::GridCleared,
        ]
    );
    assert!(controller.grid().is_empty());
}
