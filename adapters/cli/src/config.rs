//! Command-line flags and the optional TOML configuration file.
//!
//! Values resolve with the precedence flags > file > compiled-in defaults.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chronolife_world::SimulationConfig;
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

/// Largest accepted number of columns or rows.
const MAX_DIMENSION: u32 = 4_096;

/// Largest accepted number of retained generations.
const MAX_HISTORY_LIMIT: usize = 100_000;

/// Command-line arguments accepted by the `chronolife` binary.
#[derive(Debug, Parser)]
#[command(
    name = "chronolife",
    version,
    about = "Conway's Game of Life with rewind and adjustable playback speed."
)]
pub(crate) struct CliArgs {
    /// Path to a TOML file providing defaults for the options below.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of cell columns.
    #[arg(long, value_name = "CELLS")]
    width: Option<u32>,
    /// Number of cell rows.
    #[arg(long, value_name = "CELLS")]
    height: Option<u32>,
    /// Probability in [0, 1] that a cell starts alive when randomised.
    #[arg(long)]
    density: Option<f64>,
    /// Milliseconds between generations at the 1x speed multiplier.
    #[arg(long, value_name = "MILLIS")]
    step_interval_ms: Option<u64>,
    /// Number of generations retained for stepping backwards.
    #[arg(long, value_name = "GENERATIONS")]
    history_limit: Option<usize>,
    /// Seed for reproducible randomisation.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    vsync: Option<bool>,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Options that may be provided through the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    width: Option<u32>,
    height: Option<u32>,
    density: Option<f64>,
    step_interval_ms: Option<u64>,
    history_limit: Option<usize>,
    seed: Option<u64>,
    vsync: Option<bool>,
    show_fps: Option<bool>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Fully resolved settings for a run of the binary.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AppConfig {
    /// Settings forwarded to the simulation controller.
    pub(crate) simulation: SimulationConfig,
    /// Whether presentation waits for the display refresh.
    pub(crate) vsync: bool,
    /// Whether frame timing is logged.
    pub(crate) show_fps: bool,
}

impl CliArgs {
    /// Loads the configuration file, if any, and merges it with the flags.
    pub(crate) fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(&self, file: FileConfig) -> Result<AppConfig, ConfigError> {
        let defaults = SimulationConfig::default();
        let base_step_interval = self
            .step_interval_ms
            .or(file.step_interval_ms)
            .map_or(defaults.base_step_interval, Duration::from_millis);

        let config = AppConfig {
            simulation: SimulationConfig {
                width: self.width.or(file.width).unwrap_or(defaults.width),
                height: self.height.or(file.height).unwrap_or(defaults.height),
                history_limit: self
                    .history_limit
                    .or(file.history_limit)
                    .unwrap_or(defaults.history_limit),
                base_step_interval,
                density: self.density.or(file.density).unwrap_or(defaults.density),
                seed: self.seed.or(file.seed),
            },
            vsync: self.vsync.or(file.vsync).unwrap_or(true),
            show_fps: self.show_fps || file.show_fps.unwrap_or(false),
        };
        validate(&config.simulation)?;
        Ok(config)
    }
}

fn validate(config: &SimulationConfig) -> Result<(), ConfigError> {
    if config.width == 0 || config.height == 0 {
        return Err(ConfigError::ZeroDimension {
            width: config.width,
            height: config.height,
        });
    }
    if config.width > MAX_DIMENSION || config.height > MAX_DIMENSION {
        return Err(ConfigError::DimensionTooLarge {
            width: config.width,
            height: config.height,
            max: MAX_DIMENSION,
        });
    }
    if config.history_limit > MAX_HISTORY_LIMIT {
        return Err(ConfigError::HistoryLimitTooLarge {
            history_limit: config.history_limit,
            max: MAX_HISTORY_LIMIT,
        });
    }
    if !(0.0..=1.0).contains(&config.density) {
        return Err(ConfigError::DensityOutOfRange {
            density: config.density,
        });
    }
    if config.base_step_interval.is_zero() {
        return Err(ConfigError::ZeroStepInterval);
    }
    Ok(())
}

/// Errors raised while resolving the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file was not valid TOML or had unknown keys.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser failure.
        #[source]
        source: toml::de::Error,
    },
    /// The field must have at least one column and one row.
    #[error("grid dimensions must be non-zero (received {width}x{height})")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// Either side of the field exceeds the supported size.
    #[error("grid dimensions must not exceed {max} cells per side (received {width}x{height})")]
    DimensionTooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
        /// Largest accepted value per side.
        max: u32,
    },
    /// More generations requested than the history may retain.
    #[error("history limit must not exceed {max} generations (received {history_limit})")]
    HistoryLimitTooLarge {
        /// Requested history limit.
        history_limit: usize,
        /// Largest accepted history limit.
        max: usize,
    },
    /// Density is a probability.
    #[error("density must lie within [0, 1] (received {density})")]
    DensityOutOfRange {
        /// Requested density.
        density: f64,
    },
    /// Playback needs a positive interval between generations.
    #[error("step interval must be greater than zero")]
    ZeroStepInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> CliArgs {
        let argv = std::iter::once("chronolife").chain(flags.iter().copied());
        CliArgs::try_parse_from(argv).expect("flags parse")
    }

    fn file(contents: &str) -> FileConfig {
        FileConfig::parse(contents).expect("valid toml")
    }

    #[test]
    fn defaults_match_simulation_constants() {
        let config = args(&[]).resolve().expect("defaults are valid");

        assert_eq!(config.simulation, SimulationConfig::default());
        assert!(config.vsync);
        assert!(!config.show_fps);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = args(&[])
            .merge(file(
                "width = 32\nheight = 16\nstep_interval_ms = 250\nseed = 7\nshow_fps = true\n",
            ))
            .expect("valid config");

        assert_eq!(config.simulation.width, 32);
        assert_eq!(config.simulation.height, 16);
        assert_eq!(
            config.simulation.base_step_interval,
            Duration::from_millis(250)
        );
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.history_limit, SimulationConfig::default().history_limit);
        assert!(config.show_fps);
    }

    #[test]
    fn flags_override_file_values() {
        let config = args(&["--width", "80", "--density", "0.5", "--vsync", "false"])
            .merge(file("width = 32\ndensity = 0.1\nvsync = true\n"))
            .expect("valid config");

        assert_eq!(config.simulation.width, 80);
        assert!((config.simulation.density - 0.5).abs() < f64::EPSILON);
        assert!(!config.vsync);
    }

    #[test]
    fn bare_vsync_flag_enables_vsync() {
        let config = args(&["--vsync"])
            .merge(file("vsync = false\n"))
            .expect("valid config");

        assert!(config.vsync);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let error = args(&["--height", "0"]).resolve().expect_err("zero height");

        assert!(matches!(
            error,
            ConfigError::ZeroDimension {
                width: 64,
                height: 0
            }
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let error = args(&["--width", "2147483649", "--height", "1"])
            .resolve()
            .expect_err("width beyond the supported size");

        assert!(matches!(
            error,
            ConfigError::DimensionTooLarge {
                width: 2_147_483_649,
                height: 1,
                max: MAX_DIMENSION
            }
        ));
    }

    #[test]
    fn largest_supported_dimensions_are_accepted() {
        let config = args(&["--width", "4096", "--height", "4096"])
            .resolve()
            .expect("upper bound is inclusive");

        assert_eq!(config.simulation.width, MAX_DIMENSION);
        assert_eq!(config.simulation.height, MAX_DIMENSION);
    }

    #[test]
    fn oversized_history_limit_is_rejected() {
        let error = args(&[])
            .merge(file("history_limit = 100001\n"))
            .expect_err("history limit beyond the supported size");

        assert!(matches!(
            error,
            ConfigError::HistoryLimitTooLarge {
                history_limit: 100_001,
                ..
            }
        ));
    }

    #[test]
    fn density_outside_unit_interval_is_rejected() {
        for density in ["--density=1.5", "--density=-0.1", "--density=NaN"] {
            let error = args(&[density])
                .resolve()
                .expect_err("density out of range");
            assert!(matches!(error, ConfigError::DensityOutOfRange { .. }));
        }
    }

    #[test]
    fn zero_step_interval_is_rejected() {
        let error = args(&[])
            .merge(file("step_interval_ms = 0\n"))
            .expect_err("zero interval");

        assert!(matches!(error, ConfigError::ZeroStepInterval));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(FileConfig::parse("widht = 10\n").is_err());
    }

    #[test]
    fn missing_config_file_reports_its_path() {
        let path = PathBuf::from("/nonexistent/chronolife/config.toml");
        let error = FileConfig::load(&path).expect_err("file is missing");

        assert!(matches!(&error, ConfigError::Read { path: reported, .. } if *reported == path));
        assert!(error.to_string().contains("config.toml"));
    }
}
