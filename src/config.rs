use crate::global_variables::{
    CANVAS_HEIGHT, CANVAS_WIDTH, GREEN_SECS, RED_SECS, ROAD_WIDTH, SPAWN_INTERVAL_MS,
    TICK_RATE_HZ, VEHICLE_SPEED, YELLOW_SECS,
};
use crate::simulation_engine::intersections::Approach;
use crate::simulation_engine::vehicles::Maneuver;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors raised while loading or validating the simulation setup.
/// All of them are fatal at startup.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
    /// The movement table has no rule for this pair.
    MissingRule(Approach, Maneuver),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
            ConfigError::MissingRule(approach, maneuver) => write!(
                f,
                "no movement rule for {:?} vehicles coming from {}",
                maneuver, approach
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Tunables of a simulation run. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub road_width: u32,
    /// Distance a vehicle covers per tick, in pixels.
    pub vehicle_speed: f64,
    pub tick_rate_hz: u32,
    pub green_secs: u64,
    pub yellow_secs: u64,
    pub red_secs: u64,
    pub spawn_interval_ms: u64,
    /// Approach holding the light at startup. Picked at random when absent.
    pub start_approach: Option<Approach>,
    /// Stop after this many ticks instead of waiting for Ctrl-C.
    pub max_ticks: Option<u64>,
    /// Seeds the vehicle producer for reproducible runs.
    pub spawn_seed: Option<u64>,
    pub csv_log_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            road_width: ROAD_WIDTH,
            vehicle_speed: VEHICLE_SPEED,
            tick_rate_hz: TICK_RATE_HZ,
            green_secs: GREEN_SECS,
            yellow_secs: YELLOW_SECS,
            red_secs: RED_SECS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            start_approach: None,
            max_ticks: None,
            spawn_seed: None,
            csv_log_path: None,
            snapshot_path: None,
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vehicle_speed.is_finite() && self.vehicle_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "vehicle_speed must be positive, got {}",
                self.vehicle_speed
            )));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be positive".into()));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "spawn_interval_ms must be positive".into(),
            ));
        }
        for (name, secs) in [
            ("green_secs", self.green_secs),
            ("yellow_secs", self.yellow_secs),
            ("red_secs", self.red_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if self.road_width == 0
            || self.road_width >= self.canvas_width
            || self.road_width >= self.canvas_height
        {
            return Err(ConfigError::Invalid(format!(
                "road_width {} does not fit a {}x{} canvas",
                self.road_width, self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn phase_durations(&self) -> PhaseDurations {
        PhaseDurations {
            green: Duration::from_secs(self.green_secs),
            yellow: Duration::from_secs(self.yellow_secs),
            red: Duration::from_secs(self.red_secs),
        }
    }
}

/// How long each light phase is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub green: Duration,
    pub yellow: Duration,
    pub red: Duration,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            green: Duration::from_secs(GREEN_SECS),
            yellow: Duration::from_secs(YELLOW_SECS),
            red: Duration::from_secs(RED_SECS),
        }
    }
}
