//! Simulation configuration.
//!
//! Every field has a default taken from `constants`, so a config file only
//! needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub screen_width: u32,
    pub screen_height: u32,
    pub tuning: AgentTuning,
    pub spawn: SpawnSettings,
}

/// Distances and timers that drive the agent controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub leash_distance: f64,
    pub engage_distance_sq: f64,
    pub min_separation_sq: f64,
    pub audibility_radius: f64,
    pub body_lasting_secs: f64,
    pub hit_interval_secs: f64,
    pub hit_window: (f64, f64),
    pub proximity_sound_interval_secs: f64,
    pub footstep_interval_secs: f64,
    pub footstep_falloff: f64,
    pub damage_min: f64,
    pub damage_max: f64,
}

/// Spawn schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between spawns. Zero or less disables the spawner.
    pub interval_secs: f64,
    pub max_agents: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub max_attempts: u32,
    pub dormant_every: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            tuning: AgentTuning::default(),
            spawn: SpawnSettings::default(),
        }
    }
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            leash_distance: LEASH_DISTANCE,
            engage_distance_sq: ENGAGE_DISTANCE_SQ,
            min_separation_sq: MIN_SEPARATION_SQ,
            audibility_radius: AUDIBILITY_RADIUS,
            body_lasting_secs: BODY_LASTING_SECS,
            hit_interval_secs: HIT_INTERVAL_SECS,
            hit_window: HIT_WINDOW,
            proximity_sound_interval_secs: PROXIMITY_SOUND_INTERVAL_SECS,
            footstep_interval_secs: FOOTSTEP_INTERVAL_SECS,
            footstep_falloff: FOOTSTEP_FALLOFF,
            damage_min: DAMAGE_MIN,
            damage_max: DAMAGE_MAX,
        }
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            interval_secs: SPAWN_INTERVAL_SECS,
            max_agents: MAX_AGENTS,
            min_radius: SPAWN_MIN_RADIUS,
            max_radius: SPAWN_MAX_RADIUS,
            max_attempts: SPAWN_MAX_ATTEMPTS,
            dormant_every: DORMANT_EVERY,
        }
    }
}

impl SpawnSettings {
    /// A schedule that never spawns on its own (commands still can).
    pub fn disabled() -> Self {
        Self {
            interval_secs: 0.0,
            ..Self::default()
        }
    }
}

impl AgentTuning {
    #[inline]
    pub fn leash_distance_sq(&self) -> f64 {
        self.leash_distance * self.leash_distance
    }

    #[inline]
    pub fn audibility_radius_sq(&self) -> f64 {
        self.audibility_radius * self.audibility_radius
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tuning;
        if t.min_separation_sq <= 0.0 {
            return Err(ConfigError::Invalid(
                "tuning.min_separation_sq must be positive".into(),
            ));
        }
        if t.leash_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "tuning.leash_distance must be positive".into(),
            ));
        }
        if t.engage_distance_sq >= t.leash_distance_sq() {
            return Err(ConfigError::Invalid(
                "tuning.engage_distance_sq must be inside the leash".into(),
            ));
        }
        if t.damage_min < 0.0 || t.damage_min > t.damage_max {
            return Err(ConfigError::Invalid(format!(
                "tuning damage range [{}, {}) is empty or negative",
                t.damage_min, t.damage_max
            )));
        }
        if !(0.0..=1.0).contains(&t.hit_window.0)
            || !(0.0..=1.0).contains(&t.hit_window.1)
            || t.hit_window.0 >= t.hit_window.1
        {
            return Err(ConfigError::Invalid(
                "tuning.hit_window must be an ordered range inside [0, 1]".into(),
            ));
        }

        let s = &self.spawn;
        if s.min_radius < 0.0 || s.min_radius > s.max_radius {
            return Err(ConfigError::Invalid(format!(
                "spawn radius range [{}, {}] is invalid",
                s.min_radius, s.max_radius
            )));
        }
        if s.max_radius >= t.leash_distance {
            return Err(ConfigError::Invalid(
                "spawn.max_radius must be inside the leash distance".into(),
            ));
        }
        if s.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "spawn.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
