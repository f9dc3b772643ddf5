//! ECS components for hecs entities.
//!
//! Components are plain data. Behaviour lives in `horde-ai` and the sim
//! systems, not here.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// World placement of any live entity. y is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    /// Rotation about the up axis (radians).
    pub yaw: f64,
}

/// Behaviour record of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Serial number, unique for the lifetime of an engine.
    pub agent_id: u32,
    pub kind: AgentKind,
    /// Movement speed (m/s).
    pub speed: f64,
    pub alive: bool,
    /// Time of the transition to dead. Set once.
    pub death_time: Option<f64>,
    pub last_hit_at: f64,
    pub last_proximity_sound_at: f64,
    pub last_footstep_at: f64,
}

/// The pursued target (player / camera).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub health: f64,
    pub mode: TargetMode,
}

impl Transform {
    pub fn at(position: DVec3) -> Self {
        Self { position, yaw: 0.0 }
    }
}

impl Agent {
    /// A freshly spawned, living agent. `now` gates the first hit by one interval.
    pub fn new(agent_id: u32, kind: AgentKind, now: f64) -> Self {
        let speed = match kind {
            AgentKind::Walker => WALKER_SPEED,
            AgentKind::Dormant => 0.0,
        };
        Self {
            agent_id,
            kind,
            speed,
            alive: true,
            death_time: None,
            last_hit_at: now,
            last_proximity_sound_at: -PROXIMITY_SOUND_INTERVAL_SECS,
            last_footstep_at: -FOOTSTEP_INTERVAL_SECS,
        }
    }

    /// Transition to dead. Returns false if the agent was already dead.
    pub fn kill(&mut self, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.death_time = Some(now);
        true
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            health: TARGET_FULL_HEALTH,
            mode: TargetMode::Playing,
        }
    }
}

impl Player {
    /// Subtract `amount` from health, never going below zero.
    pub fn take_damage(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0, "damage must not be negative");
        self.health = (self.health - amount).max(0.0);
    }
}
