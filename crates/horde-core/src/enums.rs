//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Animation (and behaviour) state of an agent.
///
/// Mutually exclusive except during a bounded transition window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Running,
    Attacking,
    /// Terminal, non-looping. Nothing transitions out of it.
    Dying,
}

impl AnimState {
    /// Number of states; sizes the per-state tables.
    pub const COUNT: usize = 4;

    pub const ALL: [AnimState; AnimState::COUNT] = [
        AnimState::Idle,
        AnimState::Running,
        AnimState::Attacking,
        AnimState::Dying,
    ];

    /// Index into per-state tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_terminal(self) -> bool {
        self == AnimState::Dying
    }
}

/// Behaviour variant of an agent, selecting which controller drives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Chases the target, attacks in range, leaves footsteps.
    #[default]
    Walker,
    /// Stands still. Only reacts to being killed.
    Dormant,
}

/// High-level mode of the pursued target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    #[default]
    Playing,
    GameOver,
}

/// Simulation phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Active,
    Paused,
}

/// Sound cues the simulation can request from the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Growl played when an agent reaches the target.
    Proximity,
    Footstep,
    /// A landed hit.
    Impact,
}
