//! Frame snapshot: the complete visible state produced after each frame.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::AudioEvent;

/// Complete simulation state broadcast after each frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub time: f64,
    pub phase: SimPhase,
    pub target: TargetView,
    pub agents: Vec<AgentView>,
    pub audio_events: Vec<AudioEvent>,
    /// Size of the live set after this frame's update pass.
    pub live_count: usize,
}

/// The pursued target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetView {
    pub position: DVec3,
    pub health: f64,
    pub mode: TargetMode,
}

/// An in-flight blend between two animation states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionView {
    pub from: AnimState,
    pub to: AnimState,
    /// Weight of `to`, in [0, 1].
    pub weight: f64,
}

/// A live agent, as seen by renderers and UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub agent_id: u32,
    pub kind: AgentKind,
    pub position: DVec3,
    pub yaw: f64,
    pub alive: bool,
    pub state: AnimState,
    /// Normalized progress in the current state's clip.
    pub progress: f64,
    pub transition: Option<TransitionView>,
}

impl FrameSnapshot {
    pub fn agent(&self, agent_id: u32) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    pub fn living_agents(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }
}

/// One live entity, as handed to the render passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityView {
    Target(TargetView),
    Agent(AgentView),
}
