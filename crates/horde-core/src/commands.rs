//! Commands sent from the outside to the simulation.
//!
//! Commands are queued and processed at the next frame boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible external actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// Move the target (camera) to a new position.
    MoveTarget { position: DVec3 },
    /// Spawn an agent of the given kind near the target.
    SpawnAgent { kind: AgentKind },
    /// Kill an agent. Its body stays for the body-lasting time.
    KillAgent { agent_id: u32 },
    /// Pause the update pass.
    Pause,
    /// Resume the update pass.
    Resume,
}
