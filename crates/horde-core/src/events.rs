//! Events emitted by the simulation for the audio collaborator.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::SoundCue;

/// Fire-and-forget sound requests raised during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// Play `cue` at `position`, optionally attenuated over `falloff` meters.
    Positional {
        cue: SoundCue,
        position: DVec3,
        falloff: Option<f64>,
    },
}

impl AudioEvent {
    pub fn cue(&self) -> SoundCue {
        match self {
            AudioEvent::Positional { cue, .. } => *cue,
        }
    }
}
