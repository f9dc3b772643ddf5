//! Types shared between the runner and the frame loop thread.

use horde_core::commands::SimCommand;
use horde_core::constants::TARGET_FPS;

/// Commands sent to the frame loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward to the simulation engine before the next frame.
    Sim(SimCommand),
    /// Stop the loop between frames.
    Shutdown,
}

/// Target moves on a circle around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius: f64,
    /// Linear speed along the circle, in m/s.
    pub speed: f64,
}

/// How the frame loop runs.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub fps: u32,
    /// Stop once this much frame time has elapsed. `None` runs until shut down.
    pub max_seconds: Option<f64>,
    pub orbit: Option<Orbit>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            fps: TARGET_FPS,
            max_seconds: None,
            orbit: None,
        }
    }
}
