//! Fundamental geometric and frame-timing types.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Per-frame timing and viewport context handed to every update and render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    /// Frame counter, starting at 0 for the first frame.
    pub frame: u64,
    /// Elapsed wall time since the loop started (seconds).
    pub time: f64,
    /// Time covered by this frame (seconds).
    pub frame_time: f64,
    /// Viewport width in pixels. Threaded through for the render passes.
    pub screen_width: u32,
    /// Viewport height in pixels.
    pub screen_height: u32,
}

/// Accumulates frame times into successive `FrameContext`s.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameClock {
    pub frames: u64,
    pub elapsed_secs: f64,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl FrameContext {
    /// Context for a frame at `time` lasting `frame_time`, with an empty viewport.
    pub fn at(frame: u64, time: f64, frame_time: f64) -> Self {
        Self {
            frame,
            time,
            frame_time,
            screen_width: 0,
            screen_height: 0,
        }
    }
}

impl FrameClock {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            frames: 0,
            elapsed_secs: 0.0,
            screen_width,
            screen_height,
        }
    }

    /// Advance by `frame_time` seconds and return the context for the new frame.
    pub fn advance(&mut self, frame_time: f64) -> FrameContext {
        debug_assert!(frame_time >= 0.0, "frame time must not be negative");
        self.elapsed_secs += frame_time;
        let ctx = FrameContext {
            frame: self.frames,
            time: self.elapsed_secs,
            frame_time,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
        };
        self.frames += 1;
        ctx
    }
}

/// Project a world position onto the horizontal (x/z) plane.
#[inline]
pub fn horizontal(position: DVec3) -> DVec2 {
    DVec2::new(position.x, position.z)
}

/// Squared horizontal distance between two world positions (vertical axis ignored).
#[inline]
pub fn horizontal_distance_sq(a: DVec3, b: DVec3) -> f64 {
    horizontal(a).distance_squared(horizontal(b))
}

/// Yaw (radians about the up axis) that faces from `from` toward `to`.
pub fn yaw_toward(from: DVec3, to: DVec3) -> f64 {
    -(from.z - to.z).atan2(from.x - to.x) - std::f64::consts::FRAC_PI_2
}
