//! Frame loop thread: runs the simulation engine against the wall clock.
//!
//! The engine is created inside the thread and owned by it. Commands arrive
//! via an `mpsc` channel and are drained between frames. The thread hands the
//! last snapshot back through its `JoinHandle` when it stops.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::DVec3;

use horde_core::commands::SimCommand;
use horde_core::config::SimConfig;
use horde_core::state::FrameSnapshot;
use horde_core::types::FrameClock;
use horde_sim::SimulationEngine;

use crate::state::{LoopCommand, LoopSettings, Orbit};

/// Linear speed of the orbit autopilot, in m/s. Slower than a walker.
pub const ORBIT_SPEED: f64 = 1.0;

/// Nominal duration of one frame at `fps`.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

/// Where the orbiting target stands `time` seconds in.
pub fn orbit_position(orbit: &Orbit, time: f64) -> DVec3 {
    if orbit.radius <= 0.0 {
        return DVec3::ZERO;
    }
    let angle = orbit.speed * time / orbit.radius;
    DVec3::new(orbit.radius * angle.cos(), 0.0, orbit.radius * angle.sin())
}

/// Frame rate over one-second windows.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Count a frame. Returns the rate once a full second has passed.
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let rate = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(rate)
    }
}

/// Spawns the frame loop in a new thread.
///
/// Returns the command sender and the handle yielding the last snapshot.
/// Dropping the sender stops the loop.
pub fn spawn_game_loop(
    config: SimConfig,
    settings: LoopSettings,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<FrameSnapshot>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("horde-frame-loop".into())
        .spawn(move || run_game_loop(config, &settings, cmd_rx))?;

    Ok((cmd_tx, handle))
}

/// The frame loop. Runs until `Shutdown`, channel disconnect, or the time limit.
fn run_game_loop(
    config: SimConfig,
    settings: &LoopSettings,
    cmd_rx: mpsc::Receiver<LoopCommand>,
) -> FrameSnapshot {
    let mut clock = FrameClock::new(config.screen_width, config.screen_height);
    let mut engine = SimulationEngine::new(config);
    let frame_duration = frame_duration(settings.fps);

    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;
    let mut fps = FpsCounter::new(last_frame);
    let mut snapshot = FrameSnapshot::default();

    log::info!("frame loop started at {} fps", settings.fps);

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Sim(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => {
                    log::info!("frame loop shut down after {} frames", clock.frames);
                    return snapshot;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return snapshot,
            }
        }

        // 2. Frame timing from the wall clock
        let now = Instant::now();
        let ctx = clock.advance(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        // 3. Autopilot
        if let Some(orbit) = &settings.orbit {
            engine.queue_command(SimCommand::MoveTarget {
                position: orbit_position(orbit, ctx.time),
            });
        }

        // 4. Run the frame
        snapshot = engine.step(&ctx);

        if let Some(rate) = fps.frame(now) {
            log::info!(
                "{rate:.1} fps, {} live, {} agents standing, target health {:.2}",
                snapshot.live_count,
                snapshot.living_agents(),
                snapshot.target.health
            );
        }

        if settings.max_seconds.is_some_and(|limit| ctx.time >= limit) {
            log::info!("frame loop finished after {:.1}s", ctx.time);
            return snapshot;
        }

        // 5. Sleep until the next frame
        next_frame_time += frame_duration;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame_duration * 2 {
            // Too far behind, don't try to catch up
            next_frame_time = now;
        }
    }
}
