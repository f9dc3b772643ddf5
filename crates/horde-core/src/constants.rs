//! Simulation constants and tuning defaults.

use crate::enums::AnimState;

/// Target frame rate of the app loop (Hz).
pub const TARGET_FPS: u32 = 60;

// --- Animation ---

/// Seconds for one full cycle of each state's clip, indexed by `AnimState::index`.
pub const ANIMATION_PERIODS: [f64; AnimState::COUNT] = [2.0, 0.8, 1.167, 1.333];

/// Whether each state's clip wraps (true) or clamps at the end (false).
pub const ANIMATION_LOOPS: [bool; AnimState::COUNT] = [true, true, true, false];

/// Blend window between two states (seconds).
pub const ANIMATION_TRANSITION_SECS: f64 = 0.5;

/// Starting progress of the death clip.
pub const DYING_START_PROGRESS: f64 = 0.145;

// --- Movement ---

/// Distance covered by one running cycle (meters).
pub const DISTANCE_PER_RUNNING_CYCLE: f64 = 1.5;

/// Walker movement speed (m/s), matched to the running clip so feet don't slide.
pub const WALKER_SPEED: f64 = DISTANCE_PER_RUNNING_CYCLE / ANIMATION_PERIODS[1];

/// Agents farther than this from the target give up and are removed (meters).
pub const LEASH_DISTANCE: f64 = 100.0;

/// Within this squared distance an agent stops and attacks.
pub const ENGAGE_DISTANCE_SQ: f64 = 1.5;

/// Two agents may not stand closer than this squared horizontal distance.
pub const MIN_SEPARATION_SQ: f64 = 1.0;

/// Footsteps are only played within this distance of the target (meters).
pub const AUDIBILITY_RADIUS: f64 = 10.0;

// --- Timed events ---

/// How long a dead body stays before removal (seconds).
pub const BODY_LASTING_SECS: f64 = 20.0;

/// Minimum time between two landed hits (seconds).
pub const HIT_INTERVAL_SECS: f64 = 1.0;

/// Progress window in the attack clip where the swing lands.
pub const HIT_WINDOW: (f64, f64) = (0.1, 0.2);

/// Minimum time between two proximity growls (seconds).
pub const PROXIMITY_SOUND_INTERVAL_SECS: f64 = 5.0;

/// Minimum time between two footsteps (seconds).
pub const FOOTSTEP_INTERVAL_SECS: f64 = 0.4;

/// Falloff distance passed with footstep sounds.
pub const FOOTSTEP_FALLOFF: f64 = 8.0;

/// Damage range of a single hit, as a fraction of full health.
pub const DAMAGE_MIN: f64 = 0.03;
pub const DAMAGE_MAX: f64 = 0.1;

// --- Target ---

/// Health the target starts with.
pub const TARGET_FULL_HEALTH: f64 = 1.0;

// --- Spawning ---

/// Seconds between two spawns.
pub const SPAWN_INTERVAL_SECS: f64 = 2.0;

/// Spawner stops while this many agents are live.
pub const MAX_AGENTS: usize = 32;

/// Spawn ring around the target (meters).
pub const SPAWN_MIN_RADIUS: f64 = 20.0;
pub const SPAWN_MAX_RADIUS: f64 = 40.0;

/// Position samples tried before a spawn is skipped.
pub const SPAWN_MAX_ATTEMPTS: u32 = 64;

/// Every n-th spawn is a dormant agent (0 disables).
pub const DORMANT_EVERY: u32 = 8;

// --- Viewport ---

pub const DEFAULT_SCREEN_WIDTH: u32 = 1280;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 720;
