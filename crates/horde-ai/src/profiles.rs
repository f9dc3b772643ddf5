//! Animation clip parameters.

use horde_core::constants::*;
use horde_core::enums::AnimState;

/// Timing of the clips an animation state machine cycles through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationProfile {
    /// Seconds per full cycle, per state.
    pub periods: [f64; AnimState::COUNT],
    /// Whether each state's progress wraps (true) or clamps at 1.0 (false).
    pub loops: [bool; AnimState::COUNT],
    /// Length of the blend between two states (seconds).
    pub transition_secs: f64,
}

impl Default for AnimationProfile {
    fn default() -> Self {
        Self {
            periods: ANIMATION_PERIODS,
            loops: ANIMATION_LOOPS,
            transition_secs: ANIMATION_TRANSITION_SECS,
        }
    }
}

impl AnimationProfile {
    #[inline]
    pub fn period(&self, state: AnimState) -> f64 {
        self.periods[state.index()]
    }

    #[inline]
    pub fn loops(&self, state: AnimState) -> bool {
        self.loops[state.index()]
    }
}
