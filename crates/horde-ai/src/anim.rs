//! Blended animation state machine.
//!
//! Tracks which clip an agent plays, blends between clips over a fixed
//! window, and keeps a separate progress value per state so that coming
//! back to a state resumes where it left off. Gameplay reads the progress
//! to time events against the clip (a swing lands at a given phase).

use rand::Rng;

use horde_core::constants::DYING_START_PROGRESS;
use horde_core::enums::AnimState;

use crate::profiles::AnimationProfile;

/// A blend in flight from one state to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: AnimState,
    pub to: AnimState,
    /// Seconds since the blend started.
    pub elapsed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStateMachine {
    profile: AnimationProfile,
    current: AnimState,
    transition: Option<Transition>,
    progress: [f64; AnimState::COUNT],
}

impl AnimationStateMachine {
    /// A machine resting in `initial` with every clip at progress 0.
    pub fn new(initial: AnimState, profile: AnimationProfile) -> Self {
        Self {
            profile,
            current: initial,
            transition: None,
            progress: [0.0; AnimState::COUNT],
        }
    }

    /// A machine starting in `Idle` with looping clips at random phases, so
    /// a crowd spawned together does not move in lockstep.
    pub fn desynchronized<R: Rng>(profile: AnimationProfile, rng: &mut R) -> Self {
        let mut machine = Self::new(AnimState::Idle, profile);
        for state in AnimState::ALL {
            let progress = if state.is_terminal() {
                DYING_START_PROGRESS
            } else {
                rng.gen_range(0.0..1.0)
            };
            machine.set_animation_progress(state, progress);
        }
        machine
    }

    pub fn set_animation_progress(&mut self, state: AnimState, progress: f64) {
        debug_assert!(
            (0.0..=1.0).contains(&progress),
            "animation progress {progress} out of range"
        );
        self.progress[state.index()] = progress;
    }

    /// Advance by one frame, steering toward `target`.
    ///
    /// A transition is started when `target` differs from the current state
    /// and none is in flight. A transition in flight always completes at its
    /// own destination; a different target is picked up on the next update.
    /// The only exception is the terminal state, which interrupts any
    /// non-terminal transition at once. Nothing leaves the terminal state.
    pub fn update(&mut self, frame_time: f64, target: AnimState) {
        debug_assert!(frame_time >= 0.0, "frame time must not be negative");

        let target = if self.current.is_terminal() {
            self.current
        } else {
            target
        };

        let in_flight = self.transition;
        match in_flight {
            None if target != self.current => self.begin_transition(target),
            Some(t) if target.is_terminal() && !t.to.is_terminal() => {
                self.begin_transition(target)
            }
            _ => {}
        }

        self.advance_progress(self.current, frame_time);

        if let Some(mut transition) = self.transition {
            self.advance_progress(transition.to, frame_time);
            transition.elapsed += frame_time;
            if transition.elapsed >= self.profile.transition_secs {
                self.current = transition.to;
                self.transition = None;
            } else {
                self.transition = Some(transition);
            }
        }
    }

    fn begin_transition(&mut self, to: AnimState) {
        self.transition = Some(Transition {
            from: self.current,
            to,
            elapsed: 0.0,
        });
    }

    fn advance_progress(&mut self, state: AnimState, frame_time: f64) {
        let period = self.profile.period(state);
        let looping = self.profile.loops(state);
        debug_assert!(period > 0.0, "{state:?} has a non-positive period");

        let progress = &mut self.progress[state.index()];
        *progress += frame_time / period;
        if looping {
            *progress = progress.rem_euclid(1.0);
        } else {
            *progress = progress.min(1.0);
        }
    }

    pub fn current_animation_state(&self) -> AnimState {
        self.current
    }

    /// Normalized progress of the current state's clip.
    pub fn current_state_animation_progress(&self) -> f64 {
        self.progress[self.current.index()]
    }

    pub fn animation_progress(&self, state: AnimState) -> f64 {
        self.progress[state.index()]
    }

    pub fn is_transitioning_animation_states(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Weight of the transition's destination clip, in [0, 1].
    /// 1.0 whenever no transition is in flight.
    pub fn blend_weight(&self) -> f64 {
        match self.transition {
            Some(t) if self.profile.transition_secs > 0.0 => {
                (t.elapsed / self.profile.transition_secs).min(1.0)
            }
            _ => 1.0,
        }
    }

    pub fn profile(&self) -> &AnimationProfile {
        &self.profile
    }
}
