//! Per-agent behaviour controllers.
//!
//! Each frame an agent picks the animation state it wants, moves, and then
//! fires side effects gated on the state its animation machine actually
//! reached. Controllers never touch the world: they return `AgentEffect`s
//! that the sim applies (sounds, damage, deferred removal).

use glam::DVec3;
use rand::Rng;

use horde_core::components::Agent;
use horde_core::config::AgentTuning;
use horde_core::enums::{AgentKind, AnimState, SoundCue, TargetMode};
use horde_core::types::{horizontal, yaw_toward, FrameContext};

use crate::anim::AnimationStateMachine;
use crate::exclusion::{can_move_to, Peer};

/// Everything an agent may look at while deciding its frame.
pub struct AgentContext<'a, Id> {
    /// Identity of the agent being updated, used to skip itself among peers.
    pub id: Id,
    pub position: DVec3,
    pub target_position: DVec3,
    pub target_mode: TargetMode,
    /// All agents currently in the live set, possibly including `id`.
    pub peers: &'a [Peer<Id>],
    pub frame: FrameContext,
    pub tuning: &'a AgentTuning,
}

/// A side effect requested by a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEffect {
    PlaySound {
        cue: SoundCue,
        position: DVec3,
        falloff: Option<f64>,
    },
    DamageTarget {
        amount: f64,
    },
    /// Remove this agent from the live set at the next frame boundary.
    Despawn,
}

/// Result of one agent frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentUpdate {
    pub position: DVec3,
    /// New orientation, `None` to keep the current one.
    pub yaw: Option<f64>,
    /// Squared horizontal distance to the target, when it was measured.
    pub distance_sq: Option<f64>,
    pub effects: Vec<AgentEffect>,
}

impl AgentUpdate {
    fn unchanged(position: DVec3) -> Self {
        Self {
            position,
            yaw: None,
            distance_sq: None,
            effects: Vec::new(),
        }
    }

    fn play(&mut self, cue: SoundCue, falloff: Option<f64>) {
        self.effects.push(AgentEffect::PlaySound {
            cue,
            position: self.position,
            falloff,
        });
    }

    pub fn despawns(&self) -> bool {
        self.effects.contains(&AgentEffect::Despawn)
    }
}

/// What a kind of agent does each frame.
pub trait Behavior {
    /// Pick the animation state to head toward, moving the agent as a side
    /// effect. `None` means the agent was dropped and the frame ends here.
    fn compute_target_state<Id: PartialEq>(
        &self,
        agent: &mut Agent,
        ctx: &AgentContext<'_, Id>,
        update: &mut AgentUpdate,
    ) -> Option<AnimState>;

    /// React to the state the animation machine is in after this frame's advance.
    fn on_state_event<Id, R: Rng>(
        &self,
        agent: &mut Agent,
        machine: &AnimationStateMachine,
        ctx: &AgentContext<'_, Id>,
        update: &mut AgentUpdate,
        rng: &mut R,
    );
}

/// Chases the target, attacks it in range, and leaves footsteps.
pub struct Walker;

/// Stands still until killed.
pub struct Dormant;

/// Run one frame of `agent`'s behaviour and advance its animation machine.
pub fn run_agent<Id: PartialEq, R: Rng>(
    agent: &mut Agent,
    machine: &mut AnimationStateMachine,
    ctx: &AgentContext<'_, Id>,
    rng: &mut R,
) -> AgentUpdate {
    match agent.kind {
        AgentKind::Walker => drive(&Walker, agent, machine, ctx, rng),
        AgentKind::Dormant => drive(&Dormant, agent, machine, ctx, rng),
    }
}

fn drive<B: Behavior, Id: PartialEq, R: Rng>(
    behavior: &B,
    agent: &mut Agent,
    machine: &mut AnimationStateMachine,
    ctx: &AgentContext<'_, Id>,
    rng: &mut R,
) -> AgentUpdate {
    let mut update = AgentUpdate::unchanged(ctx.position);
    let Some(target_state) = behavior.compute_target_state(agent, ctx, &mut update) else {
        return update;
    };
    machine.update(ctx.frame.frame_time, target_state);
    behavior.on_state_event(agent, machine, ctx, &mut update, rng);
    update
}

/// Shared dead-agent handling: play the death clip, then leave once the
/// body has lasted long enough. Re-requesting removal is harmless.
fn dying_state<Id>(
    agent: &Agent,
    ctx: &AgentContext<'_, Id>,
    update: &mut AgentUpdate,
) -> AnimState {
    debug_assert!(agent.death_time.is_some(), "dead agent without death time");
    if let Some(death_time) = agent.death_time {
        if ctx.frame.time - death_time > ctx.tuning.body_lasting_secs {
            update.effects.push(AgentEffect::Despawn);
        }
    }
    AnimState::Dying
}

impl Behavior for Walker {
    fn compute_target_state<Id: PartialEq>(
        &self,
        agent: &mut Agent,
        ctx: &AgentContext<'_, Id>,
        update: &mut AgentUpdate,
    ) -> Option<AnimState> {
        if !agent.alive {
            return Some(dying_state(agent, ctx, update));
        }

        let now = ctx.frame.time;
        let tuning = ctx.tuning;
        let yaw = yaw_toward(ctx.position, ctx.target_position);

        if ctx.target_mode != TargetMode::Playing {
            update.yaw = Some(yaw);
            return Some(AnimState::Idle);
        }

        let here = horizontal(ctx.position);
        let to_target = horizontal(ctx.target_position) - here;
        let distance_sq = to_target.length_squared();
        update.distance_sq = Some(distance_sq);

        let state = if distance_sq > tuning.engage_distance_sq {
            if distance_sq > tuning.leash_distance_sq() {
                agent.kill(now);
                update.effects.push(AgentEffect::Despawn);
                return None;
            }

            // Not capped against overshoot: a long enough frame carries the
            // agent past the target.
            let step = agent.speed * ctx.frame.frame_time / distance_sq.sqrt();
            let candidate = here + to_target * step;

            if can_move_to(candidate, ctx.peers, Some(&ctx.id), tuning.min_separation_sq) {
                update.position = DVec3::new(candidate.x, ctx.position.y, candidate.y);
                AnimState::Running
            } else {
                AnimState::Idle
            }
        } else {
            if now - agent.last_proximity_sound_at >= tuning.proximity_sound_interval_secs {
                agent.last_proximity_sound_at = now;
                update.play(SoundCue::Proximity, None);
            }
            AnimState::Attacking
        };

        update.yaw = Some(yaw);
        Some(state)
    }

    fn on_state_event<Id, R: Rng>(
        &self,
        agent: &mut Agent,
        machine: &AnimationStateMachine,
        ctx: &AgentContext<'_, Id>,
        update: &mut AgentUpdate,
        rng: &mut R,
    ) {
        if !agent.alive || machine.is_transitioning_animation_states() {
            return;
        }

        let now = ctx.frame.time;
        let tuning = ctx.tuning;
        let state = machine.current_animation_state();
        let progress = machine.current_state_animation_progress();
        let (window_start, window_end) = tuning.hit_window;

        if state == AnimState::Attacking
            && progress >= window_start
            && progress < window_end
            && now - agent.last_hit_at >= tuning.hit_interval_secs
        {
            agent.last_hit_at = now;
            let amount = if tuning.damage_max > tuning.damage_min {
                rng.gen_range(tuning.damage_min..tuning.damage_max)
            } else {
                tuning.damage_min
            };
            update.effects.push(AgentEffect::DamageTarget { amount });
            update.play(SoundCue::Impact, None);
        } else if state == AnimState::Running
            && now - agent.last_footstep_at >= tuning.footstep_interval_secs
            && update
                .distance_sq
                .is_some_and(|d| d < tuning.audibility_radius_sq())
        {
            agent.last_footstep_at = now;
            update.play(SoundCue::Footstep, Some(tuning.footstep_falloff));
        }
    }
}

impl Behavior for Dormant {
    fn compute_target_state<Id: PartialEq>(
        &self,
        agent: &mut Agent,
        ctx: &AgentContext<'_, Id>,
        update: &mut AgentUpdate,
    ) -> Option<AnimState> {
        if !agent.alive {
            return Some(dying_state(agent, ctx, update));
        }
        Some(AnimState::Idle)
    }

    fn on_state_event<Id, R: Rng>(
        &self,
        _agent: &mut Agent,
        _machine: &AnimationStateMachine,
        _ctx: &AgentContext<'_, Id>,
        _update: &mut AgentUpdate,
        _rng: &mut R,
    ) {
    }
}
