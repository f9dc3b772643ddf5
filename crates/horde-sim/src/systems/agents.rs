//! Agent update: runs each agent's controller and applies its effects.
//!
//! Reads happen first (target, peers, own state), the controller runs on
//! plain data, then results are written back. Peer positions are read per
//! agent, so an agent sees the moves its predecessors made this frame.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use horde_ai::anim::AnimationStateMachine;
use horde_ai::behavior::{run_agent, AgentContext, AgentEffect};
use horde_core::components::{Agent, Player, Transform};
use horde_core::config::AgentTuning;
use horde_core::enums::TargetMode;
use horde_core::events::AudioEvent;
use horde_core::types::FrameContext;

use crate::components::Pursuit;
use crate::registry::PendingQueue;
use crate::world_setup::agent_peers;

/// Shared state for one update pass over all agents.
pub struct AgentPass<'a> {
    pub frame: &'a FrameContext,
    pub tuning: &'a AgentTuning,
    pub rng: &'a mut ChaCha8Rng,
    pub audio_events: &'a mut Vec<AudioEvent>,
}

impl AgentPass<'_> {
    /// Update `entity` if it is an agent; anything else is left alone.
    pub fn update(
        &mut self,
        entity: Entity,
        world: &World,
        live: &[Entity],
        pending: &mut PendingQueue,
    ) {
        let Ok(pursuit) = world.get::<&Pursuit>(entity).map(|p| *p) else {
            return;
        };
        let Ok(transform) = world.get::<&Transform>(entity).map(|t| *t) else {
            return;
        };

        // A target that has left the world counts as no longer playing,
        // and there is nothing left to face.
        let target = match (
            world.get::<&Transform>(pursuit.target),
            world.get::<&Player>(pursuit.target),
        ) {
            (Ok(t), Ok(p)) => Some((t.position, p.mode)),
            _ => None,
        };
        let (target_position, target_mode) =
            target.unwrap_or((transform.position, TargetMode::GameOver));

        let peers = agent_peers(world, live);

        let (Ok(mut agent), Ok(mut machine)) = (
            world.get::<&mut Agent>(entity),
            world.get::<&mut AnimationStateMachine>(entity),
        ) else {
            return;
        };

        let ctx = AgentContext {
            id: entity,
            position: transform.position,
            target_position,
            target_mode,
            peers: &peers,
            frame: *self.frame,
            tuning: self.tuning,
        };
        let was_alive = agent.alive;
        let mut update = run_agent(&mut agent, &mut machine, &ctx, &mut *self.rng);
        if target.is_none() {
            update.yaw = None;
        }

        if was_alive && !agent.alive {
            log::info!("agent {} strayed beyond the leash", agent.agent_id);
        }

        if let Ok(mut t) = world.get::<&mut Transform>(entity) {
            t.position = update.position;
            if let Some(yaw) = update.yaw {
                t.yaw = yaw;
            }
        }

        for effect in update.effects {
            match effect {
                AgentEffect::PlaySound {
                    cue,
                    position,
                    falloff,
                } => self.audio_events.push(AudioEvent::Positional {
                    cue,
                    position,
                    falloff,
                }),
                AgentEffect::DamageTarget { amount } => {
                    if let Ok(mut player) = world.get::<&mut Player>(pursuit.target) {
                        player.take_damage(amount);
                        log::debug!(
                            "agent {} hit for {amount:.3}, health {:.3}",
                            agent.agent_id,
                            player.health
                        );
                    }
                }
                AgentEffect::Despawn => {
                    log::debug!("agent {} leaving", agent.agent_id);
                    pending.remove(entity);
                }
            }
        }
    }
}
