//! Snapshot system: reads the live set and builds a `FrameSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use horde_ai::anim::AnimationStateMachine;
use horde_core::components::{Agent, Player, Transform};
use horde_core::enums::SimPhase;
use horde_core::events::AudioEvent;
use horde_core::state::*;
use horde_core::types::FrameContext;

use crate::registry::EntityRegistry;

/// Build a complete snapshot of the live set after a frame.
pub fn build_snapshot(
    registry: &EntityRegistry,
    frame: &FrameContext,
    phase: SimPhase,
    audio_events: Vec<AudioEvent>,
) -> FrameSnapshot {
    let world = registry.world();
    let mut target = TargetView::default();
    let mut agents = Vec::new();

    for &entity in registry.live() {
        match entity_view(world, entity) {
            Some(EntityView::Target(view)) => target = view,
            Some(EntityView::Agent(view)) => agents.push(view),
            None => {}
        }
    }

    FrameSnapshot {
        frame: frame.frame,
        time: frame.time,
        phase,
        target,
        agents,
        audio_events,
        live_count: registry.len(),
    }
}

/// View of a single entity, or `None` if it has nothing to show.
pub fn entity_view(world: &World, entity: Entity) -> Option<EntityView> {
    let entity_ref = world.entity(entity).ok()?;
    let transform = *entity_ref.get::<&Transform>()?;

    if let Some(player) = entity_ref.get::<&Player>() {
        return Some(EntityView::Target(TargetView {
            position: transform.position,
            health: player.health,
            mode: player.mode,
        }));
    }

    let agent = entity_ref.get::<&Agent>()?;
    let machine = entity_ref.get::<&AnimationStateMachine>()?;
    Some(EntityView::Agent(agent_view(&agent, &transform, &machine)))
}

pub fn agent_view(agent: &Agent, transform: &Transform, machine: &AnimationStateMachine) -> AgentView {
    AgentView {
        agent_id: agent.agent_id,
        kind: agent.kind,
        position: transform.position,
        yaw: transform.yaw,
        alive: agent.alive,
        state: machine.current_animation_state(),
        progress: machine.current_state_animation_progress(),
        transition: machine.transition().map(|t| TransitionView {
            from: t.from,
            to: t.to,
            weight: machine.blend_weight(),
        }),
    }
}
