//! Entity spawn factories.
//!
//! Builds the component bundles for the target and for agents. Nothing here
//! touches the live set directly: bundles go through the registry's queue.

use glam::{DVec2, DVec3};
use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use horde_ai::anim::AnimationStateMachine;
use horde_ai::exclusion::{can_move_to, Peer};
use horde_ai::profiles::AnimationProfile;
use horde_core::components::{Agent, Player, Transform};
use horde_core::config::{AgentTuning, SpawnSettings};
use horde_core::enums::AgentKind;
use horde_core::types::{horizontal, yaw_toward};

use crate::components::Pursuit;
use crate::registry::EntityRegistry;

/// Bundle for the pursued target, standing at `position`.
pub fn target_builder(position: DVec3) -> EntityBuilder {
    let mut builder = EntityBuilder::new();
    builder.add(Player::default()).add(Transform::at(position));
    builder
}

/// Bundle for an agent standing at `position`, facing `target_position`.
pub fn agent_builder(
    agent: Agent,
    position: DVec3,
    target: Entity,
    target_position: DVec3,
    rng: &mut ChaCha8Rng,
) -> EntityBuilder {
    let transform = Transform {
        position,
        yaw: yaw_toward(position, target_position),
    };
    let machine = AnimationStateMachine::desynchronized(AnimationProfile::default(), rng);

    let mut builder = EntityBuilder::new();
    builder
        .add(agent)
        .add(transform)
        .add(machine)
        .add(Pursuit { target });
    builder
}

/// Horizontal positions of every live agent, dead bodies included.
pub fn agent_peers(world: &World, live: &[Entity]) -> Vec<Peer<Entity>> {
    live.iter()
        .filter_map(|&entity| {
            let entity_ref = world.entity(entity).ok()?;
            if !entity_ref.has::<Agent>() {
                return None;
            }
            let transform = entity_ref.get::<&Transform>()?;
            Some(Peer {
                id: entity,
                position: horizontal(transform.position),
            })
        })
        .collect()
}

/// Spots taken by agents that are queued but not live yet.
///
/// Cleared once the queue has been applied, when those agents show up
/// among the live peers.
#[derive(Debug, Clone, Default)]
pub struct SpawnReservations {
    positions: Vec<DVec2>,
}

impl SpawnReservations {
    pub fn reserve(&mut self, position: DVec2) {
        self.positions.push(position);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn admits(&self, candidate: DVec2, min_separation_sq: f64) -> bool {
        self.positions
            .iter()
            .all(|p| p.distance_squared(candidate) >= min_separation_sq)
    }
}

/// Sample a free position on the spawn ring around `center`.
///
/// Retries until the exclusion check passes against `peers` and every
/// reserved spot; gives up after `settings.max_attempts` samples.
pub fn sample_spawn_position(
    rng: &mut ChaCha8Rng,
    center: DVec3,
    peers: &[Peer<Entity>],
    reserved: &SpawnReservations,
    settings: &SpawnSettings,
    tuning: &AgentTuning,
) -> Option<DVec3> {
    (0..settings.max_attempts).find_map(|_| {
        let bearing: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let range: f64 = rng.gen_range(settings.min_radius..=settings.max_radius);
        let candidate = DVec3::new(
            center.x + range * bearing.cos(),
            0.0,
            center.z + range * bearing.sin(),
        );
        let spot = horizontal(candidate);
        (can_move_to(spot, peers, None, tuning.min_separation_sq)
            && reserved.admits(spot, tuning.min_separation_sq))
        .then_some(candidate)
    })
}

/// Find a free spot near the target and queue a new agent there, reserving
/// the spot until the queue is applied. Returns false when no free spot was
/// found.
#[allow(clippy::too_many_arguments)]
pub fn spawn_agent(
    registry: &mut EntityRegistry,
    reserved: &mut SpawnReservations,
    rng: &mut ChaCha8Rng,
    kind: AgentKind,
    agent_id: u32,
    target: Entity,
    now: f64,
    settings: &SpawnSettings,
    tuning: &AgentTuning,
) -> bool {
    let target_position = match registry.world().get::<&Transform>(target) {
        Ok(transform) => transform.position,
        Err(_) => return false,
    };
    let peers = agent_peers(registry.world(), registry.live());

    let Some(position) =
        sample_spawn_position(rng, target_position, &peers, reserved, settings, tuning)
    else {
        log::warn!(
            "no free spawn position for agent {agent_id} after {} attempts",
            settings.max_attempts
        );
        return false;
    };

    let builder = agent_builder(
        Agent::new(agent_id, kind, now),
        position,
        target,
        target_position,
        rng,
    );
    registry.enqueue_add(builder);
    reserved.reserve(horizontal(position));
    log::info!("spawning {kind:?} agent {agent_id} at ({:.1}, {:.1})", position.x, position.z);
    true
}
