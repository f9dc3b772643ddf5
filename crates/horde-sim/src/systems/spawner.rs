//! Spawn schedule: keeps the horde topped up around the target.

use hecs::Entity;
use rand_chacha::ChaCha8Rng;

use horde_core::components::Agent;
use horde_core::config::{AgentTuning, SpawnSettings};
use horde_core::enums::AgentKind;
use horde_core::types::FrameContext;

use crate::registry::EntityRegistry;
use crate::world_setup::{self, SpawnReservations};

/// Progress through the spawn schedule.
#[derive(Debug, Clone, Default)]
pub struct SpawnSchedule {
    /// Frame time at which the next spawn is due.
    pub next_spawn_at: f64,
    /// Spawns issued so far by the schedule.
    pub spawned: u32,
}

impl SpawnSchedule {
    /// Kind of the next scheduled spawn.
    pub fn next_kind(&self, settings: &SpawnSettings) -> AgentKind {
        let every = settings.dormant_every;
        if every > 0 && self.spawned % every == every - 1 {
            AgentKind::Dormant
        } else {
            AgentKind::Walker
        }
    }
}

/// Number of live entities that are agents.
pub fn live_agents(registry: &EntityRegistry) -> usize {
    let world = registry.world();
    registry
        .live()
        .iter()
        .filter(|&&e| world.entity(e).is_ok_and(|r| r.has::<Agent>()))
        .count()
}

/// Queue at most one new agent if one is due and the horde isn't full.
#[allow(clippy::too_many_arguments)]
pub fn run(
    registry: &mut EntityRegistry,
    reserved: &mut SpawnReservations,
    rng: &mut ChaCha8Rng,
    schedule: &mut SpawnSchedule,
    settings: &SpawnSettings,
    tuning: &AgentTuning,
    frame: &FrameContext,
    next_agent_id: &mut u32,
    target: Entity,
) {
    if settings.interval_secs <= 0.0 || frame.time < schedule.next_spawn_at {
        return;
    }
    schedule.next_spawn_at = frame.time + settings.interval_secs;

    if live_agents(registry) >= settings.max_agents {
        return;
    }

    let kind = schedule.next_kind(settings);
    let spawned = world_setup::spawn_agent(
        registry,
        reserved,
        rng,
        kind,
        *next_agent_id,
        target,
        frame.time,
        settings,
        tuning,
    );
    if spawned {
        *next_agent_id += 1;
        schedule.spawned += 1;
    }
}
