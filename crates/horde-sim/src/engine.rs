//! Simulation engine: the per-frame driver.
//!
//! `SimulationEngine` owns the entity registry, processes external commands,
//! runs the update pass over the live set and the render passes, and produces
//! `FrameSnapshot`s. Headless; the caller supplies the frame timing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use horde_core::commands::SimCommand;
use horde_core::components::{Agent, Transform};
use horde_core::config::SimConfig;
use horde_core::enums::{AgentKind, SimPhase};
use horde_core::events::AudioEvent;
use horde_core::state::FrameSnapshot;
use horde_core::types::FrameContext;

use crate::registry::EntityRegistry;
use crate::systems;
use crate::systems::agents::AgentPass;
use crate::systems::render::{NullRenderSink, RenderSink};
use crate::systems::spawner::SpawnSchedule;
use crate::world_setup::{self, SpawnReservations};

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    registry: EntityRegistry,
    config: SimConfig,
    phase: SimPhase,
    rng: ChaCha8Rng,
    target: Entity,
    next_agent_id: u32,
    spawn_schedule: SpawnSchedule,
    spawn_reservations: SpawnReservations,
    command_queue: VecDeque<SimCommand>,
    audio_events: Vec<AudioEvent>,
}

impl SimulationEngine {
    /// Create an engine with the target standing at the origin.
    ///
    /// `config` must pass `SimConfig::validate`; debug builds panic otherwise.
    pub fn new(config: SimConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid simulation config: {:?}",
            config.validate().err()
        );

        let mut registry = EntityRegistry::new();
        let target = registry.insert(world_setup::target_builder(DVec3::ZERO));
        log::debug!("engine created with seed {}", config.seed);

        Self {
            registry,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            phase: SimPhase::default(),
            target,
            next_agent_id: 0,
            spawn_schedule: SpawnSchedule::default(),
            spawn_reservations: SpawnReservations::default(),
            command_queue: VecDeque::new(),
            audio_events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Run one frame and return the resulting snapshot.
    ///
    /// Order: commands, pending adds and removes, update pass (unless
    /// paused), 3D then 2D render pass, snapshot.
    pub fn tick(&mut self, frame: &FrameContext, sink: &mut impl RenderSink) -> FrameSnapshot {
        self.process_commands(frame);
        self.registry.apply_pending();
        self.spawn_reservations.clear();

        if self.phase == SimPhase::Active {
            self.run_systems(frame);
        }

        systems::render::run(&self.registry, sink, frame);

        let audio_events = std::mem::take(&mut self.audio_events);
        systems::snapshot::build_snapshot(&self.registry, frame, self.phase, audio_events)
    }

    /// Run one frame without rendering.
    pub fn step(&mut self, frame: &FrameContext) -> FrameSnapshot {
        self.tick(frame, &mut NullRenderSink)
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Handle of the pursued target.
    pub fn target(&self) -> Entity {
        self.target
    }

    /// Live entity with the given agent id, if any.
    pub fn find_agent(&self, agent_id: u32) -> Option<Entity> {
        let world = self.registry.world();
        let mut query = world.query::<&Agent>();
        let found = query
            .iter()
            .find(|(_, agent)| agent.agent_id == agent_id)
            .map(|(entity, _)| entity);
        found
    }

    /// Queue an agent at an exact position, skipping the spawn ring.
    #[cfg(test)]
    pub fn spawn_agent_at(&mut self, kind: AgentKind, position: DVec3, now: f64) -> u32 {
        let agent_id = self.next_agent_id;
        self.next_agent_id += 1;
        let target_position = self
            .registry
            .world()
            .get::<&Transform>(self.target)
            .map(|t| t.position)
            .unwrap_or(DVec3::ZERO);
        let builder = world_setup::agent_builder(
            Agent::new(agent_id, kind, now),
            position,
            self.target,
            target_position,
            &mut self.rng,
        );
        self.registry.enqueue_add(builder);
        agent_id
    }

    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    fn process_commands(&mut self, frame: &FrameContext) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, frame);
        }
    }

    fn handle_command(&mut self, command: SimCommand, frame: &FrameContext) {
        match command {
            SimCommand::MoveTarget { position } => {
                if let Ok(mut transform) = self.registry.world().get::<&mut Transform>(self.target) {
                    transform.position = position;
                }
            }
            SimCommand::SpawnAgent { kind } => self.spawn(kind, frame.time),
            SimCommand::KillAgent { agent_id } => {
                let world = self.registry.world();
                let mut query = world.query::<&mut Agent>();
                for (_entity, agent) in query.iter() {
                    if agent.agent_id == agent_id && agent.kill(frame.time) {
                        log::info!("agent {agent_id} killed");
                    }
                }
            }
            SimCommand::Pause => {
                if self.phase == SimPhase::Active {
                    self.phase = SimPhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Active;
                }
            }
        }
    }

    fn spawn(&mut self, kind: AgentKind, now: f64) {
        let spawned = world_setup::spawn_agent(
            &mut self.registry,
            &mut self.spawn_reservations,
            &mut self.rng,
            kind,
            self.next_agent_id,
            self.target,
            now,
            &self.config.spawn,
            &self.config.tuning,
        );
        if spawned {
            self.next_agent_id += 1;
        }
    }

    fn run_systems(&mut self, frame: &FrameContext) {
        // 1. Spawn schedule
        systems::spawner::run(
            &mut self.registry,
            &mut self.spawn_reservations,
            &mut self.rng,
            &mut self.spawn_schedule,
            &self.config.spawn,
            &self.config.tuning,
            frame,
            &mut self.next_agent_id,
            self.target,
        );

        // 2. Update pass, in live order
        let mut pass = AgentPass {
            frame,
            tuning: &self.config.tuning,
            rng: &mut self.rng,
            audio_events: &mut self.audio_events,
        };
        self.registry.for_each_live(|entity, world, live, pending| {
            systems::player::update(entity, world);
            pass.update(entity, world, live, pending);
        });
    }
}
