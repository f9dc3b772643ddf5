//! Simulation engine for HORDE.
//!
//! Owns the entity registry, runs the per-frame update pass over the live
//! set, drives the render passes and produces `FrameSnapshot`s.

pub mod components;
pub mod engine;
pub mod registry;
pub mod systems;
pub mod world_setup;

pub use horde_core as core;
pub use engine::SimulationEngine;
pub use registry::EntityRegistry;
pub use systems::render::{NullRenderSink, RenderSink};
