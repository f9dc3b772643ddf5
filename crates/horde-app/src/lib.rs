//! HORDE headless runner.
//!
//! Wires the simulation engine to a wall-clock frame loop, logging and
//! config loading.

pub mod game_loop;
pub mod logging;
pub mod state;

pub use horde_core as core;
