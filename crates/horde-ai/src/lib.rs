//! Agent AI for HORDE.
//!
//! Implements the blended animation state machine, the peer exclusion
//! check and the per-agent behaviour controllers. Operates on plain data;
//! the ECS side lives in `horde-sim`.

pub mod anim;
pub mod behavior;
pub mod exclusion;
pub mod profiles;

pub use horde_core as core;

#[cfg(test)]
mod tests;
