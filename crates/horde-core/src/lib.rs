//! Core types and definitions for the HORDE frame simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, frame snapshots, events, constants and
//! configuration. It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
