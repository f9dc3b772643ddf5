//! Systems that run over the live set each frame.
//!
//! Update systems receive a shared `&World` from the registry and mutate
//! components through hecs' checked borrows; they never spawn or despawn,
//! they queue the request instead.

pub mod agents;
pub mod player;
pub mod render;
pub mod snapshot;
pub mod spawner;
