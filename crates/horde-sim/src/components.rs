//! Components that only make sense with ECS handles.

use hecs::Entity;

/// Non-owning link from an agent to the entity it chases.
/// The target may be gone by the time it is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pursuit {
    pub target: Entity,
}
