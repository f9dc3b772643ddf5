//! Peer exclusion: keeps agents from piling onto the same spot.

use glam::DVec2;

/// A peer's identity and horizontal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peer<Id> {
    pub id: Id,
    pub position: DVec2,
}

/// Whether an agent identified by `this` may stand at `candidate`.
///
/// Every peer except `this` (compared by identity, not position) must be at
/// least `min_separation_sq` away, measured as squared horizontal distance.
/// Pass `None` for positions not yet owned by any agent, e.g. spawn points.
pub fn can_move_to<Id: PartialEq>(
    candidate: DVec2,
    peers: &[Peer<Id>],
    this: Option<&Id>,
    min_separation_sq: f64,
) -> bool {
    peers
        .iter()
        .filter(|peer| this != Some(&peer.id))
        .all(|peer| peer.position.distance_squared(candidate) >= min_separation_sq)
}
