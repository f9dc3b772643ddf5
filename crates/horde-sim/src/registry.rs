//! Entity registry: the authoritative live set and its deferred mutations.
//!
//! Entities are stored in a hecs `World`; `live` is the dense list that fixes
//! iteration order. Adds and removes requested while the live set is being
//! visited are queued and applied by `apply_pending`, once per frame, before
//! the update pass. `for_each_live` only hands out a shared `&World`, so the
//! set cannot grow or shrink while it is being walked.

use hecs::{Entity, EntityBuilder, World};

/// A queued change to the live set.
pub enum PendingOp {
    /// Spawn the built entity and append it to the live set.
    Add(EntityBuilder),
    /// Remove the entity with this handle, if it is still live.
    Remove(Entity),
}

/// FIFO of pending operations, applied in submission order.
#[derive(Default)]
pub struct PendingQueue {
    ops: Vec<PendingOp>,
}

/// Outcome of one `apply_pending` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub added: usize,
    pub removed: usize,
    /// Removals whose entity was already gone.
    pub missing: usize,
}

pub struct EntityRegistry {
    world: World,
    live: Vec<Entity>,
    pending: PendingQueue,
}

impl PendingQueue {
    pub fn push(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    pub fn add(&mut self, builder: EntityBuilder) {
        self.push(PendingOp::Add(builder));
    }

    pub fn remove(&mut self, entity: Entity) {
        self.push(PendingOp::Remove(entity));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            live: Vec::new(),
            pending: PendingQueue::default(),
        }
    }

    /// Queue an operation for the next `apply_pending`.
    pub fn enqueue(&mut self, op: PendingOp) {
        self.pending.push(op);
    }

    pub fn enqueue_add(&mut self, builder: EntityBuilder) {
        self.pending.add(builder);
    }

    pub fn enqueue_remove(&mut self, entity: Entity) {
        self.pending.remove(entity);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Spawn an entity right away, bypassing the queue.
    ///
    /// Needs `&mut self`, so it cannot run while the live set is being visited.
    pub fn insert(&mut self, mut builder: EntityBuilder) -> Entity {
        let entity = self.world.spawn(builder.build());
        self.live.push(entity);
        entity
    }

    /// Apply every queued operation in order, then clear the queue.
    ///
    /// Removal is by handle identity and swaps the last live entity into the
    /// freed slot. Removing an entity that is no longer live is a no-op.
    pub fn apply_pending(&mut self) -> ApplyReport {
        let mut report = ApplyReport::default();

        for op in self.pending.ops.drain(..) {
            match op {
                PendingOp::Add(mut builder) => {
                    let entity = self.world.spawn(builder.build());
                    self.live.push(entity);
                    report.added += 1;
                }
                PendingOp::Remove(entity) => {
                    match self.live.iter().position(|&e| e == entity) {
                        Some(index) => {
                            self.live.swap_remove(index);
                            let despawned = self.world.despawn(entity);
                            debug_assert!(despawned.is_ok(), "live entity missing from world");
                            report.removed += 1;
                        }
                        None => {
                            log::trace!("remove of {entity:?} ignored, already gone");
                            report.missing += 1;
                        }
                    }
                }
            }
        }

        debug_assert_eq!(self.live.len(), self.world.len() as usize);
        if report.added + report.removed > 0 {
            log::debug!(
                "registry applied +{} -{} ({} live)",
                report.added,
                report.removed,
                self.live.len()
            );
        }
        report
    }

    /// Visit every live entity in order.
    ///
    /// The visitor sees the world, the full live list (its peers) and the
    /// pending queue, where it may request adds and removes for the next frame.
    pub fn for_each_live<F>(&mut self, mut visitor: F)
    where
        F: FnMut(Entity, &World, &[Entity], &mut PendingQueue),
    {
        let world = &self.world;
        let live = self.live.as_slice();
        let pending = &mut self.pending;
        for &entity in live {
            visitor(entity, world, live, pending);
        }
    }

    /// Live entities in iteration order.
    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
