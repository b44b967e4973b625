//! # ECS World
//!
//! The central container: one entity [`Registry`] plus one type-erased
//! [`ComponentPool`] slot per component ID. The world keeps the registry's
//! component bitmasks in sync with pool membership, which is what makes
//! filter matching a pair of mask ops instead of N pool probes.
//!
//! The world is exclusively owned by one simulation and strictly
//! single-threaded. Teardown is `Drop`.

use std::any::Any;

use super::entity::{EntityId, Registry};
use super::filter::Filter;
use super::pool::{Component, ComponentPool};

/// Maximum number of distinct component types (bitmask width).
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Object-safe view of a pool, used for mask-driven teardown on destroy.
trait AnyPool {
    /// Removes an entity index from the pool, if present.
    fn remove_entity(&mut self, entity: u32);
    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyPool for ComponentPool<C> {
    fn remove_entity(&mut self, entity: u32) {
        let _ = self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The ECS world: entity registry + component pools + filter evaluation.
pub struct World {
    /// Entity slot table and free-list.
    registry: Registry,
    /// Pool per component ID. `None` until registered.
    pools: Vec<Option<Box<dyn AnyPool>>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with no registered pools.
    #[must_use]
    pub fn new() -> Self {
        let mut pools = Vec::with_capacity(MAX_COMPONENT_TYPES);
        pools.resize_with(MAX_COMPONENT_TYPES, || None);
        Self {
            registry: Registry::new(),
            pools,
        }
    }

    /// Creates a world with pre-reserved entity capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pools = Vec::with_capacity(MAX_COMPONENT_TYPES);
        pools.resize_with(MAX_COMPONENT_TYPES, || None);
        Self {
            registry: Registry::with_capacity(capacity),
            pools,
        }
    }

    /// Registers the pool for component `C`. Idempotent.
    ///
    /// All pools are registered at simulation setup; registration during a
    /// tick would be a design smell, not an error we recover from.
    pub fn register<C: Component>(&mut self) {
        let slot = &mut self.pools[C::ID as usize];
        if slot.is_none() {
            *slot = Some(Box::new(ComponentPool::<C>::new()));
        }
    }

    /// Returns the pool for component `C`.
    ///
    /// # Panics
    ///
    /// Panics if the pool was never registered (a setup bug).
    #[inline]
    #[must_use]
    pub fn pool<C: Component>(&self) -> &ComponentPool<C> {
        self.pools[C::ID as usize]
            .as_deref()
            .and_then(|p| p.as_any().downcast_ref())
            .expect("component pool not registered")
    }

    /// Returns the mutable pool for component `C`.
    ///
    /// # Panics
    ///
    /// Panics if the pool was never registered (a setup bug).
    #[inline]
    pub fn pool_mut<C: Component>(&mut self) -> &mut ComponentPool<C> {
        self.pools[C::ID as usize]
            .as_deref_mut()
            .and_then(|p| p.as_any_mut().downcast_mut())
            .expect("component pool not registered")
    }

    /// Creates a new entity with no components.
    pub fn new_entity(&mut self) -> EntityId {
        self.registry.create()
    }

    /// Destroys an entity, removing it from every pool it is a member of.
    ///
    /// Returns `false` if the ID was stale or already destroyed.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(mut mask) = self.registry.destroy(id) else {
            return false;
        };
        while mask != 0 {
            let component_id = mask.trailing_zeros() as usize;
            mask &= mask - 1;
            if let Some(pool) = self.pools[component_id].as_deref_mut() {
                pool.remove_entity(id.index());
            }
        }
        true
    }

    /// Checks whether `id` still names a live entity (stable-reference
    /// validation).
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.registry.is_alive(id)
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.registry.alive_count()
    }

    /// Attaches (or overwrites) component `C` on a live entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead/stale or the pool is unregistered.
    pub fn add<C: Component>(&mut self, id: EntityId, value: C) {
        assert!(self.registry.is_alive(id), "add component on dead entity");
        self.pool_mut::<C>().add(id.index(), value);
        self.registry.mask_add(id, C::ID);
    }

    /// Detaches component `C` from a live entity, if present.
    ///
    /// # Panics
    ///
    /// Panics if the entity is dead/stale or the pool is unregistered.
    pub fn remove<C: Component>(&mut self, id: EntityId) -> Option<C> {
        assert!(
            self.registry.is_alive(id),
            "remove component on dead entity"
        );
        let removed = self.pool_mut::<C>().remove(id.index());
        if removed.is_some() {
            self.registry.mask_remove(id, C::ID);
        }
        removed
    }

    /// Checks whether a live entity holds component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        matches!(self.registry.mask(id), Some(mask) if mask & (1 << C::ID) != 0)
    }

    /// Returns component `C` of an entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold the component; filters guarantee
    /// membership, so a miss is a pipeline bug and fails loudly.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(&self, id: EntityId) -> &C {
        self.pool::<C>().get(id.index())
    }

    /// Returns mutable component `C` of an entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold the component.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> &mut C {
        self.pool_mut::<C>().get_mut(id.index())
    }

    /// Snapshots all live entities matching `filter` into `out`.
    ///
    /// The buffer is cleared first and filled in ascending entity-index
    /// order, so identical world histories yield identical snapshots.
    /// Callers own the buffer; reusing it across ticks keeps the steady
    /// state allocation-free.
    pub fn select(&self, filter: Filter, out: &mut Vec<EntityId>) {
        out.clear();
        for (id, mask) in self.registry.iter_alive() {
            if filter.matches_mask(mask) {
                out.push(id);
            }
        }
    }

    /// Membership test: is `id` alive and matching `filter` right now?
    ///
    /// Valid after arbitrary structural changes since any snapshot was
    /// taken; this is what attack resolution uses to reject stale targets.
    #[inline]
    #[must_use]
    pub fn matches(&self, filter: Filter, id: EntityId) -> bool {
        matches!(self.registry.mask(id), Some(mask) if filter.matches_mask(mask))
    }
}
