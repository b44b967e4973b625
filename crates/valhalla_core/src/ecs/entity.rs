//! # Entity Registry
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the registry's slot table (and every pool's sparse array)
//! - A generation counter for safe slot reuse
//!
//! An [`EntityId`] doubles as a *stable reference*: holders of an old ID
//! can always ask the registry whether the slot still belongs to the same
//! logical entity. When a slot is recycled its generation is bumped, so a
//! stale ID fails the liveness check instead of silently aliasing whatever
//! entity now occupies the slot.

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: index into the slot table and pool sparse arrays
/// - Upper 32 bits: generation counter for detecting stale references
///
/// Because the generation travels with the ID, any stored `EntityId` is a
/// stable reference that can outlive the entity it names. Validation
/// happens at resolve time via [`Registry::is_alive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a new entity ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// One slot in the registry's table.
///
/// The slot keeps the authoritative generation for its index plus the
/// component membership bitmask used by filters.
#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    /// Current generation of this slot. Bumped on every reuse.
    generation: u32,
    /// Whether the slot currently holds a live entity.
    alive: bool,
    /// Bitmask of attached components (up to 64 component types).
    mask: u64,
}

/// Allocates, recycles and tracks entity identifiers.
///
/// The slot table grows on demand; freed indices are recycled through a
/// free-list in LIFO order. Recycling bumps the slot generation so that
/// stale [`EntityId`]s held elsewhere (e.g. in-flight attacks) are
/// detectably invalid.
#[derive(Debug, Default)]
pub struct Registry {
    /// All entity slots, indexed by `EntityId::index`.
    slots: Vec<Slot>,
    /// Free list of slot indices available for reuse.
    free: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with pre-reserved slot capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            alive_count: 0,
        }
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Returns the total number of slots ever allocated (live + free).
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Creates a new entity, recycling a freed slot when one is available.
    ///
    /// Reused slots come back with a bumped generation, which is what
    /// invalidates stale references to the previous occupant.
    pub fn create(&mut self) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.alive = true;
            slot.mask = 0;
            self.alive_count += 1;
            return EntityId::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len()).expect("entity index space exhausted");
        self.slots.push(Slot {
            generation: 0,
            alive: true,
            mask: 0,
        });
        self.alive_count += 1;
        EntityId::new(index, 0)
    }

    /// Destroys an entity, freeing its slot for reuse.
    ///
    /// Returns the component mask the entity held so the caller can clear
    /// its pools, or `None` if the ID was stale or already dead.
    pub fn destroy(&mut self, id: EntityId) -> Option<u64> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = &mut self.slots[id.index() as usize];
        let mask = slot.mask;
        slot.alive = false;
        slot.mask = 0;
        self.alive_count -= 1;
        self.free.push(id.index());
        Some(mask)
    }

    /// Checks whether `id` still names a live entity.
    ///
    /// This is the stable-reference validation: a recycled slot has a
    /// different generation, so old IDs fail here.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        if id.is_null() {
            return false;
        }
        match self.slots.get(id.index() as usize) {
            Some(slot) => slot.alive && slot.generation == id.generation(),
            None => false,
        }
    }

    /// Returns the component mask of a live entity, or `None` if stale.
    #[inline]
    #[must_use]
    pub fn mask(&self, id: EntityId) -> Option<u64> {
        if self.is_alive(id) {
            Some(self.slots[id.index() as usize].mask)
        } else {
            None
        }
    }

    /// Sets a component bit on a live entity's mask.
    ///
    /// # Panics
    ///
    /// Panics if the ID is stale; membership changes on dead entities are
    /// pipeline bugs, not runtime conditions.
    #[inline]
    pub fn mask_add(&mut self, id: EntityId, component_id: u8) {
        assert!(self.is_alive(id), "mask_add on dead or stale entity");
        self.slots[id.index() as usize].mask |= 1 << component_id;
    }

    /// Clears a component bit on a live entity's mask.
    ///
    /// # Panics
    ///
    /// Panics if the ID is stale.
    #[inline]
    pub fn mask_remove(&mut self, id: EntityId, component_id: u8) {
        assert!(self.is_alive(id), "mask_remove on dead or stale entity");
        self.slots[id.index() as usize].mask &= !(1 << component_id);
    }

    /// Iterates over all live entities in ascending index order.
    ///
    /// Ascending index order is the determinism anchor for every filter
    /// snapshot: given identical histories, two runs see identical orders.
    pub fn iter_alive(&self) -> impl Iterator<Item = (EntityId, u64)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            if slot.alive {
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                Some((EntityId::new(index, slot.generation), slot.mask))
            } else {
                None
            }
        })
    }
}
