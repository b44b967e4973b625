//! # Component Pools
//!
//! Sparse-set storage, one pool per component type:
//! - `dense` data stays contiguous for cache-friendly iteration
//! - `sparse` maps entity index -> dense slot in O(1)
//! - removal compacts by swapping with the last dense element
//!
//! Dense order is compaction order, not insertion order. Nothing in the
//! engine may rely on it; algorithms that need a stable order (attack
//! targeting) impose their own sort on top.

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: bitwise copyable, no heap payload
/// - `Default`: usable as a reset value
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default)]
/// struct Health {
///     hp: i32,
/// }
///
/// impl Component for Health {
///     const ID: u8 = 4;
/// }
/// ```
pub trait Component: Copy + Default + Send + Sync + 'static {
    /// Unique identifier for this component type (0-63).
    ///
    /// This ID is used for the component bitmask in the entity registry
    /// and as the pool slot index inside the world.
    const ID: u8;
}

/// Sentinel for "entity holds no slot" in the sparse array.
const ABSENT: u32 = 0;

/// Sparse-set storage for a single component type.
///
/// All operations are O(1) amortized. The sparse array grows to cover the
/// highest entity index seen; dense arrays grow with the live membership.
#[derive(Debug)]
pub struct ComponentPool<C: Component> {
    /// Entity index -> dense slot + 1. `ABSENT` (0) means not a member.
    sparse: Vec<u32>,
    /// Dense slot -> owning entity index.
    entities: Vec<u32>,
    /// Dense component values, parallel to `entities`.
    data: Vec<C>,
}

impl<C: Component> Default for ComponentPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentPool<C> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Creates a pool with pre-reserved capacity for `capacity` members.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entities holding this component.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity holds this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Dense slot for an entity index, if it is a member.
    #[inline]
    fn slot(&self, entity: u32) -> Option<usize> {
        match self.sparse.get(entity as usize) {
            Some(&s) if s != ABSENT => Some((s - 1) as usize),
            _ => None,
        }
    }

    /// Checks whether an entity index holds this component.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: u32) -> bool {
        self.slot(entity).is_some()
    }

    /// Inserts (or overwrites) the component value for an entity index.
    ///
    /// Overwrite-on-add is deliberate: respawn re-adds `Data` to reset the
    /// carried tick without a remove/add dance.
    pub fn add(&mut self, entity: u32, value: C) {
        if let Some(slot) = self.slot(entity) {
            self.data[slot] = value;
            return;
        }
        if self.sparse.len() <= entity as usize {
            self.sparse.resize(entity as usize + 1, ABSENT);
        }
        let slot = self.entities.len();
        self.entities.push(entity);
        self.data.push(value);
        self.sparse[entity as usize] =
            u32::try_from(slot + 1).expect("component pool slot space exhausted");
    }

    /// Removes the component from an entity index.
    ///
    /// Compacts by swapping the last dense element into the vacated slot.
    /// Returns the removed value, or `None` if the entity was not a member.
    pub fn remove(&mut self, entity: u32) -> Option<C> {
        let slot = self.slot(entity)?;
        let last = self.entities.len() - 1;
        let moved_entity = self.entities[last];

        self.entities.swap(slot, last);
        self.data.swap(slot, last);
        self.sparse[moved_entity as usize] =
            u32::try_from(slot + 1).expect("component pool slot space exhausted");
        self.sparse[entity as usize] = ABSENT;

        self.entities.pop();
        self.data.pop()
    }

    /// Returns the component of an entity index.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold the component. Filters guarantee
    /// membership before access; a miss here is a pipeline-ordering bug
    /// and must fail loudly rather than be papered over.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: u32) -> &C {
        let slot = self
            .slot(entity)
            .expect("pool get on non-member entity: pipeline contract violated");
        &self.data[slot]
    }

    /// Returns the mutable component of an entity index.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not hold the component (see [`Self::get`]).
    #[inline]
    pub fn get_mut(&mut self, entity: u32) -> &mut C {
        let slot = self
            .slot(entity)
            .expect("pool get_mut on non-member entity: pipeline contract violated");
        &mut self.data[slot]
    }

    /// Returns the component of an entity index, or `None` if not a member.
    #[inline]
    #[must_use]
    pub fn try_get(&self, entity: u32) -> Option<&C> {
        self.slot(entity).map(|slot| &self.data[slot])
    }

    /// Iterates over `(entity_index, &component)` pairs in dense order.
    ///
    /// Dense order is unspecified; do not rely on it for determinism.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &C)> {
        self.entities.iter().copied().zip(self.data.iter())
    }
}
