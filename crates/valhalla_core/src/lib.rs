//! # VALHALLA Core
//!
//! Deterministic sparse-set Entity Component System designed for:
//! - Benchmarking entity/component architectures under combat workloads
//! - Bit-identical replays: same population, same tick count, same state
//! - Zero allocations in the steady-state tick
//!
//! ## Architecture Rules
//!
//! 1. **Determinism above all** - no hash-map iteration, no wall clock,
//!    no ambient randomness; every random draw is a pure `(seed, counter)`
//!    hash owned by the entity drawing it
//! 2. **Data-oriented design** - components live in dense per-type pools
//!    with O(1) sparse indexing
//! 3. **Stable references** - entity IDs carry generations and are
//!    validated at resolve time, never trusted across deletion
//!
//! ## Example
//!
//! ```rust,ignore
//! use valhalla_core::{Filter, World};
//!
//! let mut world = World::new();
//! world.register::<Health>();
//! let e = world.new_entity();
//! world.add(e, Health { hp: 100 });
//! ```

pub mod ecs;
pub mod math;
pub mod random;

pub use ecs::{Component, ComponentPool, EntityId, Filter, Registry, World, MAX_COMPONENT_TYPES};
pub use math::Vec2;
pub use random::{draw, stable_hash};
