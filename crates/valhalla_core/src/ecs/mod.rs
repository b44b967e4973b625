//! # Entity Component System
//!
//! A deterministic sparse-set ECS.
//!
//! ## Design Philosophy
//!
//! - Component values live in dense arrays, one pool per type
//! - Entity IDs are indices with generation counters; a stored ID is a
//!   stable reference, validated at resolve time
//! - Filters are include/exclude bitmasks, snapshotted lazily on access
//! - No hash maps, no wall clock, no iteration-order surprises

mod entity;
mod filter;
mod pool;
mod world;

pub use entity::{EntityId, Registry};
pub use filter::Filter;
pub use pool::{Component, ComponentPool};
pub use world::{World, MAX_COMPONENT_TYPES};
