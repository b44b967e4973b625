//! # VALHALLA Sim
//!
//! A deterministic, tick-driven combat simulation over the VALHALLA ECS,
//! built to benchmark entity/component architectures:
//!
//! - units spawn, wander, fight, die and respawn as brand-new entities
//! - attacks are transient entities holding a *stable* target reference,
//!   validated at resolution so recycled slots never absorb stale hits
//! - every random decision is a pure `(seed, counter)` hash owned by the
//!   unit making it
//!
//! Given a population size and a tick count, two runs produce
//! bit-identical component state. That property is the product; the
//! frames are a side effect.
//!
//! ## Example
//!
//! ```rust,ignore
//! use valhalla_sim::{SimConfig, Simulation};
//!
//! let config = SimConfig { population: 1024, ..SimConfig::default() };
//! let mut sim = Simulation::with_defaults(&config);
//! sim.run(600);
//! println!("digest: {:#018x}", sim.state_digest());
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod policy;
pub mod render;
pub mod simulation;
pub mod systems;

pub use components::{
    Attack, Damage, Data, Dead, Health, Hero, Monster, Npc, Position, Spawn, Sprite, SpriteKind,
    Unit, UnitKind, Velocity,
};
pub use config::SimConfig;
pub use error::SimError;
pub use policy::{ArenaSpawnPolicy, BehaviorPolicy, SpawnPolicy, UnitSpawn, WanderBehavior};
pub use render::{Cell, FrameBuffer, NullSink, RenderSink};
pub use simulation::Simulation;
