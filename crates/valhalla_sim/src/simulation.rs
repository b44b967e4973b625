//! # Simulation Driver
//!
//! Owns one world and one pipeline, seeds the initial population and
//! advances time one tick at a time. The host drives it (`tick`/`run`)
//! and may stop at any tick boundary; there is no mid-tick cancellation.
//! Teardown is `Drop` - nothing is persisted.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::info;
use valhalla_core::{Filter, World};

use crate::components::{
    register_all, Damage, Data, Dead, Health, Hero, Monster, Npc, Position, Spawn, Sprite, Unit,
    Velocity,
};
use crate::config::SimConfig;
use crate::policy::{ArenaSpawnPolicy, BehaviorPolicy, SpawnPolicy, WanderBehavior};
use crate::render::{NullSink, RenderSink};
use crate::systems::Pipeline;

/// One self-contained simulation instance.
///
/// Exclusively owns its world, pools and filters; running two instances
/// side by side is fine, sharing one is not supported.
pub struct Simulation<F: RenderSink, S: SpawnPolicy, B: BehaviorPolicy> {
    world: World,
    pipeline: Pipeline<F, S, B>,
    tick: i64,
}

impl Simulation<NullSink, ArenaSpawnPolicy, WanderBehavior> {
    /// Creates a simulation with the default policies and a discarding
    /// sink - the benchmark configuration.
    #[must_use]
    pub fn with_defaults(config: &SimConfig) -> Self {
        Self::new(
            config,
            NullSink,
            ArenaSpawnPolicy {
                width: config.arena_width,
                height: config.arena_height,
            },
            WanderBehavior {
                speed: config.wander_speed,
                redirect_interval: config.redirect_interval,
            },
        )
    }
}

impl<F: RenderSink, S: SpawnPolicy, B: BehaviorPolicy> Simulation<F, S, B> {
    /// Creates a simulation: registers every pool and seeds the initial
    /// population (`Unit { id: i, seed: i }`, `Spawn`-tagged, tick 0).
    pub fn new(config: &SimConfig, sink: F, spawner: S, behavior: B) -> Self {
        let mut world = World::with_capacity(config.population as usize);
        register_all(&mut world);

        for i in 0..config.population {
            let entity = world.new_entity();
            world.add(entity, Spawn);
            world.add(entity, Data { tick: 0 });
            world.add(
                entity,
                Unit {
                    id: i,
                    seed: i,
                    ..Unit::default()
                },
            );
        }

        info!(population = config.population, "simulation seeded");

        Self {
            world,
            pipeline: Pipeline::new(config, sink, spawner, behavior),
            tick: 0,
        }
    }

    /// Advances the simulation by exactly one tick.
    pub fn tick(&mut self) {
        self.pipeline.run(&mut self.world);
        self.tick += 1;
    }

    /// Advances the simulation by `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn current_tick(&self) -> i64 {
        self.tick
    }

    /// Borrows the world (inspection).
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutably borrows the world (test scaffolding).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Borrows the render sink.
    #[must_use]
    pub fn sink(&self) -> &F {
        self.pipeline.sink()
    }

    /// Mutably borrows the render sink.
    pub fn sink_mut(&mut self) -> &mut F {
        self.pipeline.sink_mut()
    }

    /// Stable digest of all live component state.
    ///
    /// Folds every live entity in ascending index order: identity, tick
    /// context, position/velocity bits, combat state and tags. Two runs
    /// are bit-identical iff their digests agree tick for tick.
    /// `DefaultHasher` is deterministic across runs and platforms (fixed
    /// keys), which is all a benchmark comparison needs.
    #[must_use]
    pub fn state_digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let mut buf = Vec::new();
        self.world.select(Filter::new(), &mut buf);

        for &entity in &buf {
            entity.index().hash(&mut hasher);

            if self.world.has::<Unit>(entity) {
                let unit = self.world.get::<Unit>(entity);
                (unit.id, unit.seed, unit.counter).hash(&mut hasher);
                (unit.spawn_tick, unit.respawn_tick).hash(&mut hasher);
            }
            if self.world.has::<Data>(entity) {
                self.world.get::<Data>(entity).tick.hash(&mut hasher);
            }
            if self.world.has::<Position>(entity) {
                let p = self.world.get::<Position>(entity).v;
                (p.x.to_bits(), p.y.to_bits()).hash(&mut hasher);
            }
            if self.world.has::<Velocity>(entity) {
                let v = self.world.get::<Velocity>(entity).v;
                (v.x.to_bits(), v.y.to_bits()).hash(&mut hasher);
            }
            if self.world.has::<Health>(entity) {
                self.world.get::<Health>(entity).hp.hash(&mut hasher);
            }
            if self.world.has::<Damage>(entity) {
                let d = self.world.get::<Damage>(entity);
                (d.attack, d.defence, d.cooldown).hash(&mut hasher);
            }
            if self.world.has::<Sprite>(entity) {
                (self.world.get::<Sprite>(entity).character as u8).hash(&mut hasher);
            }

            let tags = [
                self.world.has::<Spawn>(entity),
                self.world.has::<Dead>(entity),
                self.world.has::<Npc>(entity),
                self.world.has::<Hero>(entity),
                self.world.has::<Monster>(entity),
            ];
            tags.hash(&mut hasher);
        }

        hasher.finish()
    }
}
