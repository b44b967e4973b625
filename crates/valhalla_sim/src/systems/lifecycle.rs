//! # Lifecycle Systems
//!
//! Spawn, respawn and kill. Between them they own every entity creation
//! and destruction in the simulation:
//!
//! - spawn turns a `Spawn`-tagged shell into a full unit
//! - kill tags bled-out units `Dead` and books their respawn tick
//! - respawn replaces an eligible dead unit with a brand-new entity and
//!   destroys the old one - the only post-death destruction point
//!
//! Death never reuses an entity in place: the grave entity and its
//! replacement are distinct IDs, which is what keeps in-flight attack
//! references honest.

use tracing::{debug, trace};
use valhalla_core::{stable_hash, EntityId, Filter, World};

use crate::components::{
    Data, Dead, Health, Hero, Monster, Npc, Spawn, Sprite, Unit, UnitKind,
};
use crate::policy::SpawnPolicy;

/// Entities awaiting initialization.
const PENDING: Filter = Filter::new().with::<Unit>().with::<Data>().with::<Spawn>();

/// Dead units carrying their tick context.
const GRAVES: Filter = Filter::new().with::<Unit>().with::<Data>().with::<Dead>();

/// Units that can still bleed out.
const MORTAL: Filter = Filter::new()
    .with::<Unit>()
    .with::<Health>()
    .with::<Data>()
    .without::<Dead>();

/// Initializes `Spawn`-tagged units via the injected [`SpawnPolicy`].
pub struct SpawnSystem<S: SpawnPolicy> {
    policy: S,
    buf: Vec<EntityId>,
}

impl<S: SpawnPolicy> SpawnSystem<S> {
    /// Creates the system around its classification policy.
    pub fn new(policy: S) -> Self {
        Self {
            policy,
            buf: Vec::new(),
        }
    }

    /// Runs one spawn pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(PENDING, &mut self.buf);
        for &entity in &self.buf {
            let data = *world.get::<Data>(entity);
            let mut unit = *world.get::<Unit>(entity);
            unit.spawn_tick = data.tick;

            let spawned = self.policy.spawn(&mut unit, &data);
            *world.get_mut::<Unit>(entity) = unit;

            world.add(entity, spawned.health);
            world.add(entity, spawned.damage);
            world.add(entity, Sprite::default());
            world.add(entity, spawned.position);
            world.add(entity, spawned.velocity);
            match spawned.kind {
                UnitKind::Npc => world.add(entity, Npc),
                UnitKind::Hero => world.add(entity, Hero),
                UnitKind::Monster => world.add(entity, Monster),
            }
            world.remove::<Spawn>(entity);

            trace!(unit = unit.id, kind = ?spawned.kind, tick = data.tick, "unit spawned");
        }
    }
}

/// Replaces eligible dead units with reseeded successors.
#[derive(Default)]
pub struct RespawnSystem {
    buf: Vec<EntityId>,
}

impl RespawnSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one respawn pass.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn run(&mut self, world: &mut World) {
        world.select(GRAVES, &mut self.buf);
        for &entity in &self.buf {
            let unit = *world.get::<Unit>(entity);
            let data = *world.get::<Data>(entity);
            if data.tick < unit.respawn_tick {
                continue;
            }

            let successor = world.new_entity();
            world.add(successor, Spawn);
            world.add(successor, data);
            world.add(
                successor,
                Unit {
                    // Fold the tick into the display ID so successive
                    // generations of the same unit stay distinguishable.
                    id: unit.id | ((data.tick as u32) << 16),
                    // Child stream: decorrelated from the parent but a
                    // pure function of its seed/counter history.
                    seed: stable_hash(unit.seed, unit.counter),
                    counter: 0,
                    spawn_tick: 0,
                    respawn_tick: 0,
                },
            );
            world.destroy(entity);

            debug!(unit = unit.id, tick = data.tick, "unit respawned");
        }
    }
}

/// Tags bled-out units `Dead` and books their respawn tick.
pub struct KillSystem {
    respawn_delay: i64,
    buf: Vec<EntityId>,
}

impl KillSystem {
    /// Creates the system with the configured death-to-respawn delay.
    #[must_use]
    pub fn new(respawn_delay: i64) -> Self {
        Self {
            respawn_delay,
            buf: Vec::new(),
        }
    }

    /// Runs one kill pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(MORTAL, &mut self.buf);
        for &entity in &self.buf {
            if world.get::<Health>(entity).hp > 0 {
                continue;
            }
            let tick = world.get::<Data>(entity).tick;
            world.add(entity, Dead);
            let unit = world.get_mut::<Unit>(entity);
            unit.respawn_tick = tick + self.respawn_delay;

            debug!(unit = unit.id, tick, "unit died");
        }
    }
}
