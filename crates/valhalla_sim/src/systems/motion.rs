//! # Motion Systems
//!
//! Movement integrates velocity into position (single-tick Euler step);
//! velocity update runs after it, so a behavior decision made on tick T
//! is first applied on tick T+1. Dead units neither move nor steer.

use valhalla_core::{EntityId, Filter, World};

use crate::components::{Data, Dead, Position, Unit, Velocity};
use crate::policy::BehaviorPolicy;

/// Anything positioned and moving, dead things excluded.
const MOVING: Filter = Filter::new()
    .with::<Position>()
    .with::<Velocity>()
    .without::<Dead>();

/// Live units that steer themselves.
const STEERING: Filter = Filter::new()
    .with::<Velocity>()
    .with::<Unit>()
    .with::<Data>()
    .with::<Position>()
    .without::<Dead>();

/// Applies `position += velocity` to every live mover.
#[derive(Default)]
pub struct MovementSystem {
    buf: Vec<EntityId>,
}

impl MovementSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one integration pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(MOVING, &mut self.buf);
        for &entity in &self.buf {
            let velocity = *world.get::<Velocity>(entity);
            world.get_mut::<Position>(entity).v += velocity.v;
        }
    }
}

/// Recomputes live units' velocities via the injected [`BehaviorPolicy`].
pub struct UpdateVelocitySystem<B: BehaviorPolicy> {
    behavior: B,
    buf: Vec<EntityId>,
}

impl<B: BehaviorPolicy> UpdateVelocitySystem<B> {
    /// Creates the system around its steering policy.
    pub fn new(behavior: B) -> Self {
        Self {
            behavior,
            buf: Vec::new(),
        }
    }

    /// Runs one steering pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(STEERING, &mut self.buf);
        for &entity in &self.buf {
            let mut unit = *world.get::<Unit>(entity);
            let data = *world.get::<Data>(entity);
            let position = *world.get::<Position>(entity);
            let velocity = *world.get::<Velocity>(entity);

            let steered = self.behavior.steer(&mut unit, &data, position, velocity);

            *world.get_mut::<Unit>(entity) = unit;
            *world.get_mut::<Velocity>(entity) = steered;
        }
    }
}
