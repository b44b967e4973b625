//! # The Simulation Pipeline
//!
//! Ten systems, one fixed order, once per tick:
//!
//! spawn -> respawn -> kill -> render -> sprite -> damage -> attack ->
//! movement -> update-velocity -> update-data
//!
//! The order is a hard contract: structural changes made by a system are
//! immediately visible to the systems after it (filters re-snapshot on
//! access), and reordering changes simulation outcomes. There is no
//! scheduler and no events - just an explicit sequence.

mod combat;
mod frame;
mod lifecycle;
mod motion;

pub use combat::{flight_ticks, AttackSystem, DamageSystem};
pub use frame::{RenderSystem, SpriteSystem, UpdateDataSystem};
pub use lifecycle::{KillSystem, RespawnSystem, SpawnSystem};
pub use motion::{MovementSystem, UpdateVelocitySystem};

use valhalla_core::World;

use crate::config::SimConfig;
use crate::policy::{BehaviorPolicy, SpawnPolicy};
use crate::render::RenderSink;

/// The fixed-order system list for one simulation instance.
pub struct Pipeline<F: RenderSink, S: SpawnPolicy, B: BehaviorPolicy> {
    spawn: SpawnSystem<S>,
    respawn: RespawnSystem,
    kill: KillSystem,
    render: RenderSystem<F>,
    sprite: SpriteSystem,
    damage: DamageSystem,
    attack: AttackSystem,
    movement: MovementSystem,
    update_velocity: UpdateVelocitySystem<B>,
    update_data: UpdateDataSystem,
}

impl<F: RenderSink, S: SpawnPolicy, B: BehaviorPolicy> Pipeline<F, S, B> {
    /// Assembles the pipeline from config, sink and policies.
    pub fn new(config: &SimConfig, sink: F, spawner: S, behavior: B) -> Self {
        Self {
            spawn: SpawnSystem::new(spawner),
            respawn: RespawnSystem::new(),
            kill: KillSystem::new(config.respawn_delay),
            render: RenderSystem::new(sink),
            sprite: SpriteSystem::new(),
            damage: DamageSystem::new(),
            attack: AttackSystem::new(config.projectile_speed),
            movement: MovementSystem::new(),
            update_velocity: UpdateVelocitySystem::new(behavior),
            update_data: UpdateDataSystem::new(),
        }
    }

    /// Executes exactly one tick: the full ordered pass.
    pub fn run(&mut self, world: &mut World) {
        self.spawn.run(world);
        self.respawn.run(world);
        self.kill.run(world);
        self.render.run(world);
        self.sprite.run(world);
        self.damage.run(world);
        self.attack.run(world);
        self.movement.run(world);
        self.update_velocity.run(world);
        self.update_data.run(world);
    }

    /// Borrows the render sink.
    pub fn sink(&self) -> &F {
        self.render.sink()
    }

    /// Mutably borrows the render sink.
    pub fn sink_mut(&mut self) -> &mut F {
        self.render.sink_mut()
    }
}
