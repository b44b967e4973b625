//! # Pluggable Policies
//!
//! The core pipeline fixes *when* things happen; these traits decide
//! *what*: how a fresh unit is classified and statted, and how a live
//! unit steers. Both draw exclusively from the owning unit's RNG stream,
//! so swapping policies never touches determinism machinery - a policy
//! that draws the same sequence produces the same run, bit for bit.

use valhalla_core::{draw, Vec2};

use crate::components::{Damage, Data, Health, Position, Unit, UnitKind, Velocity};

/// Everything the spawn system attaches to a classified unit.
#[derive(Clone, Copy, Debug)]
pub struct UnitSpawn {
    /// Classification, realized as a marker component.
    pub kind: UnitKind,
    /// Starting hit points.
    pub health: Health,
    /// Combat stats.
    pub damage: Damage,
    /// Placement on the plane.
    pub position: Position,
    /// Initial velocity.
    pub velocity: Velocity,
}

/// Classifies and equips a freshly spawned unit.
///
/// Runs once per unit, inside the spawn system, after `spawn_tick` has
/// been stamped. Any randomness must come from `unit`'s stream via
/// [`valhalla_core::draw`].
pub trait SpawnPolicy {
    /// Produces the full starting state for `unit`.
    fn spawn(&self, unit: &mut Unit, data: &Data) -> UnitSpawn;
}

/// Recomputes a live unit's velocity each tick.
///
/// Runs after movement in the pipeline, so the velocity produced here is
/// applied on the *next* tick.
pub trait BehaviorPolicy {
    /// Returns the unit's new velocity.
    fn steer(&self, unit: &mut Unit, data: &Data, position: Position, velocity: Velocity)
        -> Velocity;
}

/// Default spawner: uniform kind classification, fixed per-kind stat
/// table, uniform placement on the arena grid.
#[derive(Clone, Copy, Debug)]
pub struct ArenaSpawnPolicy {
    /// Arena width in world units.
    pub width: u32,
    /// Arena height in world units.
    pub height: u32,
}

impl SpawnPolicy for ArenaSpawnPolicy {
    fn spawn(&self, unit: &mut Unit, _data: &Data) -> UnitSpawn {
        // Draw order is part of the unit's deterministic history:
        // kind, x, y. Reordering these changes every downstream draw.
        let kind = match draw(unit.seed, &mut unit.counter, 3) {
            0 => UnitKind::Npc,
            1 => UnitKind::Hero,
            _ => UnitKind::Monster,
        };
        let x = draw(unit.seed, &mut unit.counter, self.width);
        let y = draw(unit.seed, &mut unit.counter, self.height);

        let (health, damage) = match kind {
            // NPCs never attack: cooldown 0 opts out of the attack system.
            UnitKind::Npc => (
                Health { hp: 60 },
                Damage {
                    attack: 4,
                    defence: 2,
                    cooldown: 0,
                },
            ),
            UnitKind::Hero => (
                Health { hp: 100 },
                Damage {
                    attack: 12,
                    defence: 4,
                    cooldown: 4,
                },
            ),
            UnitKind::Monster => (
                Health { hp: 80 },
                Damage {
                    attack: 8,
                    defence: 1,
                    cooldown: 3,
                },
            ),
        };

        #[allow(clippy::cast_precision_loss)]
        let position = Position {
            v: Vec2::new(x as f32, y as f32),
        };

        UnitSpawn {
            kind,
            health,
            damage,
            position,
            velocity: Velocity { v: Vec2::ZERO },
        }
    }
}

/// Default steering: hold course, and on a fixed interval re-draw one of
/// the eight compass directions from the unit's stream.
#[derive(Clone, Copy, Debug)]
pub struct WanderBehavior {
    /// Displacement per tick while moving.
    pub speed: f32,
    /// Ticks between direction re-draws.
    pub redirect_interval: i64,
}

/// The eight compass directions, unit length.
const COMPASS: [Vec2; 8] = {
    let d = std::f32::consts::FRAC_1_SQRT_2;
    [
        Vec2::new(1.0, 0.0),
        Vec2::new(d, d),
        Vec2::new(0.0, 1.0),
        Vec2::new(-d, d),
        Vec2::new(-1.0, 0.0),
        Vec2::new(-d, -d),
        Vec2::new(0.0, -1.0),
        Vec2::new(d, -d),
    ]
};

impl BehaviorPolicy for WanderBehavior {
    fn steer(
        &self,
        unit: &mut Unit,
        data: &Data,
        _position: Position,
        velocity: Velocity,
    ) -> Velocity {
        let age = data.tick - unit.spawn_tick;
        if self.redirect_interval <= 0 || age % self.redirect_interval != 0 {
            return velocity;
        }
        let dir = COMPASS[draw(unit.seed, &mut unit.counter, 8) as usize];
        Velocity {
            v: dir.scale(self.speed),
        }
    }
}
