//! # Combat Systems
//!
//! Attack creation and damage resolution. Attacks are entities of their
//! own: created when a unit's cooldown elapses, in flight for a
//! distance-derived number of ticks, destroyed on resolution.
//!
//! Targeting determinism: candidates are snapshotted once per tick and
//! sorted by stable display ID before any unit draws an index, so target
//! selection never depends on pool compaction order.

use tracing::trace;
use valhalla_core::{draw, EntityId, Filter, World};

use crate::components::{Attack, Damage, Data, Dead, Health, Position, Spawn, Unit};

/// Units that can fire and be fired upon.
const COMBATANTS: Filter = Filter::new()
    .with::<Unit>()
    .with::<Data>()
    .with::<Damage>()
    .with::<Position>()
    .without::<Spawn>()
    .without::<Dead>();

/// In-flight attack entities.
const IN_FLIGHT: Filter = Filter::new().with::<Attack>();

/// Entities an attack may still damage on arrival.
const VALID_TARGETS: Filter = Filter::new()
    .with::<Health>()
    .with::<Damage>()
    .without::<Dead>();

/// Flight time of an attack between two points.
///
/// One tick per `projectile_speed` world units of straight-line distance,
/// rounded up. Adjacent (or self-targeted) attacks compute to zero and
/// resolve on the next damage pass.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn flight_ticks(from: Position, to: Position, projectile_speed: f32) -> i32 {
    let distance = from.v.distance(to.v);
    (distance / projectile_speed).ceil() as i32
}

/// Creates attack entities for every unit whose cooldown elapsed.
pub struct AttackSystem {
    projectile_speed: f32,
    buf: Vec<EntityId>,
    /// Per-tick target snapshot: (display ID, entity, position).
    targets: Vec<(u32, EntityId, Position)>,
}

impl AttackSystem {
    /// Creates the system with the configured projectile speed.
    #[must_use]
    pub fn new(projectile_speed: f32) -> Self {
        Self {
            projectile_speed,
            buf: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Runs one attack-creation pass.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(&mut self, world: &mut World) {
        world.select(COMBATANTS, &mut self.buf);

        // One shared, ID-sorted candidate snapshot for every firing unit
        // this tick.
        self.targets.clear();
        for &entity in &self.buf {
            let id = world.get::<Unit>(entity).id;
            let position = *world.get::<Position>(entity);
            self.targets.push((id, entity, position));
        }
        self.targets.sort_by_key(|&(id, _, _)| id);

        if self.targets.is_empty() {
            return;
        }
        let candidate_count = self.targets.len() as u32;

        for &entity in &self.buf {
            let damage = *world.get::<Damage>(entity);
            if damage.cooldown <= 0 {
                continue;
            }

            let unit = *world.get::<Unit>(entity);
            let data = *world.get::<Data>(entity);
            if (data.tick - unit.spawn_tick) % i64::from(damage.cooldown) != 0 {
                continue;
            }

            let position = *world.get::<Position>(entity);
            let mut counter = unit.counter;
            let index = draw(unit.seed, &mut counter, candidate_count) as usize;
            world.get_mut::<Unit>(entity).counter = counter;

            let (_, target, target_position) = self.targets[index];
            let attack = world.new_entity();
            world.add(
                attack,
                Attack {
                    target,
                    damage: damage.attack,
                    ticks: flight_ticks(position, target_position, self.projectile_speed),
                },
            );

            trace!(attacker = unit.id, tick = data.tick, "attack created");
        }
    }
}

/// Advances in-flight attacks and resolves the ones that arrive.
#[derive(Default)]
pub struct DamageSystem {
    buf: Vec<EntityId>,
}

impl DamageSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one resolution pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(IN_FLIGHT, &mut self.buf);
        for &entity in &self.buf {
            let attack = world.get_mut::<Attack>(entity);
            let remaining = attack.ticks;
            attack.ticks -= 1;
            if remaining > 0 {
                continue;
            }

            let target = attack.target;
            let attack_damage = attack.damage;
            world.destroy(entity);

            // Stable-reference validation: the target must still be the
            // same logical entity (generation check) and still a valid
            // victim (filter check). Anything else is silently dropped -
            // expected steady state, not an error.
            if !world.matches(VALID_TARGETS, target) {
                trace!("attack discarded: stale target");
                continue;
            }

            let defence = world.get::<Damage>(target).defence;
            world.get_mut::<Health>(target).hp -= attack_damage - defence;
        }
    }
}
