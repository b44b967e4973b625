//! # Simulation Components
//!
//! Pure data, one pool per type. Component IDs are the bitmask bits used
//! by every filter in the pipeline; they are assigned once here and never
//! reused.
//!
//! Tags (`Spawn`, `Dead`, `Npc`, `Hero`, `Monster`) carry no payload and
//! replace what an object-oriented design would model as subclassing:
//! unit "kind" is a marker component queried by filters, never a vtable.

use valhalla_core::{Component, EntityId, Vec2};

/// A unit's identity and deterministic RNG stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unit {
    /// Stable display identity. Respawn derives a new one from the old
    /// ID and the respawn tick so generations stay distinguishable.
    pub id: u32,
    /// Base seed of this unit's random stream.
    pub seed: u32,
    /// Number of draws taken from the stream. Mutated on every draw,
    /// monotonically non-decreasing, part of the deterministic state.
    pub counter: u32,
    /// Tick this unit finished spawning on.
    pub spawn_tick: i64,
    /// Tick a dead unit becomes eligible for respawn.
    pub respawn_tick: i64,
}

impl Component for Unit {
    const ID: u8 = 0;
}

/// Per-entity copy of the simulation tick.
///
/// Refreshed by the last system each tick, so systems 1-9 always observe
/// the previous tick's value without any global lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Data {
    /// The tick value this entity last observed.
    pub tick: i64,
}

impl Component for Data {
    const ID: u8 = 1;
}

/// Position on the simulation plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// World-space coordinates.
    pub v: Vec2,
}

impl Component for Position {
    const ID: u8 = 2;
}

/// Velocity applied by the movement system (one Euler step per tick).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Displacement per tick.
    pub v: Vec2,
}

impl Component for Velocity {
    const ID: u8 = 3;
}

/// Hit points. May go negative between damage resolution and the next
/// kill pass; never clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Health {
    /// Current hit points.
    pub hp: i32,
}

impl Component for Health {
    const ID: u8 = 4;
}

/// Combat stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// Damage dealt per attack.
    pub attack: i32,
    /// Flat reduction applied to incoming attacks.
    pub defence: i32,
    /// Ticks between attacks. Zero or negative means the unit never
    /// attacks.
    pub cooldown: i32,
}

impl Component for Damage {
    const ID: u8 = 5;
}

/// Presentation tag derived from entity state each tick. Never
/// authoritative: dropping and recomputing it changes nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    /// What the render sink should draw for this entity.
    pub character: SpriteKind,
}

impl Component for Sprite {
    const ID: u8 = 6;
}

/// Renderable characters, in sprite-precedence order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SpriteKind {
    /// Entity is still spawning.
    #[default]
    Spawn,
    /// Entity is dead and awaiting respawn.
    Grave,
    /// Live NPC.
    Npc,
    /// Live hero.
    Hero,
    /// Live monster.
    Monster,
}

/// Tag: newly created, pending initialization. Removed by the spawn
/// system within the tick it is processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spawn;

impl Component for Spawn {
    const ID: u8 = 7;
}

/// Tag: non-simulating. Excluded from movement/attack/velocity queries
/// but still rendered (as a grave) until replaced by a respawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dead;

impl Component for Dead {
    const ID: u8 = 8;
}

/// An in-flight attack, modeled as its own transient entity.
///
/// `target` is a stable reference: by the time the attack lands, the
/// target may be dead or its slot recycled for a different unit, and
/// resolution must detect both instead of damaging a stranger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attack {
    /// Stable reference to the targeted entity.
    pub target: EntityId,
    /// Damage carried, captured from the attacker at creation time.
    pub damage: i32,
    /// Remaining flight time in ticks.
    pub ticks: i32,
}

impl Component for Attack {
    const ID: u8 = 9;
}

/// Tag: unit classified as an NPC. Assigned once at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Npc;

impl Component for Npc {
    const ID: u8 = 10;
}

/// Tag: unit classified as a hero. Assigned once at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hero;

impl Component for Hero {
    const ID: u8 = 11;
}

/// Tag: unit classified as a monster. Assigned once at spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Monster;

impl Component for Monster {
    const ID: u8 = 12;
}

/// Mutually exclusive unit classifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Passive bystander; default stats never attack.
    Npc,
    /// Player-shaped combatant.
    Hero,
    /// Hostile combatant.
    Monster,
}

/// Registers every simulation pool on a world. Called once at setup.
pub fn register_all(world: &mut valhalla_core::World) {
    world.register::<Unit>();
    world.register::<Data>();
    world.register::<Position>();
    world.register::<Velocity>();
    world.register::<Health>();
    world.register::<Damage>();
    world.register::<Sprite>();
    world.register::<Spawn>();
    world.register::<Dead>();
    world.register::<Attack>();
    world.register::<Npc>();
    world.register::<Hero>();
    world.register::<Monster>();
}
