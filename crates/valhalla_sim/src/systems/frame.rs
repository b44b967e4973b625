//! # Frame Systems
//!
//! Render emission, sprite derivation and the end-of-tick data refresh.
//!
//! `UpdateDataSystem` must run last: every other system reads `Data.tick`
//! as "the previous tick", and bumping it mid-pass would split the tick's
//! view of time.

use valhalla_core::{EntityId, Filter, World};

use crate::components::{
    Data, Dead, Hero, Monster, Npc, Position, Spawn, Sprite, SpriteKind, Unit,
};
use crate::render::RenderSink;

/// Everything the sink can draw.
const RENDERABLE: Filter = Filter::new()
    .with::<Position>()
    .with::<Sprite>()
    .with::<Unit>()
    .with::<Data>();

/// Everything carrying tick context.
const TICKED: Filter = Filter::new().with::<Data>();

/// Emits one render tuple per renderable entity. World-read-only.
pub struct RenderSystem<F: RenderSink> {
    sink: F,
    buf: Vec<EntityId>,
}

impl<F: RenderSink> RenderSystem<F> {
    /// Creates the system around its output sink.
    pub fn new(sink: F) -> Self {
        Self {
            sink,
            buf: Vec::new(),
        }
    }

    /// Borrows the sink (harness/test inspection).
    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Mutably borrows the sink.
    pub fn sink_mut(&mut self) -> &mut F {
        &mut self.sink
    }

    /// Runs one emission pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(RENDERABLE, &mut self.buf);
        for &entity in &self.buf {
            self.sink.write(
                *world.get::<Position>(entity),
                *world.get::<Sprite>(entity),
                *world.get::<Unit>(entity),
                *world.get::<Data>(entity),
            );
        }
    }
}

/// Derives `Sprite.character` from entity state.
///
/// Five disjoint filters, evaluated in precedence order:
/// Spawn > Grave > NPC/Hero/Monster. An entity matches exactly one by
/// construction (Spawn and Dead are mutually exclusive, kind tags are
/// assigned once and the kind passes exclude both transient tags).
#[derive(Default)]
pub struct SpriteSystem {
    buf: Vec<EntityId>,
}

/// The five disjoint sprite filters with the character each assigns.
const SPRITE_PASSES: [(Filter, SpriteKind); 5] = [
    (
        Filter::new().with::<Sprite>().with::<Spawn>(),
        SpriteKind::Spawn,
    ),
    (
        Filter::new().with::<Sprite>().with::<Dead>(),
        SpriteKind::Grave,
    ),
    (
        Filter::new()
            .with::<Sprite>()
            .with::<Npc>()
            .without::<Spawn>()
            .without::<Dead>(),
        SpriteKind::Npc,
    ),
    (
        Filter::new()
            .with::<Sprite>()
            .with::<Hero>()
            .without::<Spawn>()
            .without::<Dead>(),
        SpriteKind::Hero,
    ),
    (
        Filter::new()
            .with::<Sprite>()
            .with::<Monster>()
            .without::<Spawn>()
            .without::<Dead>(),
        SpriteKind::Monster,
    ),
];

impl SpriteSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one sprite-derivation pass.
    pub fn run(&mut self, world: &mut World) {
        for (filter, character) in SPRITE_PASSES {
            world.select(filter, &mut self.buf);
            for &entity in &self.buf {
                world.get_mut::<Sprite>(entity).character = character;
            }
        }
    }
}

/// Bumps every entity's tick copy. Runs last in the pipeline.
#[derive(Default)]
pub struct UpdateDataSystem {
    buf: Vec<EntityId>,
}

impl UpdateDataSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one refresh pass.
    pub fn run(&mut self, world: &mut World) {
        world.select(TICKED, &mut self.buf);
        for &entity in &self.buf {
            world.get_mut::<Data>(entity).tick += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{register_all, Health};
    use crate::render::{FrameBuffer, NullSink};
    use valhalla_core::Vec2;

    fn world() -> World {
        let mut w = World::new();
        register_all(&mut w);
        w
    }

    fn sprited_unit(w: &mut World, id: u32) -> EntityId {
        let e = w.new_entity();
        w.add(
            e,
            Unit {
                id,
                ..Unit::default()
            },
        );
        w.add(e, Data { tick: 3 });
        w.add(
            e,
            Position {
                v: Vec2::new(f32::from(u16::try_from(id).expect("small id")), 0.0),
            },
        );
        w.add(e, Sprite::default());
        e
    }

    #[test]
    fn test_sprite_precedence() {
        let mut w = world();

        let spawning = sprited_unit(&mut w, 0);
        w.add(spawning, Spawn);
        w.add(spawning, Npc);

        let grave = sprited_unit(&mut w, 1);
        w.add(grave, Dead);
        w.add(grave, Hero);

        let npc = sprited_unit(&mut w, 2);
        w.add(npc, Npc);
        let hero = sprited_unit(&mut w, 3);
        w.add(hero, Hero);
        let monster = sprited_unit(&mut w, 4);
        w.add(monster, Monster);

        SpriteSystem::new().run(&mut w);

        assert_eq!(w.get::<Sprite>(spawning).character, SpriteKind::Spawn);
        assert_eq!(w.get::<Sprite>(grave).character, SpriteKind::Grave);
        assert_eq!(w.get::<Sprite>(npc).character, SpriteKind::Npc);
        assert_eq!(w.get::<Sprite>(hero).character, SpriteKind::Hero);
        assert_eq!(w.get::<Sprite>(monster).character, SpriteKind::Monster);
    }

    #[test]
    fn test_render_emits_graves_but_not_bare_entities() {
        let mut w = world();
        let unit = sprited_unit(&mut w, 7);
        w.add(unit, Dead);

        // An attack entity has no sprite/position: never rendered.
        let attack = w.new_entity();
        w.add(attack, Data { tick: 3 });

        let mut render = RenderSystem::new(FrameBuffer::new(16, 16));
        render.run(&mut w);

        assert_eq!(render.sink().cell(7, 0).unit_id, 7);
        assert_eq!(render.sink().cell(7, 0).tick, 3);
    }

    #[test]
    fn test_update_data_bumps_every_holder() {
        let mut w = world();
        let a = sprited_unit(&mut w, 0);
        let b = w.new_entity();
        w.add(b, Data { tick: 9 });
        let unticked = w.new_entity();
        w.add(unticked, Health { hp: 1 });

        let mut update = UpdateDataSystem::new();
        update.run(&mut w);

        assert_eq!(w.get::<Data>(a).tick, 4);
        assert_eq!(w.get::<Data>(b).tick, 10);

        let mut render = RenderSystem::new(NullSink);
        render.run(&mut w); // still nothing to draw for `unticked`; no panic
    }
}
