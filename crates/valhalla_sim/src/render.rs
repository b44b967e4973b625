//! # Render Sink
//!
//! The simulation's only output surface. The render system emits one
//! `(position, sprite, unit, data)` tuple per live renderable entity per
//! tick; what happens to it is the sink's business. Sinks are assumed
//! non-blocking - nothing here may stall the tick.

use crate::components::{Data, Position, Sprite, SpriteKind, Unit};

/// Receives one write per live renderable entity per tick.
///
/// Emission order is unspecified; sinks must not infer simulation state
/// from it.
pub trait RenderSink {
    /// Accepts one entity's render tuple.
    fn write(&mut self, position: Position, sprite: Sprite, unit: Unit, data: Data);
}

/// Discards everything. The benchmark sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    #[inline]
    fn write(&mut self, _position: Position, _sprite: Sprite, _unit: Unit, _data: Data) {}
}

/// One framebuffer cell: the last entity drawn into it this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Display ID of the unit occupying the cell, 0 if empty.
    pub unit_id: u32,
    /// Sprite drawn, meaningless while `tick` is stale.
    pub sprite: SpriteKind,
    /// Tick the cell was last written. Stale cells are not cleared
    /// between ticks; readers compare against the current tick instead.
    pub tick: i64,
}

/// A fixed-size grid framebuffer.
///
/// Positions wrap onto the grid, so units wandering off one edge draw on
/// the opposite one. Cells are overwritten in emission order; the buffer
/// is a presentation artifact, not simulation state.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Creates a framebuffer of `width` x `height` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "framebuffer dimensions must be nonzero");
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Cell {
        assert!(x < self.width && y < self.height, "cell out of bounds");
        self.cells[(y * self.width + x) as usize]
    }

    /// Resets every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Wraps a world coordinate onto the grid.
    #[allow(clippy::cast_possible_truncation)]
    fn wrap(value: f32, extent: u32) -> u32 {
        let extent_f = f64::from(extent);
        let wrapped = f64::from(value).rem_euclid(extent_f);
        // rem_euclid output is in [0, extent); the cast cannot truncate
        // out of range.
        (wrapped as u32).min(extent - 1)
    }
}

impl RenderSink for FrameBuffer {
    fn write(&mut self, position: Position, sprite: Sprite, unit: Unit, data: Data) {
        let x = Self::wrap(position.v.x, self.width);
        let y = Self::wrap(position.v.y, self.height);
        self.cells[(y * self.width + x) as usize] = Cell {
            unit_id: unit.id,
            sprite: sprite.character,
            tick: data.tick,
        };
    }
}
