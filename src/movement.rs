use macroquad::prelude::*;
use std::collections::VecDeque;

use crate::tile::TileRenderData;

/// Durations at or below this are treated as instantaneous.
pub const MIN_MOVE_DURATION: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    /// Queued, waiting for the next tick to claim its cells.
    Pending,
    /// Travelling from source to destination.
    Active,
    /// Bounce leg travelling back from destination to source.
    Returning,
    Completed,
}

/// One tile travelling between two cells of a layer.
#[derive(Debug, Clone)]
pub struct TileMovement {
    pub layer_index: usize,
    pub source: Vec2,
    pub destination: Vec2,
    pub bounce: bool,
    pub duration: f32,
    pub elapsed: f32,
    pub carried_tile: TileRenderData,
    pub destination_snapshot: TileRenderData,
    pub state: MovementState,
}

impl TileMovement {
    pub fn new(
        layer_index: usize,
        source: IVec2,
        destination: IVec2,
        duration: f32,
        bounce: bool,
    ) -> Self {
        TileMovement {
            layer_index,
            source: source.as_vec2(),
            destination: destination.as_vec2(),
            bounce,
            duration,
            elapsed: 0.0,
            carried_tile: TileRenderData::EMPTY,
            destination_snapshot: TileRenderData::EMPTY,
            state: MovementState::Pending,
        }
    }

    #[inline]
    pub fn source_tile(&self) -> (i32, i32) {
        (self.source.x as i32, self.source.y as i32)
    }

    #[inline]
    pub fn destination_tile(&self) -> (i32, i32) {
        (self.destination.x as i32, self.destination.y as i32)
    }

    /// Progress of the current leg in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let duration = self.duration.max(MIN_MOVE_DURATION);
        (self.elapsed / duration).clamp(0.0, 1.0)
    }

    /// Continuous display position in tile units. Only the renderer uses this;
    /// the grid itself holds empty cells while the tile is in flight.
    pub fn tile_position(&self) -> Vec2 {
        let t = self.progress();
        if self.bounce && self.state == MovementState::Returning {
            self.destination.lerp(self.source, t)
        } else {
            self.source.lerp(self.destination, t)
        }
    }
}

/// Per-layer queue of movements: FIFO of pending requests plus the in-flight set.
#[derive(Debug, Clone, Default)]
pub struct TileMovementQueue {
    pub(crate) pending: VecDeque<TileMovement>,
    pub(crate) active: Vec<TileMovement>,
}

impl TileMovementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> impl Iterator<Item = &TileMovement> {
        self.pending.iter()
    }

    pub fn active(&self) -> &[TileMovement] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn position_interpolates_linearly() {
        let mut m = TileMovement::new(0, ivec2(0, 0), ivec2(4, 0), 1.0, false);
        m.state = MovementState::Active;
        m.elapsed = 0.5;
        assert!(approx(m.tile_position(), vec2(2.0, 0.0)));
    }

    #[test]
    fn returning_leg_runs_backwards() {
        let mut m = TileMovement::new(0, ivec2(0, 0), ivec2(4, 0), 1.0, true);
        m.state = MovementState::Returning;
        m.elapsed = 0.25;
        assert!(approx(m.tile_position(), vec2(3.0, 0.0)));
    }

    #[test]
    fn progress_clamps_and_survives_zero_duration() {
        let mut m = TileMovement::new(0, ivec2(1, 1), ivec2(2, 1), 0.0, false);
        m.elapsed = 0.0;
        assert_eq!(m.progress(), 0.0);
        m.elapsed = 5.0;
        assert_eq!(m.progress(), 1.0);
        assert!(approx(m.tile_position(), vec2(2.0, 1.0)));
    }
}
