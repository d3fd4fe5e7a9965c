use macroquad::prelude::*;
use std::collections::HashMap;

use crate::movement::{MovementState, TileMovementQueue};
use crate::spatial::index::{rel, tile_to_chunk, ChunkCoord, TileChunk};
use crate::tile::TileRenderData;

pub const DEFAULT_SMOOTH_SPEED: f32 = 10.0;

/// One surface-sized plane of tiles, stored sparsely in chunks, with its own
/// camera, scale, opacity and tileset binding.
#[derive(Debug, Clone)]
pub struct TileLayer {
    chunks: HashMap<ChunkCoord, TileChunk>,
    width: i32,
    height: i32,

    pub(crate) view_tile_offset: Vec2,
    pub(crate) view_tile_offset_target: Vec2,
    pub(crate) view_pixel_offset: Vec2,
    pub(crate) view_pixel_offset_target: Vec2,
    pub(crate) smooth_view: bool,
    pub(crate) smooth_view_speed: f32,
    pub(crate) view_master: Option<usize>,

    pub(crate) render_scale: f32,
    pub(crate) render_scale_target: f32,
    pub(crate) smooth_render_scale: bool,
    pub(crate) smooth_render_scale_speed: f32,

    pixel_offset: Vec2,
    opacity: f32,
    visible: bool,
    tileset_name: Option<String>,
    input_tile_size: Option<Vec2>,

    pub(crate) movements: TileMovementQueue,
}

impl TileLayer {
    pub fn new(width: i32, height: i32) -> Self {
        TileLayer {
            chunks: HashMap::new(),
            width,
            height,
            view_tile_offset: Vec2::ZERO,
            view_tile_offset_target: Vec2::ZERO,
            view_pixel_offset: Vec2::ZERO,
            view_pixel_offset_target: Vec2::ZERO,
            smooth_view: false,
            smooth_view_speed: DEFAULT_SMOOTH_SPEED,
            view_master: None,
            render_scale: 1.0,
            render_scale_target: 1.0,
            smooth_render_scale: false,
            smooth_render_scale_speed: DEFAULT_SMOOTH_SPEED,
            pixel_offset: Vec2::ZERO,
            opacity: 1.0,
            visible: true,
            tileset_name: None,
            input_tile_size: None,
            movements: TileMovementQueue::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Reads a tile; unallocated cells read as [`TileRenderData::EMPTY`].
    pub fn get_tile(&self, x: i32, y: i32) -> TileRenderData {
        let (lx, ly) = rel(x, y);
        match self.chunks.get(&tile_to_chunk(x, y)) {
            Some(chunk) => chunk.get(lx, ly),
            None => TileRenderData::EMPTY,
        }
    }

    /// Writes a tile, allocating its chunk on the first non-empty write.
    /// Empty writes never allocate.
    pub fn set_tile(&mut self, x: i32, y: i32, data: TileRenderData) {
        let cc = tile_to_chunk(x, y);
        let (lx, ly) = rel(x, y);

        if data.is_empty() {
            if let Some(chunk) = self.chunks.get_mut(&cc) {
                chunk.set(lx, ly, data);
            }
            return;
        }

        let chunk = self.chunks.entry(cc).or_insert_with(|| {
            log::trace!("allocating chunk ({}, {})", cc.x, cc.y);
            TileChunk::new()
        });
        chunk.set(lx, ly, data);
    }

    /// Allocated chunks whose coordinates fall inside the tile rectangle
    /// `[min, max]`, ordered row by row.
    pub fn chunks_in_range(
        &self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    ) -> Vec<(ChunkCoord, &TileChunk)> {
        let lo = tile_to_chunk(min_x, min_y);
        let hi = tile_to_chunk(max_x, max_y);

        let mut chunks: Vec<_> = self
            .chunks
            .iter()
            .filter(|(c, _)| c.x >= lo.x && c.x <= hi.x && c.y >= lo.y && c.y <= hi.y)
            .map(|(c, chunk)| (*c, chunk))
            .collect();
        chunks.sort_unstable_by_key(|(c, _)| (c.y, c.x));
        chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Clears every allocated cell. Chunks stay allocated.
    pub fn clear(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.clear();
        }
    }

    pub fn view_tile_offset(&self) -> Vec2 {
        self.view_tile_offset
    }

    pub fn view_tile_offset_target(&self) -> Vec2 {
        self.view_tile_offset_target
    }

    pub fn view_pixel_offset(&self) -> Vec2 {
        self.view_pixel_offset
    }

    pub fn view_pixel_offset_target(&self) -> Vec2 {
        self.view_pixel_offset_target
    }

    pub fn smooth_view_enabled(&self) -> bool {
        self.smooth_view
    }

    pub fn smooth_view_speed(&self) -> f32 {
        self.smooth_view_speed
    }

    /// Layer this one follows for its camera, if any.
    pub fn view_master(&self) -> Option<usize> {
        self.view_master
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    pub fn render_scale_target(&self) -> f32 {
        self.render_scale_target
    }

    pub fn smooth_render_scale_enabled(&self) -> bool {
        self.smooth_render_scale
    }

    pub fn smooth_render_scale_speed(&self) -> f32 {
        self.smooth_render_scale_speed
    }

    /// Sets the scale immediately, cancelling any smoothing in progress.
    pub fn set_render_scale(&mut self, scale: f32) {
        self.render_scale = scale;
        self.render_scale_target = scale;
    }

    pub fn set_render_scale_target(&mut self, scale: f32) {
        self.render_scale_target = scale;
        if !self.smooth_render_scale {
            self.render_scale = scale;
        }
    }

    pub fn set_smooth_render_scale(&mut self, enabled: bool, speed: f32) {
        self.smooth_render_scale = enabled;
        self.smooth_render_scale_speed = speed;
        if !enabled {
            self.render_scale = self.render_scale_target;
        }
    }

    pub fn pixel_offset(&self) -> Vec2 {
        self.pixel_offset
    }

    pub fn set_pixel_offset(&mut self, offset: Vec2) {
        self.pixel_offset = offset;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn tileset_name(&self) -> Option<&str> {
        self.tileset_name.as_deref()
    }

    pub fn set_tileset_name(&mut self, name: Option<String>) {
        self.tileset_name = name;
    }

    /// Pixel size used for hit-testing instead of the tileset's own tile size.
    pub fn input_tile_size(&self) -> Option<Vec2> {
        self.input_tile_size
    }

    pub fn set_input_tile_size(&mut self, size: Option<Vec2>) {
        self.input_tile_size = size;
    }

    pub fn movements(&self) -> &TileMovementQueue {
        &self.movements
    }

    /// Activates pending movements and advances the active ones by `dt`.
    pub(crate) fn process_movements(&mut self, dt: f32) {
        while let Some(mut m) = self.movements.pending.pop_front() {
            let (sx, sy) = m.source_tile();
            let (dx, dy) = m.destination_tile();

            let carried = self.get_tile(sx, sy);
            if carried.is_empty() {
                log::debug!(
                    "dropping move ({sx}, {sy}) -> ({dx}, {dy}) on layer {}: source emptied",
                    m.layer_index
                );
                continue;
            }

            m.carried_tile = carried;
            m.destination_snapshot = self.get_tile(dx, dy);
            // The tile is only drawn by the movement overlay while in flight.
            self.set_tile(sx, sy, TileRenderData::EMPTY);
            self.set_tile(dx, dy, TileRenderData::EMPTY);
            m.state = MovementState::Active;
            log::debug!(
                "move ({sx}, {sy}) -> ({dx}, {dy}) on layer {} active",
                m.layer_index
            );
            self.movements.active.push(m);
        }

        let mut active = std::mem::take(&mut self.movements.active);
        active.retain_mut(|m| {
            m.elapsed += dt;
            if m.elapsed < m.duration {
                return true;
            }

            let (sx, sy) = m.source_tile();
            let (dx, dy) = m.destination_tile();
            match (m.bounce, m.state) {
                (true, MovementState::Active) => {
                    m.state = MovementState::Returning;
                    m.elapsed = 0.0;
                    true
                }
                (true, _) => {
                    self.set_tile(sx, sy, m.carried_tile);
                    self.set_tile(dx, dy, m.destination_snapshot);
                    m.state = MovementState::Completed;
                    log::debug!("bounce ({sx}, {sy}) <-> ({dx}, {dy}) completed");
                    false
                }
                (false, _) => {
                    self.set_tile(dx, dy, m.carried_tile);
                    m.state = MovementState::Completed;
                    log::debug!("move ({sx}, {sy}) -> ({dx}, {dy}) completed");
                    false
                }
            }
        });
        self.movements.active = active;
    }
}
