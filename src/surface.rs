use macroquad::prelude::*;

use crate::layer::TileLayer;
use crate::movement::TileMovement;
use crate::tile::TileRenderData;
use crate::tileset::{TilesetMetadata, TilesetProvider};
use crate::view::{smooth_towards, smooth_view};

/// An ordered stack of equally sized tile layers; index 0 is drawn first.
///
/// Every coordinate-space operation is bounds-safe: out-of-range reads return
/// [`TileRenderData::EMPTY`] and out-of-range writes are ignored.
#[derive(Debug, Clone)]
pub struct TilesetSurface {
    layers: Vec<TileLayer>,
    width: i32,
    height: i32,
    default_tileset: String,
}

impl TilesetSurface {
    pub fn new(width: i32, height: i32) -> Self {
        TilesetSurface {
            layers: Vec::new(),
            width: width.max(0),
            height: height.max(0),
            default_tileset: String::new(),
        }
    }

    /// Replaces all layers with `layer_count` fresh ones.
    pub fn initialize(&mut self, layer_count: usize) {
        log::debug!(
            "initializing {}x{} surface with {layer_count} layers",
            self.width,
            self.height
        );
        self.layers = (0..layer_count)
            .map(|_| TileLayer::new(self.width, self.height))
            .collect();
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&TileLayer> {
        self.layers.get(index)
    }

    /// Mutable access for settings that are not camera related. Camera
    /// offsets go through the surface so view locks stay in sync.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut TileLayer> {
        self.layers.get_mut(index)
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn default_tileset(&self) -> &str {
        &self.default_tileset
    }

    pub fn set_default_tileset(&mut self, name: impl Into<String>) {
        self.default_tileset = name.into();
    }

    /// Tileset a layer draws with: its own binding, or the surface default.
    pub fn resolved_tileset_name(&self, layer: usize) -> Option<&str> {
        let layer = self.layers.get(layer)?;
        Some(layer.tileset_name().unwrap_or(&self.default_tileset))
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn get_tile(&self, layer: usize, x: i32, y: i32) -> TileRenderData {
        match self.layers.get(layer) {
            Some(l) if self.in_bounds(x, y) => l.get_tile(x, y),
            _ => TileRenderData::EMPTY,
        }
    }

    pub fn set_tile(&mut self, layer: usize, x: i32, y: i32, data: TileRenderData) {
        if !self.in_bounds(x, y) {
            return;
        }
        if let Some(l) = self.layers.get_mut(layer) {
            l.set_tile(x, y, data);
        }
    }

    /// Clears every tile on a layer without touching its settings.
    pub fn clear_layer(&mut self, layer: usize) {
        if let Some(l) = self.layers.get_mut(layer) {
            l.clear();
        }
    }

    /// Queues a tile move. The tile is picked up on the next
    /// [`process_movements`](Self::process_movements) tick.
    ///
    /// Returns `false`, changing nothing, when the layer or either endpoint is
    /// out of range or the source cell is empty.
    pub fn enqueue_move(
        &mut self,
        layer: usize,
        source: IVec2,
        destination: IVec2,
        duration: f32,
        bounce: bool,
    ) -> bool {
        if !self.in_bounds(source.x, source.y) || !self.in_bounds(destination.x, destination.y) {
            return false;
        }
        let Some(l) = self.layers.get_mut(layer) else {
            return false;
        };
        if l.get_tile(source.x, source.y).is_empty() {
            return false;
        }

        l.movements
            .pending
            .push_back(TileMovement::new(layer, source, destination, duration, bounce));
        true
    }

    /// Advances every layer's movements by `dt` seconds.
    pub fn process_movements(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        for layer in &mut self.layers {
            layer.process_movements(dt);
        }
    }

    pub fn has_active_movements(&self) -> bool {
        self.layers.iter().any(|l| !l.movements.is_empty())
    }

    /// Pending plus in-flight movements on a layer.
    pub fn movement_count(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, |l| l.movements.len())
    }

    /// One frame of simulation: movements first, then camera and scale smoothing.
    pub fn update<P: TilesetProvider>(&mut self, dt: f32, tilesets: &P, global_scale: f32) {
        self.process_movements(dt);
        self.update_smoothing(dt, tilesets, global_scale);
    }

    /// Eases render scales and view offsets toward their targets on layers
    /// with smoothing enabled, then copies each master's camera onto its
    /// followers.
    pub fn update_smoothing<P: TilesetProvider>(
        &mut self,
        dt: f32,
        tilesets: &P,
        global_scale: f32,
    ) {
        if !(dt > 0.0) {
            return;
        }

        for i in 0..self.layers.len() {
            let tile_size = self
                .resolved_tileset_name(i)
                .and_then(|name| tilesets.tileset(name))
                .map(|ts| ts.tile_size());
            let layer = &mut self.layers[i];

            if layer.smooth_render_scale {
                layer.render_scale = smooth_towards(
                    layer.render_scale,
                    layer.render_scale_target,
                    layer.smooth_render_scale_speed,
                    dt,
                );
            }

            if !layer.smooth_view {
                continue;
            }
            // Without a tileset there is no pixel size to blend in; snap instead.
            let Some(tile_size) = tile_size else {
                layer.view_tile_offset = layer.view_tile_offset_target;
                layer.view_pixel_offset = layer.view_pixel_offset_target;
                continue;
            };
            let scaled = tile_size * global_scale * layer.render_scale;
            (layer.view_tile_offset, layer.view_pixel_offset) = smooth_view(
                layer.view_tile_offset,
                layer.view_pixel_offset,
                layer.view_tile_offset_target,
                layer.view_pixel_offset_target,
                scaled,
                layer.smooth_view_speed,
                dt,
            );
        }

        for i in 0..self.layers.len() {
            if self.layers[i].smooth_view && self.layers[i].view_master.is_none() {
                self.sync_followers(i, true);
            }
        }
    }

    /// Sets where a layer's camera should scroll to, in whole tiles. Applies
    /// immediately unless view smoothing is enabled.
    pub fn set_view_tile_offset_target(&mut self, layer: usize, target: Vec2) {
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        l.view_tile_offset_target = target;
        let immediate = !l.smooth_view;
        if immediate {
            l.view_tile_offset = target;
        }
        self.sync_followers(layer, immediate);
    }

    pub fn set_view_pixel_offset_target(&mut self, layer: usize, target: Vec2) {
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        l.view_pixel_offset_target = target;
        let immediate = !l.smooth_view;
        if immediate {
            l.view_pixel_offset = target;
        }
        self.sync_followers(layer, immediate);
    }

    /// Jumps a layer's camera to `offset` tiles, cancelling any smoothing.
    pub fn set_view_tile_offset(&mut self, layer: usize, offset: Vec2) {
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        l.view_tile_offset = offset;
        l.view_tile_offset_target = offset;
        self.sync_followers(layer, true);
    }

    pub fn set_view_pixel_offset(&mut self, layer: usize, offset: Vec2) {
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        l.view_pixel_offset = offset;
        l.view_pixel_offset_target = offset;
        self.sync_followers(layer, true);
    }

    pub fn set_smooth_view(&mut self, layer: usize, enabled: bool, speed: f32) {
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        l.smooth_view = enabled;
        l.smooth_view_speed = speed;
        if !enabled {
            l.view_tile_offset = l.view_tile_offset_target;
            l.view_pixel_offset = l.view_pixel_offset_target;
            self.sync_followers(layer, true);
        }
    }

    /// Makes `follower` copy `master`'s camera. Rejected when either index is
    /// out of range, they are the same layer, `master` itself follows another
    /// layer, or `follower` already leads others: locks are one level deep.
    pub fn set_layer_view_lock(&mut self, master: usize, follower: usize) -> bool {
        if master == follower || master >= self.layers.len() || follower >= self.layers.len() {
            log::debug!("view lock {follower} -> {master} rejected: bad layer index");
            return false;
        }
        if self.layers[master].view_master.is_some() {
            log::debug!("view lock {follower} -> {master} rejected: master is itself locked");
            return false;
        }
        if self.layers.iter().any(|l| l.view_master == Some(follower)) {
            log::debug!("view lock {follower} -> {master} rejected: follower leads other layers");
            return false;
        }

        self.layers[follower].view_master = Some(master);
        let m = &self.layers[master];
        let (tile, tile_t, px, px_t) = (
            m.view_tile_offset,
            m.view_tile_offset_target,
            m.view_pixel_offset,
            m.view_pixel_offset_target,
        );
        let f = &mut self.layers[follower];
        f.view_tile_offset = tile;
        f.view_tile_offset_target = tile_t;
        f.view_pixel_offset = px;
        f.view_pixel_offset_target = px_t;
        true
    }

    pub fn clear_layer_view_lock(&mut self, follower: usize) {
        if let Some(l) = self.layers.get_mut(follower) {
            l.view_master = None;
        }
    }

    /// Copies `master`'s view targets, and its immediate offsets when
    /// `immediate`, onto every layer locked to it.
    fn sync_followers(&mut self, master: usize, immediate: bool) {
        let m = &self.layers[master];
        let (tile, tile_t, px, px_t) = (
            m.view_tile_offset,
            m.view_tile_offset_target,
            m.view_pixel_offset,
            m.view_pixel_offset_target,
        );
        for f in self
            .layers
            .iter_mut()
            .filter(|l| l.view_master == Some(master))
        {
            f.view_tile_offset_target = tile_t;
            f.view_pixel_offset_target = px_t;
            if immediate {
                f.view_tile_offset = tile;
                f.view_pixel_offset = px;
            }
        }
    }
}
