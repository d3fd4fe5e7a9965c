use macroquad::prelude::*;

use crate::layer::TileLayer;
use crate::render::cull::{calculate_visible_tile_range, TileRange};
use crate::render::sink::{DrawSink, TexturedQuad};
use crate::spatial::index::{ChunkCoord, TileChunk, CHUNK_SIZE};
use crate::surface::TilesetSurface;
use crate::tile::TileRenderData;
use crate::tileset::{TilesetMetadata, TilesetProvider};
use crate::view::view_pixels;

/// Insets of the clip rectangle from the surface's screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Where and how large a surface appears on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub position: Vec2,
    pub size: Vec2,
    pub global_scale: f32,
    pub margins: Margins,
}

impl ScreenLayout {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        ScreenLayout {
            position,
            size,
            global_scale: 1.0,
            margins: Margins::default(),
        }
    }

    /// Screen-space clip rectangle after margins.
    pub fn clip_rect(&self) -> Rect {
        let m = self.margins;
        Rect::new(
            self.position.x + m.left,
            self.position.y + m.top,
            (self.size.x - m.left - m.right).max(0.0),
            (self.size.y - m.top - m.bottom).max(0.0),
        )
    }
}

/// Tile size of a layer on screen.
#[inline]
pub fn scaled_tile_size(tile_size: Vec2, global_scale: f32, layer: &TileLayer) -> Vec2 {
    tile_size * global_scale * layer.render_scale()
}

/// Draws the whole surface clipped to its layout, bottom layer first.
pub fn draw_surface<P, S>(surface: &TilesetSurface, tilesets: &P, layout: &ScreenLayout, sink: &mut S)
where
    P: TilesetProvider,
    S: DrawSink,
{
    let clip = layout.clip_rect();
    sink.set_scissor(clip.x as i32, clip.y as i32, clip.w as i32, clip.h as i32);
    sink.push_translation(layout.position);

    for index in 0..surface.layer_count() {
        draw_layer(surface, index, tilesets, layout.global_scale, layout.size, sink);
    }

    sink.pop_translation();
    sink.disable_scissor();
}

/// Draws one layer in surface-local pixels: backgrounds, then tiles, then the
/// tiles currently in flight. `viewport` is the visible size in pixels.
pub fn draw_layer<P, S>(
    surface: &TilesetSurface,
    index: usize,
    tilesets: &P,
    global_scale: f32,
    viewport: Vec2,
    sink: &mut S,
) where
    P: TilesetProvider,
    S: DrawSink,
{
    let Some(layer) = surface.layer(index) else {
        return;
    };
    if !layer.is_visible() {
        return;
    }
    let Some(name) = surface.resolved_tileset_name(index) else {
        return;
    };
    let Some(ts) = tilesets.tileset(name) else {
        log::warn!("layer {index}: tileset '{name}' not found, skipping");
        return;
    };

    let scaled = scaled_tile_size(ts.tile_size(), global_scale, layer);
    let view_px = view_pixels(layer.view_tile_offset(), layer.view_pixel_offset(), scaled);
    let origin = layer.pixel_offset() - view_px;
    let opacity = layer.opacity();
    let depth = index as f32;

    let range = calculate_visible_tile_range(
        Rect::new(-origin.x, -origin.y, viewport.x, viewport.y),
        scaled,
        surface.width(),
        surface.height(),
    );

    if !range.is_empty() {
        let chunks = layer.chunks_in_range(range.min_x, range.min_y, range.max_x - 1, range.max_y - 1);

        for (cc, chunk) in &chunks {
            for (x, y, tile) in visible_cells(*cc, chunk, &range) {
                if tile.background.a > 0.0 {
                    let mut color = tile.background;
                    color.a *= opacity;
                    let pos = vec2(x as f32, y as f32) * scaled + origin;
                    sink.draw_filled_rect(pos, scaled, color);
                }
            }
        }

        for (cc, chunk) in &chunks {
            for (x, y, tile) in visible_cells(*cc, chunk, &range) {
                let pos = vec2(x as f32, y as f32) * scaled + origin;
                if let Some(quad) = tile_quad(ts, tile, pos, scaled, opacity, depth) {
                    sink.draw_textured_quad(quad);
                }
            }
        }
    }

    for m in layer.movements().active() {
        let pos = m.tile_position() * scaled + origin;
        if let Some(quad) = tile_quad(ts, &m.carried_tile, pos, scaled, opacity, depth) {
            sink.draw_textured_quad(quad);
        }
    }
}

fn visible_cells<'c>(
    cc: ChunkCoord,
    chunk: &'c TileChunk,
    range: &'c TileRange,
) -> impl Iterator<Item = (i32, i32, &'c TileRenderData)> + 'c {
    chunk.tiles().filter_map(move |(lx, ly, tile)| {
        let x = cc.x * CHUNK_SIZE + lx as i32;
        let y = cc.y * CHUNK_SIZE + ly as i32;
        range.contains(x, y).then_some((x, y, tile))
    })
}

/// Quad for a tile with a valid index, with flips applied by mirroring UVs
/// and the layer opacity folded into the tile's alpha.
pub fn tile_quad<T: TilesetMetadata>(
    ts: &T,
    tile: &TileRenderData,
    position: Vec2,
    size: Vec2,
    opacity: f32,
    depth: f32,
) -> Option<TexturedQuad> {
    if tile.tile_index < 0 || tile.tile_index as u32 >= ts.tile_count() {
        return None;
    }
    let src = ts.source_rect(tile.tile_index as u32)?;
    let tex = ts.texture_size();
    if tex.x <= 0.0 || tex.y <= 0.0 {
        return None;
    }

    let mut uv = Rect::new(src.x / tex.x, src.y / tex.y, src.w / tex.x, src.h / tex.y);
    if tile.flip.horizontal() {
        uv.x += uv.w;
        uv.w = -uv.w;
    }
    if tile.flip.vertical() {
        uv.y += uv.h;
        uv.h = -uv.h;
    }

    let mut color = tile.foreground;
    color.a *= opacity;

    Some(TexturedQuad {
        texture: ts.texture(),
        position,
        size,
        color,
        rotation: 0.0,
        origin: Vec2::ZERO,
        uv,
        depth,
    })
}
