use macroquad::prelude::*;
use std::path::PathBuf;

/// Canonical, format-agnostic surface description.
pub struct IrSurface {
    pub width: i32,
    pub height: i32,
    pub default_tileset: String,
    pub tilesets: Vec<IrTileset>,
    pub layers: Vec<IrLayer>, // draw order: array order
}

/// One image atlas with a regular grid.
pub struct IrTileset {
    pub name: String,
    pub image: PathBuf, // relative to the surface file
    pub image_w: u32,
    pub image_h: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub spacing: u32, // 0 if not used
    pub margin: u32,  // 0 if not used
}

pub struct IrLayer {
    pub name: String,
    pub tileset: Option<String>,
    pub visible: bool,
    pub opacity: f32,
    pub offset: Vec2, // pixel offset for this layer
    pub render_scale: f32,
    pub smooth_view: Option<f32>,         // speed when enabled
    pub smooth_render_scale: Option<f32>, // speed when enabled
    pub view_lock: Option<String>,        // master layer name
    pub input_tile_size: Option<Vec2>,
    /// Row-major tiles; empty when the layer starts blank.
    pub tiles: Vec<IrTile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrTile {
    pub index: i32, // -1 = empty
    pub flip_h: bool,
    pub flip_v: bool,
}
