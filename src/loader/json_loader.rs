// src/loader/json_loader.rs
use crate::error::SurfaceError;
use crate::ir_surface::*;
use crate::spatial::index::{FLIP_D, FLIP_H, FLIP_V, GID_MASK};
use crate::surface::TilesetSurface;
use crate::tile::{TileFlip, TileRenderData};
use crate::tileset::{AtlasTileset, TilesetCatalog};
use crate::render::sink::TextureId;
use crate::layer::DEFAULT_SMOOTH_SPEED;
use macroquad::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tileset: Option<String>,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "one")]
    opacity: f32,
    #[serde(default)]
    offsetx: f32,
    #[serde(default)]
    offsety: f32,
    #[serde(default = "one")]
    render_scale: f32,
    #[serde(default)]
    smooth_view: bool,
    #[serde(default = "default_speed")]
    smooth_view_speed: f32,
    #[serde(default)]
    smooth_render_scale: bool,
    #[serde(default = "default_speed")]
    smooth_render_scale_speed: f32,
    #[serde(default)]
    view_lock: Option<String>,
    #[serde(default)]
    input_tile_width: Option<f32>,
    #[serde(default)]
    input_tile_height: Option<f32>,
    #[serde(default)]
    data: Vec<u32>,
}

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}
fn default_speed() -> f32 {
    DEFAULT_SMOOTH_SPEED
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    name: String,
    source: String,
}

#[derive(Deserialize)]
struct JsonSurface {
    width: i32,
    height: i32,
    #[serde(default)]
    default_tileset: String,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: String,
    imagewidth: u32,
    imageheight: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
}

/// A surface built from a description file, with the tilesets it draws with.
pub struct LoadedSurface {
    pub surface: TilesetSurface,
    pub tilesets: TilesetCatalog,
    /// Directory the tileset images are relative to.
    pub base_dir: PathBuf,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SurfaceError> {
    let txt = std::fs::read_to_string(path).map_err(|source| SurfaceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| SurfaceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn decode_tile(raw_gid: u32) -> IrTile {
    let gid = raw_gid & GID_MASK;
    if raw_gid & FLIP_D != 0 {
        log::debug!("gid {gid}: diagonal flip is not supported, ignoring it");
    }
    IrTile {
        index: gid as i32 - 1,
        flip_h: raw_gid & FLIP_H != 0,
        flip_v: raw_gid & FLIP_V != 0,
    }
}

pub fn decode_surface_file_to_ir(path: impl AsRef<Path>) -> Result<(IrSurface, PathBuf), SurfaceError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(SurfaceError::InvalidSurface(format!(
            "Surface file must be a JSON file: {}",
            p.display()
        )));
    }

    let j: JsonSurface = read_json(p)?;
    if j.width <= 0 || j.height <= 0 {
        return Err(SurfaceError::InvalidSurface(format!(
            "Surface size must be positive, got {}x{}",
            j.width, j.height
        )));
    }

    let base_dir = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    // Build IR tilesets
    let mut tilesets = Vec::with_capacity(j.tilesets.len());
    for ts in &j.tilesets {
        if !ts.source.ends_with(".json") {
            return Err(SurfaceError::InvalidSurface(format!(
                "External tileset must be JSON: {}",
                ts.source
            )));
        }
        let ext: ExternalTileset = read_json(&base_dir.join(&ts.source))?;

        // Image paths stay relative to the surface file.
        tilesets.push(IrTileset {
            name: ts.name.clone(),
            image: PathBuf::from(ext.image),
            image_w: ext.imagewidth,
            image_h: ext.imageheight,
            tile_w: ext.tilewidth,
            tile_h: ext.tileheight,
            tilecount: ext.tilecount,
            columns: ext.columns,
            spacing: ext.spacing,
            margin: ext.margin,
        });
    }

    let tilecounts: HashMap<&str, u32> = tilesets
        .iter()
        .map(|t| (t.name.as_str(), t.tilecount))
        .collect();
    let area = (j.width as usize) * (j.height as usize);

    // Build IR layers
    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        if let Some(name) = &l.tileset {
            if !tilecounts.contains_key(name.as_str()) {
                return Err(SurfaceError::UnknownTileset {
                    layer: l.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let mut tiles = Vec::new();
        if !l.data.is_empty() {
            if l.data.len() != area {
                return Err(SurfaceError::LayerSizeMismatch {
                    layer: l.name.clone(),
                    expected: area,
                    actual: l.data.len(),
                });
            }
            let ts_name = l.tileset.as_deref().unwrap_or(&j.default_tileset);
            let Some(&max_gid) = tilecounts.get(ts_name) else {
                return Err(SurfaceError::UnknownTileset {
                    layer: l.name.clone(),
                    name: ts_name.to_owned(),
                });
            };
            tiles.reserve(area);
            for &raw_gid in &l.data {
                let gid = raw_gid & GID_MASK;
                if gid > max_gid {
                    return Err(SurfaceError::InvalidTileGid {
                        layer: l.name.clone(),
                        gid,
                        max_gid,
                    });
                }
                tiles.push(decode_tile(raw_gid));
            }
        }

        let input_tile_size = match (l.input_tile_width, l.input_tile_height) {
            (Some(w), Some(h)) => Some(vec2(w, h)),
            (Some(s), None) | (None, Some(s)) => Some(vec2(s, s)),
            (None, None) => None,
        };

        layers.push(IrLayer {
            name: l.name,
            tileset: l.tileset,
            visible: l.visible,
            opacity: l.opacity,
            offset: vec2(l.offsetx, l.offsety),
            render_scale: l.render_scale,
            smooth_view: l.smooth_view.then_some(l.smooth_view_speed),
            smooth_render_scale: l.smooth_render_scale.then_some(l.smooth_render_scale_speed),
            view_lock: l.view_lock,
            input_tile_size,
            tiles,
        });
    }

    let ir = IrSurface {
        width: j.width,
        height: j.height,
        default_tileset: j.default_tileset,
        tilesets,
        layers,
    };
    Ok((ir, base_dir))
}

/// Builds a live surface and its tileset catalog from the intermediate form.
pub fn surface_from_ir(ir: IrSurface) -> Result<(TilesetSurface, TilesetCatalog), SurfaceError> {
    if ir.width <= 0 || ir.height <= 0 {
        return Err(SurfaceError::InvalidSurface(format!(
            "Surface size must be positive, got {}x{}",
            ir.width, ir.height
        )));
    }
    let area = (ir.width as usize) * (ir.height as usize);
    if let Some(l) = ir.layers.iter().find(|l| !l.tiles.is_empty() && l.tiles.len() != area) {
        return Err(SurfaceError::LayerSizeMismatch {
            layer: l.name.clone(),
            expected: area,
            actual: l.tiles.len(),
        });
    }

    let mut catalog = TilesetCatalog::new();
    for t in ir.tilesets {
        catalog.insert(AtlasTileset {
            name: t.name,
            texture: TextureId::default(),
            image: t.image,
            image_w: t.image_w,
            image_h: t.image_h,
            tile_w: t.tile_w,
            tile_h: t.tile_h,
            tilecount: t.tilecount,
            cols: t.columns,
            spacing: t.spacing,
            margin: t.margin,
        });
    }

    let mut surface = TilesetSurface::new(ir.width, ir.height);
    surface.initialize(ir.layers.len());
    surface.set_default_tileset(ir.default_tileset);

    let mut by_name = HashMap::new();
    let width = ir.width as usize;

    for (li, layer) in ir.layers.iter().enumerate() {
        by_name.entry(layer.name.as_str()).or_insert(li);

        let Some(l) = surface.layer_mut(li) else {
            continue;
        };
        l.set_tileset_name(layer.tileset.clone());
        l.set_visible(layer.visible);
        l.set_opacity(layer.opacity);
        l.set_pixel_offset(layer.offset);
        l.set_render_scale(layer.render_scale);
        l.set_input_tile_size(layer.input_tile_size);
        if let Some(speed) = layer.smooth_render_scale {
            l.set_smooth_render_scale(true, speed);
        }

        for (i, t) in layer.tiles.iter().enumerate() {
            if t.index < 0 {
                continue;
            }
            let data = TileRenderData::new(t.index).with_flip(TileFlip::from_axes(t.flip_h, t.flip_v));
            surface.set_tile(li, (i % width) as i32, (i / width) as i32, data);
        }

        if let Some(speed) = layer.smooth_view {
            surface.set_smooth_view(li, true, speed);
        }
    }

    for (li, layer) in ir.layers.iter().enumerate() {
        let Some(master_name) = &layer.view_lock else {
            continue;
        };
        let locked = by_name
            .get(master_name.as_str())
            .is_some_and(|&master| surface.set_layer_view_lock(master, li));
        if !locked {
            return Err(SurfaceError::InvalidViewLock {
                layer: layer.name.clone(),
                master: master_name.clone(),
            });
        }
    }

    Ok((surface, catalog))
}

/// Loads a surface description file and everything it references, except
/// texture pixels (see `MacroquadSink::load_textures`).
pub fn load_surface(path: impl AsRef<Path>) -> Result<LoadedSurface, SurfaceError> {
    let path = path.as_ref();
    let (ir, base_dir) = decode_surface_file_to_ir(path)?;
    let (surface, tilesets) = surface_from_ir(ir)?;
    log::info!(
        "loaded {}: {}x{} tiles, {} layers, {} tilesets",
        path.display(),
        surface.width(),
        surface.height(),
        surface.layer_count(),
        tilesets.len()
    );
    Ok(LoadedSurface {
        surface,
        tilesets,
        base_dir,
    })
}
