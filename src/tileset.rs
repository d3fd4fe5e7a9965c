use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::render::sink::TextureId;

/// What the renderer and input mapping need to know about a tileset.
pub trait TilesetMetadata {
    fn tile_width(&self) -> f32;
    fn tile_height(&self) -> f32;
    fn tile_count(&self) -> u32;
    /// Source rectangle of `index` in texture pixels.
    fn source_rect(&self, index: u32) -> Option<Rect>;
    fn texture(&self) -> TextureId;
    /// Backing texture size in pixels, used to normalize UVs.
    fn texture_size(&self) -> Vec2;

    fn tile_size(&self) -> Vec2 {
        vec2(self.tile_width(), self.tile_height())
    }
}

/// Resolves tileset names to tileset metadata.
pub trait TilesetProvider {
    type Tileset: TilesetMetadata;

    fn tileset(&self, name: &str) -> Option<&Self::Tileset>;
}

/// Regular-grid atlas tileset, laid out the way Tiled lays out image atlases.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTileset {
    pub name: String,
    pub texture: TextureId,
    pub image: PathBuf,
    pub image_w: u32,
    pub image_h: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub tilecount: u32,
    pub cols: u32,
    pub spacing: u32,
    pub margin: u32,
}

impl TilesetMetadata for AtlasTileset {
    fn tile_width(&self) -> f32 {
        self.tile_w as f32
    }

    fn tile_height(&self) -> f32 {
        self.tile_h as f32
    }

    fn tile_count(&self) -> u32 {
        self.tilecount
    }

    fn source_rect(&self, index: u32) -> Option<Rect> {
        if index >= self.tilecount || self.cols == 0 {
            return None;
        }
        let col = index % self.cols;
        let row = index / self.cols;
        let sx = self.margin + col * (self.tile_w + self.spacing);
        let sy = self.margin + row * (self.tile_h + self.spacing);
        Some(Rect::new(
            sx as f32,
            sy as f32,
            self.tile_w as f32,
            self.tile_h as f32,
        ))
    }

    fn texture(&self) -> TextureId {
        self.texture
    }

    fn texture_size(&self) -> Vec2 {
        vec2(self.image_w as f32, self.image_h as f32)
    }
}

/// Named tilesets, each bound to its own texture handle.
#[derive(Debug, Clone, Default)]
pub struct TilesetCatalog {
    tilesets: HashMap<String, AtlasTileset>,
    next_texture: u32,
}

impl TilesetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tileset under its name, assigning it a fresh texture handle.
    /// Replaces any tileset already registered under that name.
    pub fn insert(&mut self, mut tileset: AtlasTileset) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        tileset.texture = id;
        self.tilesets.insert(tileset.name.clone(), tileset);
        id
    }

    pub fn get(&self, name: &str) -> Option<&AtlasTileset> {
        self.tilesets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtlasTileset> {
        self.tilesets.values()
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }
}

impl TilesetProvider for TilesetCatalog {
    type Tileset = AtlasTileset;

    fn tileset(&self, name: &str) -> Option<&AtlasTileset> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> AtlasTileset {
        AtlasTileset {
            name: "terrain".into(),
            texture: TextureId(0),
            image: PathBuf::from("terrain.png"),
            image_w: 70,
            image_h: 36,
            tile_w: 16,
            tile_h: 16,
            tilecount: 8,
            cols: 4,
            spacing: 1,
            margin: 1,
        }
    }

    #[test]
    fn source_rect_honors_margin_and_spacing() {
        let ts = atlas();
        assert_eq!(ts.source_rect(0), Some(Rect::new(1.0, 1.0, 16.0, 16.0)));
        assert_eq!(ts.source_rect(5), Some(Rect::new(18.0, 18.0, 16.0, 16.0)));
        assert_eq!(ts.source_rect(8), None);
    }

    #[test]
    fn catalog_assigns_distinct_textures() {
        let mut cat = TilesetCatalog::new();
        let a = cat.insert(atlas());
        let b = cat.insert(AtlasTileset {
            name: "items".into(),
            ..atlas()
        });
        assert_ne!(a, b);
        assert_eq!(cat.tileset("items").map(|t| t.texture()), Some(b));
        assert_eq!(cat.len(), 2);
    }
}
