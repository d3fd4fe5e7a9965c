use anyhow::Context;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::render::sink::{DrawSink, TextureId, TexturedQuad};
use crate::tileset::TilesetCatalog;

/// [`DrawSink`] backed by macroquad's immediate-mode drawing.
#[derive(Default)]
pub struct MacroquadSink {
    textures: HashMap<TextureId, Texture2D>,
    translations: Vec<Vec2>,
    offset: Vec2,
}

impl MacroquadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_texture(&mut self, id: TextureId, texture: Texture2D) {
        texture.set_filter(FilterMode::Nearest);
        self.textures.insert(id, texture);
    }

    /// Loads the image of every tileset in `catalog`, relative to `base_dir`.
    pub async fn load_textures(&mut self, catalog: &TilesetCatalog, base_dir: &Path) -> anyhow::Result<()> {
        for ts in catalog.iter() {
            let img_path = base_dir.join(&ts.image);
            let path_str = img_path
                .to_str()
                .with_context(|| format!("Texture path is not UTF-8: {}", img_path.display()))?;
            let tex = load_texture(path_str)
                .await
                .with_context(|| format!("Loading texture {}", ts.image.display()))?;
            self.insert_texture(ts.texture, tex);
        }
        Ok(())
    }
}

impl DrawSink for MacroquadSink {
    fn draw_filled_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        let p = position + self.offset;
        draw_rectangle(p.x, p.y, size.x, size.y, color);
    }

    fn draw_textured_quad(&mut self, quad: TexturedQuad) {
        let Some(tex) = self.textures.get(&quad.texture) else {
            log::warn!("no texture loaded for {:?}", quad.texture);
            return;
        };

        let tex_size = tex.size();
        let uv = quad.uv;
        // Negative UV extents encode mirroring; macroquad wants a positive
        // source rect plus flip flags.
        let flip_x = uv.w < 0.0;
        let flip_y = uv.h < 0.0;
        let src_x = if flip_x { uv.x + uv.w } else { uv.x };
        let src_y = if flip_y { uv.y + uv.h } else { uv.y };
        let source = Rect::new(
            src_x * tex_size.x,
            src_y * tex_size.y,
            uv.w.abs() * tex_size.x,
            uv.h.abs() * tex_size.y,
        );

        let p = quad.position + self.offset;
        draw_texture_ex(
            tex,
            p.x,
            p.y,
            quad.color,
            DrawTextureParams {
                dest_size: Some(quad.size),
                source: Some(source),
                rotation: quad.rotation,
                flip_x,
                flip_y,
                pivot: (quad.rotation != 0.0).then_some(p + quad.origin),
            },
        );
    }

    fn set_scissor(&mut self, x: i32, y: i32, w: i32, h: i32) {
        // SAFETY: only called on the main thread while a frame is being drawn.
        let mut gl = unsafe { get_internal_gl() };
        gl.flush();
        gl.quad_gl.scissor(Some((x, y, w, h)));
    }

    fn disable_scissor(&mut self) {
        // SAFETY: only called on the main thread while a frame is being drawn.
        let mut gl = unsafe { get_internal_gl() };
        gl.flush();
        gl.quad_gl.scissor(None);
    }

    fn push_translation(&mut self, offset: Vec2) {
        self.translations.push(offset);
        self.offset += offset;
    }

    fn pop_translation(&mut self) {
        if let Some(offset) = self.translations.pop() {
            self.offset -= offset;
        }
    }
}
