use macroquad::prelude::*;

use crate::command::DrawCommand;

/// Opaque texture handle. The core only compares handles for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// A textured quad. `uv` is normalized; negative extents mirror the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    pub texture: TextureId,
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub rotation: f32,
    pub origin: Vec2,
    pub uv: Rect,
    pub depth: f32,
}

/// Backend that turns draw calls into pixels.
pub trait DrawSink {
    fn draw_filled_rect(&mut self, position: Vec2, size: Vec2, color: Color);
    fn draw_textured_quad(&mut self, quad: TexturedQuad);
    fn set_scissor(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn disable_scissor(&mut self);
    fn push_translation(&mut self, offset: Vec2);
    fn pop_translation(&mut self);
}

/// Sink that records every call, for tests and headless replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quads(&self) -> impl Iterator<Item = &TexturedQuad> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Quad(q) => Some(q),
            _ => None,
        })
    }

    pub fn filled_rects(&self) -> impl Iterator<Item = (Vec2, Vec2, Color)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::FilledRect {
                position,
                size,
                color,
            } => Some((position, size, color)),
            _ => None,
        })
    }
}

impl DrawSink for RecordingSink {
    fn draw_filled_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FilledRect {
            position,
            size,
            color,
        });
    }

    fn draw_textured_quad(&mut self, quad: TexturedQuad) {
        self.commands.push(DrawCommand::Quad(quad));
    }

    fn set_scissor(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.commands.push(DrawCommand::Scissor(Some((x, y, w, h))));
    }

    fn disable_scissor(&mut self) {
        self.commands.push(DrawCommand::Scissor(None));
    }

    fn push_translation(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::PushTranslation(offset));
    }

    fn pop_translation(&mut self) {
        self.commands.push(DrawCommand::PopTranslation);
    }
}
