use macroquad::prelude::*;

use crate::render::sink::TexturedQuad;

/// One recorded call into a [`DrawSink`](crate::DrawSink).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FilledRect {
        position: Vec2,
        size: Vec2,
        color: Color,
    },
    Quad(TexturedQuad),
    /// `None` disables scissoring.
    Scissor(Option<(i32, i32, i32, i32)>),
    PushTranslation(Vec2),
    PopTranslation,
}
