use macroquad::prelude::*;

use crate::layer::TileLayer;
use crate::render::draw::ScreenLayout;
use crate::surface::TilesetSurface;
use crate::tileset::{TilesetMetadata, TilesetProvider};
use crate::view::view_pixels;

/// Maps a screen pixel to the tile under it on a layer with the given camera.
#[allow(clippy::too_many_arguments)]
pub fn input_tile_coordinates(
    global_scale: f32,
    screen_position: Vec2,
    layer_render_scale: f32,
    tile_size: Vec2,
    layer_pixel_offset: Vec2,
    view_tile_offset: Vec2,
    view_pixel_offset: Vec2,
    mouse: Vec2,
) -> IVec2 {
    let scaled = tile_size * global_scale * layer_render_scale;
    let view_px = view_pixels(view_tile_offset, view_pixel_offset, scaled);
    let relative = mouse - screen_position - layer_pixel_offset + view_px;
    (relative / scaled).floor().as_ivec2()
}

/// Whether `point` lies in `[position, position + size)`.
#[inline]
pub fn hit_test(position: Vec2, size: Vec2, point: Vec2) -> bool {
    point.x >= position.x
        && point.y >= position.y
        && point.x < position.x + size.x
        && point.y < position.y + size.y
}

/// Raw pointer state for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub mouse: Vec2,
    /// Buttons that went down this frame.
    pub pressed: Vec<MouseButton>,
    pub wheel: Vec2,
}

impl RawInput {
    pub fn from_macroquad() -> Self {
        let (wx, wy) = mouse_wheel();
        RawInput {
            mouse: mouse_position().into(),
            pressed: [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
                .into_iter()
                .filter(|b| is_mouse_button_pressed(*b))
                .collect(),
            wheel: vec2(wx, wy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileMouseKind {
    Move,
    Down(MouseButton),
    Wheel(Vec2),
}

/// A pointer event resolved to a tile of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMouseEvent {
    pub kind: TileMouseKind,
    pub layer: usize,
    pub tile: IVec2,
    pub mouse: Vec2,
}

type MouseCallback = Box<dyn FnMut(&TileMouseEvent)>;

/// Turns raw pointer input into tile events for the selected layer, or for
/// every layer when broadcasting.
pub struct InputHandler {
    selected_layer: usize,
    broadcast: bool,
    last_mouse: Option<Vec2>,
    on_mouse_move: Option<MouseCallback>,
    on_mouse_down: Option<MouseCallback>,
}

impl InputHandler {
    pub fn new(selected_layer: usize) -> Self {
        InputHandler {
            selected_layer,
            broadcast: false,
            last_mouse: None,
            on_mouse_move: None,
            on_mouse_down: None,
        }
    }

    pub fn selected_layer(&self) -> usize {
        self.selected_layer
    }

    pub fn set_selected_layer(&mut self, layer: usize) {
        self.selected_layer = layer;
    }

    pub fn broadcast(&self) -> bool {
        self.broadcast
    }

    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.broadcast = broadcast;
    }

    pub fn on_mouse_move(&mut self, f: impl FnMut(&TileMouseEvent) + 'static) {
        self.on_mouse_move = Some(Box::new(f));
    }

    pub fn on_mouse_down(&mut self, f: impl FnMut(&TileMouseEvent) + 'static) {
        self.on_mouse_down = Some(Box::new(f));
    }

    /// Tile under `mouse` on `layer`, using the layer's input size override
    /// when it has one. `None` if the layer or its tile size is unknown.
    pub fn layer_tile_at<P: TilesetProvider>(
        surface: &TilesetSurface,
        tilesets: &P,
        layout: &ScreenLayout,
        layer: usize,
        mouse: Vec2,
    ) -> Option<IVec2> {
        let l = surface.layer(layer)?;
        let tile_size = input_tile_size(surface, tilesets, layer, l)?;
        if tile_size.x <= 0.0 || tile_size.y <= 0.0 {
            return None;
        }
        Some(input_tile_coordinates(
            layout.global_scale,
            layout.position,
            l.render_scale(),
            tile_size,
            l.pixel_offset(),
            l.view_tile_offset(),
            l.view_pixel_offset(),
            mouse,
        ))
    }

    /// Processes one frame of input. Events are only produced while the
    /// pointer is inside the clipped surface area; a move is reported when the pointer
    /// position changed since the last call.
    pub fn handle<P: TilesetProvider>(
        &mut self,
        surface: &TilesetSurface,
        tilesets: &P,
        layout: &ScreenLayout,
        input: &RawInput,
    ) -> Vec<TileMouseEvent> {
        let moved = self.last_mouse != Some(input.mouse);
        self.last_mouse = Some(input.mouse);

        let mut events = Vec::new();
        let clip = layout.clip_rect();
        if !hit_test(clip.point(), clip.size(), input.mouse) {
            return events;
        }

        let layers: Vec<usize> = if self.broadcast {
            (0..surface.layer_count()).collect()
        } else {
            vec![self.selected_layer]
        };

        for layer in layers {
            let Some(tile) = Self::layer_tile_at(surface, tilesets, layout, layer, input.mouse) else {
                continue;
            };
            let event = |kind| TileMouseEvent {
                kind,
                layer,
                tile,
                mouse: input.mouse,
            };

            if moved {
                events.push(event(TileMouseKind::Move));
            }
            for button in &input.pressed {
                events.push(event(TileMouseKind::Down(*button)));
            }
            if input.wheel != Vec2::ZERO {
                events.push(event(TileMouseKind::Wheel(input.wheel)));
            }
        }

        for e in &events {
            let cb = match e.kind {
                TileMouseKind::Move => self.on_mouse_move.as_mut(),
                TileMouseKind::Down(_) => self.on_mouse_down.as_mut(),
                TileMouseKind::Wheel(_) => None,
            };
            if let Some(cb) = cb {
                cb(e);
            }
        }
        events
    }
}

fn input_tile_size<P: TilesetProvider>(
    surface: &TilesetSurface,
    tilesets: &P,
    index: usize,
    layer: &TileLayer,
) -> Option<Vec2> {
    if let Some(size) = layer.input_tile_size() {
        return Some(size);
    }
    let name = surface.resolved_tileset_name(index)?;
    tilesets.tileset(name).map(|ts| ts.tile_size())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_accounts_for_scale_and_camera() {
        let tile = input_tile_coordinates(
            2.0,
            vec2(100.0, 50.0),
            1.5,
            vec2(8.0, 8.0),
            vec2(4.0, 0.0),
            vec2(2.0, 1.0),
            vec2(6.0, 0.0),
            vec2(180.0, 80.0),
        );
        // scaled 24px; view 54,24; relative (180-100-4+54, 80-50+24) = (130, 54)
        assert_eq!(tile, ivec2(5, 2));
    }

    #[test]
    fn negative_relative_positions_floor() {
        let tile = input_tile_coordinates(
            1.0,
            Vec2::ZERO,
            1.0,
            vec2(16.0, 16.0),
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::ZERO,
            vec2(-1.0, 15.9),
        );
        assert_eq!(tile, ivec2(-1, 0));
    }

    #[test]
    fn hit_test_is_half_open() {
        let (pos, size) = (vec2(10.0, 10.0), vec2(20.0, 20.0));
        assert!(hit_test(pos, size, vec2(10.0, 10.0)));
        assert!(!hit_test(pos, size, vec2(30.0, 15.0)));
        assert!(!hit_test(pos, size, vec2(9.9, 15.0)));
    }
}
