use macroquad::prelude::*;
use macroquad_tile_surface::{
    draw_surface, AtlasTileset, InputHandler, MacroquadSink, RawInput, ScreenLayout, TextureId,
    TileMouseKind, TileRenderData, TilesetCatalog, TilesetSurface,
};
use std::path::PathBuf;

const TILE: u16 = 16;
const COLS: u16 = 4;

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Surface".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// A 4x4 atlas of flat colored squares, so the demo needs no assets.
fn generated_atlas() -> Image {
    let side = TILE * COLS;
    let mut img = Image::gen_image_color(side, side, BLANK);
    let palette = [GREEN, DARKGREEN, BROWN, GRAY, RED, ORANGE, YELLOW, SKYBLUE];
    for i in 0..(COLS * COLS) {
        let color = palette[i as usize % palette.len()];
        let (ox, oy) = ((i % COLS) * TILE, (i / COLS) * TILE);
        for y in 1..TILE - 1 {
            for x in 1..TILE - 1 {
                img.set_pixel((ox + x) as u32, (oy + y) as u32, color);
            }
        }
    }
    img
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut tilesets = TilesetCatalog::new();
    let texture = tilesets.insert(AtlasTileset {
        name: "colors".into(),
        texture: TextureId::default(),
        image: PathBuf::from("generated"),
        image_w: (TILE * COLS) as u32,
        image_h: (TILE * COLS) as u32,
        tile_w: TILE as u32,
        tile_h: TILE as u32,
        tilecount: (COLS * COLS) as u32,
        cols: COLS as u32,
        spacing: 0,
        margin: 0,
    });

    let mut sink = MacroquadSink::new();
    sink.insert_texture(texture, Texture2D::from_image(&generated_atlas()));

    let mut surface = TilesetSurface::new(256, 256);
    surface.initialize(2);
    surface.set_default_tileset("colors");
    for y in 0..256 {
        for x in 0..256 {
            surface.set_tile(0, x, y, TileRenderData::new(((x ^ y) % 4) as i32));
        }
    }
    surface.set_tile(1, 5, 5, TileRenderData::new(4));
    surface.set_layer_view_lock(0, 1);
    surface.set_smooth_view(0, true, 8.0);

    let mut layout = ScreenLayout::new(vec2(40.0, 40.0), vec2(1200.0, 640.0));
    layout.global_scale = 2.0;
    let mut input = InputHandler::new(1);
    let mut creature = ivec2(5, 5);
    let mut camera = Vec2::ZERO;

    loop {
        let dt = get_frame_time();

        let step = if is_key_pressed(KeyCode::Right) {
            ivec2(1, 0)
        } else if is_key_pressed(KeyCode::Left) {
            ivec2(-1, 0)
        } else if is_key_pressed(KeyCode::Down) {
            ivec2(0, 1)
        } else if is_key_pressed(KeyCode::Up) {
            ivec2(0, -1)
        } else {
            IVec2::ZERO
        };
        if step != IVec2::ZERO {
            let bounce = is_key_down(KeyCode::LeftShift);
            let target = creature + step;
            if surface.enqueue_move(1, creature, target, 0.15, bounce) && !bounce {
                creature = target;
            }
        }

        for event in input.handle(&surface, &tilesets, &layout, &RawInput::from_macroquad()) {
            match event.kind {
                TileMouseKind::Down(MouseButton::Left) => {
                    surface.set_tile(0, event.tile.x, event.tile.y, TileRenderData::new(7));
                }
                TileMouseKind::Wheel(delta) => {
                    camera.y -= delta.y.signum() * 4.0;
                    surface.set_view_tile_offset_target(0, camera);
                }
                _ => {}
            }
        }

        surface.update(dt, &tilesets, layout.global_scale);

        clear_background(BLACK);
        draw_surface(&surface, &tilesets, &layout, &mut sink);
        draw_text(&format!("FPS: {}", get_fps()), screen_width() - 135.0, 30.0, 30.0, RED);

        next_frame().await;
    }
}
