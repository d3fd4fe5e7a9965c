// tests/render_tests.rs

use std::path::PathBuf;

use macroquad::prelude::{ivec2, vec2, Vec2, RED};
use macroquad_tile_surface::{
    draw_layer, draw_surface, AtlasTileset, DrawCommand, RecordingSink, ScreenLayout, TextureId,
    TileFlip, TileRenderData, TilesetCatalog, TilesetSurface,
};

fn catalog() -> TilesetCatalog {
    let mut cat = TilesetCatalog::new();
    cat.insert(AtlasTileset {
        name: "base".into(),
        texture: TextureId::default(),
        image: PathBuf::from("base.png"),
        image_w: 64,
        image_h: 32,
        tile_w: 16,
        tile_h: 16,
        tilecount: 8,
        cols: 4,
        spacing: 0,
        margin: 0,
    });
    cat
}

fn surface() -> TilesetSurface {
    let mut s = TilesetSurface::new(10, 10);
    s.initialize(2);
    s.set_default_tileset("base");
    s
}

fn draw(s: &TilesetSurface, layer: usize, viewport: Vec2) -> RecordingSink {
    let mut sink = RecordingSink::new();
    draw_layer(s, layer, &catalog(), 1.0, viewport, &mut sink);
    sink
}

#[test]
fn surface_draw_is_clipped_and_translated() {
    let s = surface();
    let mut layout = ScreenLayout::new(vec2(100.0, 50.0), vec2(160.0, 160.0));
    layout.margins.left = 4.0;
    layout.margins.bottom = 10.0;

    let mut sink = RecordingSink::new();
    draw_surface(&s, &catalog(), &layout, &mut sink);

    assert_eq!(
        sink.commands,
        vec![
            DrawCommand::Scissor(Some((104, 50, 156, 150))),
            DrawCommand::PushTranslation(vec2(100.0, 50.0)),
            DrawCommand::PopTranslation,
            DrawCommand::Scissor(None),
        ]
    );
}

#[test]
fn backgrounds_are_drawn_before_tiles() {
    let mut s = surface();
    s.set_tile(0, 1, 2, TileRenderData::new(0).with_background(RED));
    s.set_tile(0, 3, 3, TileRenderData::new(2));

    let sink = draw(&s, 0, vec2(160.0, 160.0));

    let first_quad = sink
        .commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Quad(_)))
        .expect("tiles drawn");
    let last_rect = sink
        .commands
        .iter()
        .rposition(|c| matches!(c, DrawCommand::FilledRect { .. }))
        .expect("background drawn");
    assert!(last_rect < first_quad);

    let rects: Vec<_> = sink.filled_rects().collect();
    assert_eq!(rects, vec![(vec2(16.0, 32.0), vec2(16.0, 16.0), RED)]);

    let positions: Vec<Vec2> = sink.quads().map(|q| q.position).collect();
    assert_eq!(positions, vec![vec2(16.0, 32.0), vec2(48.0, 48.0)]);
}

#[test]
fn flips_mirror_uvs() {
    let mut s = surface();
    s.set_tile(0, 0, 0, TileRenderData::new(1).with_flip(TileFlip::Horizontal));
    s.set_tile(0, 1, 0, TileRenderData::new(1).with_flip(TileFlip::Vertical));

    let sink = draw(&s, 0, vec2(160.0, 160.0));
    let uvs: Vec<_> = sink.quads().map(|q| q.uv).collect();

    assert_eq!((uvs[0].x, uvs[0].w), (0.5, -0.25));
    assert_eq!((uvs[0].y, uvs[0].h), (0.0, 0.5));
    assert_eq!((uvs[1].x, uvs[1].w), (0.25, 0.25));
    assert_eq!((uvs[1].y, uvs[1].h), (0.5, -0.5));
}

#[test]
fn opacity_scales_alpha() {
    let mut s = surface();
    s.set_tile(1, 0, 0, TileRenderData::new(0));
    if let Some(l) = s.layer_mut(1) {
        l.set_opacity(0.5);
    }

    let sink = draw(&s, 1, vec2(160.0, 160.0));
    let quad = sink.quads().next().expect("quad");
    assert_eq!(quad.color.a, 0.5);
    assert_eq!(quad.depth, 1.0);
}

#[test]
fn opacity_scales_background_fill() {
    let mut s = surface();
    s.set_tile(1, 2, 1, TileRenderData::new(0).with_background(RED));
    if let Some(l) = s.layer_mut(1) {
        l.set_opacity(0.5);
    }

    let sink = draw(&s, 1, vec2(160.0, 160.0));
    let rects: Vec<_> = sink.filled_rects().collect();
    assert_eq!(rects.len(), 1);
    let (pos, size, color) = rects[0];
    assert_eq!(pos, vec2(32.0, 16.0));
    assert_eq!(size, vec2(16.0, 16.0));
    assert_eq!((color.r, color.g, color.b), (RED.r, RED.g, RED.b));
    assert_eq!(color.a, 0.5);
}

#[test]
fn invalid_indices_and_hidden_layers_draw_nothing() {
    let mut s = surface();
    s.set_tile(0, 0, 0, TileRenderData::new(8));
    assert_eq!(draw(&s, 0, vec2(160.0, 160.0)).commands.len(), 0);

    s.set_tile(0, 0, 0, TileRenderData::new(3));
    if let Some(l) = s.layer_mut(0) {
        l.set_visible(false);
    }
    assert_eq!(draw(&s, 0, vec2(160.0, 160.0)).commands.len(), 0);
}

#[test]
fn unknown_tileset_draws_nothing() {
    let mut s = surface();
    s.set_tile(0, 0, 0, TileRenderData::new(0));
    if let Some(l) = s.layer_mut(0) {
        l.set_tileset_name(Some("missing".into()));
    }
    assert!(draw(&s, 0, vec2(160.0, 160.0)).commands.is_empty());
}

#[test]
fn moving_tile_is_drawn_exactly_once() {
    let mut s = surface();
    s.set_tile(0, 0, 0, TileRenderData::new(4));
    assert!(s.enqueue_move(0, ivec2(0, 0), ivec2(4, 0), 1.0, false));
    s.process_movements(0.5);

    let sink = draw(&s, 0, vec2(160.0, 160.0));
    let quads: Vec<_> = sink.quads().collect();
    assert_eq!(quads.len(), 1);
    assert_eq!(quads[0].position, vec2(32.0, 0.0));
}

#[test]
fn camera_culls_and_offsets_tiles() {
    let mut s = surface();
    s.set_tile(0, 9, 9, TileRenderData::new(0));

    assert_eq!(draw(&s, 0, vec2(32.0, 32.0)).quads().count(), 0);

    s.set_view_tile_offset(0, vec2(8.0, 8.0));
    let sink = draw(&s, 0, vec2(32.0, 32.0));
    let positions: Vec<Vec2> = sink.quads().map(|q| q.position).collect();
    assert_eq!(positions, vec![vec2(16.0, 16.0)]);
}

#[test]
fn scales_and_pixel_offsets_apply() {
    let mut s = surface();
    s.set_tile(0, 1, 1, TileRenderData::new(0));
    if let Some(l) = s.layer_mut(0) {
        l.set_render_scale(2.0);
        l.set_pixel_offset(vec2(5.0, -3.0));
    }
    s.set_view_pixel_offset(0, vec2(10.0, 0.0));

    let mut sink = RecordingSink::new();
    draw_layer(&s, 0, &catalog(), 1.5, vec2(400.0, 400.0), &mut sink);
    let quad = sink.quads().next().expect("quad");
    assert_eq!(quad.size, vec2(48.0, 48.0));
    assert_eq!(quad.position, vec2(48.0 - 10.0 + 5.0, 48.0 - 3.0));
}
