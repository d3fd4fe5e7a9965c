// tests/load_tests.rs

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use macroquad::prelude::vec2;
use macroquad_tile_surface::{load_surface, SurfaceError, TileFlip, TilesetMetadata};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tile_surface_it_{tag}_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

const TERRAIN: &str = r#"{
  "tilewidth": 12, "tileheight": 12, "tilecount": 6, "columns": 3,
  "image": "terrain.png", "imagewidth": 36, "imageheight": 24,
  "spacing": 0, "margin": 0, "name": "ignored extra field"
}"#;

const UI: &str = r#"{
  "tilewidth": 8, "tileheight": 8, "tilecount": 4, "columns": 4,
  "image": "ui.png", "imagewidth": 32, "imageheight": 8
}"#;

const SURFACE: &str = r#"{
  "width": 3, "height": 2,
  "default_tileset": "terrain",
  "tilesets": [
    { "name": "terrain", "source": "terrain.json" },
    { "name": "ui", "source": "ui.json" }
  ],
  "layers": [
    { "name": "ground", "data": [1, 2, 0, 0, 1073741830, 3] },
    { "name": "creatures", "view_lock": "ground", "opacity": 0.75 },
    { "name": "hud", "tileset": "ui", "visible": false,
      "offsetx": 4, "offsety": -2, "render_scale": 2.0,
      "smooth_view": true, "smooth_view_speed": 4.0,
      "input_tile_width": 24 }
  ]
}"#;

fn write_fixture() -> PathBuf {
    let dir = temp_dir("fixture");
    fs::write(dir.join("terrain.json"), TERRAIN).expect("write terrain");
    fs::write(dir.join("ui.json"), UI).expect("write ui");
    let path = dir.join("surface.json");
    fs::write(&path, SURFACE).expect("write surface");
    path
}

#[test]
fn loads_layers_tiles_and_settings() {
    let path = write_fixture();
    let loaded = load_surface(&path).expect("surface should load");
    let s = &loaded.surface;

    assert_eq!((s.width(), s.height(), s.layer_count()), (3, 2, 3));
    assert_eq!(loaded.base_dir, path.parent().expect("parent").to_path_buf());

    assert_eq!(s.get_tile(0, 0, 0).tile_index, 0);
    assert_eq!(s.get_tile(0, 1, 0).tile_index, 1);
    assert!(s.get_tile(0, 2, 0).is_empty());
    assert_eq!(s.get_tile(0, 1, 1).tile_index, 5);
    assert_eq!(s.get_tile(0, 1, 1).flip, TileFlip::Vertical);
    assert_eq!(s.get_tile(0, 2, 1).tile_index, 2);

    let creatures = s.layer(1).expect("creatures");
    assert_eq!(creatures.view_master(), Some(0));
    assert_eq!(creatures.opacity(), 0.75);
    assert_eq!(creatures.chunk_count(), 0);

    let hud = s.layer(2).expect("hud");
    assert!(!hud.is_visible());
    assert_eq!(hud.tileset_name(), Some("ui"));
    assert_eq!(hud.pixel_offset(), vec2(4.0, -2.0));
    assert_eq!(hud.render_scale(), 2.0);
    assert!(hud.smooth_view_enabled());
    assert_eq!(hud.smooth_view_speed(), 4.0);
    assert_eq!(hud.input_tile_size(), Some(vec2(24.0, 24.0)));

    assert_eq!(s.resolved_tileset_name(1), Some("terrain"));
    let ui = loaded.tilesets.get("ui").expect("ui tileset");
    assert_eq!(ui.tile_size(), vec2(8.0, 8.0));
    assert_ne!(
        loaded.tilesets.get("terrain").map(|t| t.texture()),
        Some(ui.texture())
    );
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = load_surface("foo.tmx").err().expect("expected error");
    assert!(matches!(err, SurfaceError::InvalidSurface(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = temp_dir("missing").join("nonexistent.json");
    let err = load_surface(&path).err().expect("expected error");
    assert!(matches!(err, SurfaceError::Io { .. }));
    assert!(err.to_string().contains("nonexistent.json"));
}

#[test]
fn zero_sized_surface_is_rejected() {
    let dir = temp_dir("zero");
    let path = dir.join("surface.json");
    fs::write(&path, r#"{ "width": 0, "height": 4 }"#).expect("write");
    let err = load_surface(&path).err().expect("expected error");
    assert!(matches!(err, SurfaceError::InvalidSurface(_)));
}

#[test]
fn unknown_view_lock_master_is_rejected() {
    let dir = temp_dir("lock");
    let path = dir.join("surface.json");
    fs::write(
        &path,
        r#"{ "width": 2, "height": 2, "layers": [ { "name": "a", "view_lock": "ghost" } ] }"#,
    )
    .expect("write");
    let err = load_surface(&path).err().expect("expected error");
    assert!(matches!(err, SurfaceError::InvalidViewLock { ref master, .. } if master == "ghost"));
}
