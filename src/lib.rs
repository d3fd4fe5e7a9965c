//! Sparse, chunked, layered tile surface for Macroquad: tile storage, animated
//! tile moves, per-layer cameras, culled rendering and pointer-to-tile mapping.

mod command;
mod error;
mod input;
mod ir_surface;
mod layer;
mod loader {
    pub mod json_loader;
}
mod movement;
mod render;
mod spatial {
    pub mod index;
}
mod surface;
mod tile;
mod tileset;
mod view;

pub use command::DrawCommand;
pub use error::SurfaceError;
pub use input::{hit_test, input_tile_coordinates, InputHandler, RawInput, TileMouseEvent, TileMouseKind};
pub use ir_surface::{IrLayer, IrSurface, IrTile, IrTileset};
pub use layer::{TileLayer, DEFAULT_SMOOTH_SPEED};
pub use loader::json_loader::{decode_surface_file_to_ir, load_surface, surface_from_ir, LoadedSurface};
pub use movement::{MovementState, TileMovement, TileMovementQueue, MIN_MOVE_DURATION};
pub use render::cull::{calculate_visible_tile_range, TileRange};
pub use render::draw::{draw_layer, draw_surface, scaled_tile_size, tile_quad, Margins, ScreenLayout};
pub use render::macroquad_sink::MacroquadSink;
pub use render::sink::{DrawSink, RecordingSink, TextureId, TexturedQuad};
pub use spatial::index::{ChunkCoord, TileChunk, CHUNK_SIZE};
pub use surface::TilesetSurface;
pub use tile::{TileFlip, TileRenderData};
pub use tileset::{AtlasTileset, TilesetCatalog, TilesetMetadata, TilesetProvider};
pub use view::{requantize_view, smooth_towards, smooth_view, smoothing_factor, view_pixels};
