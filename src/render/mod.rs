pub mod cull;
pub mod draw;
pub mod macroquad_sink;
pub mod sink;
