use crate::tile::TileRenderData;

/// Side length of a chunk, in tiles.
pub const CHUNK_SIZE: i32 = 32;
const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

#[inline]
pub fn tile_to_chunk(x: i32, y: i32) -> ChunkCoord {
    ChunkCoord {
        x: x.div_euclid(CHUNK_SIZE),
        y: y.div_euclid(CHUNK_SIZE),
    }
}

#[inline]
pub fn rel(x: i32, y: i32) -> (usize, usize) {
    (
        x.rem_euclid(CHUNK_SIZE) as usize,
        y.rem_euclid(CHUNK_SIZE) as usize,
    )
}

/// Dense `CHUNK_SIZE x CHUNK_SIZE` block of tiles, row-major.
#[derive(Debug, Clone)]
pub struct TileChunk {
    tiles: Box<[TileRenderData]>,
    is_empty: bool,
}

impl TileChunk {
    pub fn new() -> Self {
        TileChunk {
            tiles: vec![TileRenderData::EMPTY; CHUNK_AREA].into_boxed_slice(),
            is_empty: true,
        }
    }

    #[inline]
    fn index(local_x: usize, local_y: usize) -> usize {
        debug_assert!(local_x < CHUNK_SIZE as usize && local_y < CHUNK_SIZE as usize);
        local_x + local_y * CHUNK_SIZE as usize
    }

    #[inline]
    pub fn get(&self, local_x: usize, local_y: usize) -> TileRenderData {
        self.tiles[Self::index(local_x, local_y)]
    }

    pub fn set(&mut self, local_x: usize, local_y: usize, data: TileRenderData) {
        self.tiles[Self::index(local_x, local_y)] = data;
        // Sticky: a chunk that once held a tile stays non-empty after clearing.
        if !data.is_empty() {
            self.is_empty = false;
        }
    }

    /// True until the first non-empty tile is written.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Iterates `(local_x, local_y, tile)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &TileRenderData)> {
        let size = CHUNK_SIZE as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (i % size, i / size, t))
    }

    pub(crate) fn clear(&mut self) {
        self.tiles.fill(TileRenderData::EMPTY);
    }
}

impl Default for TileChunk {
    fn default() -> Self {
        Self::new()
    }
}
