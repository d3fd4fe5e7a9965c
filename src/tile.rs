use macroquad::prelude::{Color, BLANK, WHITE};

/// Mirroring applied to a tile when it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFlip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl TileFlip {
    /// Builds a flip from the two mirror axes.
    pub fn from_axes(horizontal: bool, vertical: bool) -> Self {
        match (horizontal, vertical) {
            (false, false) => TileFlip::None,
            (true, false) => TileFlip::Horizontal,
            (false, true) => TileFlip::Vertical,
            (true, true) => TileFlip::Both,
        }
    }

    #[inline]
    pub fn horizontal(self) -> bool {
        matches!(self, TileFlip::Horizontal | TileFlip::Both)
    }

    #[inline]
    pub fn vertical(self) -> bool {
        matches!(self, TileFlip::Vertical | TileFlip::Both)
    }
}

/// What a single cell displays: a tileset index plus colors and mirroring.
///
/// A negative `tile_index` means the cell is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRenderData {
    pub tile_index: i32,
    pub foreground: Color,
    pub background: Color,
    pub flip: TileFlip,
}

impl TileRenderData {
    /// The "nothing here" tile returned for unallocated or out-of-range reads.
    pub const EMPTY: TileRenderData = TileRenderData {
        tile_index: -1,
        foreground: WHITE,
        background: BLANK,
        flip: TileFlip::None,
    };

    /// A white, unflipped tile with a transparent background.
    pub fn new(tile_index: i32) -> Self {
        TileRenderData {
            tile_index,
            ..Self::EMPTY
        }
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_flip(mut self, flip: TileFlip) -> Self {
        self.flip = flip;
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tile_index < 0
    }
}

impl Default for TileRenderData {
    fn default() -> Self {
        Self::EMPTY
    }
}
