use macroquad::prelude::*;

/// Tile range `[min, max)` covering a visible pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TileRange {
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// Tiles touched by the rectangle `visible` (in layer pixels), clamped to
/// `[0, surface_w] x [0, surface_h]`. The max side is padded by one tile so
/// partially visible trailing tiles are kept.
pub fn calculate_visible_tile_range(
    visible: Rect,
    scaled_tile: Vec2,
    surface_w: i32,
    surface_h: i32,
) -> TileRange {
    if scaled_tile.x <= 0.0 || scaled_tile.y <= 0.0 {
        return TileRange {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
        };
    }

    let clamp = |v: f32, hi: i32| (v as i64).clamp(0, hi as i64) as i32;

    TileRange {
        min_x: clamp((visible.x / scaled_tile.x).floor(), surface_w),
        min_y: clamp((visible.y / scaled_tile.y).floor(), surface_h),
        max_x: clamp(((visible.x + visible.w) / scaled_tile.x).floor() + 1.0, surface_w),
        max_y: clamp(((visible.y + visible.h) / scaled_tile.y).floor() + 1.0, surface_h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_partial_tile_is_included() {
        let r = calculate_visible_tile_range(
            Rect::new(8.0, 0.0, 40.0, 16.0),
            vec2(16.0, 16.0),
            100,
            100,
        );
        assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (0, 0, 4, 2));
    }

    #[test]
    fn degenerate_tile_size_yields_empty_range() {
        let r = calculate_visible_tile_range(Rect::new(0.0, 0.0, 10.0, 10.0), Vec2::ZERO, 10, 10);
        assert!(r.is_empty());
    }
}
