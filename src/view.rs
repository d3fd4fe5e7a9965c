use macroquad::prelude::*;

/// View offsets closer than this (in pixels) to their target snap onto it.
pub const VIEW_SNAP_PIXELS: f32 = 0.01;
/// Render scales closer than this to their target snap onto it.
pub const SCALE_SNAP: f32 = 1e-4;

/// Exponential-decay blend factor for one tick: `1 - e^(-speed * dt)`.
#[inline]
pub fn smoothing_factor(speed: f32, dt: f32) -> f32 {
    (1.0 - (-speed.max(0.0) * dt).exp()).clamp(0.0, 1.0)
}

/// Moves `current` toward `target` by one smoothing step.
pub fn smooth_towards(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let next = current + (target - current) * smoothing_factor(speed, dt);
    if (target - next).abs() <= SCALE_SNAP {
        target
    } else {
        next
    }
}

/// Combined camera offset in pixels.
#[inline]
pub fn view_pixels(tile_offset: Vec2, pixel_offset: Vec2, scaled_tile: Vec2) -> Vec2 {
    tile_offset * scaled_tile + pixel_offset
}

/// Splits a raw pixel offset back into a whole-tile part and a sub-tile
/// remainder in `[0, scaled_tile)`.
pub fn requantize_view(raw_pixels: Vec2, scaled_tile: Vec2) -> (Vec2, Vec2) {
    if scaled_tile.x <= 0.0 || scaled_tile.y <= 0.0 {
        return (Vec2::ZERO, raw_pixels);
    }
    let tiles = (raw_pixels / scaled_tile).floor();
    (tiles, raw_pixels - tiles * scaled_tile)
}

/// One smoothing step of a `(tile, pixel)` camera pair toward its target pair.
/// Returns the new `(tile, pixel)` offsets.
pub fn smooth_view(
    tile_offset: Vec2,
    pixel_offset: Vec2,
    tile_target: Vec2,
    pixel_target: Vec2,
    scaled_tile: Vec2,
    speed: f32,
    dt: f32,
) -> (Vec2, Vec2) {
    let current = view_pixels(tile_offset, pixel_offset, scaled_tile);
    let target = view_pixels(tile_target, pixel_target, scaled_tile);
    let next = current.lerp(target, smoothing_factor(speed, dt));

    if next.distance(target) <= VIEW_SNAP_PIXELS {
        return (tile_target, pixel_target);
    }
    requantize_view(next, scaled_tile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_is_zero_without_time_and_approaches_one() {
        assert_eq!(smoothing_factor(10.0, 0.0), 0.0);
        assert!(smoothing_factor(10.0, 10.0) > 0.999);
    }

    #[test]
    fn requantize_keeps_remainder_inside_one_tile() {
        let (tiles, px) = requantize_view(vec2(37.0, -5.0), vec2(16.0, 16.0));
        assert_eq!(tiles, vec2(2.0, -1.0));
        assert_eq!(px, vec2(5.0, 11.0));
    }

    #[test]
    fn smooth_view_converges_and_snaps() {
        let tile = vec2(16.0, 16.0);
        let (mut t, mut p) = (Vec2::ZERO, Vec2::ZERO);
        for _ in 0..200 {
            (t, p) = smooth_view(t, p, vec2(5.0, 7.0), Vec2::ZERO, tile, 12.0, 1.0 / 60.0);
        }
        assert_eq!(t, vec2(5.0, 7.0));
        assert_eq!(p, Vec2::ZERO);
    }

    #[test]
    fn scale_smoothing_snaps_to_target() {
        let mut s = 1.0;
        for _ in 0..500 {
            s = smooth_towards(s, 2.0, 8.0, 1.0 / 60.0);
        }
        assert_eq!(s, 2.0);
    }
}
