//! Surface offset arithmetic
//!
//! The displayed surface-address register takes the buffer's device base
//! address plus a surface offset computed here; the residual part of the
//! source coordinate goes to a second register whose meaning depends on the
//! tiling mode (a byte offset for linear surfaces, an (x, y) pair for tiled
//! ones).
//!
//! X-tiled surfaces are organized as 4 KiB tiles of 8 rows x 512 bytes. The
//! decomposition is exact: the tile-aligned base plus the tiled address of
//! the residual coordinate equals the tiled address of the original
//! coordinate.

use crate::geometry::ClampedRect;
use crate::hal::TilingMode;

/// X-tile geometry.
pub const TILE_WIDTH_BYTES: u32 = 512;
pub const TILE_HEIGHT: u32 = 8;
pub const TILE_SIZE: u32 = TILE_WIDTH_BYTES * TILE_HEIGHT;

/// A decomposed source coordinate: surface base offset plus the residual
/// coordinate left for the offset register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOffset {
    /// Byte offset added to the buffer's device address.
    pub base: u32,
    /// Residual x, in pixels.
    pub x: u32,
    /// Residual y, in rows.
    pub y: u32,
}

/// Byte offset of pixel (x, y) in a linear surface.
#[inline]
pub fn linear_offset(x: u32, y: u32, cpp: u32, stride: u32) -> u32 {
    y * stride + x * cpp
}

/// Byte address of pixel (x, y) in an X-tiled surface.
///
/// Tiles are laid out row-major: a full row of tiles occupies
/// `stride * TILE_HEIGHT` bytes, each tile is `TILE_SIZE` bytes, and inside
/// a tile rows are `TILE_WIDTH_BYTES` apart.
pub fn tiled_address(x: u32, y: u32, cpp: u32, stride: u32) -> u32 {
    let xb = x * cpp;
    (y / TILE_HEIGHT) * stride * TILE_HEIGHT
        + (xb / TILE_WIDTH_BYTES) * TILE_SIZE
        + (y % TILE_HEIGHT) * TILE_WIDTH_BYTES
        + xb % TILE_WIDTH_BYTES
}

/// Decompose source coordinate (x, y) into a surface base offset and a
/// residual coordinate.
///
/// Linear surfaces use flat addressing: the base is zero and the full
/// linear offset is the residual (written to the linear-offset register via
/// [`linear_offset`]). Tiled surfaces split at tile granularity so the
/// residual fits the tile-offset register's small x/y fields.
pub fn locate(x: u32, y: u32, tiling: TilingMode, cpp: u32, stride: u32) -> SurfaceOffset {
    match tiling {
        TilingMode::Linear => SurfaceOffset { base: 0, x, y },
        TilingMode::XTiled => {
            let pixels_per_tile_row = TILE_WIDTH_BYTES / cpp;
            let tile_rows = y / TILE_HEIGHT;
            let tiles = x / pixels_per_tile_row;
            SurfaceOffset {
                base: tile_rows * stride * TILE_HEIGHT + tiles * TILE_SIZE,
                x: x % pixels_per_tile_row,
                y: y % TILE_HEIGHT,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 180-degree rotation
//
// With rotation the scanout origin is the opposite corner of the visible
// rectangle, so every stored coordinate becomes `total - origin - extent`.
// These helpers are shared by every generation that carries the rotation
// bit; the plane code never open-codes the mirrored arithmetic.
// ---------------------------------------------------------------------------

/// Position register value for a rotated plane: the destination rectangle's
/// far corner reflected through the active surface.
pub fn rotated_position(dst: &ClampedRect, active: (u32, u32)) -> (u32, u32) {
    (
        active.0 - (dst.x + dst.width),
        active.1 - (dst.y + dst.height),
    )
}

/// Linear-offset register value for a rotated plane: the last pixel of the
/// visible rectangle.
pub fn rotated_linear_offset(dst: &ClampedRect, cpp: u32) -> u32 {
    dst.width * dst.height * cpp - cpp
}

/// Tile-offset register value for a rotated plane: the full visible extent.
pub fn rotated_tile_offset(dst: &ClampedRect) -> u32 {
    (dst.height << 16) | dst.width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_locate_is_flat() {
        let o = locate(13, 7, TilingMode::Linear, 4, 8192);
        assert_eq!(o.base, 0);
        assert_eq!((o.x, o.y), (13, 7));
        assert_eq!(linear_offset(o.x, o.y, 4, 8192), 7 * 8192 + 13 * 4);
    }

    #[test]
    fn tiled_residual_fits_one_tile() {
        let o = locate(200, 21, TilingMode::XTiled, 4, 8192);
        assert!(o.x < TILE_WIDTH_BYTES / 4);
        assert!(o.y < TILE_HEIGHT);
        assert_eq!(o.base % TILE_SIZE, 0);
    }

    #[test]
    fn tiled_decomposition_is_exact() {
        // base + tiled(residual) == tiled(original) across strides, pixel
        // sizes and both sides of every tile boundary.
        for &stride in &[2048u32, 8192, 512 * 7] {
            for &cpp in &[2u32, 4] {
                for &x in &[0u32, 1, 127, 128, 129, 255, 256, 500] {
                    for &y in &[0u32, 1, 7, 8, 9, 63, 64, 100] {
                        let o = locate(x, y, TilingMode::XTiled, cpp, stride);
                        assert_eq!(
                            o.base + tiled_address(o.x, o.y, cpp, stride),
                            tiled_address(x, y, cpp, stride),
                            "x={} y={} cpp={} stride={}",
                            x,
                            y,
                            cpp,
                            stride
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn linear_decomposition_is_exact() {
        for &(x, y) in &[(0u32, 0u32), (3, 9), (640, 479)] {
            let o = locate(x, y, TilingMode::Linear, 4, 4096);
            assert_eq!(
                o.base + linear_offset(o.x, o.y, 4, 4096),
                linear_offset(x, y, 4, 4096)
            );
        }
    }

    #[test]
    fn rotation_reflects_the_far_corner() {
        let dst = ClampedRect {
            x: 100,
            y: 50,
            width: 640,
            height: 480,
        };
        let (rx, ry) = rotated_position(&dst, (1920, 1080));
        assert_eq!((rx, ry), (1920 - 740, 1080 - 530));
        assert_eq!(rotated_linear_offset(&dst, 4), 640 * 480 * 4 - 4);
        assert_eq!(rotated_tile_offset(&dst), (480 << 16) | 640);
    }
}
