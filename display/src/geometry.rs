//! Destination rectangle clamping
//!
//! Plane destination rectangles arrive in signed screen coordinates and may
//! hang off any edge of the active surface. The hardware only takes
//! rectangles fully inside it, so the commit path clamps first; a rectangle
//! that ends up empty means "nothing to display" and is not an error.
//!
//! Source crops are the caller's contract: when a destination edge is
//! shaved off here, the caller is expected to have pre-adjusted the source
//! offset to match. This module never rescales the source.

/// A destination rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A rectangle known to lie inside the active surface, with non-negative
/// origin and non-zero extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClampedRect {
    /// True if the rectangle covers the surface exactly.
    pub fn covers(&self, bounds: (u32, u32)) -> bool {
        self.x == 0 && self.y == 0 && self.width == bounds.0 && self.height == bounds.1
    }
}

/// Clamp one axis: origin `p`, extent `len`, surface extent `limit`.
fn clamp_axis(p: i32, len: u32, limit: u32) -> Option<(u32, u32)> {
    let mut p = i64::from(p);
    let mut len = i64::from(len);
    let limit = i64::from(limit);

    if p < 0 && p + len > 0 {
        len += p;
        p = 0;
    }
    if p + len <= 0 {
        return None;
    }
    if p >= limit {
        return None;
    }
    if p + len > limit {
        len = limit - p;
    }
    if len == 0 {
        return None;
    }
    Some((p as u32, len as u32))
}

/// Clamp `rect` against the active surface `bounds` (width, height).
///
/// `None` means the plane has nothing visible to display.
pub fn clamp_to_surface(rect: Rect, bounds: (u32, u32)) -> Option<ClampedRect> {
    let (x, width) = clamp_axis(rect.x, rect.width, bounds.0)?;
    let (y, height) = clamp_axis(rect.y, rect.height, bounds.1)?;
    Some(ClampedRect {
        x,
        y,
        width,
        height,
    })
}
