//! Pixel format translation
//!
//! Maps abstract pixel formats to control-register encodings per sprite
//! engine, and knows which X/A format pairs differ only in alpha so the
//! alpha toggle and z-order arbitration can rewrite a live format field.
//!
//! All lookups are pure; callers merge the returned bits into the plane's
//! control register image.

use crate::plane::Generation;
use crate::regs;

/// Abstract pixel formats accepted at the API boundary.
///
/// Names follow the little-endian packed convention: `Xrgb8888` is b, g, r,
/// x in memory order. YUV formats are all 4:2:2 packed, differing only in
/// component order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit paletted; primary planes only, no sprite engine accepts it.
    C8,
    Rgb565,
    Xrgb8888,
    Argb8888,
    Xbgr8888,
    Abgr8888,
    Xbgr2101010,
    Abgr2101010,
    Yuyv,
    Yvyu,
    Uyvy,
    Vyuy,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn cpp(self) -> u32 {
        match self {
            Self::C8 => 1,
            Self::Rgb565 | Self::Yuyv | Self::Yvyu | Self::Uyvy | Self::Vyuy => 2,
            _ => 4,
        }
    }
}

/// A resolved format: control-register bits plus the pixel size the offset
/// and watermark math needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatEncoding {
    pub ctrl: u32,
    pub cpp: u32,
}

impl FormatEncoding {
    const fn new(ctrl: u32, cpp: u32) -> Self {
        Self { ctrl, cpp }
    }
}

/// Formats the Gen5 DVS engine accepts.
pub const GEN5_FORMATS: &[PixelFormat] = &[
    PixelFormat::Xrgb8888,
    PixelFormat::Yuyv,
    PixelFormat::Yvyu,
    PixelFormat::Uyvy,
    PixelFormat::Vyuy,
];

/// Formats the Gen6 DVS and Gen7 SPR engines accept.
pub const GEN6_FORMATS: &[PixelFormat] = &[
    PixelFormat::Xbgr8888,
    PixelFormat::Xrgb8888,
    PixelFormat::Yuyv,
    PixelFormat::Yvyu,
    PixelFormat::Uyvy,
    PixelFormat::Vyuy,
];

/// Formats the Gen7-LP SP engine accepts.
pub const GEN7LP_FORMATS: &[PixelFormat] = &[
    PixelFormat::Rgb565,
    PixelFormat::Abgr8888,
    PixelFormat::Argb8888,
    PixelFormat::Xbgr8888,
    PixelFormat::Xrgb8888,
    PixelFormat::Xbgr2101010,
    PixelFormat::Abgr2101010,
    PixelFormat::Yuyv,
    PixelFormat::Yvyu,
    PixelFormat::Uyvy,
    PixelFormat::Vyuy,
];

/// Supported format set for a generation's sprite planes.
pub fn supported_formats(generation: Generation) -> &'static [PixelFormat] {
    match generation {
        Generation::Gen5 => GEN5_FORMATS,
        Generation::Gen6 | Generation::Gen7 => GEN6_FORMATS,
        Generation::Gen7Lp => GEN7LP_FORMATS,
    }
}

/// Default opaque encoding the DVS/SPR paths fall back to when handed a
/// format outside their set.
pub const DVS_FALLBACK: FormatEncoding = FormatEncoding::new(regs::DVS_FORMAT_RGBX888, 4);
pub const SPR_FALLBACK: FormatEncoding = FormatEncoding::new(regs::SPRITE_FORMAT_RGBX888, 4);

/// DVS (Gen5/Gen6) control-register encoding.
pub fn dvs_encoding(format: PixelFormat, gen6: bool) -> Option<FormatEncoding> {
    let enc = match format {
        PixelFormat::Xbgr8888 if gen6 => {
            FormatEncoding::new(regs::DVS_FORMAT_RGBX888 | regs::DVS_RGB_ORDER_XBGR, 4)
        }
        PixelFormat::Xrgb8888 => FormatEncoding::new(regs::DVS_FORMAT_RGBX888, 4),
        PixelFormat::Yuyv => {
            FormatEncoding::new(regs::DVS_FORMAT_YUV422 | regs::DVS_YUV_ORDER_YUYV, 2)
        }
        PixelFormat::Yvyu => {
            FormatEncoding::new(regs::DVS_FORMAT_YUV422 | regs::DVS_YUV_ORDER_YVYU, 2)
        }
        PixelFormat::Uyvy => {
            FormatEncoding::new(regs::DVS_FORMAT_YUV422 | regs::DVS_YUV_ORDER_UYVY, 2)
        }
        PixelFormat::Vyuy => {
            FormatEncoding::new(regs::DVS_FORMAT_YUV422 | regs::DVS_YUV_ORDER_VYUY, 2)
        }
        _ => return None,
    };
    Some(enc)
}

/// SPR (Gen7) control-register encoding.
pub fn spr_encoding(format: PixelFormat) -> Option<FormatEncoding> {
    let enc = match format {
        PixelFormat::Xbgr8888 => FormatEncoding::new(regs::SPRITE_FORMAT_RGBX888, 4),
        PixelFormat::Xrgb8888 => {
            FormatEncoding::new(regs::SPRITE_FORMAT_RGBX888 | regs::SPRITE_RGB_ORDER_RGBX, 4)
        }
        PixelFormat::Yuyv => {
            FormatEncoding::new(regs::SPRITE_FORMAT_YUV422 | regs::SPRITE_YUV_ORDER_YUYV, 2)
        }
        PixelFormat::Yvyu => {
            FormatEncoding::new(regs::SPRITE_FORMAT_YUV422 | regs::SPRITE_YUV_ORDER_YVYU, 2)
        }
        PixelFormat::Uyvy => {
            FormatEncoding::new(regs::SPRITE_FORMAT_YUV422 | regs::SPRITE_YUV_ORDER_UYVY, 2)
        }
        PixelFormat::Vyuy => {
            FormatEncoding::new(regs::SPRITE_FORMAT_YUV422 | regs::SPRITE_YUV_ORDER_VYUY, 2)
        }
        _ => return None,
    };
    Some(enc)
}

/// SP (Gen7-LP) control-register encoding.
pub fn sp_encoding(format: PixelFormat) -> Option<FormatEncoding> {
    let enc = match format {
        PixelFormat::Yuyv => {
            FormatEncoding::new(regs::SP_FORMAT_YUV422 | regs::SP_YUV_ORDER_YUYV, 2)
        }
        PixelFormat::Yvyu => {
            FormatEncoding::new(regs::SP_FORMAT_YUV422 | regs::SP_YUV_ORDER_YVYU, 2)
        }
        PixelFormat::Uyvy => {
            FormatEncoding::new(regs::SP_FORMAT_YUV422 | regs::SP_YUV_ORDER_UYVY, 2)
        }
        PixelFormat::Vyuy => {
            FormatEncoding::new(regs::SP_FORMAT_YUV422 | regs::SP_YUV_ORDER_VYUY, 2)
        }
        PixelFormat::Rgb565 => FormatEncoding::new(regs::SP_FORMAT_BGR565, 2),
        PixelFormat::Xrgb8888 => FormatEncoding::new(regs::SP_FORMAT_BGRX8888, 4),
        PixelFormat::Argb8888 => FormatEncoding::new(regs::SP_FORMAT_BGRA8888, 4),
        PixelFormat::Xbgr2101010 => FormatEncoding::new(regs::SP_FORMAT_RGBX1010102, 4),
        PixelFormat::Abgr2101010 => FormatEncoding::new(regs::SP_FORMAT_RGBA1010102, 4),
        PixelFormat::Xbgr8888 => FormatEncoding::new(regs::SP_FORMAT_RGBX8888, 4),
        PixelFormat::Abgr8888 => FormatEncoding::new(regs::SP_FORMAT_RGBA8888, 4),
        PixelFormat::C8 => return None,
    };
    Some(enc)
}

// ---------------------------------------------------------------------------
// Alpha-pair rewrites
//
// The alpha toggle and the z-order arbiter rewrite an already-programmed
// format field in place. Each function maps the current field value to the
// X or A member of its pair; `None` means the field has no alpha variant
// (the caller logs and leaves the register alone).
// ---------------------------------------------------------------------------

/// Rewrite a primary plane format field for the requested alpha state.
///
/// `allow_16bpc` gates the 16:16:16:16 pair, which only the primary planes
/// of the first two pipes implement.
pub fn primary_with_alpha(field: u32, alpha: bool, allow_16bpc: bool) -> Option<u32> {
    use crate::regs::*;
    let new = match field {
        DISPPLANE_RGBX888 | DISPPLANE_RGBA888 => {
            if alpha {
                DISPPLANE_RGBA888
            } else {
                DISPPLANE_RGBX888
            }
        }
        DISPPLANE_BGRX888 | DISPPLANE_BGRA888 => {
            if alpha {
                DISPPLANE_BGRA888
            } else {
                DISPPLANE_BGRX888
            }
        }
        DISPPLANE_RGBX101010 | DISPPLANE_RGBA101010 => {
            if alpha {
                DISPPLANE_RGBA101010
            } else {
                DISPPLANE_RGBX101010
            }
        }
        DISPPLANE_BGRX101010 | DISPPLANE_BGRA101010 => {
            if alpha {
                DISPPLANE_BGRA101010
            } else {
                DISPPLANE_BGRX101010
            }
        }
        DISPPLANE_RGBX161616 | DISPPLANE_RGBA161616 if allow_16bpc => {
            if alpha {
                DISPPLANE_RGBA161616
            } else {
                DISPPLANE_RGBX161616
            }
        }
        // Alpha-less formats keep their encoding.
        DISPPLANE_BGRX565 => DISPPLANE_BGRX565,
        DISPPLANE_8BPP => DISPPLANE_8BPP,
        _ => return None,
    };
    Some(new)
}

/// Rewrite an SP sprite format field for the requested alpha state.
pub fn sp_with_alpha(field: u32, alpha: bool) -> Option<u32> {
    use crate::regs::*;
    let new = match field {
        SP_FORMAT_BGRX8888 | SP_FORMAT_BGRA8888 => {
            if alpha {
                SP_FORMAT_BGRA8888
            } else {
                SP_FORMAT_BGRX8888
            }
        }
        SP_FORMAT_RGBX8888 | SP_FORMAT_RGBA8888 => {
            if alpha {
                SP_FORMAT_RGBA8888
            } else {
                SP_FORMAT_RGBX8888
            }
        }
        SP_FORMAT_RGBX1010102 | SP_FORMAT_RGBA1010102 => {
            if alpha {
                SP_FORMAT_RGBA1010102
            } else {
                SP_FORMAT_RGBX1010102
            }
        }
        SP_FORMAT_YUV422 => SP_FORMAT_YUV422,
        SP_FORMAT_BGR565 => SP_FORMAT_BGR565,
        _ => return None,
    };
    Some(new)
}

/// Rewrite a cursor mode field for the requested alpha state.
pub fn cursor_with_alpha(field: u32, alpha: bool) -> Option<u32> {
    use crate::regs::*;
    let new = match field {
        CURSOR_MODE_64_32B_AX | CURSOR_MODE_64_ARGB_AX => {
            if alpha {
                CURSOR_MODE_64_ARGB_AX
            } else {
                CURSOR_MODE_64_32B_AX
            }
        }
        CURSOR_MODE_128_32B_AX | CURSOR_MODE_128_ARGB_AX => {
            if alpha {
                CURSOR_MODE_128_ARGB_AX
            } else {
                CURSOR_MODE_128_32B_AX
            }
        }
        CURSOR_MODE_256_32B_AX | CURSOR_MODE_256_ARGB_AX => {
            if alpha {
                CURSOR_MODE_256_ARGB_AX
            } else {
                CURSOR_MODE_256_32B_AX
            }
        }
        _ => return None,
    };
    Some(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs;

    #[test]
    fn uyvy_selects_yuv422_with_order_bits() {
        let enc = sp_encoding(PixelFormat::Uyvy).unwrap();
        assert_eq!(enc.ctrl, regs::SP_FORMAT_YUV422 | regs::SP_YUV_ORDER_UYVY);
        assert_eq!(enc.cpp, 2);

        let enc = spr_encoding(PixelFormat::Uyvy).unwrap();
        assert_eq!(
            enc.ctrl,
            regs::SPRITE_FORMAT_YUV422 | regs::SPRITE_YUV_ORDER_UYVY
        );
        assert_eq!(enc.cpp, 2);
    }

    #[test]
    fn gen5_rejects_xbgr() {
        assert!(dvs_encoding(PixelFormat::Xbgr8888, false).is_none());
        assert!(dvs_encoding(PixelFormat::Xbgr8888, true).is_some());
    }

    #[test]
    fn format_set_sizes_per_generation() {
        assert_eq!(supported_formats(Generation::Gen5).len(), 5);
        assert_eq!(supported_formats(Generation::Gen6).len(), 6);
        assert_eq!(supported_formats(Generation::Gen7).len(), 6);
        assert_eq!(supported_formats(Generation::Gen7Lp).len(), 11);
    }

    #[test]
    fn sp_engine_covers_its_whole_set() {
        for &f in GEN7LP_FORMATS {
            assert!(sp_encoding(f).is_some(), "{:?}", f);
        }
        assert!(sp_encoding(PixelFormat::C8).is_none());
    }

    #[test]
    fn primary_alpha_pairs_roundtrip() {
        let a = primary_with_alpha(regs::DISPPLANE_BGRX888, true, false).unwrap();
        assert_eq!(a, regs::DISPPLANE_BGRA888);
        let x = primary_with_alpha(a, false, false).unwrap();
        assert_eq!(x, regs::DISPPLANE_BGRX888);
        // 16 bpc only where allowed
        assert!(primary_with_alpha(regs::DISPPLANE_RGBX161616, true, false).is_none());
        assert_eq!(
            primary_with_alpha(regs::DISPPLANE_RGBX161616, true, true),
            Some(regs::DISPPLANE_RGBA161616)
        );
    }

    #[test]
    fn alpha_less_formats_are_kept() {
        assert_eq!(
            sp_with_alpha(regs::SP_FORMAT_YUV422, true),
            Some(regs::SP_FORMAT_YUV422)
        );
        assert_eq!(
            primary_with_alpha(regs::DISPPLANE_BGRX565, true, false),
            Some(regs::DISPPLANE_BGRX565)
        );
    }

    #[test]
    fn cursor_alpha_pairs() {
        assert_eq!(
            cursor_with_alpha(regs::CURSOR_MODE_128_32B_AX, true),
            Some(regs::CURSOR_MODE_128_ARGB_AX)
        );
        assert_eq!(
            cursor_with_alpha(regs::CURSOR_MODE_64_ARGB_AX, false),
            Some(regs::CURSOR_MODE_64_32B_AX)
        );
        assert_eq!(cursor_with_alpha(0, true), None);
    }
}
