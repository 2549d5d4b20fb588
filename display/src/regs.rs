//! Display-plane register map
//!
//! Register addresses and field encodings for the three sprite engine
//! generations. Pipe B's register block sits 0x1000 above pipe A's; the
//! low-power engine's second sprite sits 0x100 above the first.
//!
//! All size/position fields are written zero-based (stored value is the
//! dimension minus one); the conversion happens at the write site, these
//! constants only name the fields.

#![allow(dead_code)]

use crate::plane::Pipe;

/// Address distance between the two pipes' register blocks.
const PIPE_STRIDE: u32 = 0x1000;

#[inline]
fn pipe_base(pipe: Pipe) -> u32 {
    pipe.index() * PIPE_STRIDE
}

// ---------------------------------------------------------------------------
// Pipe configuration
// ---------------------------------------------------------------------------

#[inline]
pub fn pipeconf(pipe: Pipe) -> u32 {
    0x70008 + pipe_base(pipe)
}

pub const PIPECONF_ENABLE: u32 = 1 << 31;

// ---------------------------------------------------------------------------
// Primary plane
// ---------------------------------------------------------------------------

#[inline]
pub fn dspcntr(pipe: Pipe) -> u32 {
    0x70180 + pipe_base(pipe)
}

pub const DISPLAY_PLANE_ENABLE: u32 = 1 << 31;

/// Primary plane pixel format field. X/A pairs differ in the low bit;
/// values 0xa-0xd are shared with the sprite engines.
pub const DISPPLANE_PIXFORMAT_MASK: u32 = 0xf << 26;
pub const DISPPLANE_8BPP: u32 = 0x2 << 26;
pub const DISPPLANE_BGRX565: u32 = 0x5 << 26;
pub const DISPPLANE_BGRX888: u32 = 0x6 << 26;
pub const DISPPLANE_BGRA888: u32 = 0x7 << 26;
pub const DISPPLANE_RGBX101010: u32 = 0x8 << 26;
pub const DISPPLANE_RGBA101010: u32 = 0x9 << 26;
pub const DISPPLANE_BGRX101010: u32 = 0xa << 26;
pub const DISPPLANE_BGRA101010: u32 = 0xb << 26;
pub const DISPPLANE_RGBX161616: u32 = 0xc << 26;
pub const DISPPLANE_RGBA161616: u32 = 0xd << 26;
pub const DISPPLANE_RGBX888: u32 = 0xe << 26;
pub const DISPPLANE_RGBA888: u32 = 0xf << 26;

pub const DISPPLANE_180_ROTATION_ENABLE: u32 = 1 << 15;

// ---------------------------------------------------------------------------
// Cursor plane
// ---------------------------------------------------------------------------

#[inline]
pub fn curcntr(pipe: Pipe) -> u32 {
    0x70080 + pipe_base(pipe)
}

/// Cursor mode field; bit 5 selects ARGB over AND/XOR modes.
pub const CURSOR_MODE_MASK: u32 = 0x27;
pub const CURSOR_MODE_128_32B_AX: u32 = 0x02;
pub const CURSOR_MODE_256_32B_AX: u32 = 0x03;
pub const CURSOR_MODE_64_32B_AX: u32 = 0x07;
pub const CURSOR_MODE_128_ARGB_AX: u32 = 0x22;
pub const CURSOR_MODE_256_ARGB_AX: u32 = 0x23;
pub const CURSOR_MODE_64_ARGB_AX: u32 = 0x27;

// ---------------------------------------------------------------------------
// DVS overlay engine (Gen5/Gen6), one sprite per pipe
// ---------------------------------------------------------------------------

const DVS_BASE: u32 = 0x72180;

#[inline]
pub fn dvs_cntr(pipe: Pipe) -> u32 {
    DVS_BASE + pipe_base(pipe)
}
#[inline]
pub fn dvs_linoff(pipe: Pipe) -> u32 {
    DVS_BASE + 0x04 + pipe_base(pipe)
}
#[inline]
pub fn dvs_stride(pipe: Pipe) -> u32 {
    DVS_BASE + 0x08 + pipe_base(pipe)
}
#[inline]
pub fn dvs_pos(pipe: Pipe) -> u32 {
    DVS_BASE + 0x0c + pipe_base(pipe)
}
#[inline]
pub fn dvs_size(pipe: Pipe) -> u32 {
    DVS_BASE + 0x10 + pipe_base(pipe)
}
#[inline]
pub fn dvs_keyval(pipe: Pipe) -> u32 {
    DVS_BASE + 0x14 + pipe_base(pipe)
}
#[inline]
pub fn dvs_keymsk(pipe: Pipe) -> u32 {
    DVS_BASE + 0x18 + pipe_base(pipe)
}
#[inline]
pub fn dvs_surf(pipe: Pipe) -> u32 {
    DVS_BASE + 0x1c + pipe_base(pipe)
}
#[inline]
pub fn dvs_keymax(pipe: Pipe) -> u32 {
    DVS_BASE + 0x20 + pipe_base(pipe)
}
#[inline]
pub fn dvs_tileoff(pipe: Pipe) -> u32 {
    DVS_BASE + 0x24 + pipe_base(pipe)
}
#[inline]
pub fn dvs_scale(pipe: Pipe) -> u32 {
    0x72204 + pipe_base(pipe)
}

pub const DVS_ENABLE: u32 = 1 << 31;
pub const DVS_PIXFORMAT_MASK: u32 = 0x3 << 25;
pub const DVS_FORMAT_YUV422: u32 = 0 << 25;
pub const DVS_FORMAT_RGBX101010: u32 = 1 << 25;
pub const DVS_FORMAT_RGBX888: u32 = 2 << 25;
pub const DVS_FORMAT_RGBX161616: u32 = 3 << 25;
pub const DVS_RGB_ORDER_XBGR: u32 = 1 << 20;
pub const DVS_YUV_BYTE_ORDER_MASK: u32 = 0x3 << 16;
pub const DVS_YUV_ORDER_YUYV: u32 = 0 << 16;
pub const DVS_YUV_ORDER_UYVY: u32 = 1 << 16;
pub const DVS_YUV_ORDER_YVYU: u32 = 2 << 16;
pub const DVS_YUV_ORDER_VYUY: u32 = 3 << 16;
pub const DVS_TRICKLE_FEED_DISABLE: u32 = 1 << 14;
pub const DVS_TILED: u32 = 1 << 10;
pub const DVS_SOURCE_KEY: u32 = 1 << 22;
pub const DVS_DEST_KEY: u32 = 1 << 2;
pub const DVS_SCALE_ENABLE: u32 = 1 << 31;

// ---------------------------------------------------------------------------
// SPR sprite engine (Gen7), one sprite per pipe
// ---------------------------------------------------------------------------

const SPR_BASE: u32 = 0x70280;

#[inline]
pub fn spr_ctl(pipe: Pipe) -> u32 {
    SPR_BASE + pipe_base(pipe)
}
#[inline]
pub fn spr_linoff(pipe: Pipe) -> u32 {
    SPR_BASE + 0x04 + pipe_base(pipe)
}
#[inline]
pub fn spr_stride(pipe: Pipe) -> u32 {
    SPR_BASE + 0x08 + pipe_base(pipe)
}
#[inline]
pub fn spr_pos(pipe: Pipe) -> u32 {
    SPR_BASE + 0x0c + pipe_base(pipe)
}
#[inline]
pub fn spr_size(pipe: Pipe) -> u32 {
    SPR_BASE + 0x10 + pipe_base(pipe)
}
#[inline]
pub fn spr_keyval(pipe: Pipe) -> u32 {
    SPR_BASE + 0x14 + pipe_base(pipe)
}
#[inline]
pub fn spr_keymsk(pipe: Pipe) -> u32 {
    SPR_BASE + 0x18 + pipe_base(pipe)
}
#[inline]
pub fn spr_surf(pipe: Pipe) -> u32 {
    SPR_BASE + 0x1c + pipe_base(pipe)
}
#[inline]
pub fn spr_keymax(pipe: Pipe) -> u32 {
    SPR_BASE + 0x20 + pipe_base(pipe)
}
#[inline]
pub fn spr_tileoff(pipe: Pipe) -> u32 {
    SPR_BASE + 0x24 + pipe_base(pipe)
}
#[inline]
pub fn spr_scale(pipe: Pipe) -> u32 {
    0x70304 + pipe_base(pipe)
}

pub const SPRITE_ENABLE: u32 = 1 << 31;
pub const SPRITE_PIXFORMAT_MASK: u32 = 0x7 << 25;
pub const SPRITE_FORMAT_YUV422: u32 = 0 << 25;
pub const SPRITE_FORMAT_RGBX101010: u32 = 1 << 25;
pub const SPRITE_FORMAT_RGBX888: u32 = 2 << 25;
pub const SPRITE_FORMAT_RGBX161616: u32 = 3 << 25;
pub const SPRITE_RGB_ORDER_RGBX: u32 = 1 << 20;
pub const SPRITE_YUV_BYTE_ORDER_MASK: u32 = 0x3 << 16;
pub const SPRITE_YUV_ORDER_YUYV: u32 = 0 << 16;
pub const SPRITE_YUV_ORDER_UYVY: u32 = 1 << 16;
pub const SPRITE_YUV_ORDER_YVYU: u32 = 2 << 16;
pub const SPRITE_YUV_ORDER_VYUY: u32 = 3 << 16;
pub const SPRITE_TRICKLE_FEED_DISABLE: u32 = 1 << 14;
pub const SPRITE_TILED: u32 = 1 << 10;
pub const SPRITE_SOURCE_KEY: u32 = 1 << 22;
pub const SPRITE_DEST_KEY: u32 = 1 << 2;
pub const SPRITE_SCALE_ENABLE: u32 = 1 << 31;

// ---------------------------------------------------------------------------
// SP sprite engine (Gen7-LP), two sprites per pipe
// ---------------------------------------------------------------------------

const SP_BASE: u32 = 0x72180;
const SP_STRIDE_PER_SPRITE: u32 = 0x100;

#[inline]
fn sp_reg(offset: u32, pipe: Pipe, sprite: u8) -> u32 {
    SP_BASE + offset + pipe_base(pipe) + u32::from(sprite) * SP_STRIDE_PER_SPRITE
}

#[inline]
pub fn sp_cntr(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x00, pipe, sprite)
}
#[inline]
pub fn sp_linoff(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x04, pipe, sprite)
}
#[inline]
pub fn sp_stride(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x08, pipe, sprite)
}
#[inline]
pub fn sp_pos(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x0c, pipe, sprite)
}
#[inline]
pub fn sp_size(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x10, pipe, sprite)
}
#[inline]
pub fn sp_keyminval(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x14, pipe, sprite)
}
#[inline]
pub fn sp_keymsk(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x18, pipe, sprite)
}
#[inline]
pub fn sp_surf(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x1c, pipe, sprite)
}
#[inline]
pub fn sp_keymaxval(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x20, pipe, sprite)
}
#[inline]
pub fn sp_tileoff(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x24, pipe, sprite)
}
#[inline]
pub fn sp_constalpha(pipe: Pipe, sprite: u8) -> u32 {
    sp_reg(0x48, pipe, sprite)
}

pub const SP_ENABLE: u32 = 1 << 31;
pub const SP_PIXFORMAT_MASK: u32 = 0xf << 26;
pub const SP_FORMAT_YUV422: u32 = 0x0 << 26;
pub const SP_FORMAT_BGR565: u32 = 0x5 << 26;
pub const SP_FORMAT_BGRX8888: u32 = 0x6 << 26;
pub const SP_FORMAT_BGRA8888: u32 = 0x7 << 26;
pub const SP_FORMAT_RGBX1010102: u32 = 0x8 << 26;
pub const SP_FORMAT_RGBA1010102: u32 = 0x9 << 26;
pub const SP_FORMAT_RGBX8888: u32 = 0xe << 26;
pub const SP_FORMAT_RGBA8888: u32 = 0xf << 26;
pub const SP_YUV_BYTE_ORDER_MASK: u32 = 0x3 << 16;
pub const SP_YUV_ORDER_YUYV: u32 = 0 << 16;
pub const SP_YUV_ORDER_UYVY: u32 = 1 << 16;
pub const SP_YUV_ORDER_YVYU: u32 = 2 << 16;
pub const SP_YUV_ORDER_VYUY: u32 = 3 << 16;
pub const SP_TILED: u32 = 1 << 10;
pub const SP_SOURCE_KEY: u32 = 1 << 22;

/// Z-order control bits in the SP control register.
pub const SP_ZORDER_ENABLE: u32 = 1 << 0;
pub const SP_FORCE_BOTTOM: u32 = 1 << 2;

/// Constant-alpha register enable bit; low bits carry the alpha value.
pub const SP_ALPHA_EN: u32 = 1 << 31;

// ---------------------------------------------------------------------------
// FIFO watermark control (Gen7-LP self-refresh)
// ---------------------------------------------------------------------------

pub const FW_BLC_SELF: u32 = 0x6500;
/// Self-refresh power-down enable. Must be clear while any sprite scans out.
pub const FW_CSPWRDWNEN: u32 = 1 << 15;
