//! Plane identity and per-generation register programming
//!
//! Three sprite engine generations share one commit shape (stride, position,
//! offset, size, [scale], control, surface address last, posting read) but
//! differ in register layout, format encodings, scaling capability and
//! workarounds:
//!
//! - **DVS** (Gen5/Gen6): one sprite per pipe, scaler always present, Gen5
//!   programs it unconditionally, Gen6 must disable trickle feed.
//! - **SPR** (Gen7): one sprite per pipe, scaler gated by the low-power
//!   watermark workaround (sequenced in [`crate::device`]), trickle feed
//!   always disabled.
//! - **SP** (Gen7-LP): two sprites per pipe, no scaler, 180-degree rotation,
//!   z-order control bits, and the FIFO self-refresh workaround.
//!
//! Everything here is a leaf: pure register sequences over a
//! [`DisplayHal`], no locking, no residency bookkeeping.

use crate::colorkey::{ColorKey, ColorKeyFlags};
use crate::error::{PlaneError, Result};
use crate::format::FormatEncoding;
use crate::geometry::ClampedRect;
use crate::hal::{BufferHandle, DisplayHal, Framebuffer, PinnedSurface, TilingMode};
use crate::offset::{
    linear_offset, locate, rotated_linear_offset, rotated_position, rotated_tile_offset,
};
use crate::regs;
use crate::scale::scale_config;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// One display pipe's scanout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipe {
    A,
    B,
}

impl Pipe {
    pub const COUNT: usize = 2;

    #[inline]
    pub fn index(self) -> u32 {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::B),
            _ => None,
        }
    }
}

/// What a plane contributes to its pipe's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneRole {
    Primary,
    Sprite(u8),
    Cursor,
}

/// Identity of one plane on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneId {
    pub pipe: Pipe,
    pub role: PlaneRole,
}

impl PlaneId {
    pub fn new(pipe: Pipe, role: PlaneRole) -> Self {
        Self { pipe, role }
    }
}

/// Display controller generation, fixed at device construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// First DVS revision.
    Gen5,
    /// Second DVS revision (adds XBGR, trickle-feed workaround).
    Gen6,
    /// SPR engine.
    Gen7,
    /// Low-power SP engine, two sprites per pipe.
    Gen7Lp,
}

impl Generation {
    /// Sprites available on each pipe.
    pub fn sprites_per_pipe(self) -> u8 {
        match self {
            Self::Gen7Lp => 2,
            _ => 1,
        }
    }

    /// Whether a full-screen sprite may power down the primary plane.
    /// Never applied on the low-power engine.
    pub fn primary_cover_optimization(self) -> bool {
        !matches!(self, Self::Gen7Lp)
    }
}

/// Mutable per-plane bookkeeping held by the device.
#[derive(Debug)]
pub(crate) struct PlaneState {
    pub id: PlaneId,
    pub enabled: bool,
    pub bound: Option<BufferHandle>,
    /// Bumped on every rebind; used to detect concurrent mutation across
    /// the unlocked vblank window.
    pub generation_counter: u64,
}

impl PlaneState {
    pub fn new(id: PlaneId) -> Self {
        Self {
            id,
            enabled: false,
            bound: None,
            generation_counter: 0,
        }
    }
}

/// Everything a generation's commit sequence needs, computed and validated
/// up front by the device.
pub(crate) struct CommitParams<'a> {
    pub fb: &'a Framebuffer,
    pub encoding: FormatEncoding,
    pub surface: PinnedSurface,
    pub dst: ClampedRect,
    pub src_x: u32,
    pub src_y: u32,
    pub src_w: u32,
    pub src_h: u32,
    /// Active surface extent, for rotated coordinate derivation.
    pub active: (u32, u32),
}

#[inline]
fn packed_pos(x: u32, y: u32) -> u32 {
    (y << 16) | x
}

#[inline]
fn packed_size(dst: &ClampedRect) -> u32 {
    ((dst.height - 1) << 16) | (dst.width - 1)
}

// ---------------------------------------------------------------------------
// DVS engine (Gen5/Gen6)
// ---------------------------------------------------------------------------

pub(crate) fn dvs_commit<H: DisplayHal>(hal: &H, pipe: Pipe, gen6: bool, p: &CommitParams<'_>) {
    let mut dvscntr = hal.read(regs::dvs_cntr(pipe));
    dvscntr &= !(regs::DVS_PIXFORMAT_MASK
        | regs::DVS_RGB_ORDER_XBGR
        | regs::DVS_YUV_BYTE_ORDER_MASK
        | regs::DVS_TILED);
    dvscntr |= p.encoding.ctrl;

    let tiled = p.surface.tiling != TilingMode::Linear;
    if tiled {
        dvscntr |= regs::DVS_TILED;
    }
    if gen6 {
        // Must be off while the sprite scans out.
        dvscntr |= regs::DVS_TRICKLE_FEED_DISABLE;
    }
    dvscntr |= regs::DVS_ENABLE;

    hal.update_sprite_watermarks(pipe, p.dst.width - 1, p.encoding.cpp);

    // Gen5 keeps the scaler engaged even at unity.
    let dvsscale = scale_config(
        (p.src_w, p.src_h),
        (p.dst.width, p.dst.height),
        !gen6,
    );

    hal.write(regs::dvs_stride(pipe), p.fb.stride);
    hal.write(regs::dvs_pos(pipe), packed_pos(p.dst.x, p.dst.y));

    let off = locate(p.src_x, p.src_y, p.surface.tiling, p.encoding.cpp, p.fb.stride);
    if tiled {
        hal.write(regs::dvs_tileoff(pipe), packed_pos(off.x, off.y));
    } else {
        hal.write(
            regs::dvs_linoff(pipe),
            linear_offset(off.x, off.y, p.encoding.cpp, p.fb.stride),
        );
    }

    hal.write(regs::dvs_size(pipe), packed_size(&p.dst));
    hal.write(regs::dvs_scale(pipe), dvsscale);
    hal.write(regs::dvs_cntr(pipe), dvscntr);
    hal.write(regs::dvs_surf(pipe), p.surface.base_address + off.base);
    hal.posting_read(regs::dvs_surf(pipe));
}

pub(crate) fn dvs_disable<H: DisplayHal>(hal: &H, pipe: Pipe) {
    hal.write(
        regs::dvs_cntr(pipe),
        hal.read(regs::dvs_cntr(pipe)) & !regs::DVS_ENABLE,
    );
    // Can't leave the scaler enabled.
    hal.write(regs::dvs_scale(pipe), 0);
    // Flush the double-buffered update.
    hal.write(regs::dvs_surf(pipe), 0);
    hal.posting_read(regs::dvs_surf(pipe));
}

pub(crate) fn dvs_set_colorkey<H: DisplayHal>(hal: &H, pipe: Pipe, key: &ColorKey) {
    hal.write(regs::dvs_keyval(pipe), key.min_value);
    hal.write(regs::dvs_keymax(pipe), key.max_value);
    hal.write(regs::dvs_keymsk(pipe), key.channel_mask);

    let mut dvscntr = hal.read(regs::dvs_cntr(pipe));
    dvscntr &= !(regs::DVS_SOURCE_KEY | regs::DVS_DEST_KEY);
    if key.flags.contains(ColorKeyFlags::DESTINATION) {
        dvscntr |= regs::DVS_DEST_KEY;
    } else if key.flags.contains(ColorKeyFlags::SOURCE) {
        dvscntr |= regs::DVS_SOURCE_KEY;
    }
    hal.write(regs::dvs_cntr(pipe), dvscntr);

    hal.posting_read(regs::dvs_keymsk(pipe));
}

pub(crate) fn dvs_get_colorkey<H: DisplayHal>(hal: &H, pipe: Pipe) -> ColorKey {
    let dvscntr = hal.read(regs::dvs_cntr(pipe));
    let flags = if dvscntr & regs::DVS_DEST_KEY != 0 {
        ColorKeyFlags::DESTINATION
    } else if dvscntr & regs::DVS_SOURCE_KEY != 0 {
        ColorKeyFlags::SOURCE
    } else {
        ColorKeyFlags::NONE
    };
    ColorKey {
        min_value: hal.read(regs::dvs_keyval(pipe)),
        max_value: hal.read(regs::dvs_keymax(pipe)),
        channel_mask: hal.read(regs::dvs_keymsk(pipe)),
        flags,
    }
}

// ---------------------------------------------------------------------------
// SPR engine (Gen7)
// ---------------------------------------------------------------------------

/// The sprite watermark report and the scaling workaround happen before
/// this is called; `sprscale` arrives precomputed because the workaround
/// decision depends on it.
pub(crate) fn spr_commit<H: DisplayHal>(hal: &H, pipe: Pipe, p: &CommitParams<'_>, sprscale: u32) {
    let mut sprctl = hal.read(regs::spr_ctl(pipe));
    sprctl &= !(regs::SPRITE_PIXFORMAT_MASK
        | regs::SPRITE_RGB_ORDER_RGBX
        | regs::SPRITE_YUV_BYTE_ORDER_MASK
        | regs::SPRITE_TILED);
    sprctl |= p.encoding.ctrl;

    let tiled = p.surface.tiling != TilingMode::Linear;
    if tiled {
        sprctl |= regs::SPRITE_TILED;
    }
    // Must be off while the sprite scans out.
    sprctl |= regs::SPRITE_TRICKLE_FEED_DISABLE;
    sprctl |= regs::SPRITE_ENABLE;

    hal.write(regs::spr_stride(pipe), p.fb.stride);
    hal.write(regs::spr_pos(pipe), packed_pos(p.dst.x, p.dst.y));

    let off = locate(p.src_x, p.src_y, p.surface.tiling, p.encoding.cpp, p.fb.stride);
    if tiled {
        hal.write(regs::spr_tileoff(pipe), packed_pos(off.x, off.y));
    } else {
        hal.write(
            regs::spr_linoff(pipe),
            linear_offset(off.x, off.y, p.encoding.cpp, p.fb.stride),
        );
    }

    hal.write(regs::spr_size(pipe), packed_size(&p.dst));
    hal.write(regs::spr_scale(pipe), sprscale);
    hal.write(regs::spr_ctl(pipe), sprctl);
    hal.write(regs::spr_surf(pipe), p.surface.base_address + off.base);
    hal.posting_read(regs::spr_surf(pipe));
}

pub(crate) fn spr_disable<H: DisplayHal>(hal: &H, pipe: Pipe) {
    hal.write(
        regs::spr_ctl(pipe),
        hal.read(regs::spr_ctl(pipe)) & !regs::SPRITE_ENABLE,
    );
    // Can't leave the scaler enabled.
    hal.write(regs::spr_scale(pipe), 0);
    // Flush the double-buffered update.
    hal.write(regs::spr_surf(pipe), 0);
    hal.posting_read(regs::spr_surf(pipe));
}

pub(crate) fn spr_set_colorkey<H: DisplayHal>(hal: &H, pipe: Pipe, key: &ColorKey) {
    hal.write(regs::spr_keyval(pipe), key.min_value);
    hal.write(regs::spr_keymax(pipe), key.max_value);
    hal.write(regs::spr_keymsk(pipe), key.channel_mask);

    let mut sprctl = hal.read(regs::spr_ctl(pipe));
    sprctl &= !(regs::SPRITE_SOURCE_KEY | regs::SPRITE_DEST_KEY);
    if key.flags.contains(ColorKeyFlags::DESTINATION) {
        sprctl |= regs::SPRITE_DEST_KEY;
    } else if key.flags.contains(ColorKeyFlags::SOURCE) {
        sprctl |= regs::SPRITE_SOURCE_KEY;
    }
    hal.write(regs::spr_ctl(pipe), sprctl);

    hal.posting_read(regs::spr_keymsk(pipe));
}

pub(crate) fn spr_get_colorkey<H: DisplayHal>(hal: &H, pipe: Pipe) -> ColorKey {
    let sprctl = hal.read(regs::spr_ctl(pipe));
    let flags = if sprctl & regs::SPRITE_DEST_KEY != 0 {
        ColorKeyFlags::DESTINATION
    } else if sprctl & regs::SPRITE_SOURCE_KEY != 0 {
        ColorKeyFlags::SOURCE
    } else {
        ColorKeyFlags::NONE
    };
    ColorKey {
        min_value: hal.read(regs::spr_keyval(pipe)),
        max_value: hal.read(regs::spr_keymax(pipe)),
        channel_mask: hal.read(regs::spr_keymsk(pipe)),
        flags,
    }
}

// ---------------------------------------------------------------------------
// SP engine (Gen7-LP)
// ---------------------------------------------------------------------------

pub(crate) fn sp_commit<H: DisplayHal>(hal: &H, pipe: Pipe, sprite: u8, p: &CommitParams<'_>) {
    let mut spcntr = hal.read(regs::sp_cntr(pipe, sprite));
    spcntr &= !(regs::SP_PIXFORMAT_MASK | regs::SP_YUV_BYTE_ORDER_MASK | regs::SP_TILED);
    spcntr |= p.encoding.ctrl;

    let tiled = p.surface.tiling != TilingMode::Linear;
    if tiled {
        spcntr |= regs::SP_TILED;
    }
    spcntr |= regs::SP_ENABLE;

    // Rotation is sticky plane configuration; honor whatever is programmed.
    let rotate = spcntr & regs::DISPPLANE_180_ROTATION_ENABLE != 0;

    // Self-refresh must be off while any sprite scans out. Leave it alone
    // if it is already off.
    let fw = hal.read(regs::FW_BLC_SELF);
    if fw & regs::FW_CSPWRDWNEN != 0 {
        hal.write(regs::FW_BLC_SELF, fw & !regs::FW_CSPWRDWNEN);
    }

    hal.update_sprite_watermarks(pipe, p.dst.width - 1, p.encoding.cpp);

    hal.write(regs::sp_stride(pipe, sprite), p.fb.stride);
    if rotate {
        let (rx, ry) = rotated_position(&p.dst, p.active);
        hal.write(regs::sp_pos(pipe, sprite), packed_pos(rx, ry));
    } else {
        hal.write(regs::sp_pos(pipe, sprite), packed_pos(p.dst.x, p.dst.y));
    }

    let off = locate(p.src_x, p.src_y, p.surface.tiling, p.encoding.cpp, p.fb.stride);
    if tiled {
        if rotate {
            hal.write(regs::sp_tileoff(pipe, sprite), rotated_tile_offset(&p.dst));
        } else {
            hal.write(regs::sp_tileoff(pipe, sprite), packed_pos(off.x, off.y));
        }
    } else if rotate {
        hal.write(
            regs::sp_linoff(pipe, sprite),
            rotated_linear_offset(&p.dst, p.encoding.cpp),
        );
    } else {
        hal.write(
            regs::sp_linoff(pipe, sprite),
            linear_offset(off.x, off.y, p.encoding.cpp, p.fb.stride),
        );
    }

    hal.write(regs::sp_size(pipe, sprite), packed_size(&p.dst));
    hal.write(regs::sp_cntr(pipe, sprite), spcntr);
    hal.write(
        regs::sp_surf(pipe, sprite),
        p.surface.base_address + off.base,
    );
    hal.posting_read(regs::sp_surf(pipe, sprite));
}

pub(crate) fn sp_disable<H: DisplayHal>(hal: &H, pipe: Pipe, sprite: u8, restore_self_refresh: bool) {
    hal.write(
        regs::sp_cntr(pipe, sprite),
        hal.read(regs::sp_cntr(pipe, sprite)) & !regs::SP_ENABLE,
    );
    if restore_self_refresh {
        hal.write(regs::FW_BLC_SELF, regs::FW_CSPWRDWNEN);
    }
    // Flush the double-buffered update.
    hal.write(regs::sp_surf(pipe, sprite), 0);
    hal.posting_read(regs::sp_surf(pipe, sprite));
}

pub(crate) fn sp_set_colorkey<H: DisplayHal>(
    hal: &H,
    pipe: Pipe,
    sprite: u8,
    key: &ColorKey,
) -> Result<()> {
    // The SP engine only does source keying and constant alpha.
    if !key
        .flags
        .intersects(ColorKeyFlags::SOURCE | ColorKeyFlags::ALPHA)
    {
        return Err(PlaneError::UnsupportedOperation {
            operation: "color key mode on the low-power sprite engine",
        });
    }

    hal.write(regs::sp_keyminval(pipe, sprite), key.min_value);
    hal.write(regs::sp_keymaxval(pipe, sprite), key.max_value);
    hal.write(regs::sp_keymsk(pipe, sprite), key.channel_mask);

    let mut spcntr = hal.read(regs::sp_cntr(pipe, sprite));
    spcntr &= !regs::SP_SOURCE_KEY;

    if !key.flags.contains(ColorKeyFlags::ALPHA) {
        hal.write(regs::sp_constalpha(pipe, sprite), 0);
    }
    if key.flags.contains(ColorKeyFlags::SOURCE) {
        spcntr |= regs::SP_SOURCE_KEY;
    } else if key.flags.contains(ColorKeyFlags::ALPHA) {
        hal.write(
            regs::sp_constalpha(pipe, sprite),
            regs::SP_ALPHA_EN | key.channel_mask,
        );
    }
    hal.write(regs::sp_cntr(pipe, sprite), spcntr);

    hal.posting_read(regs::sp_keymsk(pipe, sprite));
    Ok(())
}

pub(crate) fn sp_get_colorkey<H: DisplayHal>(hal: &H, pipe: Pipe, sprite: u8) -> ColorKey {
    let spcntr = hal.read(regs::sp_cntr(pipe, sprite));
    let flags = if spcntr & regs::SP_SOURCE_KEY != 0 {
        ColorKeyFlags::SOURCE
    } else {
        ColorKeyFlags::NONE
    };
    ColorKey {
        min_value: hal.read(regs::sp_keyminval(pipe, sprite)),
        max_value: hal.read(regs::sp_keymaxval(pipe, sprite)),
        channel_mask: hal.read(regs::sp_keymsk(pipe, sprite)),
        flags,
    }
}

// ---------------------------------------------------------------------------
// Primary plane power coupling
// ---------------------------------------------------------------------------

/// Re-enable a primary plane that was powered down under a covering sprite.
pub(crate) fn enable_primary<H: DisplayHal>(hal: &H, pipe: Pipe, primary_disabled: &mut bool) {
    if !*primary_disabled {
        return;
    }
    *primary_disabled = false;
    hal.fb_power_changed();

    let reg = regs::dspcntr(pipe);
    hal.write(reg, hal.read(reg) | regs::DISPLAY_PLANE_ENABLE);
}

/// Power down a primary plane fully covered by a sprite.
pub(crate) fn disable_primary<H: DisplayHal>(hal: &H, pipe: Pipe, primary_disabled: &mut bool) {
    if *primary_disabled {
        return;
    }
    let reg = regs::dspcntr(pipe);
    hal.write(reg, hal.read(reg) & !regs::DISPLAY_PLANE_ENABLE);

    *primary_disabled = true;
    hal.fb_power_changed();
}
