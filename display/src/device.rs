//! Device-level plane orchestration
//!
//! [`DisplayDevice`] owns the HAL and the per-plane bookkeeping and sequences
//! the whole commit protocol: validation, destination clamping, format
//! resolution, buffer residency, the generation-specific register sequence,
//! and the primary-plane power coupling.
//!
//! Locking: one [`spin::Mutex`] guards all mutable device state. Vblank
//! waits never happen under the lock; the bookkeeping that must survive the
//! unlocked window (which buffer to unpin, whether the plane was reconfigured
//! meanwhile) travels in locals and is re-validated against the plane's
//! generation counter after relocking.
//!
//! Residency: a plane holds exactly one pin reference on its bound buffer.
//! Swapping buffers pins the new one first, commits, then drops the old
//! reference after the next vblank so scanout never reads freed memory. The
//! low-power engine latches the whole update atomically at vblank, so it
//! releases the old buffer immediately; disabling a plane switches it off at
//! the register level first, so its buffer is also released without a wait.
//! A vblank timeout is reported as an error, but only after the pending
//! unpin has been carried out, keeping the pin accounting exact even on a
//! wedged device.

use alloc::vec::Vec;

use log::{debug, warn};
use spin::Mutex;

use crate::colorkey::{ColorKey, ColorKeyFlags};
use crate::error::{PlaneError, Result};
use crate::format::{
    cursor_with_alpha, dvs_encoding, primary_with_alpha, sp_encoding, sp_with_alpha, spr_encoding,
    DVS_FALLBACK, SPR_FALLBACK,
};
use crate::geometry::{clamp_to_surface, Rect};
use crate::hal::{DisplayHal, Framebuffer};
use crate::plane::{self, CommitParams, Generation, Pipe, PlaneId, PlaneRole, PlaneState};
use crate::regs;
use crate::scale::{scale_config, scaling_enabled};
use crate::zorder::{alpha_enabled, ZOrderConfig};

/// Outcome of a successful [`DisplayDevice::update_plane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The plane is scanning out the requested buffer.
    Updated,
    /// The request had nothing visible to display; the plane was left
    /// untouched. Not an error: panning a sprite off-screen is a legitimate
    /// request.
    NothingToDisplay,
}

/// One plane update as handed in by the caller.
///
/// The destination rectangle is in signed screen coordinates and may hang
/// off the surface; the source origin selects where in `fb` scanout starts.
/// Source and destination extents may differ on generations with a scaler.
pub struct UpdateRequest<'a> {
    pub fb: &'a Framebuffer,
    pub dst: Rect,
    pub src_x: u32,
    pub src_y: u32,
    pub src_w: u32,
    pub src_h: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct PipeState {
    width: u32,
    height: u32,
    /// Primary powered down under a covering sprite.
    primary_disabled: bool,
    /// Sprite scaler active (Gen7 watermark coupling).
    sprite_scaling: bool,
}

struct DeviceState {
    pipes: [PipeState; Pipe::COUNT],
    planes: Vec<PlaneState>,
}

/// The display-plane subsystem for one device.
pub struct DisplayDevice<H: DisplayHal> {
    hal: H,
    generation: Generation,
    state: Mutex<DeviceState>,
}

impl<H: DisplayHal> DisplayDevice<H> {
    pub fn new(hal: H, generation: Generation) -> Self {
        let mut planes = Vec::new();
        for pipe in [Pipe::A, Pipe::B] {
            planes.push(PlaneState::new(PlaneId::new(pipe, PlaneRole::Primary)));
            for sprite in 0..generation.sprites_per_pipe() {
                planes.push(PlaneState::new(PlaneId::new(pipe, PlaneRole::Sprite(sprite))));
            }
            planes.push(PlaneState::new(PlaneId::new(pipe, PlaneRole::Cursor)));
        }
        Self {
            hal,
            generation,
            state: Mutex::new(DeviceState {
                pipes: [PipeState::default(); Pipe::COUNT],
                planes,
            }),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Record `pipe`'s active surface extent. Destination rectangles are
    /// clamped against this on every update.
    pub fn set_pipe_mode(&self, pipe: Pipe, width: u32, height: u32) {
        let mut st = self.state.lock();
        let ps = &mut st.pipes[pipe.index() as usize];
        ps.width = width;
        ps.height = height;
    }

    fn wait_vblank(&self, pipe: Pipe) -> Result<()> {
        self.hal
            .wait_for_vblank(pipe)
            .map_err(|_| PlaneError::VblankTimeout { pipe })
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Point a sprite plane at `req.fb` and commit the new configuration.
    ///
    /// Validation happens before any register or residency side effect;
    /// failure leaves the plane exactly as it was.
    pub fn update_plane(
        &self,
        id: PlaneId,
        pipe: Pipe,
        req: &UpdateRequest<'_>,
    ) -> Result<UpdateStatus> {
        let sprite = match id.role {
            PlaneRole::Sprite(n) => n,
            _ => {
                return Err(PlaneError::UnsupportedOperation {
                    operation: "buffer presentation on a non-sprite plane",
                })
            }
        };

        let mut st = self.state.lock();
        let idx = st
            .planes
            .iter()
            .position(|p| p.id == id)
            .ok_or(PlaneError::InvalidPlane { plane: id })?;
        if id.pipe != pipe {
            return Err(PlaneError::CrossPipe {
                plane: id.pipe,
                requested: pipe,
            });
        }
        if self.hal.read(regs::pipeconf(pipe)) & regs::PIPECONF_ENABLE == 0 {
            return Err(PlaneError::PipeNotRunning { pipe });
        }

        // A zero source extent or a fully off-screen destination shows
        // nothing. The plane keeps whatever it was scanning out; turning it
        // off is the caller's call, via disable.
        if req.src_w == 0 || req.src_h == 0 {
            return Ok(UpdateStatus::NothingToDisplay);
        }
        let pi = pipe.index() as usize;
        let bounds = (st.pipes[pi].width, st.pipes[pi].height);
        let dst = match clamp_to_surface(req.dst, bounds) {
            Some(dst) => dst,
            None => return Ok(UpdateStatus::NothingToDisplay),
        };

        let fb = req.fb;
        let encoding = match self.generation {
            Generation::Gen5 | Generation::Gen6 => {
                let gen6 = self.generation == Generation::Gen6;
                match dvs_encoding(fb.format, gen6) {
                    Some(enc) => enc,
                    None => {
                        warn!(
                            "sprite format {:?} unsupported, scanning out as opaque RGB",
                            fb.format
                        );
                        DVS_FALLBACK
                    }
                }
            }
            Generation::Gen7 => match spr_encoding(fb.format) {
                Some(enc) => enc,
                None => {
                    warn!(
                        "sprite format {:?} unsupported, scanning out as opaque RGB",
                        fb.format
                    );
                    SPR_FALLBACK
                }
            },
            Generation::Gen7Lp => sp_encoding(fb.format)
                .ok_or(PlaneError::UnsupportedFormat { format: fb.format })?,
        };

        let covers = self.generation.primary_cover_optimization() && dst.covers(bounds);

        // Gen7 couples the sprite scaler to the low-power watermarks: they
        // must be off for a full frame before the scaler may engage. Done
        // before residency changes so the vblank wait has nothing to undo.
        let mut sprscale = 0;
        if self.generation == Generation::Gen7 {
            self.hal
                .update_sprite_watermarks(pipe, dst.width - 1, encoding.cpp);
            sprscale = scale_config((req.src_w, req.src_h), (dst.width, dst.height), false);
            if scaling_enabled(sprscale) && !st.pipes[pi].sprite_scaling {
                st.pipes[pi].sprite_scaling = true;
                self.hal.update_watermarks();
                drop(st);
                self.wait_vblank(pipe)?;
                st = self.state.lock();
            }
        }

        let surface = self
            .hal
            .pin(fb.handle)
            .map_err(|_| PlaneError::PinFailed { handle: fb.handle.0 })?;

        let old = st.planes[idx].bound.replace(fb.handle);
        st.planes[idx].enabled = true;
        st.planes[idx].generation_counter += 1;
        let bound_gen = st.planes[idx].generation_counter;

        if !covers {
            plane::enable_primary(&self.hal, pipe, &mut st.pipes[pi].primary_disabled);
        }

        let params = CommitParams {
            fb,
            encoding,
            surface,
            dst,
            src_x: req.src_x,
            src_y: req.src_y,
            src_w: req.src_w,
            src_h: req.src_h,
            active: bounds,
        };

        match self.generation {
            Generation::Gen5 => plane::dvs_commit(&self.hal, pipe, false, &params),
            Generation::Gen6 => plane::dvs_commit(&self.hal, pipe, true, &params),
            Generation::Gen7 => {
                plane::spr_commit(&self.hal, pipe, &params, sprscale);
                if !scaling_enabled(sprscale) && st.pipes[pi].sprite_scaling {
                    st.pipes[pi].sprite_scaling = false;
                    self.hal.update_watermarks();
                }
            }
            Generation::Gen7Lp => plane::sp_commit(&self.hal, pipe, sprite, &params),
        }

        if covers {
            plane::disable_primary(&self.hal, pipe, &mut st.pipes[pi].primary_disabled);
        }

        if let Some(old_handle) = old {
            if old_handle == fb.handle || self.generation == Generation::Gen7Lp {
                // Scanout never leaves this object (same buffer), or the
                // engine latches the whole update at vblank; the extra
                // reference can go now.
                self.hal.unpin(old_handle);
            } else {
                drop(st);
                let waited = self.wait_vblank(pipe);
                let st = self.state.lock();
                if st.planes[idx].generation_counter != bound_gen {
                    debug!("plane {:?} reconfigured during vblank wait", id);
                }
                drop(st);
                self.hal.unpin(old_handle);
                waited?;
            }
        }

        Ok(UpdateStatus::Updated)
    }

    // -----------------------------------------------------------------------
    // Disable
    // -----------------------------------------------------------------------

    /// Stop scanning out on a sprite plane and release its buffer.
    /// Disabling an already-disabled plane is a no-op.
    pub fn disable_plane(&self, id: PlaneId, pipe: Pipe) -> Result<()> {
        let sprite = match id.role {
            PlaneRole::Sprite(n) => n,
            _ => {
                return Err(PlaneError::UnsupportedOperation {
                    operation: "disabling a non-sprite plane",
                })
            }
        };

        let mut st = self.state.lock();
        let idx = st
            .planes
            .iter()
            .position(|p| p.id == id)
            .ok_or(PlaneError::InvalidPlane { plane: id })?;
        if id.pipe != pipe {
            return Err(PlaneError::CrossPipe {
                plane: id.pipe,
                requested: pipe,
            });
        }
        self.disable_in(&mut st, idx, sprite);
        Ok(())
    }

    /// Disable the sprite at `idx`. The plane is switched off at the
    /// register level first, so its buffer can be released right away; no
    /// vblank wait is needed.
    fn disable_in(&self, st: &mut DeviceState, idx: usize, sprite: u8) {
        if !st.planes[idx].enabled {
            return;
        }
        let pipe = st.planes[idx].id.pipe;
        let pi = pipe.index() as usize;
        st.planes[idx].enabled = false;

        if self.generation.primary_cover_optimization() {
            plane::enable_primary(&self.hal, pipe, &mut st.pipes[pi].primary_disabled);
        }

        match self.generation {
            Generation::Gen5 | Generation::Gen6 => plane::dvs_disable(&self.hal, pipe),
            Generation::Gen7 => {
                plane::spr_disable(&self.hal, pipe);
                st.pipes[pi].sprite_scaling = false;
                self.hal.update_watermarks();
            }
            Generation::Gen7Lp => {
                // Self-refresh may come back once no sprite scans out.
                let restore = !st
                    .planes
                    .iter()
                    .any(|p| matches!(p.id.role, PlaneRole::Sprite(_)) && p.enabled);
                plane::sp_disable(&self.hal, pipe, sprite, restore);
            }
        }

        if let Some(handle) = st.planes[idx].bound.take() {
            st.planes[idx].generation_counter += 1;
            self.hal.unpin(handle);
        }
    }

    // -----------------------------------------------------------------------
    // Z-order
    // -----------------------------------------------------------------------

    /// Restack one pipe's planes and fix up alpha so the bottom plane scans
    /// out opaque. Low-power engine only.
    pub fn set_zorder(&self, code: u32) -> Result<()> {
        let cfg = ZOrderConfig::decode(code)?;
        if self.generation != Generation::Gen7Lp {
            return Err(PlaneError::UnsupportedOperation {
                operation: "z-order control on this generation",
            });
        }
        let _st = self.state.lock();
        let pipe = cfg.pipe;

        // Two passes: wipe the restack bits on both sprites first, then
        // program the new stacking, so the hardware never latches a mix of
        // old and new order.
        for sprite in 0..2u8 {
            let reg = regs::sp_cntr(pipe, sprite);
            let value = self.hal.read(reg) & !(regs::SP_ZORDER_ENABLE | regs::SP_FORCE_BOTTOM);
            self.hal.write(reg, value);
        }
        for sprite in 0..2u8 {
            let (on_top, force_bottom) = if sprite == 0 {
                (cfg.sprite0_on_top, cfg.sprite0_force_bottom)
            } else {
                (cfg.sprite1_on_top, cfg.sprite1_force_bottom)
            };
            let mut bits = 0;
            if on_top {
                bits |= regs::SP_ZORDER_ENABLE;
            }
            if force_bottom {
                bits |= regs::SP_FORCE_BOTTOM;
            }
            if bits != 0 {
                let reg = regs::sp_cntr(pipe, sprite);
                self.hal.write(reg, self.hal.read(reg) | bits);
            }
        }

        self.rewrite_alpha(
            regs::dspcntr(pipe),
            regs::DISPLAY_PLANE_ENABLE,
            regs::DISPPLANE_PIXFORMAT_MASK,
            alpha_enabled(PlaneRole::Primary, cfg.order),
            |field, alpha| primary_with_alpha(field, alpha, true),
        );
        for sprite in 0..2u8 {
            self.rewrite_alpha(
                regs::sp_cntr(pipe, sprite),
                regs::SP_ENABLE,
                regs::SP_PIXFORMAT_MASK,
                alpha_enabled(PlaneRole::Sprite(sprite), cfg.order),
                sp_with_alpha,
            );
        }
        Ok(())
    }

    /// Swap an enabled plane's format field to the alpha variant `alpha`
    /// selects. Disabled planes are left alone; they pick up alpha state
    /// from their format on the next enable.
    fn rewrite_alpha(
        &self,
        reg: u32,
        enable_bit: u32,
        mask: u32,
        alpha: bool,
        rewrite: impl Fn(u32, bool) -> Option<u32>,
    ) {
        let value = self.hal.read(reg);
        if value & enable_bit == 0 {
            return;
        }
        let field = value & mask;
        match rewrite(field, alpha) {
            Some(new) if new != field => self.hal.write(reg, (value & !mask) | new),
            Some(_) => {}
            None => warn!("format field {:#010x} has no alpha variant", field),
        }
    }

    // -----------------------------------------------------------------------
    // Alpha
    // -----------------------------------------------------------------------

    /// Toggle a plane's per-pixel alpha by rewriting its live format field.
    ///
    /// A plane with no format programmed is quietly skipped; a format with
    /// no alpha variant is logged and kept.
    pub fn set_alpha(&self, id: PlaneId, enabled: bool) -> Result<()> {
        let st = self.state.lock();
        if !st.planes.iter().any(|p| p.id == id) {
            return Err(PlaneError::InvalidPlane { plane: id });
        }

        let (reg, mask) = match id.role {
            PlaneRole::Primary => (regs::dspcntr(id.pipe), regs::DISPPLANE_PIXFORMAT_MASK),
            PlaneRole::Cursor => (regs::curcntr(id.pipe), regs::CURSOR_MODE_MASK),
            PlaneRole::Sprite(n) => {
                if self.generation != Generation::Gen7Lp {
                    return Err(PlaneError::UnsupportedOperation {
                        operation: "sprite alpha toggling on this generation",
                    });
                }
                (regs::sp_cntr(id.pipe, n), regs::SP_PIXFORMAT_MASK)
            }
        };

        let value = self.hal.read(reg);
        let field = value & mask;
        if field == 0 {
            debug!("plane {:?} has no format programmed, alpha request ignored", id);
            return Ok(());
        }

        let new = match id.role {
            PlaneRole::Primary => primary_with_alpha(field, enabled, true),
            PlaneRole::Cursor => cursor_with_alpha(field, enabled),
            PlaneRole::Sprite(_) => sp_with_alpha(field, enabled),
        };
        match new {
            Some(new_field) if new_field != field => {
                self.hal.write(reg, (value & !mask) | new_field);
            }
            Some(_) => {}
            None => warn!(
                "plane {:?} format field {:#010x} has no alpha variant",
                id, field
            ),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Color keys
    // -----------------------------------------------------------------------

    pub fn set_colorkey(&self, id: PlaneId, key: &ColorKey) -> Result<()> {
        if key.flags.contains(ColorKeyFlags::SOURCE)
            && key.flags.contains(ColorKeyFlags::DESTINATION)
        {
            return Err(PlaneError::ConflictingColorKey);
        }
        let _st = self.state.lock();
        let sprite = self.lookup_sprite(&_st, id)?;
        match self.generation {
            Generation::Gen5 | Generation::Gen6 => {
                plane::dvs_set_colorkey(&self.hal, id.pipe, key);
                Ok(())
            }
            Generation::Gen7 => {
                plane::spr_set_colorkey(&self.hal, id.pipe, key);
                Ok(())
            }
            Generation::Gen7Lp => plane::sp_set_colorkey(&self.hal, id.pipe, sprite, key),
        }
    }

    pub fn get_colorkey(&self, id: PlaneId) -> Result<ColorKey> {
        let _st = self.state.lock();
        let sprite = self.lookup_sprite(&_st, id)?;
        Ok(match self.generation {
            Generation::Gen5 | Generation::Gen6 => plane::dvs_get_colorkey(&self.hal, id.pipe),
            Generation::Gen7 => plane::spr_get_colorkey(&self.hal, id.pipe),
            Generation::Gen7Lp => plane::sp_get_colorkey(&self.hal, id.pipe, sprite),
        })
    }

    fn lookup_sprite(&self, st: &DeviceState, id: PlaneId) -> Result<u8> {
        if !st.planes.iter().any(|p| p.id == id) {
            return Err(PlaneError::InvalidPlane { plane: id });
        }
        match id.role {
            PlaneRole::Sprite(n) => Ok(n),
            _ => Err(PlaneError::UnsupportedOperation {
                operation: "color keying on a non-sprite plane",
            }),
        }
    }
}
