//! Hardware abstraction for the display-plane core
//!
//! The core never touches hardware or memory management directly; everything
//! goes through [`DisplayHal`]: register access with posting reads, buffer
//! pin/unpin, the vblank wait, and the watermark/power notifications the
//! commit protocol has to issue.
//!
//! Methods take `&self`. Register writes on this bus are posted, so an MMIO
//! implementation is interior-mutable by nature; test doubles use `RefCell`.

use core::ptr;

use crate::format::PixelFormat;
use crate::plane::Pipe;

/// Opaque reference to a buffer object owned by the memory manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Memory layout of a pinned surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilingMode {
    /// Row-major rows, `stride` bytes apart.
    Linear,
    /// X-tiled: 512-byte-wide, 8-row tiles.
    XTiled,
}

/// Result of pinning a buffer: where the display engine can scan it out
/// from, and how its rows are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinnedSurface {
    /// Device address of the buffer's first byte.
    pub base_address: u32,
    /// Tiling mode of the underlying buffer object.
    pub tiling: TilingMode,
}

/// A scanout source as handed in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framebuffer {
    pub handle: BufferHandle,
    pub format: PixelFormat,
    /// Row stride in bytes.
    pub stride: u32,
    pub width: u32,
    pub height: u32,
}

/// Failures reported by the HAL collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// The memory manager could not place the buffer.
    PinFailed,
    /// The bounded vblank wait expired.
    VblankTimeout,
}

/// External collaborator surface consumed by the core.
pub trait DisplayHal {
    /// Read a display register.
    fn read(&self, reg: u32) -> u32;

    /// Write a display register. Writes are posted; use [`posting_read`]
    /// where completion must be observed before proceeding.
    ///
    /// [`posting_read`]: DisplayHal::posting_read
    fn write(&self, reg: u32, value: u32);

    /// Read back a register purely to force posted writes to complete.
    fn posting_read(&self, reg: u32) {
        let _ = self.read(reg);
    }

    /// Pin a buffer object resident for scanout.
    fn pin(&self, handle: BufferHandle) -> Result<PinnedSurface, HalError>;

    /// Drop one pin reference on a buffer object.
    fn unpin(&self, handle: BufferHandle);

    /// Block until the next vertical blank on `pipe`. Implementations must
    /// bound the wait and report expiry as an error.
    fn wait_for_vblank(&self, pipe: Pipe) -> Result<(), HalError>;

    /// Recalculate device watermarks (low-power watermark enable state may
    /// change as a result).
    fn update_watermarks(&self);

    /// Report a sprite configuration (clamped width, bytes per pixel) for
    /// per-plane watermark sizing.
    fn update_sprite_watermarks(&self, pipe: Pipe, width: u32, cpp: u32);

    /// Notify that primary plane visibility changed, so framebuffer
    /// compression can be re-evaluated.
    fn fb_power_changed(&self);
}

/// Volatile accessor for a mapped display register block.
///
/// Building block for MMIO-backed [`DisplayHal`] implementations; covers the
/// register half of the trait, the residency and vblank halves come from the
/// platform's memory manager and interrupt plumbing.
///
/// # Safety Invariant
///
/// `base` must point to a mapped display MMIO region covering every register
/// offset in [`crate::regs`], and stay mapped for the lifetime of the value.
#[derive(Debug, Clone, Copy)]
pub struct MmioRegisters {
    base: usize,
}

impl MmioRegisters {
    /// # Safety
    ///
    /// See the type-level safety invariant: `base` must be a valid, mapped
    /// display register block.
    pub unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    pub fn read32(&self, reg: u32) -> u32 {
        // SAFETY: base + reg lies inside the mapped register block per the
        // type-level invariant; volatile keeps the access ordered.
        unsafe { ptr::read_volatile((self.base + reg as usize) as *const u32) }
    }

    #[inline]
    pub fn write32(&self, reg: u32, value: u32) {
        // SAFETY: base + reg lies inside the mapped register block per the
        // type-level invariant; volatile keeps the access ordered.
        unsafe { ptr::write_volatile((self.base + reg as usize) as *mut u32, value) }
    }
}
