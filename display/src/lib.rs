//! Sprite and overlay plane management for a two-pipe display controller.
//!
//! The crate drives the sprite engines of three hardware generations behind
//! one device API: clamp the destination, resolve the pixel format, pin the
//! backing buffer, program the plane's register block in the order the
//! double-buffering latch requires (surface address last), and release the
//! previous buffer only once scanout has moved off it.
//!
//! Hardware access and memory management are abstracted behind
//! [`hal::DisplayHal`], so the core is platform-independent and fully
//! testable against a mock. [`hal::MmioRegisters`] provides the volatile
//! register half for real MMIO-backed implementations.
//!
//! ```no_run
//! use plane_display::{
//!     ColorKey, DisplayDevice, Generation, Pipe, PlaneId, PlaneRole,
//! };
//! # fn demo<H: plane_display::DisplayHal>(hal: H) -> plane_display::Result<()> {
//! let dev = DisplayDevice::new(hal, Generation::Gen7Lp);
//! dev.set_pipe_mode(Pipe::A, 1920, 1080);
//! let sprite = PlaneId::new(Pipe::A, PlaneRole::Sprite(0));
//! dev.set_colorkey(sprite, &ColorKey::none())?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod colorkey;
pub mod device;
pub mod error;
pub mod format;
pub mod geometry;
pub mod hal;
pub mod offset;
pub mod plane;
pub mod regs;
pub mod scale;
pub mod zorder;

pub use colorkey::{ColorKey, ColorKeyFlags};
pub use device::{DisplayDevice, UpdateRequest, UpdateStatus};
pub use error::{PlaneError, Result};
pub use format::PixelFormat;
pub use geometry::Rect;
pub use hal::{BufferHandle, DisplayHal, Framebuffer, MmioRegisters, PinnedSurface, TilingMode};
pub use plane::{Generation, Pipe, PlaneId, PlaneRole};
pub use zorder::{StackOrder, ZOrderConfig};
