//! Error types for the display-plane core
//!
//! Every operation that can fail returns [`PlaneError`]. The taxonomy follows
//! the validation order of the commit path: caller errors (`InvalidPlane`,
//! `CrossPipe`) and precondition violations (`PipeNotRunning`) are rejected
//! before any register is touched; resource errors (`PinFailed`) propagate
//! from the buffer manager with no partial plane state committed.

use core::fmt;

use crate::{format::PixelFormat, plane::{Pipe, PlaneId}};

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PlaneError>;

/// Errors surfaced by plane operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneError {
    /// The (pipe, role) pair does not name a plane on this device.
    InvalidPlane {
        plane: PlaneId,
    },
    /// The plane belongs to a different pipe than the one being presented.
    CrossPipe {
        plane: Pipe,
        requested: Pipe,
    },
    /// The pipe's configuration register does not report it as running.
    PipeNotRunning {
        pipe: Pipe,
    },
    /// The pixel format is outside the generation's supported set and the
    /// generation has no graceful fallback.
    UnsupportedFormat {
        format: PixelFormat,
    },
    /// Source and destination color keying requested at the same time.
    ConflictingColorKey,
    /// The packed z-order code is outside the enumerated ordering set.
    UnsupportedZOrder {
        code: u32,
    },
    /// The operation is not available on this hardware generation or plane.
    UnsupportedOperation {
        operation: &'static str,
    },
    /// The buffer manager could not pin the framebuffer.
    PinFailed {
        handle: u64,
    },
    /// The bounded vblank wait expired. Treated as a fatal device error.
    VblankTimeout {
        pipe: Pipe,
    },
}

impl fmt::Display for PlaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlane { plane } => {
                write!(f, "no such plane: {:?}", plane)
            }
            Self::CrossPipe { plane, requested } => {
                write!(
                    f,
                    "plane is on pipe {:?} but pipe {:?} was requested",
                    plane, requested
                )
            }
            Self::PipeNotRunning { pipe } => {
                write!(f, "pipe {:?} is not running", pipe)
            }
            Self::UnsupportedFormat { format } => {
                write!(f, "pixel format {:?} not supported by this generation", format)
            }
            Self::ConflictingColorKey => {
                write!(f, "source and destination color keys are mutually exclusive")
            }
            Self::UnsupportedZOrder { code } => {
                write!(f, "z-order code {:#x} outside the enumerated ordering set", code)
            }
            Self::UnsupportedOperation { operation } => {
                write!(f, "operation not supported: {}", operation)
            }
            Self::PinFailed { handle } => {
                write!(f, "failed to pin framebuffer object {:#x}", handle)
            }
            Self::VblankTimeout { pipe } => {
                write!(f, "vblank wait timed out on pipe {:?}", pipe)
            }
        }
    }
}
