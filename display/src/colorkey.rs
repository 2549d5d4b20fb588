//! Color key configuration
//!
//! A color key marks a pixel-value range as transparent (source keying) or
//! uses it to mask the destination (destination keying). Source and
//! destination keying are mutually exclusive by contract; the constant-alpha
//! mode exists only on the low-power sprite engine.

use bitflags::bitflags;

bitflags! {
    /// Requested keying mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorKeyFlags: u32 {
        const NONE = 1 << 0;
        const DESTINATION = 1 << 1;
        const SOURCE = 1 << 2;
        const ALPHA = 1 << 3;
    }
}

/// Color key state for one sprite plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorKey {
    pub min_value: u32,
    pub max_value: u32,
    pub channel_mask: u32,
    pub flags: ColorKeyFlags,
}

impl ColorKey {
    /// A disabled key.
    pub const fn none() -> Self {
        Self {
            min_value: 0,
            max_value: 0,
            channel_mask: 0,
            flags: ColorKeyFlags::NONE,
        }
    }
}
