//! Hardware scaling decisions
//!
//! A sprite scales whenever the source and destination extents differ. The
//! scale register encodes the zero-based source size with an enable flag;
//! zero disables the scaler. Gen5 programs the scaler unconditionally.
//!
//! The Gen7 SPR engine additionally requires low-power watermarks to be off
//! for a full frame before scaling may be enabled; that sequencing lives in
//! the commit path, this module only decides and encodes.

/// Scale-enable flag shared by the DVS and SPR scale registers.
const SCALE_ENABLE: u32 = 1 << 31;

/// Encode the scale register for a `src` -> `dst` (width, height) mapping.
///
/// Returns 0 when no scaling is needed and `force` is not set.
pub fn scale_config(src: (u32, u32), dst: (u32, u32), force: bool) -> u32 {
    if force || src != dst {
        SCALE_ENABLE | ((src.0 - 1) << 16) | (src.1 - 1)
    } else {
        0
    }
}

/// True if `value` has the scaler enabled.
pub fn scaling_enabled(value: u32) -> bool {
    value & SCALE_ENABLE != 0
}
