//! Z-order decoding and alpha arbitration
//!
//! One pipe composites a primary plane, two sprites and a cursor. Callers
//! hand in a packed 32-bit code; it is decoded here into named fields, and
//! the stacking order drives a fixed alpha convention: the plane sitting at
//! the bottom of the stack must scan out opaque, every plane with something
//! underneath it blends.
//!
//! Only the six enumerated permutations are defined. The hardware
//! convention says nothing about other values, so they are rejected rather
//! than guessed.

use crate::error::{PlaneError, Result};
use crate::plane::{Pipe, PlaneRole};

/// Bottom-to-top stacking of primary and sprites; the cursor is always on
/// top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOrder {
    PrimarySprite0Sprite1,
    PrimarySprite1Sprite0,
    Sprite0PrimarySprite1,
    Sprite0Sprite1Primary,
    Sprite1PrimarySprite0,
    Sprite1Sprite0Primary,
}

impl StackOrder {
    fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::PrimarySprite0Sprite1),
            1 => Some(Self::PrimarySprite1Sprite0),
            2 => Some(Self::Sprite0PrimarySprite1),
            3 => Some(Self::Sprite0Sprite1Primary),
            4 => Some(Self::Sprite1PrimarySprite0),
            5 => Some(Self::Sprite1Sprite0Primary),
            _ => None,
        }
    }
}

/// Decoded z-order request for one pipe.
///
/// The packed wire format is kept only at this boundary: bit 31 selects the
/// pipe, bits 3/2 are sprite 0's on-top/force-bottom flags, bits 1/0 are
/// sprite 1's, and the low nibble doubles as the stacking order consumed by
/// the alpha arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrderConfig {
    pub pipe: Pipe,
    pub sprite0_on_top: bool,
    pub sprite0_force_bottom: bool,
    pub sprite1_on_top: bool,
    pub sprite1_force_bottom: bool,
    pub order: StackOrder,
}

impl ZOrderConfig {
    /// Decode the packed code, rejecting orderings outside the enumerated
    /// set.
    pub fn decode(code: u32) -> Result<Self> {
        let order = StackOrder::from_code(code & 0xf)
            .ok_or(PlaneError::UnsupportedZOrder { code })?;
        Ok(Self {
            pipe: if (code >> 31) & 1 == 0 {
                Pipe::A
            } else {
                Pipe::B
            },
            sprite0_on_top: (code >> 3) & 1 != 0,
            sprite0_force_bottom: (code >> 2) & 1 != 0,
            sprite1_on_top: (code >> 1) & 1 != 0,
            sprite1_force_bottom: code & 1 != 0,
            order,
        })
    }
}

/// Whether `role`'s alpha channel stays enabled under `order`.
///
/// A plane blends unless it is the bottom of the stack: the primary is
/// opaque in the two primary-bottom orders, sprite N is opaque in the two
/// orders that place it at the bottom. The cursor always blends.
pub fn alpha_enabled(role: PlaneRole, order: StackOrder) -> bool {
    use StackOrder::*;
    match role {
        PlaneRole::Primary => !matches!(order, PrimarySprite0Sprite1 | PrimarySprite1Sprite0),
        PlaneRole::Sprite(0) => !matches!(order, Sprite0PrimarySprite1 | Sprite0Sprite1Primary),
        PlaneRole::Sprite(_) => !matches!(order, Sprite1PrimarySprite0 | Sprite1Sprite0Primary),
        PlaneRole::Cursor => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_codes_outside_the_set() {
        for code in 6..16 {
            assert_eq!(
                ZOrderConfig::decode(code),
                Err(PlaneError::UnsupportedZOrder { code })
            );
        }
    }

    #[test]
    fn decode_pipe_and_flags() {
        let cfg = ZOrderConfig::decode((1 << 31) | 0b0101).unwrap();
        assert_eq!(cfg.pipe, Pipe::B);
        assert!(!cfg.sprite0_on_top);
        assert!(cfg.sprite0_force_bottom);
        assert!(!cfg.sprite1_on_top);
        assert!(cfg.sprite1_force_bottom);
        assert_eq!(cfg.order, StackOrder::Sprite1Sprite0Primary);
    }

    #[test]
    fn alpha_table_matches_the_convention() {
        use StackOrder::*;
        let all = [
            PrimarySprite0Sprite1,
            PrimarySprite1Sprite0,
            Sprite0PrimarySprite1,
            Sprite0Sprite1Primary,
            Sprite1PrimarySprite0,
            Sprite1Sprite0Primary,
        ];
        // Primary is opaque only when directly below both sprites.
        assert!(!alpha_enabled(PlaneRole::Primary, PrimarySprite0Sprite1));
        assert!(!alpha_enabled(PlaneRole::Primary, PrimarySprite1Sprite0));
        assert!(alpha_enabled(PlaneRole::Primary, Sprite0PrimarySprite1));
        assert!(alpha_enabled(PlaneRole::Primary, Sprite1Sprite0Primary));
        // Sprite 0 is opaque only at the bottom of the stack.
        assert!(!alpha_enabled(PlaneRole::Sprite(0), Sprite0PrimarySprite1));
        assert!(!alpha_enabled(PlaneRole::Sprite(0), Sprite0Sprite1Primary));
        assert!(alpha_enabled(PlaneRole::Sprite(0), PrimarySprite0Sprite1));
        assert!(alpha_enabled(PlaneRole::Sprite(0), Sprite1Sprite0Primary));
        // Sprite 1 likewise.
        assert!(!alpha_enabled(PlaneRole::Sprite(1), Sprite1PrimarySprite0));
        assert!(!alpha_enabled(PlaneRole::Sprite(1), Sprite1Sprite0Primary));
        assert!(alpha_enabled(PlaneRole::Sprite(1), PrimarySprite1Sprite0));
        assert!(alpha_enabled(PlaneRole::Sprite(1), Sprite0Sprite1Primary));
        // The cursor always blends.
        for order in all {
            assert!(alpha_enabled(PlaneRole::Cursor, order));
        }
    }
}
