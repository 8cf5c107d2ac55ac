//! Interrupt number to bit-plane position mapping.
//!
//! Bit `b` of plane word `w` holds the state of interrupt `w * 32 + b`. The
//! shift and mask are fixed once from the plane geometry.

use crate::registers::PLANE_WORDS;
use crate::NvicError;

/// Number of interrupt bits carried by one plane word.
pub const WORD_BITS: u32 = u32::BITS;
/// Mask selecting the bit index inside a plane word.
pub const MASK: u32 = WORD_BITS - 1;
/// Shift selecting the plane word, i.e. the bit length of [`MASK`].
pub const OFFSET: u32 = u32::BITS - MASK.leading_zeros();
/// Number of device interrupts addressable by the bit-planes.
#[allow(clippy::cast_possible_truncation)]
pub const IRQN_MAX: u32 = PLANE_WORDS as u32 * WORD_BITS;

const _: () = assert!(1 << OFFSET == WORD_BITS, "plane word width must be a power of two");

/// Location of one interrupt bit inside a bit-plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPosition {
    /// Plane word index.
    pub word: usize,
    /// Bit index inside the word.
    pub bit: u32,
}

impl BitPosition {
    /// Single-bit mask for this position.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.bit
    }

    /// Interrupt number encoded by this position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn irqn(self) -> u32 {
        ((self.word as u32) << OFFSET) | self.bit
    }
}

/// Maps a device interrupt number to its plane position.
///
/// No range check is applied; use [`checked_locate`] for untrusted input.
#[must_use]
pub const fn locate(irqn: u32) -> BitPosition {
    BitPosition {
        word: (irqn >> OFFSET) as usize,
        bit: irqn & MASK,
    }
}

/// Maps a non-negative interrupt number to its plane position.
///
/// # Errors
///
/// Returns [`NvicError::IrqOutOfRange`] for negative numbers and numbers at or
/// above [`IRQN_MAX`].
pub fn checked_locate(irqn: i32) -> Result<BitPosition, NvicError> {
    match u32::try_from(irqn) {
        Ok(n) if n < IRQN_MAX => Ok(locate(n)),
        _ => Err(NvicError::IrqOutOfRange(irqn)),
    }
}
