//! Zero-initialised byte storage behind the NVIC register map.

use super::layout::{RegisterField, REGISTER_BLOCK_BYTES, WORD_BYTES};
use crate::NvicError;

/// Widest access representable in the `u64` I/O surface.
pub const MAX_ACCESS_BYTES: usize = 8;

/// Byte-addressable NVIC register storage.
///
/// All field access goes through bounds-checked accessors; words are stored
/// little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBlock {
    bytes: Box<[u8]>,
}

impl Default for RegisterBlock {
    fn default() -> Self {
        Self {
            bytes: vec![0; REGISTER_BLOCK_BYTES].into_boxed_slice(),
        }
    }
}

impl RegisterBlock {
    /// Allocates a zeroed register block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw register bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Zeroes every register byte.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Validates that `size` bytes starting at `offset` lie inside the block.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::InvalidAccessSize`] when `size` is zero or wider
    /// than [`MAX_ACCESS_BYTES`], and [`NvicError::OutOfBounds`] when the range
    /// ends past the block.
    pub const fn check_access(offset: usize, size: usize) -> Result<(), NvicError> {
        if size == 0 || size > MAX_ACCESS_BYTES {
            return Err(NvicError::InvalidAccessSize(size));
        }
        match offset.checked_add(size) {
            Some(end) if end <= REGISTER_BLOCK_BYTES => Ok(()),
            _ => Err(NvicError::OutOfBounds { offset, size }),
        }
    }

    /// Reads `size` bytes at `offset` as a little-endian integer.
    ///
    /// # Errors
    ///
    /// Propagates [`RegisterBlock::check_access`] failures.
    pub fn read_le(&self, offset: usize, size: usize) -> Result<u64, NvicError> {
        Self::check_access(offset, size)?;
        let value = self.bytes[offset..offset + size]
            .iter()
            .rev()
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
        Ok(value)
    }

    /// Reads one raw byte.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] when `offset` is past the block.
    pub fn byte(&self, offset: usize) -> Result<u8, NvicError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(NvicError::OutOfBounds { offset, size: 1 })
    }

    /// Stores one raw byte without any trigger semantics.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] when `offset` is past the block.
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Result<(), NvicError> {
        let slot = self
            .bytes
            .get_mut(offset)
            .ok_or(NvicError::OutOfBounds { offset, size: 1 })?;
        *slot = value;
        Ok(())
    }

    /// Reads word `index` of a named field.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] when the word lies outside `field`.
    pub fn word(&self, field: RegisterField, index: usize) -> Result<u32, NvicError> {
        let offset = Self::word_offset(field, index)?;
        let mut raw = [0_u8; WORD_BYTES];
        raw.copy_from_slice(&self.bytes[offset..offset + WORD_BYTES]);
        Ok(u32::from_le_bytes(raw))
    }

    /// Writes word `index` of a named field.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] when the word lies outside `field`.
    pub fn set_word(
        &mut self,
        field: RegisterField,
        index: usize,
        value: u32,
    ) -> Result<(), NvicError> {
        let offset = Self::word_offset(field, index)?;
        self.bytes[offset..offset + WORD_BYTES].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn word_offset(field: RegisterField, index: usize) -> Result<usize, NvicError> {
        let descriptor = field.descriptor();
        if index < descriptor.size / WORD_BYTES {
            Ok(descriptor.offset + index * WORD_BYTES)
        } else {
            Err(NvicError::OutOfBounds {
                offset: descriptor.offset.saturating_add(index.saturating_mul(WORD_BYTES)),
                size: WORD_BYTES,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RegisterBlock, MAX_ACCESS_BYTES};
    use crate::registers::layout::{RegisterField, ICER_OFFSET, REGISTER_BLOCK_BYTES};
    use crate::NvicError;

    #[test]
    fn new_block_is_zeroed_and_full_size() {
        let block = RegisterBlock::new();
        assert_eq!(block.as_bytes().len(), REGISTER_BLOCK_BYTES);
        assert!(block.as_bytes().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn words_are_stored_little_endian() {
        let mut block = RegisterBlock::new();
        block
            .set_word(RegisterField::ClearEnable, 1, 0x1122_3344)
            .expect("word 1 exists");
        assert_eq!(block.byte(ICER_OFFSET + 4), Ok(0x44));
        assert_eq!(block.byte(ICER_OFFSET + 7), Ok(0x11));
        assert_eq!(block.read_le(ICER_OFFSET + 4, 4), Ok(0x1122_3344));
        assert_eq!(block.read_le(ICER_OFFSET + 5, 2), Ok(0x2233));
    }

    #[test]
    fn word_index_past_field_is_rejected() {
        let block = RegisterBlock::new();
        assert!(block.word(RegisterField::SetEnable, 7).is_ok());
        assert!(matches!(
            block.word(RegisterField::SetEnable, 8),
            Err(NvicError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn access_checks_cover_width_and_end_of_block() {
        assert_eq!(RegisterBlock::check_access(0, 1), Ok(()));
        assert_eq!(
            RegisterBlock::check_access(REGISTER_BLOCK_BYTES - 4, 4),
            Ok(())
        );
        assert_eq!(
            RegisterBlock::check_access(REGISTER_BLOCK_BYTES - 3, 4),
            Err(NvicError::OutOfBounds {
                offset: REGISTER_BLOCK_BYTES - 3,
                size: 4
            })
        );
        assert_eq!(
            RegisterBlock::check_access(usize::MAX, 1),
            Err(NvicError::OutOfBounds {
                offset: usize::MAX,
                size: 1
            })
        );
        assert_eq!(
            RegisterBlock::check_access(0, 0),
            Err(NvicError::InvalidAccessSize(0))
        );
        assert_eq!(
            RegisterBlock::check_access(0, MAX_ACCESS_BYTES + 1),
            Err(NvicError::InvalidAccessSize(MAX_ACCESS_BYTES + 1))
        );
    }

    #[test]
    fn clear_zeroes_previous_contents() {
        let mut block = RegisterBlock::new();
        block.set_byte(0x300, 0xA0).expect("priority byte exists");
        block.clear();
        assert_eq!(block.byte(0x300), Ok(0));
    }
}
