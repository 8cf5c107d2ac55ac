//! Byte-range read/write surface exposed to the bus.

use crate::{Nvic, NvicError, PeripheralBus, RegisterBlock, SystemExceptionAuthority};

impl<A: SystemExceptionAuthority> Nvic<A> {
    /// Reads `size` bytes at `offset` as a little-endian integer.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] or [`NvicError::InvalidAccessSize`]
    /// for accesses the block cannot serve.
    pub fn read(&self, offset: usize, size: usize) -> Result<u64, NvicError> {
        self.registers.read_le(offset, size)
    }

    /// Writes the low `size` bytes of `value` at `offset`, little-endian, one
    /// byte at a time.
    ///
    /// Bytes landing in the set/clear enable and pending planes fire their
    /// triggers instead of being stored. The whole range is bounds-checked
    /// before the first byte is applied.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::OutOfBounds`] or [`NvicError::InvalidAccessSize`]
    /// for accesses the block cannot serve.
    pub fn write(&mut self, offset: usize, size: usize, value: u64) -> Result<(), NvicError> {
        RegisterBlock::check_access(offset, size)?;
        for (ofs, byte) in (offset..offset + size).zip(value.to_le_bytes()) {
            self.write_byte(ofs, byte)?;
        }
        Ok(())
    }
}

impl<A: SystemExceptionAuthority> PeripheralBus for Nvic<A> {
    fn read(&self, offset: usize, size: usize) -> Result<u64, NvicError> {
        self.registers.read_le(offset, size)
    }

    fn write(&mut self, offset: usize, size: usize, value: u64) -> Result<(), NvicError> {
        Self::write(self, offset, size, value)
    }
}
