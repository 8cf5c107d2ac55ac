//! Host-facing collaborator contracts for embedding the controller.
//!
//! The controller owns only its register block and dispatch queue. System
//! exceptions, CPU registers, guest memory and instruction execution are
//! reached through the traits below.

use crate::{EngineFault, MemoryFault, NvicError};

/// Owner of enable/pending state for system exceptions (negative numbers).
pub trait SystemExceptionAuthority {
    /// Enables system exception `irqn`.
    fn enable(&mut self, irqn: i32);
    /// Disables system exception `irqn`.
    fn disable(&mut self, irqn: i32);
    /// Returns whether system exception `irqn` is enabled.
    fn get_enable(&self, irqn: i32) -> bool;
    /// Marks system exception `irqn` pending.
    fn set_pending(&mut self, irqn: i32);
    /// Clears the pending state of system exception `irqn`.
    fn clear_pending(&mut self, irqn: i32);
    /// Returns whether system exception `irqn` is pending.
    fn get_pending(&self, irqn: i32) -> bool;
}

/// Core registers the controller reads or writes during exception entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CoreRegister {
    R0,
    R1,
    R2,
    R3,
    R12,
    Sp,
    Lr,
    Pc,
    Xpsr,
}

/// Register file and memory access of the emulated core.
pub trait CpuContext {
    /// Reads a core register.
    fn read_register(&self, reg: CoreRegister) -> u32;

    /// Writes a core register.
    fn write_register(&mut self, reg: CoreRegister, value: u32);

    /// Pushes a word onto the active stack.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault`] when the stack slot is not writable.
    fn stack_push(&mut self, value: u32) -> Result<(), MemoryFault>;

    /// Pops a word from the active stack.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault`] when the stack slot is not readable.
    fn stack_pop(&mut self) -> Result<u32, MemoryFault>;

    /// Reads a little-endian word from guest memory.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryFault`] when `addr` is not readable.
    fn read_u32(&self, addr: u32) -> Result<u32, MemoryFault>;
}

/// Run control of the emulation engine.
pub trait ExecutionEngine {
    /// Executes guest code from `begin` until the program counter reaches
    /// `until`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineFault`] when execution stops anywhere else.
    fn run(&mut self, begin: u32, until: u32) -> Result<(), EngineFault>;
}

/// A complete emulated core: register file, memory and engine.
pub trait Cpu: CpuContext + ExecutionEngine {}

impl<T: CpuContext + ExecutionEngine + ?Sized> Cpu for T {}

/// Byte-range register surface a host bus routes accesses through.
pub trait PeripheralBus {
    /// Reads `size` bytes at block offset `offset`, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError`] when the access is out of bounds or too wide.
    fn read(&self, offset: usize, size: usize) -> Result<u64, NvicError>;

    /// Writes the low `size` bytes of `value` at block offset `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError`] when the access is out of bounds, too wide, or a
    /// routed state change fails.
    fn write(&mut self, offset: usize, size: usize, value: u64) -> Result<(), NvicError>;
}

/// Number of system exception slots preceding device interrupt vectors.
pub const SYSTEM_EXCEPTION_SLOTS: usize = 16;

/// Minimal [`SystemExceptionAuthority`] keeping enable/pending flags for the
/// sixteen system exception slots (`-16..=-1`).
///
/// Numbers outside that range read as disabled and not pending; writes to
/// them are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemExceptionLatch {
    enabled: u16,
    pending: u16,
}

impl SystemExceptionLatch {
    /// Creates a latch with every exception disabled and idle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: 0,
            pending: 0,
        }
    }

    fn slot_mask(irqn: i32) -> Option<u16> {
        let slot = usize::try_from(irqn.checked_add(16)?).ok()?;
        if irqn < 0 && slot < SYSTEM_EXCEPTION_SLOTS {
            Some(1 << slot)
        } else {
            None
        }
    }
}

impl SystemExceptionAuthority for SystemExceptionLatch {
    fn enable(&mut self, irqn: i32) {
        if let Some(mask) = Self::slot_mask(irqn) {
            self.enabled |= mask;
        }
    }

    fn disable(&mut self, irqn: i32) {
        if let Some(mask) = Self::slot_mask(irqn) {
            self.enabled &= !mask;
        }
    }

    fn get_enable(&self, irqn: i32) -> bool {
        Self::slot_mask(irqn).is_some_and(|mask| self.enabled & mask != 0)
    }

    fn set_pending(&mut self, irqn: i32) {
        if let Some(mask) = Self::slot_mask(irqn) {
            self.pending |= mask;
        }
    }

    fn clear_pending(&mut self, irqn: i32) {
        if let Some(mask) = Self::slot_mask(irqn) {
            self.pending &= !mask;
        }
    }

    fn get_pending(&self, irqn: i32) -> bool {
        Self::slot_mask(irqn).is_some_and(|mask| self.pending & mask != 0)
    }
}
