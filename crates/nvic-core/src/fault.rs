use thiserror::Error;

/// Failure reported by a CPU-context collaborator for a stack or memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("memory access failed at {addr:#010x}")]
pub struct MemoryFault {
    /// Guest address that could not be accessed.
    pub addr: u32,
}

/// Reason a nested engine run stopped before reaching its stop address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum EngineFault {
    /// Instruction fetch from an address with no backing memory.
    #[error("instruction fetch from unmapped address {pc:#010x}")]
    UnmappedFetch {
        /// Program counter of the failed fetch.
        pc: u32,
    },
    /// Data access to an address with no backing memory.
    #[error("invalid memory access at {addr:#010x} (pc {pc:#010x})")]
    InvalidMemory {
        /// Program counter of the faulting instruction.
        pc: u32,
        /// Data address that was accessed.
        addr: u32,
    },
    /// Decoder rejected the instruction at `pc`.
    #[error("undefined instruction at {pc:#010x}")]
    UndefinedInstruction {
        /// Program counter of the rejected instruction.
        pc: u32,
    },
    /// Engine stopped on its own, e.g. an explicit halt request.
    #[error("engine halted at {pc:#010x}")]
    Halted {
        /// Program counter where execution stopped.
        pc: u32,
    },
}

impl EngineFault {
    /// Returns the program counter the engine reported with this fault.
    #[must_use]
    pub const fn pc(self) -> u32 {
        match self {
            Self::UnmappedFetch { pc }
            | Self::InvalidMemory { pc, .. }
            | Self::UndefinedInstruction { pc }
            | Self::Halted { pc } => pc,
        }
    }
}

/// Errors surfaced by controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NvicError {
    /// Register access touched bytes past the end of the register block.
    #[error("register access at {offset:#x} of {size} bytes is outside the register block")]
    OutOfBounds {
        /// Starting byte offset of the access.
        offset: usize,
        /// Width of the access in bytes.
        size: usize,
    },
    /// Register access width is not representable in a 64-bit value.
    #[error("unsupported register access width of {0} bytes")]
    InvalidAccessSize(usize),
    /// Non-negative interrupt number beyond the controller's bit-planes.
    #[error("interrupt number {0} is outside the controller range")]
    IrqOutOfRange(i32),
    /// CPU context save/restore or vector lookup failed.
    #[error(transparent)]
    Memory(#[from] MemoryFault),
    /// Handler code faulted while an interrupt was being delivered.
    #[error("handler for interrupt {irqn} faulted: {fault}")]
    HandlerFault {
        /// Interrupt whose handler faulted.
        irqn: i32,
        /// Fault reported by the engine.
        fault: EngineFault,
    },
}
