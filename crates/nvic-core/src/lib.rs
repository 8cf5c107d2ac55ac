//! Nested Vectored Interrupt Controller model for Cortex-M emulation.
//!
//! [`Nvic`] serves the register block to a host bus and keeps enable/pending
//! state for device interrupts. System exceptions are forwarded to an injected
//! [`SystemExceptionAuthority`]. Once per scheduler tick, [`Nvic::tick`]
//! delivers queued interrupts to the emulated core.

/// Error taxonomy for register access, memory and handler faults.
pub mod fault;
pub use fault::{EngineFault, MemoryFault, NvicError};

/// Register storage and fixed field layout.
pub mod registers;
pub use registers::{
    field_at, FieldDescriptor, RegisterBlock, RegisterField, MAX_ACCESS_BYTES, PLANE_WORDS,
    PRIORITY_ENTRIES, REGISTER_BLOCK_BYTES, REGISTER_FIELDS,
};

/// Interrupt number to bit-plane position mapping.
pub mod bits;
pub use bits::{checked_locate, locate, BitPosition, IRQN_MAX};

/// Collaborator traits implemented by the host.
pub mod api;
pub use api::{
    CoreRegister, Cpu, CpuContext, ExecutionEngine, PeripheralBus, SystemExceptionAuthority,
    SystemExceptionLatch, SYSTEM_EXCEPTION_SLOTS,
};

/// Controller configuration.
pub mod config;
pub use config::{FaultPolicy, NvicConfig};

/// Interrupts queued for the next tick.
pub mod queue;
pub use queue::PendingQueue;

/// The controller instance.
pub mod nvic;
pub use nvic::Nvic;

/// Enable, pending, active and priority operations.
pub mod state;
pub use state::PRIORITY_STUB;

/// Write triggers of the set/clear planes.
pub mod trigger;
pub use trigger::{trigger_at, TriggerAction, TRIGGER_TABLE};

/// Register read/write surface.
pub mod io;

/// Per-tick interrupt delivery.
pub mod dispatch;
pub use dispatch::{
    restore_context, save_context, vector_address, Delivery, HandlerOutcome, TickOutcome,
    CONTEXT_FRAME, EXC_RETURN,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
