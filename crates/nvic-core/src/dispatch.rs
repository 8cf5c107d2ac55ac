//! Per-tick delivery of queued interrupts.
//!
//! A tick stacks the caller's context the way exception entry does, runs each
//! queued handler to completion on the engine, then unstacks the context so
//! the interrupted code resumes exactly where it stopped.

use crate::{
    CoreRegister, Cpu, CpuContext, EngineFault, FaultPolicy, Nvic, NvicError,
    SystemExceptionAuthority,
};

/// `EXC_RETURN` value: return to thread mode on the main stack.
pub const EXC_RETURN: u32 = 0xFFFF_FFF9;

/// Registers stacked on entry, in push order.
pub const CONTEXT_FRAME: [CoreRegister; 8] = [
    CoreRegister::Xpsr,
    CoreRegister::Pc,
    CoreRegister::Lr,
    CoreRegister::R12,
    CoreRegister::R3,
    CoreRegister::R2,
    CoreRegister::R1,
    CoreRegister::R0,
];

/// Width in bytes of one vector table entry.
pub const VECTOR_ENTRY_BYTES: u32 = 4;

/// Vector slots reserved for system exceptions ahead of device interrupts.
const SYSTEM_VECTOR_SLOTS: i32 = 16;

/// How a handler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerOutcome {
    /// Execution reached the return sentinel.
    Returned,
    /// Execution stopped anywhere else.
    Faulted(EngineFault),
}

impl HandlerOutcome {
    /// Classifies the result of a nested engine run.
    ///
    /// The core cannot fetch from the sentinel address, so a fault reported
    /// there is the handler's normal exception return.
    #[must_use]
    pub const fn from_run(result: Result<(), EngineFault>) -> Self {
        match result {
            Ok(()) => Self::Returned,
            Err(fault) if fault.pc() & !1 == EXC_RETURN & !1 => Self::Returned,
            Err(fault) => Self::Faulted(fault),
        }
    }
}

/// One interrupt delivered during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delivery {
    /// Delivered interrupt number.
    pub irqn: i32,
    /// Handler entry address read from the vector table.
    pub handler: u32,
    /// How the handler run ended.
    pub outcome: HandlerOutcome,
}

/// Result of one dispatcher tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was queued; the core was not touched.
    Idle,
    /// Queued interrupts were delivered in order.
    Dispatched {
        /// Deliveries in the order they ran.
        deliveries: Vec<Delivery>,
    },
}

/// Address of the vector table entry for `irqn`.
///
/// # Errors
///
/// Returns [`NvicError::IrqOutOfRange`] for numbers below the first system
/// exception slot or whose entry would not fit in the address space.
pub fn vector_address(vector_table_base: u32, irqn: i32) -> Result<u32, NvicError> {
    irqn.checked_add(SYSTEM_VECTOR_SLOTS)
        .and_then(|slot| u32::try_from(slot).ok())
        .and_then(|slot| slot.checked_mul(VECTOR_ENTRY_BYTES))
        .and_then(|offset| vector_table_base.checked_add(offset))
        .ok_or(NvicError::IrqOutOfRange(irqn))
}

/// Pushes [`CONTEXT_FRAME`] onto the active stack.
///
/// A failed push puts the stack pointer back where it started, so a partial
/// frame is never left stacked.
///
/// # Errors
///
/// Returns [`NvicError::Memory`] when a stack slot cannot be written.
pub fn save_context<C: CpuContext + ?Sized>(cpu: &mut C) -> Result<(), NvicError> {
    let sp = cpu.read_register(CoreRegister::Sp);
    for reg in CONTEXT_FRAME {
        let value = cpu.read_register(reg);
        if let Err(fault) = cpu.stack_push(value) {
            cpu.write_register(CoreRegister::Sp, sp);
            return Err(fault.into());
        }
    }
    Ok(())
}

/// Pops [`CONTEXT_FRAME`] back in reverse push order.
///
/// # Errors
///
/// Returns [`NvicError::Memory`] when a stack slot cannot be read.
pub fn restore_context<C: CpuContext + ?Sized>(cpu: &mut C) -> Result<(), NvicError> {
    for reg in CONTEXT_FRAME.iter().rev() {
        let value = cpu.stack_pop()?;
        cpu.write_register(*reg, value);
    }
    Ok(())
}

/// Restores the context after a failed delivery and hands back `err`.
///
/// A restore failure is logged rather than returned so the caller still sees
/// what stopped the tick.
fn unwind<C: CpuContext + ?Sized>(cpu: &mut C, err: NvicError) -> NvicError {
    if let Err(restore) = restore_context(cpu) {
        log::warn!("context restore failed after `{err}`: {restore}");
    }
    err
}

impl<A: SystemExceptionAuthority> Nvic<A> {
    /// Delivers every queued interrupt, lowest priority value first.
    ///
    /// Returns [`TickOutcome::Idle`] without touching `cpu` when nothing is
    /// queued. Otherwise the context is saved once, each interrupt has its
    /// pending state cleared and its handler run until it returns, the queue
    /// is emptied and the context restored.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::Memory`] when stacking or a vector read fails and
    /// [`NvicError::HandlerFault`] when a handler faults under
    /// [`FaultPolicy::Propagate`]. The context is restored and every interrupt
    /// not yet delivered goes back on the queue. An interrupt whose vector
    /// could not be read counts as not delivered and stays pending.
    pub fn tick<C: Cpu + ?Sized>(&mut self, cpu: &mut C) -> Result<TickOutcome, NvicError> {
        if self.queue.is_empty() {
            return Ok(TickOutcome::Idle);
        }

        let mut batch = self.queue.take();
        batch.sort_by_key(|irqn| self.get_priority(*irqn));
        log::debug!("dispatching {} queued interrupt(s)", batch.len());

        if let Err(err) = save_context(cpu) {
            self.queue.requeue_front(&batch);
            return Err(err);
        }

        let mut deliveries = Vec::with_capacity(batch.len());
        for (index, &irqn) in batch.iter().enumerate() {
            let delivery = match self.deliver(cpu, irqn) {
                Ok(delivery) => delivery,
                Err(err) => {
                    self.queue.requeue_front(&batch[index..]);
                    return Err(unwind(cpu, err));
                }
            };

            if let HandlerOutcome::Faulted(fault) = delivery.outcome {
                match self.config.fault_policy {
                    FaultPolicy::Propagate => {
                        self.queue.requeue_front(&batch[index + 1..]);
                        return Err(unwind(cpu, NvicError::HandlerFault { irqn, fault }));
                    }
                    FaultPolicy::Absorb => {
                        log::warn!("handler for irq {irqn} faulted, continuing: {fault}");
                    }
                }
            }
            deliveries.push(delivery);
        }

        restore_context(cpu)?;
        Ok(TickOutcome::Dispatched { deliveries })
    }

    fn deliver<C: Cpu + ?Sized>(&mut self, cpu: &mut C, irqn: i32) -> Result<Delivery, NvicError> {
        let address = vector_address(self.config.vector_table_base, irqn)?;
        let handler = cpu.read_u32(address)?;
        log::debug!("enter irq {irqn}: vector {address:#010x} -> handler {handler:#010x}");

        // Pending clears only once the handler is known.
        self.clear_pending(irqn)?;

        cpu.write_register(CoreRegister::Pc, handler);
        cpu.write_register(CoreRegister::Lr, EXC_RETURN);

        self.set_active(irqn, true)?;
        let begin = cpu.read_register(CoreRegister::Pc);
        let outcome = HandlerOutcome::from_run(cpu.run(begin, EXC_RETURN));
        self.set_active(irqn, false)?;

        log::debug!("exit irq {irqn}: {outcome:?}");
        Ok(Delivery {
            irqn,
            handler,
            outcome,
        })
    }
}
