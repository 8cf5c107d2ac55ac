//! Write-side semantics of the set/clear bit-planes.
//!
//! A byte written into one of the four covered planes is not stored. Each set
//! bit instead fires the plane's action for the interrupt it encodes.

use crate::registers::{FieldDescriptor, RegisterField};
use crate::{Nvic, NvicError, SystemExceptionAuthority};

/// State change fired by a set bit in a covered plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerAction {
    /// Enable the interrupt.
    Enable,
    /// Disable the interrupt.
    Disable,
    /// Mark the interrupt pending.
    SetPending,
    /// Clear the interrupt's pending state.
    ClearPending,
}

/// Planes with write triggers and the action each fires.
pub const TRIGGER_TABLE: [(FieldDescriptor, TriggerAction); 4] = [
    (RegisterField::SetEnable.descriptor(), TriggerAction::Enable),
    (RegisterField::ClearEnable.descriptor(), TriggerAction::Disable),
    (RegisterField::SetPending.descriptor(), TriggerAction::SetPending),
    (RegisterField::ClearPending.descriptor(), TriggerAction::ClearPending),
];

/// Finds the trigger covering byte `offset`, with the covered plane.
#[must_use]
pub fn trigger_at(offset: usize) -> Option<(FieldDescriptor, TriggerAction)> {
    TRIGGER_TABLE
        .iter()
        .copied()
        .find(|(descriptor, _)| descriptor.contains(offset))
}

/// Interrupt numbers encoded by the set bits of `byte` written at `offset`
/// inside `plane`, lowest first.
pub fn triggered_irqns(
    plane: FieldDescriptor,
    offset: usize,
    byte: u8,
) -> impl Iterator<Item = i32> {
    let base = offset.saturating_sub(plane.offset) * 8;
    (0..8_usize)
        .filter(move |bit| (byte >> bit) & 1 != 0)
        .filter_map(move |bit| i32::try_from(base + bit).ok())
}

impl<A: SystemExceptionAuthority> Nvic<A> {
    /// Runs `action` for interrupt `irqn`.
    ///
    /// # Errors
    ///
    /// Propagates the state operation's error.
    pub fn apply_trigger(&mut self, action: TriggerAction, irqn: i32) -> Result<(), NvicError> {
        match action {
            TriggerAction::Enable => self.enable(irqn),
            TriggerAction::Disable => self.disable(irqn),
            TriggerAction::SetPending => self.set_pending(irqn),
            TriggerAction::ClearPending => self.clear_pending(irqn),
        }
    }

    /// Routes one written byte: triggers for covered planes, raw storage for
    /// everything else.
    pub(crate) fn write_byte(&mut self, offset: usize, byte: u8) -> Result<(), NvicError> {
        let Some((plane, action)) = trigger_at(offset) else {
            return self.registers.set_byte(offset, byte);
        };

        for irqn in triggered_irqns(plane, offset, byte) {
            log::trace!("register write at {offset:#x} fires {action:?} for irq {irqn}");
            self.apply_trigger(action, irqn)?;
        }
        Ok(())
    }
}
