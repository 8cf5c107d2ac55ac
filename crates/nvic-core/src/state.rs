//! Enable, pending, active and priority state of individual interrupts.
//!
//! Device interrupts (`irqn >= 0`) live in the register block. The set and
//! clear planes of each capability alias one logical bit, so every mutation
//! writes both and either plane answers a query. Negative numbers are system
//! exceptions and go to the injected authority.

use crate::bits::checked_locate;
use crate::registers::{RegisterField, IPR_OFFSET, PRIORITY_ENTRIES};
use crate::{Nvic, NvicError, SystemExceptionAuthority};

/// Priority reported for every interrupt until priority grouping is modelled.
pub const PRIORITY_STUB: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Enable,
    Pending,
}

impl Capability {
    const fn planes(self) -> [RegisterField; 2] {
        match self {
            Self::Enable => [RegisterField::SetEnable, RegisterField::ClearEnable],
            Self::Pending => [RegisterField::SetPending, RegisterField::ClearPending],
        }
    }
}

impl<A: SystemExceptionAuthority> Nvic<A> {
    /// Enables interrupt `irqn`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn enable(&mut self, irqn: i32) -> Result<(), NvicError> {
        if irqn < 0 {
            log::trace!("forwarding enable of system exception {irqn}");
            self.authority.enable(irqn);
            return Ok(());
        }
        self.store_mirrored(Capability::Enable, irqn, true)
    }

    /// Disables interrupt `irqn`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn disable(&mut self, irqn: i32) -> Result<(), NvicError> {
        if irqn < 0 {
            log::trace!("forwarding disable of system exception {irqn}");
            self.authority.disable(irqn);
            return Ok(());
        }
        self.store_mirrored(Capability::Enable, irqn, false)
    }

    /// Returns whether interrupt `irqn` is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn get_enable(&self, irqn: i32) -> Result<bool, NvicError> {
        if irqn < 0 {
            return Ok(self.authority.get_enable(irqn));
        }
        self.load_bit(RegisterField::SetEnable, irqn)
    }

    /// Marks interrupt `irqn` pending and, when it is enabled, queues it for
    /// the next tick.
    ///
    /// Pending state is recorded whether or not the interrupt is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn set_pending(&mut self, irqn: i32) -> Result<(), NvicError> {
        if irqn < 0 {
            log::trace!("forwarding set-pending of system exception {irqn}");
            self.authority.set_pending(irqn);
        } else {
            self.store_mirrored(Capability::Pending, irqn, true)?;
        }

        if self.get_enable(irqn)? {
            self.queue.push(irqn);
        }
        Ok(())
    }

    /// Clears the pending state of interrupt `irqn`.
    ///
    /// Entries already queued stay queued until the next tick drains them.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn clear_pending(&mut self, irqn: i32) -> Result<(), NvicError> {
        if irqn < 0 {
            log::trace!("forwarding clear-pending of system exception {irqn}");
            self.authority.clear_pending(irqn);
            return Ok(());
        }
        self.store_mirrored(Capability::Pending, irqn, false)
    }

    /// Returns whether interrupt `irqn` is pending.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn get_pending(&self, irqn: i32) -> Result<bool, NvicError> {
        if irqn < 0 {
            return Ok(self.authority.get_pending(irqn));
        }
        self.load_bit(RegisterField::SetPending, irqn)
    }

    /// Returns whether the handler of device interrupt `irqn` is running.
    ///
    /// System exceptions are never tracked in the active plane and report
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] for device numbers past the planes.
    pub fn get_active(&self, irqn: i32) -> Result<bool, NvicError> {
        if irqn < 0 {
            return Ok(false);
        }
        self.load_bit(RegisterField::Active, irqn)
    }

    /// Dispatch priority of `irqn`; lower values are delivered first.
    ///
    /// Always [`PRIORITY_STUB`]. The priority table is stored but not yet
    /// consulted.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn get_priority(&self, _irqn: i32) -> u8 {
        PRIORITY_STUB
    }

    /// Reads the raw priority byte of device interrupt `irqn`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] when `irqn` has no priority entry.
    pub fn priority_byte(&self, irqn: i32) -> Result<u8, NvicError> {
        self.registers.byte(Self::priority_offset(irqn)?)
    }

    /// Stores the raw priority byte of device interrupt `irqn`.
    ///
    /// # Errors
    ///
    /// Returns [`NvicError::IrqOutOfRange`] when `irqn` has no priority entry.
    pub fn set_priority_byte(&mut self, irqn: i32, value: u8) -> Result<(), NvicError> {
        self.registers.set_byte(Self::priority_offset(irqn)?, value)
    }

    pub(crate) fn set_active(&mut self, irqn: i32, active: bool) -> Result<(), NvicError> {
        if irqn < 0 {
            return Ok(());
        }
        self.store_bit(RegisterField::Active, irqn, active)
    }

    fn priority_offset(irqn: i32) -> Result<usize, NvicError> {
        match usize::try_from(irqn) {
            Ok(index) if index < PRIORITY_ENTRIES => Ok(IPR_OFFSET + index),
            _ => Err(NvicError::IrqOutOfRange(irqn)),
        }
    }

    fn store_mirrored(
        &mut self,
        capability: Capability,
        irqn: i32,
        value: bool,
    ) -> Result<(), NvicError> {
        for field in capability.planes() {
            self.store_bit(field, irqn, value)?;
        }
        Ok(())
    }

    fn store_bit(&mut self, field: RegisterField, irqn: i32, value: bool) -> Result<(), NvicError> {
        let position = checked_locate(irqn)?;
        let word = self.registers.word(field, position.word)?;
        let word = if value {
            word | position.mask()
        } else {
            word & !position.mask()
        };
        self.registers.set_word(field, position.word, word)
    }

    fn load_bit(&self, field: RegisterField, irqn: i32) -> Result<bool, NvicError> {
        let position = checked_locate(irqn)?;
        let word = self.registers.word(field, position.word)?;
        Ok(word & position.mask() != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::PRIORITY_STUB;
    use crate::registers::{RegisterField, IPR_OFFSET};
    use crate::{Nvic, NvicConfig, NvicError, SystemExceptionAuthority, SystemExceptionLatch};

    fn nvic() -> Nvic<SystemExceptionLatch> {
        Nvic::new(NvicConfig::default(), SystemExceptionLatch::new())
    }

    #[test]
    fn enable_writes_both_enable_planes() {
        let mut nvic = nvic();
        nvic.enable(33).expect("valid interrupt");

        assert_eq!(nvic.registers.word(RegisterField::SetEnable, 1), Ok(1 << 1));
        assert_eq!(
            nvic.registers.word(RegisterField::ClearEnable, 1),
            Ok(1 << 1)
        );
        assert_eq!(nvic.get_enable(33), Ok(true));

        nvic.disable(33).expect("valid interrupt");
        assert_eq!(nvic.registers.word(RegisterField::SetEnable, 1), Ok(0));
        assert_eq!(nvic.registers.word(RegisterField::ClearEnable, 1), Ok(0));
        assert_eq!(nvic.get_enable(33), Ok(false));
    }

    #[test]
    fn disable_leaves_neighbouring_bits_untouched() {
        let mut nvic = nvic();
        for irqn in 0..32 {
            nvic.enable(irqn).expect("valid interrupt");
        }
        nvic.disable(7).expect("valid interrupt");
        assert_eq!(
            nvic.registers.word(RegisterField::SetEnable, 0),
            Ok(!(1 << 7))
        );
    }

    #[test]
    fn pending_uses_pending_planes_not_enable_planes() {
        let mut nvic = nvic();
        nvic.set_pending(40).expect("valid interrupt");

        assert_eq!(nvic.get_pending(40), Ok(true));
        assert_eq!(nvic.get_enable(40), Ok(false));
        assert_eq!(
            nvic.registers.word(RegisterField::ClearPending, 1),
            Ok(1 << 8)
        );

        nvic.clear_pending(40).expect("valid interrupt");
        assert_eq!(nvic.get_pending(40), Ok(false));
    }

    #[test]
    fn set_pending_queues_only_enabled_interrupts() {
        let mut nvic = nvic();
        nvic.set_pending(4).expect("valid interrupt");
        assert!(nvic.pending_queue().is_empty());

        nvic.enable(4).expect("valid interrupt");
        nvic.set_pending(4).expect("valid interrupt");
        nvic.set_pending(4).expect("valid interrupt");
        assert_eq!(nvic.pending_queue().as_slice(), &[4, 4]);

        nvic.clear_pending(4).expect("valid interrupt");
        assert_eq!(nvic.pending_queue().as_slice(), &[4, 4]);
    }

    #[test]
    fn negative_numbers_are_forwarded_to_authority() {
        let mut nvic = nvic();
        nvic.enable(-1).expect("system exception");
        nvic.set_pending(-1).expect("system exception");

        assert!(nvic.authority().get_enable(-1));
        assert!(nvic.authority().get_pending(-1));
        assert_eq!(nvic.pending_queue().as_slice(), &[-1]);
        assert!(nvic.registers.as_bytes().iter().all(|byte| *byte == 0));

        nvic.clear_pending(-1).expect("system exception");
        nvic.disable(-1).expect("system exception");
        assert_eq!(nvic.get_pending(-1), Ok(false));
        assert_eq!(nvic.get_enable(-1), Ok(false));
    }

    #[test]
    fn numbers_past_planes_are_rejected() {
        let mut nvic = nvic();
        assert_eq!(nvic.enable(256), Err(NvicError::IrqOutOfRange(256)));
        assert_eq!(nvic.set_pending(1000), Err(NvicError::IrqOutOfRange(1000)));
        assert_eq!(nvic.get_pending(256), Err(NvicError::IrqOutOfRange(256)));
        assert!(nvic.pending_queue().is_empty());
    }

    #[test]
    fn priority_is_stubbed_while_table_is_stored() {
        let mut nvic = nvic();
        nvic.set_priority_byte(10, 0xC0).expect("priority entry");

        assert_eq!(nvic.get_priority(10), PRIORITY_STUB);
        assert_eq!(nvic.get_priority(-3), PRIORITY_STUB);
        assert_eq!(nvic.priority_byte(10), Ok(0xC0));
        assert_eq!(nvic.registers.byte(IPR_OFFSET + 10), Ok(0xC0));
        assert_eq!(nvic.priority_byte(240), Err(NvicError::IrqOutOfRange(240)));
        assert_eq!(nvic.priority_byte(-1), Err(NvicError::IrqOutOfRange(-1)));
    }

    #[test]
    fn active_plane_tracks_device_interrupts_only() {
        let mut nvic = nvic();
        nvic.set_active(9, true).expect("valid interrupt");
        assert_eq!(nvic.get_active(9), Ok(true));
        nvic.set_active(9, false).expect("valid interrupt");
        assert_eq!(nvic.get_active(9), Ok(false));

        nvic.set_active(-2, true).expect("system exception");
        assert_eq!(nvic.get_active(-2), Ok(false));
    }
}
