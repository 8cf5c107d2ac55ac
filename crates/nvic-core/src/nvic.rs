//! The controller instance: register storage, dispatch queue and the injected
//! system-exception authority.

use crate::{NvicConfig, PendingQueue, RegisterBlock, SystemExceptionAuthority};

/// Nested Vectored Interrupt Controller model.
///
/// `A` owns system exceptions (negative interrupt numbers); every operation on
/// them is forwarded there.
#[derive(Debug, Clone)]
pub struct Nvic<A> {
    pub(crate) config: NvicConfig,
    pub(crate) registers: RegisterBlock,
    pub(crate) queue: PendingQueue,
    pub(crate) authority: A,
}

impl<A: SystemExceptionAuthority> Nvic<A> {
    /// Creates a controller with a zeroed register block and an empty queue.
    #[must_use]
    pub fn new(config: NvicConfig, authority: A) -> Self {
        Self {
            config,
            registers: RegisterBlock::new(),
            queue: PendingQueue::new(),
            authority,
        }
    }

    /// Returns the configuration this controller was built with.
    #[must_use]
    pub const fn config(&self) -> &NvicConfig {
        &self.config
    }

    /// Returns the register storage.
    #[must_use]
    pub const fn registers(&self) -> &RegisterBlock {
        &self.registers
    }

    /// Returns the interrupts queued for the next tick.
    #[must_use]
    pub const fn pending_queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// Returns the system-exception authority.
    #[must_use]
    pub const fn authority(&self) -> &A {
        &self.authority
    }

    /// Returns the system-exception authority mutably.
    #[allow(clippy::missing_const_for_fn)]
    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    /// Restores power-on state: zeroed registers and an empty queue.
    ///
    /// The system-exception authority is left untouched.
    pub fn reset(&mut self) {
        self.registers.clear();
        self.queue.clear();
        log::debug!("nvic reset");
    }
}

#[cfg(test)]
mod tests {
    use super::Nvic;
    use crate::{NvicConfig, SystemExceptionLatch};

    #[test]
    fn new_controller_starts_zeroed_and_idle() {
        let nvic = Nvic::new(
            NvicConfig::with_vector_table(0x0800_0000),
            SystemExceptionLatch::new(),
        );
        assert!(nvic.pending_queue().is_empty());
        assert!(nvic.registers().as_bytes().iter().all(|byte| *byte == 0));
        assert_eq!(nvic.config().vector_table_base, 0x0800_0000);
    }

    #[test]
    fn reset_clears_state_and_queue() {
        let mut nvic = Nvic::new(NvicConfig::default(), SystemExceptionLatch::new());
        nvic.enable(3).expect("valid interrupt");
        nvic.set_pending(3).expect("valid interrupt");
        assert_eq!(nvic.pending_queue().as_slice(), &[3]);

        nvic.reset();

        assert!(nvic.pending_queue().is_empty());
        assert_eq!(nvic.get_enable(3), Ok(false));
        assert_eq!(nvic.get_pending(3), Ok(false));
    }
}
