//! Controller configuration.

/// What a tick does when a handler stops somewhere other than its return
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultPolicy {
    /// Restore context, requeue undelivered interrupts and return the fault.
    #[default]
    Propagate,
    /// Log the fault and treat the handler as completed.
    Absorb,
}

/// Immutable configuration for a controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NvicConfig {
    /// Guest address of the boot vector table.
    pub vector_table_base: u32,
    /// Handling of faulted handlers during dispatch.
    pub fault_policy: FaultPolicy,
}

impl NvicConfig {
    /// Configuration with the vector table at `vector_table_base`.
    #[must_use]
    pub const fn with_vector_table(vector_table_base: u32) -> Self {
        Self {
            vector_table_base,
            fault_policy: FaultPolicy::Propagate,
        }
    }

    /// Returns a copy using `fault_policy`.
    #[must_use]
    pub const fn fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.fault_policy = fault_policy;
        self
    }
}
