//! NVIC register storage and fixed field layout.

/// Bounds-checked byte and word storage.
pub mod block;
/// Named field offsets and sizes.
pub mod layout;

pub use block::{RegisterBlock, MAX_ACCESS_BYTES};
pub use layout::{
    field_at, FieldDescriptor, RegisterField, IABR_OFFSET, ICER_OFFSET, ICPR_OFFSET, IPR_OFFSET,
    ISER_OFFSET, ISPR_OFFSET, PLANE_WORDS, PRIORITY_ENTRIES, REGISTER_BLOCK_BYTES,
    REGISTER_FIELDS, SOFTWARE_TRIGGER_WORDS, STIR_OFFSET, WORD_BYTES,
};
