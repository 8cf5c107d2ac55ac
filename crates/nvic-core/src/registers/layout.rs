//! Fixed NVIC register-block layout and field table.

/// Number of 32-bit words in every enable/pending/active bit-plane.
pub const PLANE_WORDS: usize = 8;
/// Width in bytes of one bit-plane word.
pub const WORD_BYTES: usize = 4;
/// Number of per-interrupt priority bytes.
pub const PRIORITY_ENTRIES: usize = 240;
/// Number of 32-bit words in the software-trigger field.
pub const SOFTWARE_TRIGGER_WORDS: usize = 8;

/// Byte offset of the set-enable plane (`ISER`).
pub const ISER_OFFSET: usize = 0x000;
/// Byte offset of the clear-enable plane (`ICER`).
pub const ICER_OFFSET: usize = 0x080;
/// Byte offset of the set-pending plane (`ISPR`).
pub const ISPR_OFFSET: usize = 0x100;
/// Byte offset of the clear-pending plane (`ICPR`).
pub const ICPR_OFFSET: usize = 0x180;
/// Byte offset of the active plane (`IABR`).
pub const IABR_OFFSET: usize = 0x200;
/// Byte offset of the priority table (`IPR`).
pub const IPR_OFFSET: usize = 0x300;
/// Byte offset of the software-trigger field (`STIR`).
pub const STIR_OFFSET: usize = 0xE00;

const PLANE_BYTES: usize = PLANE_WORDS * WORD_BYTES;

/// Total size in bytes of the register block, reserved gaps included.
pub const REGISTER_BLOCK_BYTES: usize = STIR_OFFSET + SOFTWARE_TRIGGER_WORDS * WORD_BYTES;

/// Named register fields of the NVIC block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterField {
    /// Interrupt set-enable bit-plane.
    SetEnable,
    /// Interrupt clear-enable bit-plane.
    ClearEnable,
    /// Interrupt set-pending bit-plane.
    SetPending,
    /// Interrupt clear-pending bit-plane.
    ClearPending,
    /// Interrupt active bit-plane.
    Active,
    /// Per-interrupt priority bytes.
    Priority,
    /// Software-trigger words.
    SoftwareTrigger,
}

/// Placement of one named field inside the register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field identity.
    pub field: RegisterField,
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Field length in bytes.
    pub size: usize,
}

impl FieldDescriptor {
    /// Returns `true` when byte `offset` falls inside this field.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.offset + self.size
    }

    /// Exclusive end offset of the field.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

impl RegisterField {
    /// Returns the canonical placement of this field.
    #[must_use]
    pub const fn descriptor(self) -> FieldDescriptor {
        let (offset, size) = match self {
            Self::SetEnable => (ISER_OFFSET, PLANE_BYTES),
            Self::ClearEnable => (ICER_OFFSET, PLANE_BYTES),
            Self::SetPending => (ISPR_OFFSET, PLANE_BYTES),
            Self::ClearPending => (ICPR_OFFSET, PLANE_BYTES),
            Self::Active => (IABR_OFFSET, PLANE_BYTES),
            Self::Priority => (IPR_OFFSET, PRIORITY_ENTRIES),
            Self::SoftwareTrigger => (STIR_OFFSET, SOFTWARE_TRIGGER_WORDS * WORD_BYTES),
        };
        FieldDescriptor {
            field: self,
            offset,
            size,
        }
    }

    /// Returns `true` for the 8-word interrupt bit-planes.
    #[must_use]
    pub const fn is_bit_plane(self) -> bool {
        matches!(
            self,
            Self::SetEnable | Self::ClearEnable | Self::SetPending | Self::ClearPending | Self::Active
        )
    }
}

/// Named fields in ascending offset order.
pub const REGISTER_FIELDS: [FieldDescriptor; 7] = [
    RegisterField::SetEnable.descriptor(),
    RegisterField::ClearEnable.descriptor(),
    RegisterField::SetPending.descriptor(),
    RegisterField::ClearPending.descriptor(),
    RegisterField::Active.descriptor(),
    RegisterField::Priority.descriptor(),
    RegisterField::SoftwareTrigger.descriptor(),
];

const _: () = assert_register_layout();

const fn assert_register_layout() {
    let mut index = 0;
    while index < REGISTER_FIELDS.len() {
        let descriptor = REGISTER_FIELDS[index];
        assert!(descriptor.size > 0, "fields cannot be empty");
        assert!(
            descriptor.end() <= REGISTER_BLOCK_BYTES,
            "fields must lie inside the register block"
        );

        if index > 0 {
            let previous = REGISTER_FIELDS[index - 1];
            assert!(
                previous.end() <= descriptor.offset,
                "fields must be ascending and non-overlapping"
            );
        }

        index += 1;
    }

    assert!(
        PRIORITY_ENTRIES <= PLANE_WORDS * 32,
        "priority table cannot outgrow the bit-planes"
    );
}

/// Finds the named field covering byte `offset`, if any.
///
/// Bytes in reserved gaps return `None`.
#[must_use]
pub fn field_at(offset: usize) -> Option<FieldDescriptor> {
    REGISTER_FIELDS
        .iter()
        .copied()
        .find(|descriptor| descriptor.contains(offset))
}

#[cfg(test)]
mod tests {
    use super::{
        field_at, RegisterField, IABR_OFFSET, ICER_OFFSET, ICPR_OFFSET, IPR_OFFSET, ISER_OFFSET,
        ISPR_OFFSET, REGISTER_BLOCK_BYTES, REGISTER_FIELDS, STIR_OFFSET,
    };

    #[test]
    fn block_size_matches_cortex_m_layout() {
        assert_eq!(REGISTER_BLOCK_BYTES, 0xE20);
    }

    #[test]
    fn field_offsets_match_architectural_map() {
        let offsets: Vec<usize> = REGISTER_FIELDS.iter().map(|d| d.offset).collect();
        assert_eq!(
            offsets,
            vec![
                ISER_OFFSET,
                ICER_OFFSET,
                ISPR_OFFSET,
                ICPR_OFFSET,
                IABR_OFFSET,
                IPR_OFFSET,
                STIR_OFFSET
            ]
        );
        assert_eq!(RegisterField::Priority.descriptor().size, 240);
        assert_eq!(RegisterField::SetEnable.descriptor().size, 32);
    }

    #[test]
    fn field_lookup_is_correct_at_boundaries() {
        assert_eq!(
            field_at(0x000).map(|d| d.field),
            Some(RegisterField::SetEnable)
        );
        assert_eq!(
            field_at(0x01F).map(|d| d.field),
            Some(RegisterField::SetEnable)
        );
        assert_eq!(field_at(0x020), None);
        assert_eq!(
            field_at(0x180).map(|d| d.field),
            Some(RegisterField::ClearPending)
        );
        assert_eq!(
            field_at(0x3EF).map(|d| d.field),
            Some(RegisterField::Priority)
        );
        assert_eq!(field_at(0x3F0), None);
        assert_eq!(
            field_at(0xE1F).map(|d| d.field),
            Some(RegisterField::SoftwareTrigger)
        );
        assert_eq!(field_at(REGISTER_BLOCK_BYTES), None);
    }

    #[test]
    fn only_word_planes_are_bit_planes() {
        assert!(RegisterField::Active.is_bit_plane());
        assert!(RegisterField::ClearEnable.is_bit_plane());
        assert!(!RegisterField::Priority.is_bit_plane());
        assert!(!RegisterField::SoftwareTrigger.is_bit_plane());
    }
}
