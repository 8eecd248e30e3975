/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Image orientation (mirror / flip) patching of mode tables

use crate::registers::Register;
use crate::table::{RegisterEntry, RegisterKind};

/// Flip/mirror policy configured for the board
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlipMode {
    /// No policy configured: keep the sensor's power-on orientation
    Unset,
    /// Policy configured, but neither mirrored nor flipped
    Normal,
    Mirror,
    Flip,
    Both,
}

impl Default for FlipMode {
    fn default() -> Self {
        FlipMode::Unset
    }
}

/// Values for [`Register::ImageOrientation`]
#[repr(u16)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    None = 0x0,
    Horizontal = 0x1,
    Vertical = 0x2,
    Both = 0x3,
}

impl Orientation {
    /// `None` when the policy is unset and the table must stay untouched
    pub fn from_flip_mode(mode: FlipMode) -> Option<Self> {
        match mode {
            FlipMode::Unset => None,
            FlipMode::Normal => Some(Orientation::None),
            FlipMode::Mirror => Some(Orientation::Horizontal),
            FlipMode::Flip => Some(Orientation::Vertical),
            FlipMode::Both => Some(Orientation::Both),
        }
    }
}

/// Rewrite the orientation entry of a caller-owned table copy.
/// Returns the orientation written, or `None` if nothing was changed.
pub fn set_orientation(
    table: &mut [RegisterEntry],
    flip_mode: FlipMode,
) -> Option<Orientation> {
    let orientation = Orientation::from_flip_mode(flip_mode)?;
    let target = Register::ImageOrientation.addr();
    let mut patched = false;
    for entry in table
        .iter_mut()
        .filter(|e| e.kind == RegisterKind::Data && e.address == target)
    {
        entry.value = orientation as u16;
        patched = true;
    }
    if patched {
        Some(orientation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModeRegistry;

    fn orientation_value(table: &[RegisterEntry]) -> Option<u16> {
        table
            .iter()
            .find(|e| e.address == Register::ImageOrientation.addr())
            .map(|e| e.value)
    }

    #[test]
    fn unset_policy_leaves_table_untouched() {
        let registry = ModeRegistry::new();
        let mut table = registry.default_mode().register_table();
        assert_eq!(set_orientation(&mut table, FlipMode::Unset), None);
        assert_eq!(table.as_slice(), registry.default_mode().registers());
    }

    #[test]
    fn policies_map_to_orientation_bits() {
        let registry = ModeRegistry::new();
        let cases = [
            (FlipMode::Normal, 0x0),
            (FlipMode::Mirror, 0x1),
            (FlipMode::Flip, 0x2),
            (FlipMode::Both, 0x3),
        ];
        for &(mode, expected) in cases.iter() {
            let mut table = registry.default_mode().register_table();
            set_orientation(&mut table, mode);
            assert_eq!(orientation_value(&table), Some(expected), "{:?}", mode);
        }
    }

    #[test]
    fn patching_a_copy_keeps_catalog_pristine() {
        let registry = ModeRegistry::new();
        let mut table = registry.get(1).unwrap().register_table();
        assert_eq!(
            set_orientation(&mut table, FlipMode::Both),
            Some(Orientation::Both)
        );
        let pristine = registry.get(1).unwrap().registers();
        assert_eq!(orientation_value(pristine), Some(0));
    }

    #[test]
    fn table_without_orientation_entry_is_unchanged() {
        let mut table = [RegisterEntry::data(0x0340, 0x07)];
        assert_eq!(set_orientation(&mut table, FlipMode::Mirror), None);
        assert_eq!(table[0], RegisterEntry::data(0x0340, 0x07));
    }
}
