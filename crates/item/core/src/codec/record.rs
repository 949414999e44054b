//! Version-neutral item model.
//!
//! An [`ItemRecord`] holds every persisted field of an item independently of
//! the schema generation it came from. Creation and version conversion go
//! through this model and re-encode from scratch; raw bytes are never patched
//! across generations.
use super::header::{ItemFlags, RawLocation};
use super::properties::RawProperty;
use super::quality::{Quality, QualityData};
use crate::env::ItemCode;

/// Persisted fields of one item and its socketed children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    /// Raw flags word, unknown bits included.
    pub flags: ItemFlags,
    /// Expansion game mode (derived from the version tag).
    pub expansion: bool,
    /// Version tag as stored. Written back when it agrees with `expansion`;
    /// `None` writes the canonical tag of the target version.
    pub version_tag: Option<u16>,
    pub location: RawLocation,
    /// Type code; [`ItemCode::INVALID`] for ears.
    pub code: ItemCode,
    pub ear: Option<EarRecord>,
    /// Full-record fields; `None` for simple records.
    pub extended: Option<ExtendedRecord>,
    /// Unassigned bits of the fixed-length layouts, packed in offset order.
    pub reserved: u64,
    pub children: Vec<ItemRecord>,
}

/// Ear trophy fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EarRecord {
    pub class: u8,
    pub level: u8,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurabilityRecord {
    pub max: u8,
    pub current: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunewordRecord {
    pub id: u16,
    /// Trailing bits written after the id.
    pub extra: u8,
}

/// Fields present only in full records. Gated fields are kept even when the
/// target layout does not store them; the encoder decides what to write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtendedRecord {
    pub id: u32,
    /// Second half of the legacy seed pair; zero in the variable layouts.
    pub seed: u32,
    pub level: u8,
    pub quality: Quality,
    pub picture: Option<u8>,
    pub class_affix: Option<u16>,
    pub quality_data: QualityData,
    pub runeword: Option<RunewordRecord>,
    pub personalized_name: Option<String>,
    pub tome_charge: u8,
    pub realm: Option<[u32; 3]>,
    pub defense: u16,
    pub durability: DurabilityRecord,
    pub quantity: u16,
    pub socket_count: u8,
    pub set_mask: u8,
    pub magic_properties: Vec<RawProperty>,
    pub set_properties: Vec<Vec<RawProperty>>,
    pub runeword_properties: Vec<RawProperty>,
}

impl ExtendedRecord {
    pub fn new(id: u32, level: u8) -> Self {
        Self {
            id,
            level,
            ..Self::default()
        }
    }
}

impl ItemRecord {
    /// Simple record for a type code.
    pub fn simple(code: ItemCode) -> Self {
        Self {
            flags: ItemFlags::CONSTANT | ItemFlags::IDENTIFIED | ItemFlags::SIMPLE,
            code,
            ..Self::default()
        }
    }

    /// Full record for a type code.
    pub fn full(code: ItemCode, extended: ExtendedRecord) -> Self {
        Self {
            flags: ItemFlags::CONSTANT | ItemFlags::IDENTIFIED,
            code,
            extended: Some(extended),
            ..Self::default()
        }
    }

    pub fn ear(ear: EarRecord) -> Self {
        Self {
            flags: ItemFlags::CONSTANT | ItemFlags::IDENTIFIED | ItemFlags::SIMPLE | ItemFlags::EAR,
            ear: Some(ear),
            ..Self::default()
        }
    }

    /// Flags word consistent with the record's sections.
    pub fn normalized_flags(&self) -> ItemFlags {
        let mut flags = self.flags;
        flags.set(ItemFlags::EAR, self.ear.is_some());
        flags.set(ItemFlags::SIMPLE, self.extended.is_none());
        match &self.extended {
            Some(ext) => {
                flags.set(ItemFlags::PERSONALIZED, ext.personalized_name.is_some());
                flags.set(ItemFlags::RUNEWORD, ext.runeword.is_some());
                if ext.socket_count > 0 || !self.children.is_empty() {
                    flags.insert(ItemFlags::SOCKETED);
                }
            }
            None => flags.remove(ItemFlags::PERSONALIZED | ItemFlags::RUNEWORD),
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_sections() {
        let code = ItemCode::new("lsd").unwrap();
        let mut ext = ExtendedRecord::new(7, 10);
        ext.personalized_name = Some(String::from("Tal"));
        ext.socket_count = 3;
        let record = ItemRecord::full(code, ext);
        let flags = record.normalized_flags();
        assert!(flags.contains(ItemFlags::PERSONALIZED | ItemFlags::SOCKETED));
        assert!(!flags.intersects(ItemFlags::SIMPLE | ItemFlags::RUNEWORD | ItemFlags::EAR));

        let simple = ItemRecord::simple(code);
        let mut stray = simple.clone();
        stray.flags |= ItemFlags::PERSONALIZED;
        assert_eq!(stray.normalized_flags(), simple.normalized_flags());
    }
}
