//! Quality-dependent accessors.
use super::{Item, MagicalAttribute};
use crate::codec::layout::{RUNEWORD_EXTRA_BITS, RUNEWORD_ID_BITS};
use crate::codec::walker::Walker;
use crate::codec::{FieldId, Quality, QualityData};
use crate::env::{AffixOracle, RunewordDefinition};

/// Set membership of a set-quality item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetAttributes<'a> {
    pub id: u16,
    /// Bonus lists stored on the item; bit `n` selects list `n`.
    pub mask: u8,
    pub bonuses: &'a [Vec<MagicalAttribute>],
}

/// Name pair and affix slots of a rare or crafted item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RareAttributes {
    pub prefix_name: u8,
    pub suffix_name: u8,
    /// Even slots hold prefixes, odd slots suffixes.
    pub affixes: [Option<u16>; 6],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunewordAttributes<'a> {
    pub id: u16,
    pub attributes: &'a [MagicalAttribute],
}

impl Item {
    /// Quality as stored in the record; normal when the generation does not
    /// store one.
    pub(crate) fn stored_quality(&self) -> Quality {
        self.field(FieldId::Quality)
            .and_then(|raw| Quality::try_from(raw as u8).ok())
            .unwrap_or(Quality::Normal)
    }

    pub(crate) fn stored_quality_data(&self) -> QualityData {
        let quality = self.stored_quality();
        let Some(slot) = self.fields.present(FieldId::QualityData) else {
            return QualityData::empty_for(quality);
        };
        let mut walker = Walker::new(self.data.as_bytes(), 0);
        walker.seek(slot.marker);
        let read = if self.version.is_legacy() {
            QualityData::read_fixed(&mut walker, quality)
        } else {
            QualityData::read_variable(&mut walker, quality)
        };
        read.unwrap_or(QualityData::empty_for(quality))
    }

    /// Effective quality; regenerated for generations that do not store it.
    pub fn quality(&self) -> Quality {
        match &self.legacy {
            Some(roll) => roll.quality,
            None => self.stored_quality(),
        }
    }

    pub fn quality_data(&self) -> QualityData {
        match &self.legacy {
            Some(roll) => roll.quality_data,
            None => self.stored_quality_data(),
        }
    }

    /// Magic prefix and suffix ids (zero for none).
    pub fn magical_affixes(&self) -> Option<(u16, u16)> {
        match self.quality_data() {
            QualityData::Magic { prefix, suffix } => Some((prefix, suffix)),
            _ => None,
        }
    }

    pub fn set_attributes(&self) -> Option<SetAttributes<'_>> {
        let QualityData::Set(id) = self.quality_data() else {
            return None;
        };
        Some(SetAttributes {
            id,
            mask: self.field(FieldId::SetBonusMask).unwrap_or(0) as u8,
            bonuses: &self.properties.set,
        })
    }

    pub fn rare_or_crafted_attributes(&self) -> Option<RareAttributes> {
        match self.quality_data() {
            QualityData::Rare {
                prefix_name,
                suffix_name,
                affixes,
            } => Some(RareAttributes {
                prefix_name,
                suffix_name,
                affixes,
            }),
            _ => None,
        }
    }

    /// Unique id.
    pub fn unique_attributes(&self) -> Option<u16> {
        match self.quality_data() {
            QualityData::Unique(id) => Some(id),
            _ => None,
        }
    }

    pub fn runeword_id(&self) -> Option<u16> {
        let slot = self.fields.present(FieldId::Runeword)?;
        Some(self.data.read_bits(slot.marker, RUNEWORD_ID_BITS) as u16)
    }

    pub(crate) fn runeword_extra(&self) -> u8 {
        self.fields.present(FieldId::Runeword).map_or(0, |slot| {
            let at = slot.marker + RUNEWORD_ID_BITS as usize;
            self.data.read_bits(at, RUNEWORD_EXTRA_BITS) as u8
        })
    }

    pub fn runeword_attributes(&self) -> Option<RunewordAttributes<'_>> {
        Some(RunewordAttributes {
            id: self.runeword_id()?,
            attributes: &self.properties.runeword,
        })
    }

    /// Catalogue entry of the attached runeword.
    pub fn runeword<'a>(&self, affixes: &'a dyn AffixOracle) -> Option<&'a RunewordDefinition> {
        affixes.runeword(self.runeword_id()?)
    }
}
