//! Item quality and the quality-dependent data section.
use super::CodecError;
use super::encode::check_width;
use super::fields::FieldId;
use super::walker::Walker;
use crate::bits::BitBuffer;
use crate::env::{AffixKind, AffixOracle};

/// Stored quality grade.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Quality {
    Inferior = 1,
    #[default]
    Normal = 2,
    Superior = 3,
    Magic = 4,
    Set = 5,
    Rare = 6,
    Unique = 7,
    Crafted = 8,
}

impl Quality {
    pub const BITS: u32 = 4;

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Qualities that can carry a runeword.
    pub const fn accepts_runeword(self) -> bool {
        matches!(self, Self::Normal | Self::Superior)
    }
}

impl TryFrom<u8> for Quality {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Inferior,
            2 => Self::Normal,
            3 => Self::Superior,
            4 => Self::Magic,
            5 => Self::Set,
            6 => Self::Rare,
            7 => Self::Unique,
            8 => Self::Crafted,
            other => return Err(CodecError::UnknownQuality(other)),
        })
    }
}

/// Quality-dependent identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualityData {
    #[default]
    None,
    /// Inferior/superior sub-grade.
    Grade(u8),
    Magic { prefix: u16, suffix: u16 },
    Set(u16),
    Unique(u16),
    /// Rare and crafted: name pair plus up to six affixes (even slots are
    /// prefixes, odd slots suffixes).
    Rare {
        prefix_name: u8,
        suffix_name: u8,
        affixes: [Option<u16>; 6],
    },
}

const GRADE_BITS: u32 = 3;
const AFFIX_BITS: u32 = 11;
const SET_UNIQUE_BITS: u32 = 12;
const RARE_NAME_BITS: u32 = 8;
/// Fixed width of the quality section in 1.07 records.
pub(crate) const FIXED_QUALITY_BITS: usize = 82;

impl QualityData {
    /// Data with every id zeroed, shaped for `quality`.
    pub fn empty_for(quality: Quality) -> Self {
        match quality {
            Quality::Inferior | Quality::Superior => Self::Grade(0),
            Quality::Normal => Self::None,
            Quality::Magic => Self::Magic {
                prefix: 0,
                suffix: 0,
            },
            Quality::Set => Self::Set(0),
            Quality::Unique => Self::Unique(0),
            Quality::Rare | Quality::Crafted => Self::Rare {
                prefix_name: 0,
                suffix_name: 0,
                affixes: [None; 6],
            },
        }
    }

    /// Returns `self` when its shape fits `quality`, otherwise an empty shape.
    pub fn shaped_for(self, quality: Quality) -> Self {
        if core::mem::discriminant(&self) == core::mem::discriminant(&Self::empty_for(quality)) {
            self
        } else {
            Self::empty_for(quality)
        }
    }

    /// Bits used in the variable layouts.
    pub fn variable_width(&self) -> usize {
        (match self {
            Self::None => 0,
            Self::Grade(_) => GRADE_BITS,
            Self::Magic { .. } => 2 * AFFIX_BITS,
            Self::Set(_) | Self::Unique(_) => SET_UNIQUE_BITS,
            Self::Rare { affixes, .. } => {
                2 * RARE_NAME_BITS
                    + affixes
                        .iter()
                        .map(|a| 1 + if a.is_some() { AFFIX_BITS } else { 0 })
                        .sum::<u32>()
            }
        }) as usize
    }

    pub(crate) fn read_variable(walker: &mut Walker<'_>, quality: Quality) -> Result<Self, CodecError> {
        Ok(match Self::empty_for(quality) {
            Self::None => Self::None,
            Self::Grade(_) => Self::Grade(walker.read(GRADE_BITS)? as u8),
            Self::Magic { .. } => Self::Magic {
                prefix: walker.read(AFFIX_BITS)? as u16,
                suffix: walker.read(AFFIX_BITS)? as u16,
            },
            Self::Set(_) => Self::Set(walker.read(SET_UNIQUE_BITS)? as u16),
            Self::Unique(_) => Self::Unique(walker.read(SET_UNIQUE_BITS)? as u16),
            Self::Rare { .. } => {
                let prefix_name = walker.read(RARE_NAME_BITS)? as u8;
                let suffix_name = walker.read(RARE_NAME_BITS)? as u8;
                let mut affixes = [None; 6];
                for slot in &mut affixes {
                    if walker.read(1)? == 1 {
                        *slot = Some(walker.read(AFFIX_BITS)? as u16);
                    }
                }
                Self::Rare {
                    prefix_name,
                    suffix_name,
                    affixes,
                }
            }
        })
    }

    pub(crate) fn write_variable(&self, buffer: &mut BitBuffer, cursor: &mut usize) {
        match *self {
            Self::None => {}
            Self::Grade(grade) => buffer.set_bits(cursor, GRADE_BITS, u32::from(grade)),
            Self::Magic { prefix, suffix } => {
                buffer.set_bits(cursor, AFFIX_BITS, u32::from(prefix));
                buffer.set_bits(cursor, AFFIX_BITS, u32::from(suffix));
            }
            Self::Set(id) | Self::Unique(id) => {
                buffer.set_bits(cursor, SET_UNIQUE_BITS, u32::from(id))
            }
            Self::Rare {
                prefix_name,
                suffix_name,
                affixes,
            } => {
                buffer.set_bits(cursor, RARE_NAME_BITS, u32::from(prefix_name));
                buffer.set_bits(cursor, RARE_NAME_BITS, u32::from(suffix_name));
                for affix in affixes {
                    match affix {
                        Some(id) => {
                            buffer.set_bits(cursor, 1, 1);
                            buffer.set_bits(cursor, AFFIX_BITS, u32::from(id));
                        }
                        None => buffer.set_bits(cursor, 1, 0),
                    }
                }
            }
        }
    }

    /// Reads the fixed 82-bit section of 1.07 records. Rare affix ids are
    /// stored without presence flags; zero means empty.
    pub(crate) fn read_fixed(walker: &mut Walker<'_>, quality: Quality) -> Result<Self, CodecError> {
        let start = walker.pos();
        walker.ensure(FIXED_QUALITY_BITS)?;
        let data = match Self::empty_for(quality) {
            Self::Rare { .. } => {
                let prefix_name = walker.read(RARE_NAME_BITS)? as u8;
                let suffix_name = walker.read(RARE_NAME_BITS)? as u8;
                let mut affixes = [None; 6];
                for slot in &mut affixes {
                    let id = walker.read(AFFIX_BITS)? as u16;
                    *slot = (id != 0).then_some(id);
                }
                Self::Rare {
                    prefix_name,
                    suffix_name,
                    affixes,
                }
            }
            _ => Self::read_variable(walker, quality)?,
        };
        walker.seek(start + FIXED_QUALITY_BITS);
        Ok(data)
    }

    pub(crate) fn write_fixed(&self, buffer: &mut BitBuffer, cursor: &mut usize) {
        let start = *cursor;
        match *self {
            Self::Rare {
                prefix_name,
                suffix_name,
                affixes,
            } => {
                buffer.set_bits(cursor, RARE_NAME_BITS, u32::from(prefix_name));
                buffer.set_bits(cursor, RARE_NAME_BITS, u32::from(suffix_name));
                for affix in affixes {
                    buffer.set_bits(cursor, AFFIX_BITS, u32::from(affix.unwrap_or(0)));
                }
            }
            _ => self.write_variable(buffer, cursor),
        }
        let used = *cursor - start;
        let mut pad = FIXED_QUALITY_BITS - used;
        while pad > 0 {
            let step = pad.min(32);
            buffer.set_bits(cursor, step as u32, 0);
            pad -= step;
        }
    }

    /// Fails when an id needs more bits than its slot holds.
    pub(crate) fn check_widths(&self) -> Result<(), CodecError> {
        let check = |width, value: u64| check_width(FieldId::QualityData, width, value);
        match *self {
            Self::None => Ok(()),
            Self::Grade(grade) => check(GRADE_BITS, u64::from(grade)),
            Self::Magic { prefix, suffix } => {
                check(AFFIX_BITS, u64::from(prefix))?;
                check(AFFIX_BITS, u64::from(suffix))
            }
            Self::Set(id) | Self::Unique(id) => check(SET_UNIQUE_BITS, u64::from(id)),
            Self::Rare { affixes, .. } => affixes
                .iter()
                .flatten()
                .try_for_each(|&id| check(AFFIX_BITS, u64::from(id))),
        }
    }

    /// Checks every referenced id against the catalogue.
    pub(crate) fn validate(&self, affixes: &dyn AffixOracle) -> Result<(), CodecError> {
        let unknown = |kind, id| CodecError::UnknownAffix { kind, id };
        match *self {
            Self::None | Self::Grade(_) => {}
            Self::Magic { prefix, suffix } => {
                if prefix != 0 && affixes.magic_prefix(prefix).is_none() {
                    return Err(unknown(AffixKind::MagicPrefix, prefix));
                }
                if suffix != 0 && affixes.magic_suffix(suffix).is_none() {
                    return Err(unknown(AffixKind::MagicSuffix, suffix));
                }
            }
            Self::Set(id) => {
                if affixes.set_item(id).is_none() {
                    return Err(unknown(AffixKind::SetItem, id));
                }
            }
            Self::Unique(id) => {
                if affixes.unique_item(id).is_none() {
                    return Err(unknown(AffixKind::Unique, id));
                }
            }
            Self::Rare {
                prefix_name,
                suffix_name,
                affixes: slots,
            } => {
                if affixes.rare_prefix(u16::from(prefix_name)).is_none() {
                    return Err(unknown(AffixKind::RarePrefix, u16::from(prefix_name)));
                }
                if affixes.rare_suffix(u16::from(suffix_name)).is_none() {
                    return Err(unknown(AffixKind::RareSuffix, u16::from(suffix_name)));
                }
                for (i, id) in slots.iter().enumerate() {
                    let Some(id) = *id else { continue };
                    let (found, kind) = if i % 2 == 0 {
                        (affixes.magic_prefix(id).is_some(), AffixKind::MagicPrefix)
                    } else {
                        (affixes.magic_suffix(id).is_some(), AffixKind::MagicSuffix)
                    };
                    if !found {
                        return Err(unknown(kind, id));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_values_follow_storage_order() {
        assert_eq!(Quality::try_from(4).unwrap(), Quality::Magic);
        assert_eq!(Quality::Crafted.bits(), 8);
        assert_eq!(Quality::try_from(0), Err(CodecError::UnknownQuality(0)));
        assert_eq!(Quality::try_from(9), Err(CodecError::UnknownQuality(9)));
    }

    #[test]
    fn rare_width_counts_presence_flags() {
        let data = QualityData::Rare {
            prefix_name: 1,
            suffix_name: 2,
            affixes: [Some(1), None, Some(3), None, None, None],
        };
        assert_eq!(data.variable_width(), 16 + 6 + 2 * 11);
    }

    #[test]
    fn fixed_section_is_always_82_bits() {
        let data = QualityData::Magic {
            prefix: 2,
            suffix: 3,
        };
        let mut buffer = BitBuffer::new();
        let mut cursor = 0;
        data.write_fixed(&mut buffer, &mut cursor);
        assert_eq!(cursor, FIXED_QUALITY_BITS);
        let mut walker = Walker::new(buffer.as_bytes(), 0);
        assert_eq!(QualityData::read_fixed(&mut walker, Quality::Magic).unwrap(), data);
        assert_eq!(walker.pos(), FIXED_QUALITY_BITS);
    }

    #[test]
    fn mismatched_shape_is_replaced() {
        let data = QualityData::Set(4).shaped_for(Quality::Magic);
        assert_eq!(
            data,
            QualityData::Magic {
                prefix: 0,
                suffix: 0
            }
        );
    }
}
